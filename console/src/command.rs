//! Line commands read from stdin
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::path::PathBuf;

use pagesim_core::{AlgorithmId, Key, Speed};
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  run                      submit the form
  random                   fill the form with a random reference string
  frames <n>               set the frame count
  ref <string>             set the reference string
  toggle <algorithm>       select or deselect fifo, lru or optimal
  samples                  list the sample inputs
  sample <n>               load sample n into the form
  algorithms               describe the available algorithms
  prev | left | h          previous step
  next | right | l         next step
  play | pause | space | p toggle auto-advance
  speed <fast|medium|slow> set the auto-advance speed
  tab <n>                  show step-by-step tab n
  save [path]              export the comparison graph
  show                     redraw the form and results
  help                     this text
  quit                     exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run,
    Random,
    Frames(String),
    Reference(String),
    Toggle(AlgorithmId),
    Samples,
    /// 0-based sample index
    Sample(usize),
    Algorithms,
    Key(Key),
    Speed(Speed),
    /// 0-based tab index
    Tab(usize),
    Save(Option<PathBuf>),
    Show,
    Help,
    Quit,
    Empty,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type 'help' for the list of commands.")]
    Unknown(String),

    #[error("'{0}' needs an argument. Type 'help' for usage.")]
    MissingArgument(&'static str),

    #[error("Invalid argument for '{command}': {value}")]
    InvalidArgument { command: &'static str, value: String },
}

/// Parse one input line
pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "" => Command::Empty,
        "run" => Command::Run,
        "random" => Command::Random,
        "frames" => Command::Frames(required("frames", rest)?.to_string()),
        "ref" => Command::Reference(required("ref", rest)?.to_string()),
        "toggle" => Command::Toggle(AlgorithmId::new(required("toggle", rest)?)),
        "samples" => Command::Samples,
        "sample" => Command::Sample(index("sample", rest)?),
        "algorithms" => Command::Algorithms,
        "prev" | "left" | "h" => Command::Key(Key::ArrowLeft),
        "next" | "right" | "l" => Command::Key(Key::ArrowRight),
        "play" | "pause" | "space" | "p" => Command::Key(Key::Space),
        "speed" => {
            let value = required("speed", rest)?;
            Command::Speed(value.parse().map_err(|_| CommandError::InvalidArgument {
                command: "speed",
                value: value.to_string(),
            })?)
        }
        "tab" => Command::Tab(index("tab", rest)?),
        "save" => Command::Save((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => return Err(CommandError::Unknown(word.to_string())),
    };
    Ok(command)
}

fn required<'a>(command: &'static str, rest: &'a str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument(command))
    } else {
        Ok(rest)
    }
}

/// 1-based position as typed, 0-based index as used
fn index(command: &'static str, rest: &str) -> Result<usize, CommandError> {
    let value = required(command, rest)?;
    match value.parse::<usize>() {
        Ok(position) if position >= 1 => Ok(position - 1),
        _ => Err(CommandError::InvalidArgument {
            command,
            value: value.to_string(),
        }),
    }
}
