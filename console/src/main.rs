//! `pagesim`: terminal front end for the page-replacement visualizer
//!
//! Reads line commands from stdin and redraws the form and results after
//! every change. Logs go to stderr (`RUST_LOG`, default `warn`).
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

mod app;
mod cli;
mod command;

use std::sync::Arc;

use clap::Parser;
use log::info;
use pagesim_core::{HttpComputeService, Session};
use pagesim_visualization::RenderOptions;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::app::{Console, Reply};
use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = cli.load_config()?;
    info!("computation service at {}", config.normalized_base_url());

    let options = RenderOptions {
        color: config.color,
    };
    let service = Arc::new(HttpComputeService::new(&config));
    let (mut session, mut events) = Session::new(config, service);
    cli.prefill(session.form_mut());
    session.load_algorithm_catalog();

    let mut console = Console::new(session, options);
    println!("{}", console.screen());
    println!("Type 'help' for the list of commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match command::parse(&line) {
                    Ok(command) => match console.execute(command) {
                        Reply::Print(text) if !text.is_empty() => println!("{text}"),
                        Reply::Print(_) | Reply::Nothing => {}
                        Reply::Redraw => println!("{}", console.screen()),
                        Reply::Quit => break,
                    },
                    Err(err) => println!("{err}"),
                }
            }
            Some(event) = events.recv() => {
                if let Some(screen) = console.on_event(event) {
                    println!("{screen}");
                }
            }
        }
    }
    Ok(())
}
