//! Console front end: line commands and events in, rendered text out
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::path::PathBuf;

use log::{debug, info};
use pagesim_core::{Event, Session, SAMPLE_PRESETS};
use pagesim_visualization::view::NavigationView;
use pagesim_visualization::{
    build_results_view, export_graph, render, render_catalog, render_form, render_navigation,
    render_samples, render_status, RenderOptions, StatusView,
};

use crate::command::{Command, HELP};

/// What the caller should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Print(String),
    Redraw,
    Nothing,
    Quit,
}

pub struct Console {
    session: Session,
    options: RenderOptions,
}

impl Console {
    pub fn new(session: Session, options: RenderOptions) -> Self {
        Self { session, options }
    }

    /// Form, results when loaded, and the status line
    pub fn screen(&self) -> String {
        let mut parts = vec![render_form(self.session.form(), &self.options)];
        if let Some(loaded) = self.session.result() {
            let view =
                build_results_view(loaded, self.session.playback(), self.session.active_tab());
            parts.push(render(&view, &self.options));
        }
        let status = self.status();
        if !status.is_empty() {
            parts.push(status);
        }
        parts.join("\n\n")
    }

    fn status(&self) -> String {
        render_status(
            &StatusView {
                loading: self.session.is_loading(),
                notice: self.session.notice().cloned(),
            },
            &self.options,
        )
    }

    /// Apply a completion or tick; returns text to show when anything changed
    pub fn on_event(&mut self, event: Event) -> Option<String> {
        self.session.handle_event(event).then(|| self.screen())
    }

    pub fn execute(&mut self, command: Command) -> Reply {
        debug!("command {command:?}");
        match command {
            Command::Run => {
                self.session.submit();
                Reply::Print(self.status())
            }
            Command::Random => {
                self.session.request_random_input();
                Reply::Print(self.status())
            }
            Command::Frames(frames) => {
                self.session.form_mut().frames = frames;
                Reply::Print(render_form(self.session.form(), &self.options))
            }
            Command::Reference(reference) => {
                self.session.form_mut().reference_string = reference;
                Reply::Print(render_form(self.session.form(), &self.options))
            }
            Command::Toggle(id) => match self.session.form_mut().algorithms.toggle(&id) {
                Some(_) => Reply::Print(render_form(self.session.form(), &self.options)),
                None => Reply::Print(format!("Unknown algorithm '{id}'")),
            },
            Command::Samples => Reply::Print(render_samples(SAMPLE_PRESETS, &self.options)),
            Command::Sample(index) => match SAMPLE_PRESETS.get(index) {
                Some(preset) => {
                    self.session.form_mut().apply_preset(preset);
                    Reply::Print(render_form(self.session.form(), &self.options))
                }
                None => Reply::Print(format!(
                    "No sample {}; there are {}.",
                    index + 1,
                    SAMPLE_PRESETS.len()
                )),
            },
            Command::Algorithms => match self.session.catalog() {
                Some(catalog) => Reply::Print(render_catalog(&catalog.entries(), &self.options)),
                None => Reply::Print("Algorithm information has not loaded.".to_string()),
            },
            Command::Key(key) => {
                if self.session.result().is_none() {
                    Reply::Print("Run a simulation first.".to_string())
                } else if self.session.handle_key(key) {
                    Reply::Redraw
                } else {
                    Reply::Nothing
                }
            }
            Command::Speed(speed) => {
                self.session.set_speed(speed);
                Reply::Print(self.navigation())
            }
            Command::Tab(index) => {
                if self.session.select_tab(index) {
                    Reply::Redraw
                } else {
                    Reply::Print(format!("No step-by-step tab {}", index + 1))
                }
            }
            Command::Save(path) => Reply::Print(self.save(path)),
            Command::Show => Reply::Redraw,
            Command::Help => Reply::Print(HELP.to_string()),
            Command::Quit => Reply::Quit,
            Command::Empty => Reply::Nothing,
        }
    }

    fn navigation(&self) -> String {
        let nav = NavigationView::from_playback(self.session.playback());
        render_navigation(&nav, &self.options)
    }

    fn save(&self, path: Option<PathBuf>) -> String {
        let Some(loaded) = self.session.result() else {
            return "Run a simulation first.".to_string();
        };
        let path = path.unwrap_or_else(|| self.session.config().graph_export_path.clone());
        match export_graph(loaded.response.graph.as_deref(), &path) {
            Ok(()) => {
                info!("comparison graph exported to {}", path.display());
                format!("Saved {}", path.display())
            }
            Err(err) => err.to_string(),
        }
    }
}
