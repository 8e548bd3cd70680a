//! Text renderer
//!
//! Turns view models into terminal text. Everything here is pure: the same
//! view and options always give the same string.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt::Write as _;

use pagesim_core::input::SamplePreset;
use pagesim_core::model::AlgorithmInfo;
use pagesim_core::{ErrorKind, FormState};
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table,
};

use crate::graph::GraphView;
use crate::theme::{styled, Theme};
use crate::view::{
    AlgorithmSection, InputSummary, NavigationView, ResultsView, StatusView, StepTable, TabPane,
    TabView,
};

/// Marker in front of the step number of the current row
pub const CURRENT_MARKER: &str = "▶";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { color: true }
    }
}

impl RenderOptions {
    pub fn theme(&self) -> Theme {
        Theme::for_color(self.color)
    }
}

/// Render the full results screen
pub fn render(view: &ResultsView, options: &RenderOptions) -> String {
    let theme = options.theme();
    let mut out = String::new();

    render_summary(&mut out, &view.summary, &theme);
    for section in &view.sections {
        out.push('\n');
        render_section(&mut out, section, &theme);
    }
    if let Some(tabs) = &view.tabs {
        out.push('\n');
        render_tabs(&mut out, tabs, &theme);
    }
    out.push('\n');
    render_graph(&mut out, &view.graph, &theme);
    out.push('\n');
    out.push_str(&render_navigation(&view.navigation, options));
    out.push('\n');
    out
}

fn render_summary(out: &mut String, summary: &InputSummary, theme: &Theme) {
    let _ = writeln!(out, "{}", styled("Input", theme.title));
    let _ = writeln!(
        out,
        "  {} {}",
        styled("Reference string:", theme.label),
        summary.reference_string
    );
    let _ = writeln!(out, "  {} {}", styled("Frames:", theme.label), summary.frames);
    let _ = writeln!(
        out,
        "  {} {}",
        styled("Total pages:", theme.label),
        summary.total_pages
    );
}

fn render_section(out: &mut String, section: &AlgorithmSection, theme: &Theme) {
    let _ = writeln!(out, "{}", styled(&section.title, theme.title));
    let _ = writeln!(
        out,
        "  {} {}   {} {}   {} {}",
        styled("Page faults:", theme.label),
        styled(section.stats.page_faults, theme.fault),
        styled("Fault rate:", theme.label),
        section.stats.fault_rate,
        styled("Steps:", theme.label),
        section.stats.steps
    );
    if section.table.rows.is_empty() {
        let _ = writeln!(out, "  {}", styled("No steps recorded.", theme.muted));
    } else {
        let _ = writeln!(out, "{}", render_step_table(&section.table));
    }
}

/// Draw a step table with rounded borders. The current row carries the
/// marker in its step cell.
pub fn render_step_table(table: &StepTable) -> String {
    if table.headers.is_empty() && table.rows.is_empty() {
        return String::new();
    }

    let mut data: Vec<Vec<String>> = Vec::with_capacity(table.rows.len() + 1);
    data.push(table.headers.clone());
    for row in &table.rows {
        let marker = if row.current { CURRENT_MARKER } else { " " };
        let mut cells = Vec::with_capacity(row.frames.len() + 4);
        cells.push(format!("{marker} {}", row.step));
        cells.push(row.page.clone());
        cells.extend(row.frames.iter().cloned());
        cells.push(row.status.label().to_string());
        cells.push(row.replaced.clone());
        data.push(cells);
    }

    Table::from_iter(data)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string()
}

fn render_tabs(out: &mut String, tabs: &TabView, theme: &Theme) {
    let _ = writeln!(out, "{}", styled("Step-by-Step Execution", theme.title));
    let labels: Vec<String> = tabs
        .tabs
        .iter()
        .enumerate()
        .map(|(index, tab)| {
            if index == tabs.active {
                styled(format!("[{}]", tab.label), theme.active)
            } else {
                styled(format!(" {} ", tab.label), theme.muted)
            }
        })
        .collect();
    let _ = writeln!(out, "  {}", labels.join(" "));

    match &tabs.pane {
        TabPane::Steps(table) if table.rows.is_empty() => {
            let _ = writeln!(out, "  {}", styled("No steps recorded.", theme.muted));
        }
        TabPane::Steps(table) => {
            let _ = writeln!(out, "{}", render_step_table(table));
        }
        TabPane::Placeholder(message) => {
            let _ = writeln!(out, "  {}", styled(message, theme.muted));
        }
    }
}

fn render_graph(out: &mut String, graph: &GraphView, theme: &Theme) {
    let _ = writeln!(out, "{}", styled("Page Fault Comparison", theme.title));
    match graph {
        GraphView::Image(image) => {
            let kind = if image.is_png() { "PNG image" } else { "image" };
            let _ = writeln!(
                out,
                "  {kind}, {} bytes {}",
                image.len(),
                styled("(save to export)", theme.muted)
            );
        }
        GraphView::Placeholder(message) => {
            let _ = writeln!(out, "  {}", styled(message, theme.muted));
        }
    }
}

/// One-line navigation bar: prev, position, next, play state and speed
pub fn render_navigation(nav: &NavigationView, options: &RenderOptions) -> String {
    let theme = options.theme();
    let button = |label: &str, enabled: bool| {
        if enabled {
            format!("[{label}]")
        } else {
            styled(format!("({label})"), theme.muted)
        }
    };
    let play = if nav.playing { "Pause" } else { "Play" };
    format!(
        "{} Step {} {} [{}] Speed: {}",
        button("◀ prev", nav.prev_enabled),
        nav.position,
        button("next ▶", nav.next_enabled),
        play,
        nav.speed
    )
}

/// Loading indicator and the error slot. Empty when there is nothing to say.
pub fn render_status(status: &StatusView, options: &RenderOptions) -> String {
    let theme = options.theme();
    let mut lines = Vec::new();
    if status.loading {
        lines.push(styled("Loading...", theme.info));
    }
    if let Some(notice) = &status.notice {
        let style = match notice.kind {
            ErrorKind::Validation => theme.warning,
            ErrorKind::Connectivity => theme.error,
        };
        lines.push(styled(&notice.message, style));
    }
    lines.join("\n")
}

/// Current form contents with the algorithm selector
pub fn render_form(form: &FormState, options: &RenderOptions) -> String {
    let theme = options.theme();
    let mut out = String::new();
    let _ = writeln!(out, "{}", styled("Simulation Input", theme.title));
    let _ = writeln!(out, "  {} {}", styled("Frames:", theme.label), form.frames);
    let reference = if form.reference_string.trim().is_empty() {
        styled("(empty)", theme.muted)
    } else {
        form.reference_string.clone()
    };
    let _ = writeln!(out, "  {} {}", styled("Reference string:", theme.label), reference);
    let selector: Vec<String> = form
        .algorithms
        .options()
        .iter()
        .map(|option| {
            let mark = if option.selected { "x" } else { " " };
            format!("[{mark}] {}", option.id)
        })
        .collect();
    let _ = write!(out, "  {} {}", styled("Algorithms:", theme.label), selector.join("  "));
    out
}

/// Algorithm catalog as published by the service
pub fn render_catalog(entries: &[AlgorithmInfo], options: &RenderOptions) -> String {
    if entries.is_empty() {
        return styled("No algorithm information available.", options.theme().muted);
    }
    let mut data = vec![vec![
        "Id".to_string(),
        "Name".to_string(),
        "Description".to_string(),
    ]];
    data.extend(
        entries
            .iter()
            .map(|info| vec![info.id.clone(), info.name.clone(), info.description.clone()]),
    );
    Table::from_iter(data)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string()
}

/// Numbered list of sample inputs, 1-based
pub fn render_samples(samples: &[SamplePreset], options: &RenderOptions) -> String {
    let theme = options.theme();
    samples
        .iter()
        .enumerate()
        .map(|(index, sample)| {
            format!(
                "  {}. {} {} {}",
                index + 1,
                styled(sample.label, theme.label),
                sample.reference_string,
                styled(format!("({} frames)", sample.frames), theme.muted)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
