//! Results view model
//!
//! A pure projection of a loaded simulation and the playback position into
//! everything the renderer draws. Gaps in the service payload fall back to
//! defaults here, so rendering never fails on partial data.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use pagesim_core::model::StepRecord;
use pagesim_core::{AlgorithmResult, LoadedResult, Notice, PlaybackState, Speed};
use serde_json::Value;

use crate::graph::GraphView;

/// Cell text for an empty frame slot or a missing replaced page
pub const EMPTY_CELL: &str = "-";

/// Frame columns drawn when the frame count exceeds every step's memory
pub const MAX_FRAME_COLUMNS: usize = 64;

/// Pane text for step-by-step data without step records
pub const TAB_PLACEHOLDER: &str = "Detailed step-by-step data is not available for this algorithm.";

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub summary: InputSummary,
    /// One section per algorithm, in service order
    pub sections: Vec<AlgorithmSection>,
    pub tabs: Option<TabView>,
    pub graph: GraphView,
    pub navigation: NavigationView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSummary {
    pub reference_string: String,
    pub frames: u32,
    pub total_pages: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlgorithmSection {
    /// Key of the result in the response
    pub key: String,
    pub title: String,
    pub stats: StatsBlock,
    pub table: StepTable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsBlock {
    pub page_faults: u64,
    /// Fault rate as a percentage, e.g. `62.5%`
    pub fault_rate: String,
    pub steps: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepTable {
    pub headers: Vec<String>,
    pub rows: Vec<StepRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Fault,
    Hit,
}

impl StepStatus {
    pub fn label(self) -> &'static str {
        match self {
            StepStatus::Fault => "Fault",
            StepStatus::Hit => "Hit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRow {
    pub step: usize,
    pub page: String,
    /// Exactly one cell per frame
    pub frames: Vec<String>,
    pub status: StepStatus,
    pub replaced: String,
    /// Row at the playback position
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub key: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabPane {
    Steps(StepTable),
    Placeholder(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabView {
    pub tabs: Vec<Tab>,
    pub active: usize,
    pub pane: TabPane,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationView {
    /// 1-based position, `3 / 8`
    pub position: String,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub playing: bool,
    pub speed: Speed,
}

impl NavigationView {
    pub fn from_playback(playback: &PlaybackState) -> Self {
        Self {
            position: playback.position_label(),
            prev_enabled: playback.can_step_back(),
            next_enabled: playback.can_step_forward(),
            playing: playback.is_playing(),
            speed: playback.speed(),
        }
    }
}

/// Loading indicator and message area
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusView {
    pub loading: bool,
    pub notice: Option<Notice>,
}

/// Build the view of a loaded result at the current playback position
pub fn build_results_view(
    loaded: &LoadedResult,
    playback: &PlaybackState,
    active_tab: usize,
) -> ResultsView {
    let response = &loaded.response;
    let frames = loaded.frames;
    let highlight = playback.is_loaded().then(|| playback.current_step());

    let reference_string = response
        .input
        .as_ref()
        .map(|input| input.reference_string.clone())
        .filter(|reference| !reference.is_empty())
        .unwrap_or_else(|| loaded.request.reference_string().to_string());

    let summary = InputSummary {
        reference_string,
        frames,
        total_pages: response.total_steps(),
    };

    let sections = response
        .results
        .iter()
        .map(|(key, result)| build_section(key, result, frames, highlight))
        .collect();

    let tabs = response
        .step_by_step
        .as_ref()
        .filter(|entries| !entries.is_empty())
        .map(|entries| {
            let tabs: Vec<Tab> = entries
                .keys()
                .map(|key| Tab {
                    key: key.to_string(),
                    label: key.to_uppercase(),
                })
                .collect();
            let active = if active_tab < tabs.len() { active_tab } else { 0 };
            let pane = entries
                .get_index(active)
                .and_then(|(_, data)| step_records(data))
                .map(|history| TabPane::Steps(build_table(&history, frames, highlight)))
                .unwrap_or(TabPane::Placeholder(TAB_PLACEHOLDER));
            TabView { tabs, active, pane }
        });

    ResultsView {
        summary,
        sections,
        tabs,
        graph: GraphView::from_encoded(response.graph.as_deref()),
        navigation: NavigationView::from_playback(playback),
    }
}

fn build_section(
    key: &str,
    result: &AlgorithmResult,
    frames: u32,
    highlight: Option<usize>,
) -> AlgorithmSection {
    let name = if result.name.is_empty() { key } else { result.name.as_str() };
    AlgorithmSection {
        key: key.to_string(),
        title: format!("{name} Results"),
        stats: StatsBlock {
            page_faults: result.page_faults,
            fault_rate: format_rate(result.page_fault_rate),
            steps: result.history.len(),
        },
        table: build_table(&result.history, frames, highlight),
    }
}

/// `0.625` -> `62.5%`. Halves round up, so `0.3125` -> `31.3%`.
pub fn format_rate(rate: f64) -> String {
    let percent = if rate.is_finite() {
        (rate * 1000.0).round() / 10.0
    } else {
        0.0
    };
    format!("{percent:.1}%")
}

/// Frame columns drawn for a history. A frame count far beyond anything
/// the steps hold is capped at the larger of the longest memory and
/// [`MAX_FRAME_COLUMNS`].
pub fn frame_columns(history: &[StepRecord], frames: u32) -> usize {
    let longest = history
        .iter()
        .map(|record| record.memory.len())
        .max()
        .unwrap_or(0);
    (frames as usize).min(longest.max(MAX_FRAME_COLUMNS))
}

pub fn table_headers(columns: usize) -> Vec<String> {
    let mut headers = vec!["Step".to_string(), "Page".to_string()];
    headers.extend((1..=columns).map(|slot| format!("Frame {slot}")));
    headers.push("Fault".to_string());
    headers.push("Replaced".to_string());
    headers
}

fn build_table(history: &[StepRecord], frames: u32, highlight: Option<usize>) -> StepTable {
    let columns = frame_columns(history, frames);
    let rows = history
        .iter()
        .enumerate()
        .map(|(index, record)| StepRow {
            step: index + 1,
            page: record
                .page
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| EMPTY_CELL.to_string()),
            frames: (0..columns)
                .map(|slot| match record.memory.get(slot) {
                    Some(Some(page)) => page.to_string(),
                    _ => EMPTY_CELL.to_string(),
                })
                .collect(),
            status: if record.fault { StepStatus::Fault } else { StepStatus::Hit },
            replaced: record
                .replaced
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| EMPTY_CELL.to_string()),
            current: highlight == Some(index),
        })
        .collect();

    StepTable {
        headers: table_headers(columns),
        rows,
    }
}

/// Step records carried by a step-by-step entry: either a bare list or an
/// object with a `history` list.
fn step_records(data: &Value) -> Option<Vec<StepRecord>> {
    let list = match data {
        Value::Array(_) => data,
        Value::Object(map) => map.get("history")?,
        _ => return None,
    };
    serde_json::from_value(list.clone()).ok()
}
