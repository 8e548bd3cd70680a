//! PAGESIM visualization: results view models and terminal rendering
//!
//! `view` projects a loaded simulation and the playback position into a
//! view model, `render` turns view models into text, and `graph` handles
//! the comparison image shipped by the service.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod error;
pub mod graph;
pub mod render;
pub mod theme;
pub mod view;

pub use error::RenderError;
pub use graph::{export_graph, GraphImage, GraphView, GRAPH_PLACEHOLDER};
pub use render::{
    render, render_catalog, render_form, render_navigation, render_samples, render_status,
    render_step_table, RenderOptions,
};
pub use theme::Theme;
pub use view::{build_results_view, ResultsView, StatusView};
