//! Rendering errors
//!
//! Missing or partial result data is never an error here; only exporting
//! the comparison graph can fail.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No comparison graph in the current result")]
    NoGraph,

    #[error("Comparison graph is not valid base64: {0}")]
    InvalidGraph(#[from] base64::DecodeError),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
