//! Comparison graph
//!
//! The service renders the fault-count comparison itself and ships it as a
//! base64 PNG. This module decodes it, reports a placeholder when it is
//! missing, and exports it to disk.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, warn};

use crate::error::RenderError;

/// Text shown when no graph is available
pub const GRAPH_PLACEHOLDER: &str = "Could not generate graph.";

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Decoded comparison graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphImage {
    bytes: Vec<u8>,
}

impl GraphImage {
    /// Decode a base64 image as sent by the service
    pub fn decode(encoded: &str) -> Result<Self, RenderError> {
        let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = STANDARD.decode(compact)?;
        Ok(Self { bytes })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn is_png(&self) -> bool {
        self.bytes.starts_with(PNG_SIGNATURE)
    }

    /// Write the image to `path`
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let path = path.as_ref();
        std::fs::write(path, &self.bytes).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("saved comparison graph ({} bytes) to {}", self.bytes.len(), path.display());
        Ok(())
    }
}

/// Graph slot of the results view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphView {
    Image(GraphImage),
    Placeholder(&'static str),
}

impl GraphView {
    /// Build from the optional base64 field; undecodable data shows the
    /// placeholder like missing data does.
    pub fn from_encoded(encoded: Option<&str>) -> Self {
        match encoded.filter(|text| !text.trim().is_empty()) {
            Some(text) => match GraphImage::decode(text) {
                Ok(image) => GraphView::Image(image),
                Err(err) => {
                    warn!("ignoring comparison graph: {err}");
                    GraphView::Placeholder(GRAPH_PLACEHOLDER)
                }
            },
            None => GraphView::Placeholder(GRAPH_PLACEHOLDER),
        }
    }

    pub fn image(&self) -> Option<&GraphImage> {
        match self {
            GraphView::Image(image) => Some(image),
            GraphView::Placeholder(_) => None,
        }
    }
}

/// Export the graph of a result, if it has one
pub fn export_graph(encoded: Option<&str>, path: impl AsRef<Path>) -> Result<(), RenderError> {
    match GraphView::from_encoded(encoded) {
        GraphView::Image(image) => image.save(path),
        GraphView::Placeholder(_) => Err(RenderError::NoGraph),
    }
}
