//! Wire and view-state data model
//!
//! Types exchanged with the computation service. Decoding is deliberately
//! lenient: any optional field the service leaves out (or sends as `null`)
//! decodes to its default so rendering never has to fail on partial data.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::InputError;

/// Frame count used when the form value cannot be used
pub const DEFAULT_FRAMES: u32 = 3;

/// Identifier of a page-replacement algorithm as the service knows it
/// (`fifo`, `lru`, `optimal`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlgorithmId(String);

impl AlgorithmId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Algorithms offered by a stock service, in display order
    pub fn builtin() -> Vec<AlgorithmId> {
        ["fifo", "lru", "optimal"].into_iter().map(AlgorithmId::new).collect()
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Page identifier. The service sends integers, but anything scalar is
/// accepted and kept as display text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PageId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(PageId(s)),
            Value::Number(n) => Ok(PageId(n.to_string())),
            Value::Bool(b) => Ok(PageId(b.to_string())),
            other => Err(de::Error::custom(format!(
                "unsupported page identifier: {other}"
            ))),
        }
    }
}

/// `null` decodes like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `null`, `false` and `""` all mean "nothing was replaced"
fn replaced_page<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<PageId>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null | Value::Bool(false) => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(PageId(s))),
        Value::Number(n) => Ok(Some(PageId(n.to_string()))),
        Value::Bool(true) => Ok(Some(PageId("true".to_string()))),
        other => Err(de::Error::custom(format!(
            "unsupported replaced page: {other}"
        ))),
    }
}

/// A validated simulation request.
///
/// Only constructible through [`SimulationRequest::new`] (or the input
/// collector), so a value always has at least one algorithm and a
/// non-blank reference string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationRequest {
    frames: u32,
    reference_string: String,
    algorithms: Vec<AlgorithmId>,
}

impl SimulationRequest {
    /// Build a request, enforcing the submission invariants.
    ///
    /// A frame count of zero is raised to one.
    pub fn new(
        frames: u32,
        reference_string: impl Into<String>,
        algorithms: Vec<AlgorithmId>,
    ) -> Result<Self, InputError> {
        let reference_string = reference_string.into();
        if algorithms.is_empty() {
            return Err(InputError::NoAlgorithmSelected);
        }
        if reference_string.trim().is_empty() {
            return Err(InputError::EmptyReferenceString);
        }
        Ok(Self {
            frames: frames.max(1),
            reference_string,
            algorithms,
        })
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn reference_string(&self) -> &str {
        &self.reference_string
    }

    pub fn algorithms(&self) -> &[AlgorithmId] {
        &self.algorithms
    }
}

/// One step of a simulated run
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StepRecord {
    /// 1-based step number, when the service reports it
    #[serde(default)]
    pub step: Option<usize>,

    /// Page referenced at this step
    #[serde(default)]
    pub page: Option<PageId>,

    /// Frame contents after the reference; `None` slots are empty
    #[serde(default, deserialize_with = "null_as_default")]
    pub memory: Vec<Option<PageId>>,

    /// Whether the reference faulted
    #[serde(default, deserialize_with = "null_as_default")]
    pub fault: bool,

    /// Page evicted to make room, if any
    #[serde(default, deserialize_with = "replaced_page")]
    pub replaced: Option<PageId>,
}

/// Per-algorithm outcome
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AlgorithmResult {
    /// Display name (`FIFO`, `LRU`, `Optimal`)
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub page_faults: u64,

    /// Fraction of references that faulted, in `[0, 1]`
    #[serde(default, deserialize_with = "null_as_default")]
    pub page_fault_rate: f64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub history: Vec<StepRecord>,

    #[serde(default)]
    pub total: Option<usize>,
}

/// Echo of the input as the service understood it
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InputEcho {
    #[serde(default, deserialize_with = "null_as_default")]
    pub reference_string: String,

    #[serde(default)]
    pub frames: Option<u32>,

    #[serde(default)]
    pub total_pages: Option<usize>,
}

/// Response to a simulation request
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationResponse {
    #[serde(default)]
    pub success: Option<bool>,

    /// Results keyed by algorithm, in service order
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: IndexMap<String, AlgorithmResult>,

    #[serde(default)]
    pub input: Option<InputEcho>,

    #[serde(default)]
    pub total_pages: Option<usize>,

    /// Base64-encoded PNG comparing fault counts
    #[serde(default)]
    pub graph: Option<String>,

    /// Optional per-algorithm breakdown shown as tabs
    #[serde(default)]
    pub step_by_step: Option<IndexMap<String, Value>>,

    /// Business-rule failure reported by the service
    #[serde(default)]
    pub error: Option<String>,
}

impl SimulationResponse {
    /// Business error message, if the service reported a non-empty one
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|msg| !msg.is_empty())
    }

    /// Number of playback steps.
    ///
    /// Prefers the top-level `total_pages`, then the input echo, then the
    /// longest history.
    pub fn total_steps(&self) -> usize {
        self.total_pages
            .or_else(|| self.input.as_ref().and_then(|input| input.total_pages))
            .unwrap_or_else(|| {
                self.results
                    .values()
                    .map(|result| result.history.len())
                    .max()
                    .unwrap_or(0)
            })
    }

    /// Frame count echoed by the service, or `fallback`
    pub fn frames_or(&self, fallback: u32) -> u32 {
        self.input
            .as_ref()
            .and_then(|input| input.frames)
            .filter(|&frames| frames > 0)
            .unwrap_or(fallback)
    }
}

/// Suggested input from the random generator endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RandomInput {
    pub reference_string: String,
    pub frames: u32,
}

/// Descriptive entry of the algorithm catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Algorithm metadata published by the service. The shape is informational,
/// so entries are kept as raw JSON and interpreted on demand.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct AlgorithmCatalog(IndexMap<String, Value>);

impl AlgorithmCatalog {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries with whatever `name` / `description` they carry
    pub fn entries(&self) -> Vec<AlgorithmInfo> {
        self.0
            .iter()
            .map(|(id, value)| {
                let field = |key: &str| {
                    value
                        .get(key)
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string()
                };
                let name = field("name");
                AlgorithmInfo {
                    id: id.to_string(),
                    name: if name.is_empty() { id.to_uppercase() } else { name },
                    description: field("description"),
                }
            })
            .collect()
    }
}
