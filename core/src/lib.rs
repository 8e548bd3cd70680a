//! PAGESIM core: the client-side controller of the page-replacement visualizer
//!
//! The simulations themselves run in an external computation service. This
//! crate collects input, dispatches requests to that service, owns the
//! loaded results and drives step-by-step playback over them.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod config;
pub mod error;
pub mod event;
pub mod input;
pub mod model;
pub mod playback;
pub mod service;
pub mod session;
pub mod status;
pub mod timer;

pub use config::ClientConfig;
pub use error::{ConfigError, ErrorKind, InputError, ServiceError, ServiceResult};
pub use event::{Event, Key};
pub use input::{FormState, SamplePreset, SAMPLE_PRESETS};
pub use model::{
    AlgorithmCatalog, AlgorithmId, AlgorithmResult, PageId, SimulationRequest,
    SimulationResponse, StepRecord,
};
pub use playback::{PlaybackPhase, PlaybackState, Speed};
pub use service::{ComputeService, HttpComputeService};
pub use session::{LoadedResult, Session};
pub use status::Notice;
