//! Events delivered to the session's event loop
//!
//! Timer ticks and request completions all arrive on one channel and are
//! handled one at a time by [`crate::session::Session::handle_event`].
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use crate::error::ServiceResult;
use crate::model::{AlgorithmCatalog, RandomInput, SimulationRequest, SimulationResponse};
use crate::status::LoadingGuard;

/// Outcome of a request that raised the loading indicator. The indicator
/// stays up until this value is consumed.
#[derive(Debug)]
pub struct Completion<T> {
    pub outcome: T,
    loading: LoadingGuard,
}

impl<T> Completion<T> {
    pub fn new(outcome: T, loading: LoadingGuard) -> Self {
        Self { outcome, loading }
    }

    /// Split into the outcome and the guard holding the indicator
    pub fn into_parts(self) -> (T, LoadingGuard) {
        (self.outcome, self.loading)
    }
}

#[derive(Debug)]
pub enum Event {
    /// Playback timer fired
    Tick { generation: u64 },

    /// Simulation request finished
    Simulation {
        request: SimulationRequest,
        completion: Completion<ServiceResult<SimulationResponse>>,
    },

    /// Random input request finished
    RandomInput(Completion<ServiceResult<RandomInput>>),

    /// Algorithm catalog request finished
    Catalog(ServiceResult<AlgorithmCatalog>),
}

/// Keyboard shortcuts understood by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Space,
}
