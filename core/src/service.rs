//! Request dispatcher
//!
//! [`ComputeService`] is the seam to the external computation service that
//! runs the actual page-replacement simulations. [`HttpComputeService`]
//! talks to it over HTTP/JSON with a blocking `ureq` agent; the session
//! runs those calls on tokio's blocking pool.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::{debug, trace};
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::model::{AlgorithmCatalog, RandomInput, SimulationRequest, SimulationResponse};

/// Operations offered by the computation service
pub trait ComputeService: Send + Sync {
    /// Simulate `request`. A response carrying an `error` field is reported
    /// as [`ServiceError::Rejected`].
    fn run_simulation(&self, request: &SimulationRequest) -> ServiceResult<SimulationResponse>;

    /// Ask for a random reference string of `length` pages
    fn fetch_random_input(&self, length: usize) -> ServiceResult<RandomInput>;

    /// Fetch descriptive metadata about the available algorithms
    fn fetch_algorithm_catalog(&self) -> ServiceResult<AlgorithmCatalog>;
}

/// HTTP client for the computation service
#[derive(Debug, Clone)]
pub struct HttpComputeService {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpComputeService {
    pub fn new(config: &ClientConfig) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Self {
            agent: builder.build(),
            base_url: config.normalized_base_url().to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_json<T: DeserializeOwned>(&self, request: ureq::Request) -> ServiceResult<T> {
        let response = request.call()?;
        response
            .into_json()
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

impl ComputeService for HttpComputeService {
    fn run_simulation(&self, request: &SimulationRequest) -> ServiceResult<SimulationResponse> {
        let url = self.url("/api/calculate");
        debug!(
            "POST {url} frames={} algorithms={:?}",
            request.frames(),
            request.algorithms()
        );

        let response = match self
            .agent
            .post(&url)
            .set("Content-Type", "application/json")
            .send_json(request)
        {
            Ok(response) => response,
            // Validation failures come back as 4xx with the message in the body
            Err(ureq::Error::Status(code, response)) => {
                let rejection = response
                    .into_json::<SimulationResponse>()
                    .ok()
                    .and_then(|body| body.error_message().map(str::to_string));
                return Err(match rejection {
                    Some(message) => ServiceError::Rejected(message),
                    None => ServiceError::Status(code),
                });
            }
            Err(err) => return Err(err.into()),
        };

        let body: SimulationResponse = response
            .into_json()
            .map_err(|e| ServiceError::Decode(e.to_string()))?;
        if let Some(message) = body.error_message() {
            return Err(ServiceError::Rejected(message.to_string()));
        }
        trace!("simulation returned {} result(s)", body.results.len());
        Ok(body)
    }

    fn fetch_random_input(&self, length: usize) -> ServiceResult<RandomInput> {
        let url = self.url("/api/random");
        debug!("GET {url}?length={length}");
        self.get_json(self.agent.get(&url).query("length", &length.to_string()))
    }

    fn fetch_algorithm_catalog(&self) -> ServiceResult<AlgorithmCatalog> {
        let url = self.url("/api/algorithms");
        debug!("GET {url}");
        self.get_json(self.agent.get(&url))
    }
}
