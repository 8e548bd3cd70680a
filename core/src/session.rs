//! Session controller
//!
//! One `Session` owns everything the client knows: the form, the current
//! result, playback state, the playback timer, the status slot and the
//! loading indicator. User actions are plain method calls; timer ticks and
//! request completions come back through the event channel returned by
//! [`Session::new`] and are applied with [`Session::handle_event`].
//!
//! Requests are not cancelled when a newer one is issued. Whichever
//! completion is handled last wins.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::sync::Arc;

use log::{debug, info, trace, warn};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::config::ClientConfig;
use crate::error::{ErrorKind, ServiceError, ServiceResult};
use crate::event::{Completion, Event, Key};
use crate::input::{self, FormState};
use crate::model::{AlgorithmCatalog, SimulationRequest, SimulationResponse};
use crate::playback::{PlaybackPhase, PlaybackState, Speed, TickOutcome};
use crate::service::ComputeService;
use crate::status::{LoadingIndicator, Notice, StatusSlot};
use crate::timer::PlaybackTimer;

/// Message shown when the random generator cannot be reached
pub const RANDOM_INPUT_FAILED: &str = "Failed to generate random input";

/// A successful simulation, the request that produced it and the frame
/// count it is drawn with
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedResult {
    pub response: SimulationResponse,
    pub request: SimulationRequest,
    pub frames: u32,
}

pub struct Session {
    config: ClientConfig,
    service: Arc<dyn ComputeService>,
    events: UnboundedSender<Event>,
    form: FormState,
    result: Option<LoadedResult>,
    playback: PlaybackState,
    timer: PlaybackTimer,
    status: StatusSlot,
    loading: LoadingIndicator,
    catalog: Option<AlgorithmCatalog>,
    active_tab: usize,
}

impl Session {
    /// Create a session and the receiver its events arrive on
    pub fn new(
        config: ClientConfig,
        service: Arc<dyn ComputeService>,
    ) -> (Self, UnboundedReceiver<Event>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let playback = PlaybackState::new(config.default_speed);
        let session = Self {
            config,
            service,
            timer: PlaybackTimer::new(events.clone()),
            events,
            form: FormState::default(),
            result: None,
            playback,
            status: StatusSlot::default(),
            loading: LoadingIndicator::default(),
            catalog: None,
            active_tab: 0,
        };
        (session, receiver)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    pub fn result(&self) -> Option<&LoadedResult> {
        self.result.as_ref()
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.playback.phase()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.status.notice()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_active()
    }

    pub fn catalog(&self) -> Option<&AlgorithmCatalog> {
        self.catalog.as_ref()
    }

    pub fn active_tab(&self) -> usize {
        self.active_tab
    }

    pub fn timer_active(&self) -> bool {
        self.timer.is_active()
    }

    pub fn timer_generation(&self) -> u64 {
        self.timer.generation()
    }

    /// Validate the form and dispatch a simulation.
    ///
    /// Validation failures are shown and nothing is sent. Otherwise any
    /// running playback stops, the error slot clears and the loading
    /// indicator stays up until the completion is handled. Returns whether a
    /// request was dispatched. Must be called from within a tokio runtime.
    pub fn submit(&mut self) -> bool {
        let request = match input::collect(&self.form) {
            Ok(request) => request,
            Err(err) => {
                debug!("submission rejected: {err}");
                self.status.show(Notice::validation(err.to_string()));
                return false;
            }
        };

        self.stop_playback();
        self.status.clear();
        let loading = self.loading.begin();
        debug!(
            "dispatching simulation of {:?} over {} frame(s)",
            request.reference_string(),
            request.frames()
        );

        let call = request.clone();
        self.dispatch(
            move |service| service.run_simulation(&call),
            move |outcome| Event::Simulation {
                request,
                completion: Completion::new(outcome, loading),
            },
        );
        true
    }

    /// Ask the service for a random reference string and frame count
    pub fn request_random_input(&mut self) {
        let length = self.config.random_length;
        let loading = self.loading.begin();
        self.dispatch(
            move |service| service.fetch_random_input(length),
            move |outcome| Event::RandomInput(Completion::new(outcome, loading)),
        );
    }

    /// Fetch algorithm metadata. Best effort: failures are only logged.
    pub fn load_algorithm_catalog(&self) {
        self.dispatch(
            |service| service.fetch_algorithm_catalog(),
            Event::Catalog,
        );
    }

    fn dispatch<T, F, W>(&self, call: F, wrap: W)
    where
        T: Send + 'static,
        F: FnOnce(&dyn ComputeService) -> ServiceResult<T> + Send + 'static,
        W: FnOnce(ServiceResult<T>) -> Event + Send + 'static,
    {
        let service = Arc::clone(&self.service);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = tokio::task::spawn_blocking(move || call(service.as_ref()))
                .await
                .unwrap_or_else(|err| Err(ServiceError::Task(err.to_string())));
            if events.send(wrap(outcome)).is_err() {
                debug!("session closed before a completion was delivered");
            }
        });
    }

    /// Apply an event from the channel. Returns whether anything visible
    /// changed.
    pub fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Tick { generation } => self.on_tick(generation),
            Event::Simulation { request, completion } => {
                let (outcome, _loading) = completion.into_parts();
                match outcome.and_then(reject_business_error) {
                    Ok(response) => self.load_result(response, request),
                    Err(err) => {
                        warn!("simulation failed: {err}");
                        let notice = match err.kind() {
                            ErrorKind::Validation => Notice::validation(err.to_string()),
                            ErrorKind::Connectivity => {
                                Notice::connectivity(format!("Failed to connect to server: {err}"))
                            }
                        };
                        self.status.show(notice);
                    }
                }
                true
            }
            Event::RandomInput(completion) => {
                let (outcome, _loading) = completion.into_parts();
                match outcome {
                    Ok(random) => {
                        debug!(
                            "random input: {:?} with {} frame(s)",
                            random.reference_string, random.frames
                        );
                        self.form.apply_random(&random);
                        self.status.clear();
                    }
                    Err(err) => {
                        warn!("random input failed: {err}");
                        self.status.show(Notice::connectivity(RANDOM_INPUT_FAILED));
                    }
                }
                true
            }
            Event::Catalog(outcome) => {
                match outcome {
                    Ok(catalog) => {
                        info!("Algorithm info loaded: {} entries", catalog.len());
                        self.catalog = Some(catalog);
                    }
                    Err(err) => warn!("Could not load algorithm info: {err}"),
                }
                false
            }
        }
    }

    fn on_tick(&mut self, generation: u64) -> bool {
        if !self.timer.is_current(generation) {
            trace!("ignoring tick from stale timer {generation}");
            return false;
        }
        match self.playback.tick() {
            TickOutcome::Advanced => true,
            TickOutcome::Finished => {
                self.timer.cancel();
                debug!("playback reached the last step");
                true
            }
            TickOutcome::Ignored => {
                self.timer.cancel();
                false
            }
        }
    }

    fn load_result(&mut self, response: SimulationResponse, request: SimulationRequest) {
        self.stop_playback();
        let frames = response.frames_or(request.frames());
        let total_steps = response.total_steps();
        info!(
            "loaded {} algorithm result(s), {} step(s), {} frame(s)",
            response.results.len(),
            total_steps,
            frames
        );
        self.playback.load(total_steps);
        self.active_tab = 0;
        self.result = Some(LoadedResult {
            response,
            request,
            frames,
        });
        self.status.clear();
    }

    fn stop_playback(&mut self) {
        self.timer.cancel();
        self.playback.stop();
    }

    /// Move the current step by `delta`; out-of-range moves are no-ops
    pub fn change_step(&mut self, delta: isize) -> bool {
        if self.result.is_none() {
            return false;
        }
        self.playback.change_step(delta)
    }

    /// Start auto-advance. Already playing is a no-op, so at most one timer
    /// ever runs.
    pub fn play(&mut self) -> bool {
        if self.result.is_none() || !self.playback.start() {
            return false;
        }
        self.timer.start(self.playback.speed().period());
        true
    }

    pub fn pause(&mut self) -> bool {
        let was_playing = self.playback.is_playing();
        self.stop_playback();
        was_playing
    }

    /// Play/pause toggle
    pub fn toggle_play(&mut self) -> bool {
        if self.result.is_none() {
            return false;
        }
        if self.playback.is_playing() {
            self.pause()
        } else {
            self.play()
        }
    }

    /// Change the auto-advance speed; a running timer restarts at the new
    /// period without moving the current step.
    pub fn set_speed(&mut self, speed: Speed) {
        self.playback.set_speed(speed);
        if self.playback.is_playing() {
            self.timer.start(speed.period());
        }
    }

    /// Keyboard shortcuts, active only once a result exists
    pub fn handle_key(&mut self, key: Key) -> bool {
        if self.result.is_none() {
            return false;
        }
        match key {
            Key::ArrowLeft if self.playback.can_step_back() => self.change_step(-1),
            Key::ArrowRight if self.playback.can_step_forward() => self.change_step(1),
            Key::Space => self.toggle_play(),
            _ => false,
        }
    }

    /// Activate a step-by-step tab
    pub fn select_tab(&mut self, index: usize) -> bool {
        let tabs = self
            .result
            .as_ref()
            .and_then(|loaded| loaded.response.step_by_step.as_ref())
            .map_or(0, |tabs| tabs.len());
        if index >= tabs {
            return false;
        }
        self.active_tab = index;
        true
    }
}

fn reject_business_error(response: SimulationResponse) -> ServiceResult<SimulationResponse> {
    match response.error_message() {
        Some(message) => Err(ServiceError::Rejected(message.to_string())),
        None => Ok(response),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use serde_json::json;
    use tokio::time::Instant;

    use crate::model::{AlgorithmId, RandomInput};

    struct MockService {
        simulation: ServiceResult<SimulationResponse>,
        random: ServiceResult<RandomInput>,
        catalog: ServiceResult<AlgorithmCatalog>,
        calls: AtomicUsize,
    }

    impl MockService {
        fn with_simulation(simulation: ServiceResult<SimulationResponse>) -> Arc<Self> {
            Arc::new(Self {
                simulation,
                random: Err(ServiceError::Transport("connection refused".into())),
                catalog: Err(ServiceError::Transport("connection refused".into())),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ComputeService for MockService {
        fn run_simulation(&self, _request: &SimulationRequest) -> ServiceResult<SimulationResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.simulation.clone()
        }

        fn fetch_random_input(&self, _length: usize) -> ServiceResult<RandomInput> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.random.clone()
        }

        fn fetch_algorithm_catalog(&self) -> ServiceResult<AlgorithmCatalog> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.catalog.clone()
        }
    }

    fn response_with_steps(steps: usize) -> SimulationResponse {
        let history: Vec<_> = (0..steps)
            .map(|i| json!({"page": i, "memory": [i], "fault": true, "replaced": null}))
            .collect();
        serde_json::from_value(json!({
            "results": {"FIFO": {"name": "FIFO", "page_faults": steps, "history": history}},
            "input": {"frames": 3, "reference_string": "x", "total_pages": steps},
            "step_by_step": {"fifo": [], "lru": []}
        }))
        .unwrap()
    }

    fn session_with(service: Arc<MockService>) -> (Session, UnboundedReceiver<Event>) {
        let (mut session, rx) = Session::new(ClientConfig::default(), service);
        session.form_mut().reference_string = "7,0,1,2,0,3,0,4".into();
        session.form_mut().algorithms.toggle(&AlgorithmId::new("fifo"));
        (session, rx)
    }

    async fn pump(session: &mut Session, rx: &mut UnboundedReceiver<Event>) -> bool {
        let event = rx.recv().await.expect("event channel closed");
        session.handle_event(event)
    }

    async fn loaded_session(steps: usize) -> (Session, UnboundedReceiver<Event>) {
        let (mut session, mut rx) = session_with(MockService::with_simulation(Ok(response_with_steps(steps))));
        assert!(session.submit());
        pump(&mut session, &mut rx).await;
        assert_eq!(session.phase(), PlaybackPhase::Ready);
        (session, rx)
    }

    #[tokio::test]
    async fn test_no_algorithm_rejected_before_any_call() {
        let service = MockService::with_simulation(Ok(response_with_steps(3)));
        let (mut session, mut rx) = Session::new(ClientConfig::default(), service.clone());
        session.form_mut().reference_string = "1 2 3".into();

        assert!(!session.submit());
        assert_eq!(
            session.notice().unwrap(),
            &Notice::validation("Please select at least one algorithm")
        );
        assert!(!session.is_loading());
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
        assert_eq!(service.calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_reference_rejected_before_any_call() {
        let service = MockService::with_simulation(Ok(response_with_steps(3)));
        let (mut session, _rx) = session_with(service.clone());
        session.form_mut().reference_string = "   ".into();

        assert!(!session.submit());
        assert_eq!(session.notice().unwrap().message, "Please enter a reference string");
        assert_eq!(service.calls(), 0);
    }

    #[tokio::test]
    async fn test_successful_submit_enters_ready() {
        let service = MockService::with_simulation(Ok(response_with_steps(8)));
        let (mut session, mut rx) = session_with(service.clone());
        session.form_mut().reference_string.clear();
        session.submit();
        assert!(session.notice().is_some());

        session.form_mut().reference_string = "7,0,1,2,0,3,0,4".into();
        assert!(session.submit());
        assert!(session.is_loading());
        assert!(session.notice().is_none());
        assert_eq!(session.phase(), PlaybackPhase::Idle);

        pump(&mut session, &mut rx).await;
        assert!(!session.is_loading());
        assert_eq!(service.calls(), 1);
        assert_eq!(session.phase(), PlaybackPhase::Ready);
        assert_eq!(session.playback().current_step(), 0);
        assert_eq!(session.playback().total_steps(), 8);
        assert!(!session.playback().can_step_back());
        assert!(session.playback().can_step_forward());
        assert_eq!(session.result().unwrap().frames, 3);
    }

    #[tokio::test]
    async fn test_business_error_is_validation_and_keeps_prior_result() {
        let (mut session, mut rx) = loaded_session(4).await;
        session.service = MockService::with_simulation(Err(ServiceError::Rejected("Invalid format".into())));

        session.submit();
        pump(&mut session, &mut rx).await;
        let notice = session.notice().unwrap();
        assert_eq!(notice.kind, ErrorKind::Validation);
        assert_eq!(notice.message, "Invalid format");
        assert!(session.result().is_some());
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_error_field_on_success_body_is_rejected() {
        let response: SimulationResponse =
            serde_json::from_value(json!({"success": false, "error": "Frames must be >= 1"})).unwrap();
        let (mut session, mut rx) = session_with(MockService::with_simulation(Ok(response)));
        session.submit();
        pump(&mut session, &mut rx).await;
        assert_eq!(session.notice().unwrap().message, "Frames must be >= 1");
        assert_eq!(session.phase(), PlaybackPhase::Idle);
    }

    #[tokio::test]
    async fn test_network_failure_is_connectivity_and_clears_loading() {
        let service = MockService::with_simulation(Err(ServiceError::Transport("connection refused".into())));
        let (mut session, mut rx) = session_with(service);
        session.submit();
        assert!(session.is_loading());
        pump(&mut session, &mut rx).await;

        let notice = session.notice().unwrap();
        assert_eq!(notice.kind, ErrorKind::Connectivity);
        assert!(notice.message.starts_with("Failed to connect to server: "));
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_random_failure_leaves_form_untouched() {
        let (mut session, mut rx) = session_with(MockService::with_simulation(Ok(response_with_steps(1))));
        session.form_mut().frames = "4".into();
        let before = session.form().clone();

        session.request_random_input();
        assert!(session.is_loading());
        pump(&mut session, &mut rx).await;

        assert_eq!(session.form(), &before);
        assert_eq!(session.notice().unwrap(), &Notice::connectivity(RANDOM_INPUT_FAILED));
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_random_success_fills_form() {
        let service = Arc::new(MockService {
            simulation: Ok(SimulationResponse::default()),
            random: Ok(RandomInput {
                reference_string: "3 1 4 1 5".into(),
                frames: 4,
            }),
            catalog: Ok(AlgorithmCatalog::default()),
            calls: AtomicUsize::new(0),
        });
        let (mut session, mut rx) = session_with(service);
        session.request_random_input();
        pump(&mut session, &mut rx).await;
        assert_eq!(session.form().reference_string, "3 1 4 1 5");
        assert_eq!(session.form().frames, "4");
        assert!(session.notice().is_none());
    }

    #[tokio::test]
    async fn test_catalog_failure_is_silent() {
        let (mut session, mut rx) = session_with(MockService::with_simulation(Ok(response_with_steps(1))));
        session.load_algorithm_catalog();
        assert!(!pump(&mut session, &mut rx).await);
        assert!(session.notice().is_none());
        assert!(session.catalog().is_none());
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_navigation_without_result_is_noop() {
        let (mut session, _rx) = session_with(MockService::with_simulation(Ok(response_with_steps(1))));
        assert!(!session.change_step(1));
        assert!(!session.toggle_play());
        assert!(!session.handle_key(Key::Space));
        assert!(!session.handle_key(Key::ArrowRight));
        assert!(!session.timer_active());
    }

    #[tokio::test]
    async fn test_keys_respect_disabled_controls() {
        let (mut session, _rx) = loaded_session(3).await;
        assert!(!session.handle_key(Key::ArrowLeft));
        assert_eq!(session.playback().current_step(), 0);
        assert!(session.handle_key(Key::ArrowRight));
        assert!(session.handle_key(Key::ArrowRight));
        assert!(!session.handle_key(Key::ArrowRight));
        assert_eq!(session.playback().current_step(), 2);
        assert!(session.handle_key(Key::ArrowLeft));
        assert_eq!(session.playback().current_step(), 1);

        assert!(session.handle_key(Key::Space));
        assert_eq!(session.phase(), PlaybackPhase::Playing);
        assert!(session.handle_key(Key::Space));
        assert_eq!(session.phase(), PlaybackPhase::Ready);
        assert!(!session.timer_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_twice_keeps_one_timer() {
        let (mut session, mut rx) = loaded_session(8).await;
        assert!(session.play());
        assert!(!session.play());
        assert_eq!(session.timer_generation(), 1);
        assert!(session.timer_active());

        assert!(pump(&mut session, &mut rx).await);
        assert_eq!(session.playback().current_step(), 1);

        assert!(session.toggle_play());
        assert!(!session.timer_active());
        assert_eq!(session.phase(), PlaybackPhase::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_playback_stops_at_last_step() {
        let (mut session, mut rx) = loaded_session(3).await;
        session.play();
        pump(&mut session, &mut rx).await;
        pump(&mut session, &mut rx).await;
        assert_eq!(session.playback().current_step(), 2);
        assert!(session.timer_active());

        pump(&mut session, &mut rx).await;
        assert_eq!(session.phase(), PlaybackPhase::Ready);
        assert_eq!(session.playback().current_step(), 2);
        assert!(!session.timer_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_speed_change_mid_playback() {
        let (mut session, mut rx) = loaded_session(8).await;
        let started = Instant::now();
        session.play();
        pump(&mut session, &mut rx).await;
        assert_eq!(started.elapsed(), Duration::from_millis(500));
        assert_eq!(session.playback().current_step(), 1);

        session.set_speed(Speed::Fast);
        assert_eq!(session.playback().current_step(), 1);
        assert!(session.playback().is_playing());

        pump(&mut session, &mut rx).await;
        assert_eq!(started.elapsed(), Duration::from_millis(800));
        assert_eq!(session.playback().current_step(), 2);

        session.set_speed(Speed::Slow);
        pump(&mut session, &mut rx).await;
        assert_eq!(started.elapsed(), Duration::from_millis(1800));
        assert_eq!(session.playback().current_step(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_speed_change_while_paused_does_not_start_timer() {
        let (mut session, _rx) = loaded_session(8).await;
        session.set_speed(Speed::Slow);
        assert!(!session.timer_active());
        assert_eq!(session.playback().speed(), Speed::Slow);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_tick_is_ignored() {
        let (mut session, _rx) = loaded_session(8).await;
        session.play();
        let generation = session.timer_generation();
        session.pause();
        assert!(!session.handle_event(Event::Tick { generation }));
        assert_eq!(session.playback().current_step(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resubmit_while_playing_resets_playback() {
        let (mut session, mut rx) = loaded_session(8).await;
        session.play();
        pump(&mut session, &mut rx).await;
        assert_eq!(session.playback().current_step(), 1);

        assert!(session.submit());
        assert!(!session.timer_active());
        assert_eq!(session.phase(), PlaybackPhase::Ready);

        // the first event after resubmitting is the completion; no ticks remain
        pump(&mut session, &mut rx).await;
        assert_eq!(session.playback().current_step(), 0);
        assert_eq!(session.phase(), PlaybackPhase::Ready);
    }

    #[tokio::test]
    async fn test_select_tab_bounds() {
        let (mut session, _rx) = loaded_session(2).await;
        assert_eq!(session.active_tab(), 0);
        assert!(session.select_tab(1));
        assert_eq!(session.active_tab(), 1);
        assert!(!session.select_tab(2));
        assert_eq!(session.active_tab(), 1);
    }

    #[tokio::test]
    async fn test_new_result_resets_active_tab() {
        let (mut session, mut rx) = loaded_session(2).await;
        assert!(session.select_tab(1));
        assert_eq!(session.active_tab(), 1);

        assert!(session.submit());
        assert!(pump(&mut session, &mut rx).await);
        assert_eq!(session.phase(), PlaybackPhase::Ready);
        assert_eq!(session.active_tab(), 0);
    }

    #[tokio::test]
    async fn test_dropped_completion_releases_loading() {
        let (mut session, rx) = session_with(MockService::with_simulation(Ok(response_with_steps(2))));
        drop(rx);
        session.submit();
        assert!(session.is_loading());
        for _ in 0..100 {
            if !session.is_loading() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(!session.is_loading());
    }
}
