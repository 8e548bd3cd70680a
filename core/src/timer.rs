//! Playback timer
//!
//! A repeating tokio task that posts [`Event::Tick`] at a fixed period.
//! At most one task runs per timer: `start` always cancels the previous one
//! first. Every start bumps a generation number that the ticks carry, so a
//! tick queued by a cancelled task can be recognised and ignored.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::time::Duration;

use log::debug;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::event::Event;

pub struct PlaybackTimer {
    events: UnboundedSender<Event>,
    task: Option<JoinHandle<()>>,
    generation: u64,
    period: Option<Duration>,
}

impl PlaybackTimer {
    pub fn new(events: UnboundedSender<Event>) -> Self {
        Self {
            events,
            task: None,
            generation: 0,
            period: None,
        }
    }

    /// Start ticking every `period`, replacing any running task.
    /// The first tick fires one full period after the call.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, period: Duration) -> u64 {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;
        let events = self.events.clone();

        self.task = Some(tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if events.send(Event::Tick { generation }).is_err() {
                    break;
                }
            }
        }));
        self.period = Some(period);
        debug!("playback timer {generation} started at {period:?}");
        generation
    }

    /// Stop the running task. Cancelling an idle timer is a no-op.
    pub fn cancel(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                task.abort();
                self.period = None;
                debug!("playback timer {} cancelled", self.generation);
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Whether a tick of `generation` comes from the running task
    pub fn is_current(&self, generation: u64) -> bool {
        self.task.is_some() && generation == self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn period(&self) -> Option<Duration> {
        self.period
    }
}

impl Drop for PlaybackTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
