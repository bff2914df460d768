//! Fixed-interval fetch-and-render loops.
//!
//! Each loop owns its view (and whatever cache backs it) plus its error
//! dedup state; nothing is shared between loops. Ticks are issued on a
//! fixed schedule independent of response latency, so requests from
//! consecutive ticks may overlap and the last response to arrive wins.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use futures_util::StreamExt;
use gloo_timers::future::IntervalStream;
use serde::de::DeserializeOwned;
use shared_types::{ENDPOINT_NODES_LIST, ENDPOINT_PERFORMANCE_SUMMARY, ENDPOINT_UPTIME};
use wasm_bindgen_futures::spawn_local;

use crate::api::{request_json, FetchError, HttpMethod};
use crate::render::ActivityLevel;
use crate::sink::ActivitySink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSpec {
    pub name: &'static str,
    pub endpoint: &'static str,
    pub method: HttpMethod,
    pub interval: Duration,
    pub error_prefix: &'static str,
}

impl PollSpec {
    fn interval_millis(&self) -> u32 {
        u32::try_from(self.interval.as_millis()).unwrap_or(u32::MAX)
    }
}

pub const NODES_POLL: PollSpec = PollSpec {
    name: "nodes",
    endpoint: ENDPOINT_NODES_LIST,
    method: HttpMethod::Get,
    interval: Duration::from_secs(5),
    error_prefix: "Node status update failed: ",
};

pub const UPTIME_POLL: PollSpec = PollSpec {
    name: "uptime",
    endpoint: ENDPOINT_UPTIME,
    method: HttpMethod::Get,
    interval: Duration::from_secs(1),
    error_prefix: "Uptime update failed: ",
};

pub const PERFORMANCE_POLL: PollSpec = PollSpec {
    name: "performance",
    endpoint: ENDPOINT_PERFORMANCE_SUMMARY,
    method: HttpMethod::Get,
    interval: Duration::from_secs(10),
    error_prefix: "Performance update failed: ",
};

/// Suppresses repeats of the same failure message until a success
/// clears it. Two outages with the same message and no success in
/// between collapse into one notice.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ErrorDedup {
    last_error: Option<String>,
}

impl ErrorDedup {
    /// Returns the message when it should be surfaced.
    pub fn failure(&mut self, message: String) -> Option<String> {
        if self.last_error.as_deref() == Some(message.as_str()) {
            return None;
        }
        self.last_error = Some(message.clone());
        Some(message)
    }

    pub fn success(&mut self) {
        self.last_error = None;
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

/// A render sink for one data source. The payload replaces whatever the
/// view held before; there is no merging.
pub trait PollView: 'static {
    type Payload: DeserializeOwned + 'static;

    fn render(&mut self, payload: Self::Payload);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    Idle,
    InFlight,
    Cooldown,
}

pub struct PollLoop<V: PollView> {
    spec: PollSpec,
    view: V,
    errors: ErrorDedup,
    phase: LoopPhase,
    in_flight: u32,
    ticks: u64,
}

impl<V: PollView> PollLoop<V> {
    pub fn new(spec: PollSpec, view: V) -> Self {
        Self {
            spec,
            view,
            errors: ErrorDedup::default(),
            phase: LoopPhase::Idle,
            in_flight: 0,
            ticks: 0,
        }
    }

    pub fn spec(&self) -> &PollSpec {
        &self.spec
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn in_flight(&self) -> u32 {
        self.in_flight
    }

    pub fn last_error(&self) -> Option<&str> {
        self.errors.last_error()
    }

    /// Ticks issued since the loop started
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    fn set_phase(&mut self, next: LoopPhase) {
        if self.phase != next {
            log::debug!("{} poll {:?} -> {:?}", self.spec.name, self.phase, next);
            self.phase = next;
        }
    }

    /// The interval has elapsed. A loop cooling down with nothing in
    /// flight goes back to idle; outstanding requests keep it in flight.
    pub fn rest(&mut self) {
        if self.phase == LoopPhase::Cooldown && self.in_flight == 0 {
            self.set_phase(LoopPhase::Idle);
        }
    }

    pub fn begin_tick(&mut self) {
        self.rest();
        self.ticks += 1;
        self.in_flight += 1;
        self.set_phase(LoopPhase::InFlight);
    }

    /// Apply one response. Returns the operator notice to emit, if any.
    pub fn complete(&mut self, outcome: Result<V::Payload, FetchError>) -> Option<String> {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.in_flight == 0 {
            self.set_phase(LoopPhase::Cooldown);
        }

        match outcome {
            Ok(payload) => {
                self.errors.success();
                self.view.render(payload);
                None
            }
            Err(e) => {
                if let FetchError::Decode(_) = e {
                    log::warn!("{} poll got a malformed payload: {}", self.spec.name, e);
                } else {
                    log::debug!("{} poll failed: {}", self.spec.name, e);
                }
                self.errors
                    .failure(e.to_string())
                    .map(|message| format!("{}{}", self.spec.error_prefix, message))
            }
        }
    }
}

/// Start a loop: one tick now, then one per interval for the rest of the
/// page session. Failures never stop the schedule.
pub fn start<V: PollView>(
    spec: PollSpec,
    view: V,
    sink: Rc<dyn ActivitySink>,
) -> Rc<RefCell<PollLoop<V>>> {
    let poll = Rc::new(RefCell::new(PollLoop::new(spec, view)));
    let runner = Rc::clone(&poll);

    spawn_local(async move {
        let mut ticks = IntervalStream::new(spec.interval_millis());
        tick(&runner, &sink);
        while ticks.next().await.is_some() {
            runner.borrow_mut().rest();
            tick(&runner, &sink);
        }
    });

    log::info!(
        "started {} poll every {:?} ({})",
        spec.name,
        spec.interval,
        spec.endpoint
    );
    poll
}

fn tick<V: PollView>(poll: &Rc<RefCell<PollLoop<V>>>, sink: &Rc<dyn ActivitySink>) {
    let spec = {
        let mut poll = poll.borrow_mut();
        poll.begin_tick();
        *poll.spec()
    };

    let poll = Rc::clone(poll);
    let sink = Rc::clone(sink);
    spawn_local(async move {
        let outcome = request_json::<V::Payload>(spec.method, spec.endpoint).await;
        let notice = poll.borrow_mut().complete(outcome);
        if let Some(message) = notice {
            sink.report(ActivityLevel::Error, &message);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountView {
        latest: Option<u32>,
        renders: usize,
    }

    impl PollView for CountView {
        type Payload = u32;

        fn render(&mut self, payload: u32) {
            self.latest = Some(payload);
            self.renders += 1;
        }
    }

    fn down() -> Result<u32, FetchError> {
        Err(FetchError::Status(503))
    }

    #[test]
    fn sustained_failure_emits_once() {
        let mut poll = PollLoop::new(UPTIME_POLL, CountView::default());
        let mut notices = Vec::new();

        for _ in 0..5 {
            poll.begin_tick();
            notices.extend(poll.complete(down()));
        }
        assert_eq!(notices, vec!["Uptime update failed: HTTP 503".to_string()]);

        poll.begin_tick();
        assert_eq!(poll.complete(Ok(7)), None);
        assert_eq!(poll.last_error(), None);
        assert_eq!(poll.view().latest, Some(7));

        // A success ends the outage, so the same message is a new one.
        poll.begin_tick();
        assert!(poll.complete(down()).is_some());
    }

    #[test]
    fn changed_message_is_reported() {
        let mut poll = PollLoop::new(NODES_POLL, CountView::default());
        poll.begin_tick();
        assert!(poll.complete(down()).is_some());
        poll.begin_tick();
        let notice = poll.complete(Err(FetchError::Network("Failed to fetch".into())));
        assert_eq!(
            notice.as_deref(),
            Some("Node status update failed: request failed: Failed to fetch")
        );
        poll.begin_tick();
        assert_eq!(
            poll.complete(down()).as_deref(),
            Some("Node status update failed: HTTP 503")
        );
    }

    #[test]
    fn phases_follow_overlapping_ticks() {
        let mut poll = PollLoop::new(PERFORMANCE_POLL, CountView::default());
        assert_eq!(poll.phase(), LoopPhase::Idle);

        poll.begin_tick();
        poll.begin_tick();
        assert_eq!(poll.in_flight(), 2);
        assert_eq!(poll.phase(), LoopPhase::InFlight);

        // Responses land out of order; the last one to arrive wins.
        poll.complete(Ok(2));
        assert_eq!(poll.phase(), LoopPhase::InFlight);
        poll.complete(Ok(1));
        assert_eq!(poll.phase(), LoopPhase::Cooldown);
        assert_eq!(poll.view().latest, Some(1));
        assert_eq!(poll.view().renders, 2);

        poll.rest();
        assert_eq!(poll.phase(), LoopPhase::Idle);
        assert_eq!(poll.ticks(), 2);
    }

    #[test]
    fn cooldown_returns_to_idle_before_next_tick() {
        let mut poll = PollLoop::new(UPTIME_POLL, CountView::default());
        poll.begin_tick();
        poll.complete(Ok(1));
        assert_eq!(poll.phase(), LoopPhase::Cooldown);

        poll.rest();
        assert_eq!(poll.phase(), LoopPhase::Idle);
        poll.begin_tick();
        assert_eq!(poll.phase(), LoopPhase::InFlight);
    }

    #[test]
    fn rest_keeps_outstanding_requests_in_flight() {
        let mut poll = PollLoop::new(NODES_POLL, CountView::default());
        poll.begin_tick();
        poll.rest();
        assert_eq!(poll.phase(), LoopPhase::InFlight);
        assert_eq!(poll.in_flight(), 1);
    }

    #[test]
    fn malformed_payload_is_reported_with_prefix() {
        let mut poll = PollLoop::new(UPTIME_POLL, CountView::default());
        poll.begin_tick();
        let notice = poll.complete(Err(FetchError::Decode("expected value".into())));
        assert_eq!(
            notice.as_deref(),
            Some("Uptime update failed: failed to parse JSON: expected value")
        );
    }

    #[test]
    fn failure_keeps_previous_render() {
        let mut poll = PollLoop::new(NODES_POLL, CountView::default());
        poll.begin_tick();
        poll.complete(Ok(3));
        poll.begin_tick();
        poll.complete(down());
        assert_eq!(poll.view().latest, Some(3));
        assert_eq!(poll.view().renders, 1);
    }

    #[test]
    fn dedup_state_is_per_loop() {
        let mut nodes = PollLoop::new(NODES_POLL, CountView::default());
        let mut uptime = PollLoop::new(UPTIME_POLL, CountView::default());

        nodes.begin_tick();
        assert!(nodes.complete(down()).is_some());
        uptime.begin_tick();
        assert!(uptime.complete(down()).is_some());
    }

    #[test]
    fn specs_match_intervals() {
        assert_eq!(NODES_POLL.interval_millis(), 5_000);
        assert_eq!(UPTIME_POLL.interval_millis(), 1_000);
        assert_eq!(PERFORMANCE_POLL.interval_millis(), 10_000);
        assert!([NODES_POLL, UPTIME_POLL, PERFORMANCE_POLL]
            .iter()
            .all(|spec| spec.method == HttpMethod::Get));
    }
}
