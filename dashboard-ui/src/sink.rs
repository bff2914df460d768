//! Deferred activity sink.
//!
//! Producers may record activity before the footer (home of the log and
//! alert surfaces) has been injected. Events are buffered until a render
//! target first appears, drained in recording order, and from then on the
//! buffer is bypassed for the rest of the page session.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::Utc;
use wasm_bindgen_futures::spawn_local;

use crate::dom;
use crate::frame::next_frame;
use crate::render::{activity_entry, ActivityLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderTarget {
    Log,
    Alerts,
}

impl RenderTarget {
    pub const ALL: [RenderTarget; 2] = [RenderTarget::Log, RenderTarget::Alerts];

    pub fn element_id(self) -> &'static str {
        match self {
            RenderTarget::Log => "activity-log",
            RenderTarget::Alerts => "alert-log",
        }
    }
}

/// Where rendered events end up. The browser implementation is
/// [`DomSurfaces`].
pub trait EventSurfaces {
    fn is_present(&self, target: RenderTarget) -> bool;
    /// Insert `fragment` above everything already in `target`.
    fn prepend(&self, target: RenderTarget, fragment: &str);
}

/// Operator channel. Recording never blocks and never fails.
pub trait ActivitySink {
    fn record(&self, fragment: String);

    fn report(&self, level: ActivityLevel, message: &str) {
        self.record(activity_entry(level, message, Utc::now()));
    }
}

pub struct DeferredSink<S> {
    surfaces: S,
    buffer: RefCell<Vec<String>>,
    latched: Cell<bool>,
    watching: Cell<bool>,
}

impl<S: EventSurfaces> DeferredSink<S> {
    pub fn new(surfaces: S) -> Self {
        Self {
            surfaces,
            buffer: RefCell::new(Vec::new()),
            latched: Cell::new(false),
            watching: Cell::new(false),
        }
    }

    pub fn surfaces(&self) -> &S {
        &self.surfaces
    }

    pub fn is_latched(&self) -> bool {
        self.latched.get()
    }

    pub fn buffered_len(&self) -> usize {
        self.buffer.borrow().len()
    }

    fn present_targets(&self) -> Vec<RenderTarget> {
        RenderTarget::ALL
            .into_iter()
            .filter(|target| self.surfaces.is_present(*target))
            .collect()
    }

    fn deliver(&self, fragment: &str, targets: &[RenderTarget]) {
        for target in targets {
            self.surfaces.prepend(*target, fragment);
        }
    }

    /// Latch and drain the buffer, oldest first, into `targets`.
    fn flush_into(&self, targets: &[RenderTarget]) {
        self.latched.set(true);
        let drained = std::mem::take(&mut *self.buffer.borrow_mut());
        log::debug!(
            "activity sink latched, flushing {} buffered event(s) into {:?}",
            drained.len(),
            targets
        );
        for fragment in &drained {
            self.deliver(fragment, targets);
        }
    }

    /// Flush if any target is present. Returns true once the sink has latched.
    pub fn try_flush(&self) -> bool {
        if self.latched.get() {
            return true;
        }
        let targets = self.present_targets();
        if targets.is_empty() {
            return false;
        }
        self.flush_into(&targets);
        true
    }
}

impl<S: EventSurfaces + 'static> DeferredSink<S> {
    /// Watch for a render target once per frame until the latch closes.
    /// Calling this more than once does not start a second watcher.
    pub fn watch(self: &Rc<Self>) {
        if self.watching.replace(true) {
            return;
        }
        let sink = Rc::clone(self);
        spawn_local(async move {
            while !sink.try_flush() {
                next_frame().await;
            }
        });
    }
}

impl<S: EventSurfaces> ActivitySink for DeferredSink<S> {
    fn record(&self, fragment: String) {
        let targets = self.present_targets();

        if self.latched.get() {
            // Missing surfaces after the latch are a silent no-op.
            self.deliver(&fragment, &targets);
            return;
        }

        if targets.is_empty() {
            self.buffer.borrow_mut().push(fragment);
            return;
        }

        // A target showed up before the watcher's next frame; keep order.
        self.flush_into(&targets);
        self.deliver(&fragment, &targets);
    }
}

/// Render targets looked up by id in the live document
#[derive(Debug, Default, Clone, Copy)]
pub struct DomSurfaces;

impl EventSurfaces for DomSurfaces {
    fn is_present(&self, target: RenderTarget) -> bool {
        dom::by_id(target.element_id()).is_some()
    }

    fn prepend(&self, target: RenderTarget, fragment: &str) {
        if let Some(element) = dom::by_id(target.element_id()) {
            if let Err(e) = element.insert_adjacent_html("afterbegin", fragment) {
                log::warn!("failed to prepend into #{}: {:?}", target.element_id(), e);
            }
        }
    }
}
