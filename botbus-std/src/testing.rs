//! Testing utilities for botbus.
//!
//! This module provides probe handlers that make dispatch behavior easy to
//! assert on: what ran, in what order, how often, and what faulted.
//!
//! # Features
//!
//! - [`RecordingHandler`]: records every event it receives
//! - [`CountingHandler`]: counts invocations on any channel
//! - [`FailingHandler`] / [`PanickingHandler`]: always fault
//! - [`OrderProbe`]: shared log of which labelled handler ran when
//! - [`FixedTransform`]: a transform stage with a canned answer
//! - [`FaultCollector`]: a [`FaultObserver`] that keeps every report

use crate::dispatch::{FaultObserver, FaultReport};
use botbus_core::{Channel, Handler, HandlerResult, Payload, TransformHandler, TransformResult};
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicUsize, Ordering},
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Recording Handler
// ============================================================================

/// A handler that records all events it receives.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingHandler::<MessageEvent>::new();
/// bus.register_message(Arc::new(recorder.clone()));
///
/// bus.dispatch_message(&event);
/// assert_eq!(recorder.events(), vec![event]);
/// ```
pub struct RecordingHandler<E: Clone> {
    events: Arc<Mutex<Vec<E>>>,
}

impl<E: Clone> RecordingHandler<E> {
    /// Create a new recording handler.
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get a clone of the recorded events.
    pub fn events(&self) -> Vec<E> {
        lock(&self.events).clone()
    }

    /// Get the number of recorded events.
    pub fn count(&self) -> usize {
        lock(&self.events).len()
    }

    /// Clear all recorded events.
    pub fn clear(&self) {
        lock(&self.events).clear();
    }
}

impl<E: Clone> Default for RecordingHandler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone> Clone for RecordingHandler<E> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
        }
    }
}

impl<E: Payload + Clone> Handler<E> for RecordingHandler<E> {
    fn handle(&self, event: &E) -> HandlerResult {
        lock(&self.events).push(event.clone());
        Ok(())
    }
}

// ============================================================================
// Counting Handler
// ============================================================================

/// A handler that counts invocations, on any channel.
///
/// Clones share the counter but are distinct handlers: registering two
/// clones registers two handlers.
pub struct CountingHandler {
    count: Arc<AtomicUsize>,
}

impl CountingHandler {
    /// Create a new counting handler.
    pub fn new() -> Self {
        Self {
            count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl Default for CountingHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for CountingHandler {
    fn clone(&self) -> Self {
        Self {
            count: self.count.clone(),
        }
    }
}

impl<E: Payload> Handler<E> for CountingHandler {
    fn handle(&self, _event: &E) -> HandlerResult {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// Faulting Handlers
// ============================================================================

/// A handler that always returns an error with the given message.
#[derive(Debug, Clone)]
pub struct FailingHandler {
    message: String,
    calls: Arc<AtomicUsize>,
}

impl FailingHandler {
    /// Create a handler failing with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// How many times the handler was invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<E: Payload> Handler<E> for FailingHandler {
    fn handle(&self, _event: &E) -> HandlerResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.message.clone().into())
    }
}

impl TransformHandler for FailingHandler {
    fn transform(&self, _text: &str, _target_id: &str, _kind: i32) -> TransformResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.message.clone().into())
    }
}

/// A handler that always panics with the given message.
#[derive(Debug, Clone)]
pub struct PanickingHandler {
    message: String,
}

impl PanickingHandler {
    /// Create a handler panicking with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl<E: Payload> Handler<E> for PanickingHandler {
    fn handle(&self, _event: &E) -> HandlerResult {
        panic!("{}", self.message)
    }
}

impl TransformHandler for PanickingHandler {
    fn transform(&self, _text: &str, _target_id: &str, _kind: i32) -> TransformResult {
        panic!("{}", self.message)
    }
}

// ============================================================================
// Order Probe
// ============================================================================

/// A shared log of handler invocations, by label.
///
/// # Example
///
/// ```rust,ignore
/// let probe = OrderProbe::new();
/// bus.register_message_with_priority(Arc::new(probe.handler("low")), Priority::Low);
/// bus.register_message_with_priority(Arc::new(probe.handler("high")), Priority::High);
///
/// bus.dispatch_message(&event);
/// assert_eq!(probe.order(), vec!["high", "low"]);
/// ```
#[derive(Clone, Default)]
pub struct OrderProbe {
    log: Arc<Mutex<Vec<&'static str>>>,
}

impl OrderProbe {
    /// Create an empty probe.
    pub fn new() -> Self {
        Self::default()
    }

    /// A new handler that appends `label` to this probe's log when invoked.
    pub fn handler(&self, label: &'static str) -> ProbeHandler {
        ProbeHandler {
            label,
            log: self.log.clone(),
        }
    }

    /// Labels in invocation order.
    pub fn order(&self) -> Vec<&'static str> {
        lock(&self.log).clone()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        lock(&self.log).clear();
    }
}

/// A handler created by [`OrderProbe::handler`].
pub struct ProbeHandler {
    label: &'static str,
    log: Arc<Mutex<Vec<&'static str>>>,
}

impl<E: Payload> Handler<E> for ProbeHandler {
    fn handle(&self, _event: &E) -> HandlerResult {
        lock(&self.log).push(self.label);
        Ok(())
    }
}

impl TransformHandler for ProbeHandler {
    fn transform(&self, _text: &str, _target_id: &str, _kind: i32) -> TransformResult {
        lock(&self.log).push(self.label);
        Ok(None)
    }
}

// ============================================================================
// Fixed Transform
// ============================================================================

/// A transform stage that always answers with the same value.
#[derive(Debug, Clone)]
pub struct FixedTransform {
    answer: Option<String>,
}

impl FixedTransform {
    /// `Some(text)` replaces the message with `text`; `None` passes it through.
    pub fn new(answer: Option<&str>) -> Self {
        Self {
            answer: answer.map(str::to_string),
        }
    }
}

impl TransformHandler for FixedTransform {
    fn transform(&self, _text: &str, _target_id: &str, _kind: i32) -> TransformResult {
        Ok(self.answer.clone())
    }
}

// ============================================================================
// Fault Collector
// ============================================================================

/// A fault as seen by [`FaultCollector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedFault {
    /// Channel that was being dispatched.
    pub channel: Channel,
    /// Name of the failing handler.
    pub handler: &'static str,
    /// The fault's display text.
    pub message: String,
    /// Whether the fault was a panic.
    pub panic: bool,
}

/// A [`FaultObserver`] that keeps every report.
#[derive(Clone, Default)]
pub struct FaultCollector {
    faults: Arc<Mutex<Vec<CollectedFault>>>,
}

impl FaultCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Faults observed so far.
    pub fn faults(&self) -> Vec<CollectedFault> {
        lock(&self.faults).clone()
    }

    /// Number of faults observed so far.
    pub fn count(&self) -> usize {
        lock(&self.faults).len()
    }
}

impl FaultObserver for FaultCollector {
    fn on_fault(&self, report: &FaultReport) {
        lock(&self.faults).push(CollectedFault {
            channel: report.channel,
            handler: report.handler,
            message: report.fault.to_string(),
            panic: report.fault.is_panic(),
        });
    }
}
