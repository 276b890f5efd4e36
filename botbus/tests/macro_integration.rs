//! `#[handler]` and `#[derive(Payload)]` used through the bus.

#![cfg(feature = "macros")]

use botbus::{
    Channel, EventBus, Handler, HandlerResult, MessageEvent, Payload, Priority,
    dispatch::Dispatcher, handler, testing::RecordingHandler,
};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

mod common;
use common::text;

static GROUP_ECHOES: AtomicUsize = AtomicUsize::new(0);
static URGENT: AtomicUsize = AtomicUsize::new(0);
static ROUTED: AtomicUsize = AtomicUsize::new(0);
static GROUP_PINGS: AtomicUsize = AtomicUsize::new(0);
static LONGEST: AtomicUsize = AtomicUsize::new(0);

#[handler(priority = 2, filter = |e: &MessageEvent| e.is_group())]
fn group_echo(event: &MessageEvent) -> HandlerResult {
    if event.content.is_empty() {
        return Err("nothing to echo".into());
    }
    GROUP_ECHOES.fetch_add(1, Ordering::SeqCst);
    Ok(())
}

#[handler(name = "UrgentHandler", priority = 0)]
fn urgent(_event: &MessageEvent) -> HandlerResult {
    URGENT.fetch_add(1, Ordering::SeqCst);
    Ok(())
}

#[handler]
fn router(_event: &MessageEvent) -> HandlerResult {
    ROUTED.fetch_add(1, Ordering::SeqCst);
    Ok(())
}

#[handler(filter = |e: &MessageEvent| e.is_group())]
fn group_ping(_: &MessageEvent) -> HandlerResult {
    GROUP_PINGS.fetch_add(1, Ordering::SeqCst);
    Ok(())
}

#[handler(filter = |e: &MessageEvent| !e.content.is_empty())]
fn longest_message(MessageEvent { content, .. }: &MessageEvent) -> HandlerResult {
    LONGEST.fetch_max(content.chars().count(), Ordering::SeqCst);
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Payload)]
struct Heartbeat {
    seq: u64,
}

#[test]
fn test_generated_priority_constants() {
    assert_eq!(group_echo::PRIORITY, Priority::High);
    assert_eq!(UrgentHandler::PRIORITY, Priority::Low);
    assert_eq!(router::PRIORITY, Priority::Normal);
}

#[test]
fn test_generated_names() {
    assert_eq!(Handler::<MessageEvent>::name(&group_echo), "group_echo");
    assert_eq!(Handler::<MessageEvent>::name(&UrgentHandler), "UrgentHandler");
}

#[test]
fn test_filter_skips_rejected_events() {
    let bus = EventBus::new();
    bus.register_message_with_priority(Arc::new(group_echo), group_echo::PRIORITY);

    bus.dispatch_message(&MessageEvent::private("10001", "direct"));
    assert_eq!(GROUP_ECHOES.load(Ordering::SeqCst), 0);

    bus.dispatch_message(&text("in group"));
    assert_eq!(GROUP_ECHOES.load(Ordering::SeqCst), 1);
}

#[test]
fn test_generated_handler_runs_unfiltered() {
    let bus = EventBus::new();
    bus.register_message_with_priority(Arc::new(UrgentHandler), UrgentHandler::PRIORITY);
    bus.register_message_with_priority(Arc::new(router), router::PRIORITY);
    assert_eq!(bus.handler_count(Channel::Message), 2);

    bus.dispatch_message(&MessageEvent::private("10001", "hi"));
    assert_eq!(URGENT.load(Ordering::SeqCst), 1);
    assert_eq!(ROUTED.load(Ordering::SeqCst), 1);
}

#[test]
fn test_wildcard_parameter_with_filter() {
    let bus = EventBus::new();
    bus.register_message(Arc::new(group_ping));

    bus.dispatch_message(&MessageEvent::private("10001", "direct"));
    bus.dispatch_message(&text("one"));
    bus.dispatch_message(&text("two"));
    assert_eq!(GROUP_PINGS.load(Ordering::SeqCst), 2);
}

#[test]
fn test_destructured_parameter_with_filter() {
    let bus = EventBus::new();
    bus.register_message(Arc::new(longest_message));

    bus.dispatch_message(&text("hello"));
    bus.dispatch_message(&text("hi"));
    bus.dispatch_message(&text(""));
    assert_eq!(LONGEST.load(Ordering::SeqCst), 5);
}

#[test]
fn test_derived_payload_dispatches() {
    let recorder = RecordingHandler::<Heartbeat>::new();
    let handlers: Vec<Arc<dyn Handler<Heartbeat>>> = vec![Arc::new(recorder.clone())];

    Dispatcher::new().deliver(Channel::RawMessage, &handlers, &Heartbeat { seq: 7 });
    assert_eq!(recorder.events(), vec![Heartbeat { seq: 7 }]);
}
