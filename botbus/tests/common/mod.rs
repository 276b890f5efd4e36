#![allow(dead_code)]

use botbus::{EventBus, Handler, HandlerResult, MessageEvent};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Test Events
// ============================================================================

pub fn text(content: &str) -> MessageEvent {
    MessageEvent::group("777", "10001", content)
}

// ============================================================================
// Test Handlers
// ============================================================================

/// Unregisters itself from the message channel the first time it runs.
pub struct SelfRemovingHandler {
    pub bus: Arc<EventBus>,
    pub me: Mutex<Option<Arc<dyn Handler<MessageEvent>>>>,
    pub calls: Arc<AtomicUsize>,
}

impl Handler<MessageEvent> for SelfRemovingHandler {
    fn handle(&self, _event: &MessageEvent) -> HandlerResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(me) = self.me.lock().unwrap().take() {
            self.bus.unregister_message(&me);
        }
        Ok(())
    }
}

/// Registers `next` on the message channel every time it runs.
pub struct RegisteringHandler {
    pub bus: Arc<EventBus>,
    pub next: Arc<dyn Handler<MessageEvent>>,
}

impl Handler<MessageEvent> for RegisteringHandler {
    fn handle(&self, _event: &MessageEvent) -> HandlerResult {
        self.bus.register_message(self.next.clone());
        Ok(())
    }
}
