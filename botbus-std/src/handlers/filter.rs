//! Kind filter for message handlers.

use botbus_core::{Handler, HandlerResult, MessageEvent, MessageKind};

/// A message handler that only runs its inner handler for selected kinds.
///
/// Messages of any other kind are accepted without invoking the inner
/// handler. Faults of the inner handler are the filter's faults.
///
/// # Example
///
/// ```rust,ignore
/// let voice_only = KindFilter::new(TranscribeHandler, &[MessageKind::Voice]);
/// bus.register_message(Arc::new(voice_only));
/// ```
pub struct KindFilter<H> {
    inner: H,
    kinds: Vec<MessageKind>,
}

impl<H> KindFilter<H> {
    /// Wrap `inner` so it only sees messages whose kind is in `kinds`.
    pub fn new(inner: H, kinds: &[MessageKind]) -> Self {
        Self {
            inner,
            kinds: kinds.to_vec(),
        }
    }

    /// The kinds this filter lets through.
    pub fn kinds(&self) -> &[MessageKind] {
        &self.kinds
    }

    /// Whether a message of `kind` reaches the inner handler.
    pub fn accepts(&self, kind: MessageKind) -> bool {
        self.kinds.contains(&kind)
    }
}

impl<H> Handler<MessageEvent> for KindFilter<H>
where
    H: Handler<MessageEvent>,
{
    fn handle(&self, event: &MessageEvent) -> HandlerResult {
        if !self.accepts(event.kind) {
            return Ok(());
        }
        self.inner.handle(event)
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
