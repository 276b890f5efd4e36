//! Payload trait for event types.

/// A marker trait for values carried on a bus channel.
///
/// Payloads must be `Send + Sync + 'static` so that a bus can be shared
/// between the host's threads. The dispatch core never looks inside a payload.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone, Debug)]
/// struct PokeEvent { user_id: String }
///
/// impl Payload for PokeEvent {}
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Payload",
    label = "must be `Send + Sync + 'static`",
    note = "All bus payloads must be thread-safe and static."
)]
pub trait Payload: Send + Sync + 'static {}

impl Payload for () {}
impl Payload for String {}
impl Payload for &'static str {}
impl<T: Payload> Payload for Box<T> {}
impl<T: Payload> Payload for std::sync::Arc<T> {}
impl<T: Payload> Payload for Vec<T> {}
impl<T: Payload> Payload for Option<T> {}
