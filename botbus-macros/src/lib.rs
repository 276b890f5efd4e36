//! Procedural macros for botbus.
//!
//! - `#[derive(Payload)]` - marks a type as a bus payload
//! - `#[handler]` - turns a plain function into a registrable handler type

use proc_macro::TokenStream;

mod handler;
mod payload;

/// Derive macro for implementing the `Payload` trait.
#[proc_macro_derive(Payload)]
pub fn derive_payload(input: TokenStream) -> TokenStream {
    payload::derive_payload_impl(input)
}

/// Turn `fn name(event: &E) -> HandlerResult` into a unit struct `name`
/// implementing `Handler<E>`.
///
/// # Arguments
///
/// - `priority = N`: integer priority code exposed as `name::PRIORITY`
///   (unknown codes mean normal)
/// - `name = "Ident"`: name of the generated struct, instead of the function's
/// - `filter = expr`: a `Fn(&E) -> bool`; events it rejects are accepted
///   without running the body
///
/// # Example
///
/// ```rust,ignore
/// #[botbus::handler(priority = 2, filter = |e: &MessageEvent| e.is_group())]
/// fn group_echo(event: &MessageEvent) -> HandlerResult {
///     reply(event.reply_target(), &event.content)
/// }
///
/// bus.register_message_with_priority(Arc::new(group_echo), group_echo::PRIORITY);
/// ```
#[proc_macro_attribute]
pub fn handler(attr: TokenStream, item: TokenStream) -> TokenStream {
    handler::handler_impl(attr, item)
}
