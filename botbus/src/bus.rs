//! The event bus facade.
//!
//! An [`EventBus`] owns one registry per [`Channel`] and a [`Dispatcher`]
//! shared by all of them. The host constructs one bus at startup and passes
//! it to both sides: script modules register on it when they load, and the
//! host's event callbacks dispatch through it.

use crate::builder::BusBuilder;
use botbus_core::{
    Channel, ForbiddenAction, Handler, HandlerId, Load, MembershipChange, MenuBuild,
    MessageEvent, Priority, RawMessage, TransformHandler, Unload, WindowClick,
};
use botbus_std::{
    dispatch::Dispatcher,
    registry::{Ordering, Registry},
};
use std::sync::{Arc, OnceLock};

/// Registry of observing handlers for payload type `E`.
pub type HandlerRegistry<E> = Registry<dyn Handler<E>>;

/// Registry of outbound transform handlers.
pub type TransformRegistry = Registry<dyn TransformHandler>;

/// The registries behind a bus, created on first use.
pub(crate) struct Channels {
    message: HandlerRegistry<MessageEvent>,
    forbidden_action: HandlerRegistry<ForbiddenAction>,
    membership_change: HandlerRegistry<MembershipChange>,
    window_click: HandlerRegistry<WindowClick>,
    outbound: TransformRegistry,
    menu_build: HandlerRegistry<MenuBuild>,
    raw_message: HandlerRegistry<RawMessage>,
    load: HandlerRegistry<Load>,
    unload: HandlerRegistry<Unload>,
}

impl Channels {
    fn new() -> Self {
        fn registry<H: ?Sized>(channel: Channel) -> Registry<H> {
            Registry::new(Ordering::for_channel(channel))
        }

        Self {
            message: registry(Channel::Message),
            forbidden_action: registry(Channel::ForbiddenAction),
            membership_change: registry(Channel::MembershipChange),
            window_click: registry(Channel::FloatingWindowClick),
            outbound: registry(Channel::OutboundTransform),
            menu_build: registry(Channel::MenuBuild),
            raw_message: registry(Channel::RawMessage),
            load: registry(Channel::Load),
            unload: registry(Channel::Unload),
        }
    }

    fn len(&self, channel: Channel) -> usize {
        match channel {
            Channel::Message => self.message.len(),
            Channel::ForbiddenAction => self.forbidden_action.len(),
            Channel::MembershipChange => self.membership_change.len(),
            Channel::FloatingWindowClick => self.window_click.len(),
            Channel::OutboundTransform => self.outbound.len(),
            Channel::MenuBuild => self.menu_build.len(),
            Channel::RawMessage => self.raw_message.len(),
            Channel::Load => self.load.len(),
            Channel::Unload => self.unload.len(),
        }
    }

    fn clear(&self, channel: Channel) -> usize {
        match channel {
            Channel::Message => self.message.clear(),
            Channel::ForbiddenAction => self.forbidden_action.clear(),
            Channel::MembershipChange => self.membership_change.clear(),
            Channel::FloatingWindowClick => self.window_click.clear(),
            Channel::OutboundTransform => self.outbound.clear(),
            Channel::MenuBuild => self.menu_build.clear(),
            Channel::RawMessage => self.raw_message.clear(),
            Channel::Load => self.load.clear(),
            Channel::Unload => self.unload.clear(),
        }
    }
}

mod sealed {
    use super::{Channels, HandlerRegistry};
    use botbus_core::Payload;

    pub trait Sealed: Payload + Sized {
        fn registry(channels: &Channels) -> &HandlerRegistry<Self>;
    }
}

/// A payload type with its own observing channel on the bus.
///
/// Implemented for every payload except the outbound transform, which has
/// its own API. Each type maps to exactly one [`Channel`].
pub trait BusEvent: sealed::Sealed {
    /// The channel events of this type are dispatched on.
    const CHANNEL: Channel;
}

macro_rules! bus_events {
    ($($event:ty => $channel:ident . $field:ident),* $(,)?) => {$(
        impl sealed::Sealed for $event {
            fn registry(channels: &Channels) -> &HandlerRegistry<Self> {
                &channels.$field
            }
        }

        impl BusEvent for $event {
            const CHANNEL: Channel = Channel::$channel;
        }
    )*};
}

bus_events! {
    MessageEvent => Message.message,
    ForbiddenAction => ForbiddenAction.forbidden_action,
    MembershipChange => MembershipChange.membership_change,
    WindowClick => FloatingWindowClick.window_click,
    MenuBuild => MenuBuild.menu_build,
    RawMessage => RawMessage.raw_message,
    Load => Load.load,
    Unload => Unload.unload,
}

/// Generates the named register/unregister pair of an observing channel.
macro_rules! channel_registration {
    ($($event:ty => $register:ident, $unregister:ident;)*) => {$(
        #[doc = concat!("Register a `", stringify!($event), "` handler. Returns `false` if it was already registered.")]
        pub fn $register(&self, handler: Arc<dyn Handler<$event>>) -> bool {
            self.register::<$event>(handler)
        }

        #[doc = concat!("Unregister a `", stringify!($event), "` handler. Returns `false` if it was not registered.")]
        pub fn $unregister<H>(&self, handler: &Arc<H>) -> bool
        where
            H: Handler<$event> + ?Sized,
        {
            self.unregister::<$event, H>(handler)
        }
    )*};
}

/// Fans host events out to script module handlers.
///
/// # Example
///
/// ```rust,ignore
/// let bus = EventBus::builder().named("qq").build();
///
/// bus.register_message_with_priority(Arc::new(CommandRouter), Priority::High);
/// bus.register_transform(Arc::new(SignatureAppender));
///
/// bus.dispatch_message(&MessageEvent::group("777", "10001", "/help"));
/// let outgoing = bus.dispatch_transform("hello", "777", 1);
/// ```
pub struct EventBus {
    channels: OnceLock<Channels>,
    dispatcher: Dispatcher,
}

impl EventBus {
    /// Create an unnamed bus without a fault observer.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Start configuring a bus.
    pub fn builder() -> BusBuilder {
        BusBuilder::new()
    }

    pub(crate) fn from_dispatcher(dispatcher: Dispatcher) -> Self {
        Self {
            channels: OnceLock::new(),
            dispatcher,
        }
    }

    /// The name attached to this bus's logs.
    pub fn name(&self) -> &'static str {
        self.dispatcher.name()
    }

    /// Prepare the channel registries. Every operation does this on first
    /// use; calling it again has no effect.
    pub fn initialize(&self) {
        self.channels();
    }

    /// Whether the channel registries have been prepared.
    pub fn is_initialized(&self) -> bool {
        self.channels.get().is_some()
    }

    fn channels(&self) -> &Channels {
        self.channels.get_or_init(|| {
            tracing::debug!(bus = self.name(), "initializing channel registries");
            Channels::new()
        })
    }

    // ==================== Generic channel API ====================

    /// Register a handler on the channel of `E`.
    ///
    /// On the message channel this uses [`Priority::Normal`].
    pub fn register<E: BusEvent>(&self, handler: Arc<dyn Handler<E>>) -> bool {
        E::registry(self.channels()).register(handler, Priority::Normal)
    }

    /// Unregister a handler from the channel of `E`.
    pub fn unregister<E, H>(&self, handler: &Arc<H>) -> bool
    where
        E: BusEvent,
        H: Handler<E> + ?Sized,
    {
        E::registry(self.channels()).unregister(HandlerId::of(handler))
    }

    /// Deliver `event` to every handler on its channel.
    ///
    /// Handlers run in order on the caller's thread. Registrations made while
    /// the dispatch runs only take effect for the next dispatch. Handler
    /// faults are logged and never returned.
    pub fn dispatch<E: BusEvent>(&self, event: &E) {
        let snapshot = E::registry(self.channels()).snapshot();
        self.dispatcher.deliver(E::CHANNEL, &snapshot, event);
    }

    // ==================== Message channel ====================

    /// Register a message handler with [`Priority::Normal`].
    pub fn register_message(&self, handler: Arc<dyn Handler<MessageEvent>>) -> bool {
        self.register_message_with_priority(handler, Priority::Normal)
    }

    /// Register a message handler with a priority.
    ///
    /// Accepts a [`Priority`], its integer code or its name; unrecognized
    /// codes and names mean [`Priority::Normal`]. Re-registering a handler
    /// keeps its original priority.
    pub fn register_message_with_priority(
        &self,
        handler: Arc<dyn Handler<MessageEvent>>,
        priority: impl Into<Priority>,
    ) -> bool {
        self.channels().message.register(handler, priority.into())
    }

    /// Unregister a message handler.
    pub fn unregister_message<H>(&self, handler: &Arc<H>) -> bool
    where
        H: Handler<MessageEvent> + ?Sized,
    {
        self.unregister::<MessageEvent, H>(handler)
    }

    /// Deliver a message to every message handler, highest priority first.
    ///
    /// `None` (a host callback without a message) dispatches nothing.
    pub fn dispatch_message<'a>(&self, event: impl Into<Option<&'a MessageEvent>>) {
        if let Some(event) = event.into() {
            self.dispatch(event);
        }
    }

    /// Number of registered message handlers.
    pub fn message_handler_count(&self) -> usize {
        self.handler_count(Channel::Message)
    }

    // ==================== Observing channels ====================

    channel_registration! {
        ForbiddenAction => register_forbidden_action, unregister_forbidden_action;
        MembershipChange => register_membership_change, unregister_membership_change;
        WindowClick => register_floating_window_click, unregister_floating_window_click;
        MenuBuild => register_menu_build, unregister_menu_build;
        RawMessage => register_raw_message, unregister_raw_message;
        Load => register_load, unregister_load;
        Unload => register_unload, unregister_unload;
    }

    /// A group member was muted or restricted.
    pub fn dispatch_forbidden_action(
        &self,
        group_id: &str,
        user_id: &str,
        operator_id: &str,
        timestamp: i64,
    ) {
        self.dispatch(&ForbiddenAction {
            group_id: group_id.to_string(),
            user_id: user_id.to_string(),
            operator_id: operator_id.to_string(),
            timestamp,
        });
    }

    /// A group member joined or left.
    pub fn dispatch_membership_change(&self, group_id: &str, user_id: &str, change_type: i32) {
        self.dispatch(&MembershipChange {
            group_id: group_id.to_string(),
            user_id: user_id.to_string(),
            change_type,
        });
    }

    /// The floating window was clicked.
    pub fn dispatch_floating_window_click(&self, click_type: i32, user_id: &str) {
        self.dispatch(&WindowClick {
            click_type,
            user_id: user_id.to_string(),
        });
    }

    /// A message context menu is being built.
    pub fn dispatch_menu_build(&self, event: &MenuBuild) {
        self.dispatch(event);
    }

    /// A raw protocol message arrived.
    pub fn dispatch_raw_message(&self, event: &RawMessage) {
        self.dispatch(event);
    }

    /// The host finished loading scripts.
    pub fn dispatch_load(&self) {
        self.dispatch(&Load);
    }

    /// The host is unloading scripts.
    pub fn dispatch_unload(&self) {
        self.dispatch(&Unload);
    }

    // ==================== Outbound transform channel ====================

    /// Register an outbound transform stage. Stages run in registration order.
    pub fn register_transform(&self, handler: Arc<dyn TransformHandler>) -> bool {
        self.channels().outbound.register(handler, Priority::Normal)
    }

    /// Unregister an outbound transform stage.
    pub fn unregister_transform<H>(&self, handler: &Arc<H>) -> bool
    where
        H: TransformHandler + ?Sized,
    {
        self.channels().outbound.unregister(HandlerId::of(handler))
    }

    /// Run outgoing text through every transform stage and return the result.
    ///
    /// With no stages registered the text comes back unchanged.
    pub fn dispatch_transform(&self, text: impl Into<String>, target_id: &str, kind: i32) -> String {
        let snapshot = self.channels().outbound.snapshot();
        let (text, _) = self
            .dispatcher
            .transform(&snapshot, text.into(), target_id, kind);
        text
    }

    // ==================== Diagnostics ====================

    /// Number of handlers registered on `channel`.
    pub fn handler_count(&self, channel: Channel) -> usize {
        self.channels().len(channel)
    }

    /// Number of handlers registered across all channels.
    pub fn total_handler_count(&self) -> usize {
        let channels = self.channels();
        Channel::ALL.into_iter().map(|c| channels.len(c)).sum()
    }

    /// Remove every handler from `channel`, returning how many were removed.
    pub fn clear(&self, channel: Channel) -> usize {
        self.channels().clear(channel)
    }

    /// Remove every handler from every channel.
    pub fn clear_all(&self) {
        let channels = self.channels();
        let removed: usize = Channel::ALL.into_iter().map(|c| channels.clear(c)).sum();
        tracing::debug!(bus = self.name(), removed, "all channels cleared");
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("EventBus");
        s.field("name", &self.name());
        match self.channels.get() {
            Some(channels) => {
                for channel in Channel::ALL {
                    s.field(channel.name(), &channels.len(channel));
                }
            }
            None => {
                s.field("initialized", &false);
            }
        }
        s.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botbus_core::TransformResult;
    use botbus_std::testing::CountingHandler;

    #[test]
    fn initialization_is_lazy_and_idempotent() {
        let bus = EventBus::new();
        assert!(!bus.is_initialized());

        bus.initialize();
        assert!(bus.is_initialized());
        bus.initialize();
        assert!(bus.is_initialized());
        assert_eq!(bus.total_handler_count(), 0);
    }

    #[test]
    fn first_registration_initializes() {
        let bus = EventBus::new();
        bus.register_load(Arc::new(CountingHandler::new()));
        assert!(bus.is_initialized());
        assert_eq!(bus.handler_count(Channel::Load), 1);
    }

    #[test]
    fn every_channel_counts_toward_total() {
        let bus = EventBus::new();
        let counter = Arc::new(CountingHandler::new());

        bus.register_message(counter.clone());
        bus.register_forbidden_action(counter.clone());
        bus.register_membership_change(counter.clone());
        bus.register_floating_window_click(counter.clone());
        bus.register_menu_build(counter.clone());
        bus.register_raw_message(counter.clone());
        bus.register_load(counter.clone());
        bus.register_unload(counter.clone());
        bus.register_transform(Arc::new(|_: &str, _: &str, _: i32| -> TransformResult { Ok(None) }));

        for channel in Channel::ALL {
            assert_eq!(bus.handler_count(channel), 1, "{channel}");
        }
        assert_eq!(bus.total_handler_count(), 9);
    }

    #[test]
    fn registries_order_by_channel() {
        let channels = Channels::new();
        assert_eq!(channels.message.ordering(), Ordering::Priority);
        assert_eq!(channels.forbidden_action.ordering(), Ordering::Registration);
        assert_eq!(channels.outbound.ordering(), Ordering::Registration);
        assert_eq!(channels.unload.ordering(), Ordering::Registration);
    }

    #[test]
    fn channel_constants_match_payloads() {
        assert_eq!(<MessageEvent as BusEvent>::CHANNEL, Channel::Message);
        assert_eq!(<WindowClick as BusEvent>::CHANNEL, Channel::FloatingWindowClick);
        assert_eq!(<Unload as BusEvent>::CHANNEL, Channel::Unload);
    }
}
