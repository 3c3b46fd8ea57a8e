use crate::callback::Callback;
use crate::error::EventBusError;
use crate::handlers::HandlerList;
use crate::lock::{Guard, Local, LockPolicy, Shared};
use crate::priority::Priority;
use fxhash::FxHashMap;
use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, trace};

/// Marker trait for types that can be published on the [`EventBus`].
///
/// Any `'static` type automatically implements this trait.
pub trait Event: Any {}
impl<T: Any> Event for T {}

/// Thread-safe bus, usable from any thread.
pub type SharedEventBus = EventBus<Shared>;

/// Single-threaded bus without synchronization.
pub type LocalEventBus = EventBus<Local>;

/// A synchronous, type-keyed publish/subscribe dispatcher.
///
/// Each event type gets its own [`HandlerList`], created on first
/// subscription and kept for the lifetime of the bus. The registry lock only
/// guards which event types are known; every list has its own lock, so work
/// on different event types never contends on a list lock.
///
/// Delivery happens on the publishing thread, before [`EventBus::publish`]
/// returns. Nothing can abort it: a callback that blocks also blocks its
/// publisher.
///
/// Cloning is cheap and yields a handle to the same registry.
///
/// # Examples
///
/// ```rust
/// use herald_event_bus::{Priority, SharedEventBus, make_func};
///
/// struct Attack { damage: i32 }
///
/// fn floor(attack: &mut Attack) {
///     if attack.damage <= 0 {
///         attack.damage = 1;
///     }
/// }
///
/// fn triple(attack: &mut Attack) { attack.damage *= 3; }
///
/// let bus = SharedEventBus::new();
/// bus.subscribe(make_func(triple));
/// bus.subscribe_with_priority(make_func(floor), Priority::High);
///
/// let mut attack = Attack { damage: 0 };
/// assert!(bus.publish(&mut attack));
/// assert_eq!(attack.damage, 3);
/// ```
pub struct EventBus<P: LockPolicy = Shared> {
    registry: Arc<P::Lock<FxHashMap<TypeId, P::Handle>>>,
}

impl<P: LockPolicy> EventBus<P> {
    /// Creates a new, empty `EventBus`.
    #[must_use]
    pub fn new() -> Self {
        Self { registry: Arc::new(Guard::new(FxHashMap::default())) }
    }

    /// Subscribes `callback` to events of type `E` with [`Priority::Default`].
    pub fn subscribe<E: Event>(&self, callback: Callback<E, (), P>) {
        self.subscribe_with_priority(callback, Priority::Default);
    }

    /// Subscribes `callback` to events of type `E`.
    ///
    /// Subscribing the same callback twice registers it twice.
    pub fn subscribe_with_priority<E: Event>(
        &self,
        callback: Callback<E, (), P>,
        priority: Priority,
    ) {
        let handle = self.list_or_insert::<E>();
        let id = callback.id();
        match with_list::<P, E, _>(&handle, |list| list.add(callback, priority)) {
            Ok(()) => trace!(event = type_name::<E>(), ?id, %priority, "Callback subscribed"),
            Err(err) => error!(event = type_name::<E>(), %err, "Subscription dropped"),
        }
    }

    /// Removes the first subscription of `E` equal to `callback`.
    ///
    /// Returns `true` whenever a handler list exists for `E`, even if
    /// `callback` was not part of it; use [`EventBus::is_subscribed`] to
    /// confirm membership. Returns `false` if `E` was never subscribed to.
    pub fn unsubscribe<E: Event>(&self, callback: &Callback<E, (), P>) -> bool {
        let Some(handle) = self.list::<E>() else {
            trace!(event = type_name::<E>(), "Unsubscribe ignored: no handler list");
            return false;
        };

        match with_list::<P, E, _>(&handle, |list| list.remove(callback)) {
            Ok(true) => {
                trace!(event = type_name::<E>(), id = ?callback.id(), "Callback unsubscribed");
                true
            },
            Ok(false) => {
                debug!(
                    event = type_name::<E>(),
                    id = ?callback.id(),
                    "Unsubscribe requested for a callback that is not subscribed"
                );
                true
            },
            Err(err) => {
                error!(event = type_name::<E>(), %err, "Unsubscribe failed");
                false
            },
        }
    }

    /// Delivers `event` to every subscriber of `E`, highest priority first.
    ///
    /// The subscriber list is copied and all locks are released before the
    /// first callback runs, so callbacks may freely subscribe, unsubscribe or
    /// publish on this bus. A callback added during delivery is first invoked
    /// by the next publish; one removed during delivery may still run once.
    ///
    /// Returns `false` only if `E` was never subscribed to, in which case no
    /// callback runs.
    pub fn publish<E: Event>(&self, event: &mut E) -> bool {
        let Some(handle) = self.list::<E>() else {
            trace!(event = type_name::<E>(), "Event dropped: no handler list");
            return false;
        };

        let snapshot = match with_list::<P, E, _>(&handle, HandlerList::snapshot) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                error!(event = type_name::<E>(), %err, "Event dropped");
                return false;
            },
        };
        drop(handle);

        trace!(event = type_name::<E>(), count = snapshot.len(), "Dispatching event");
        for subscription in &snapshot {
            subscription.callback().invoke(event);
        }
        true
    }

    /// Number of current subscriptions for `E`.
    #[must_use]
    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.list::<E>()
            .and_then(|handle| with_list::<P, E, _>(&handle, HandlerList::len).ok())
            .unwrap_or(0)
    }

    /// Whether `callback` is currently subscribed to `E`.
    #[must_use]
    pub fn is_subscribed<E: Event>(&self, callback: &Callback<E, (), P>) -> bool {
        self.list::<E>()
            .and_then(|handle| with_list::<P, E, _>(&handle, |list| list.find(callback)).ok())
            .flatten()
            .is_some()
    }

    /// Number of event types that have a handler list.
    #[must_use]
    pub fn event_types(&self) -> usize {
        self.registry.with_read(|map| map.len())
    }

    fn list<E: Event>(&self) -> Option<P::Handle> {
        let id = TypeId::of::<E>();
        self.registry.with_read(|map| map.get(&id).cloned())
    }

    fn list_or_insert<E: Event>(&self) -> P::Handle {
        if let Some(handle) = self.list::<E>() {
            return handle;
        }

        let id = TypeId::of::<E>();
        self.registry.with_write(|map| {
            map.entry(id)
                .or_insert_with(|| {
                    debug!(event = type_name::<E>(), "Initializing new handler list");
                    P::share(HandlerList::<E, (), P>::new())
                })
                .clone()
        })
    }
}

fn with_list<P: LockPolicy, E: Event, O>(
    handle: &P::Handle,
    f: impl FnOnce(&HandlerList<E, (), P>) -> O,
) -> Result<O, EventBusError> {
    P::with_list::<E, (), O>(handle, f).ok_or_else(|| EventBusError::TypeMismatch {
        message: type_name::<E>().into(),
        context: Some("Registry entry holds a foreign handler list".into()),
    })
}

impl<P: LockPolicy> Default for EventBus<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: LockPolicy> Clone for EventBus<P> {
    fn clone(&self) -> Self {
        Self { registry: Arc::clone(&self.registry) }
    }
}

impl<P: LockPolicy> fmt::Debug for EventBus<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("policy", &type_name::<P>())
            .field("event_types", &self.event_types())
            .finish()
    }
}
