//! # Event Bus
//!
//! A synchronous, strongly typed, in-process publish/subscribe dispatcher.
//!
//! ## Overview
//!
//! Components register interest in an event type by handing the [`EventBus`]
//! a [`Callback`]; other components publish event instances that are
//! delivered, on the publishing thread, to every current subscriber in
//! [`Priority`] order.
//!
//! ## Features
//!
//! * **Type-Safe**: Events are identified by their Rust type; handler lists
//!   are stored type-erased and restored only where the type is known.
//! * **Removable subscribers**: Callbacks are free functions or methods bound
//!   to a receiver, compared by [`CallbackId`], so they can be unsubscribed.
//! * **Reentrant**: Delivery runs from a snapshot with no lock held, so
//!   callbacks may subscribe, unsubscribe or publish on the same bus.
//! * **Pluggable locking**: [`Shared`] (`parking_lot`) for multi-threaded
//!   buses, [`Local`] (no synchronization) for single-threaded ones, whose
//!   receivers may be `Rc`, `Rc<RefCell<_>>` or otherwise `!Sync`.
//!
//! Delivery is not guaranteed beyond the current process, nothing is
//! queued or persisted, and a blocking callback blocks its publisher.
//!
//! # Example
//!
//! ```rust
//! use herald_event_bus::{LocalEventBus, Priority, make_func, make_method};
//! use std::rc::Rc;
//!
//! #[derive(Debug, Default)]
//! struct UserCreated { greeted: Vec<String> }
//!
//! struct Greeter { name: String }
//!
//! impl Greeter {
//!     fn greet(&self, event: &mut UserCreated) {
//!         event.greeted.push(self.name.clone());
//!     }
//! }
//!
//! fn audit(event: &mut UserCreated) {
//!     event.greeted.push("audit".to_owned());
//! }
//!
//! let bus = LocalEventBus::new();
//! let greeter = Rc::new(Greeter { name: "greeter".to_owned() });
//!
//! bus.subscribe(make_method(&greeter, Greeter::greet));
//! bus.subscribe_with_priority(make_func(audit), Priority::VeryHigh);
//!
//! let mut event = UserCreated::default();
//! assert!(bus.publish(&mut event));
//! assert_eq!(event.greeted, ["audit", "greeter"]);
//!
//! assert!(bus.unsubscribe(&make_func(audit)));
//! assert_eq!(bus.subscriber_count::<UserCreated>(), 1);
//! ```

mod bus;
mod callback;
mod error;
mod handlers;
mod lock;
mod priority;

pub use bus::{Event, EventBus, LocalEventBus, SharedEventBus};
pub use callback::{
    Callback, CallbackId, Receiver, ReceiverMut, make_func, make_method, make_method_mut,
};
pub use error::{EventBusError, EventBusErrorExt};
pub use handlers::{HandlerList, Subscription};
pub use lock::{Guard, Local, LockPolicy, Shared};
pub use priority::Priority;
