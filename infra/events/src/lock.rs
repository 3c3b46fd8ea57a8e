//! Pluggable mutual-exclusion policies.
//!
//! A [`LockPolicy`] decides for an [`EventBus`](crate::EventBus) which lock
//! guards the registry and every handler list, how a handler list is stored
//! type-erased in the registry, and how callbacks are stored.
//!
//! * [`Shared`] uses [`parking_lot::RwLock`], `Arc<dyn Any + Send + Sync>`
//!   and `Arc<dyn Fn + Send + Sync>` invokers. The bus is `Send + Sync` and
//!   can be used from any thread; receivers must be thread-safe too.
//! * [`Local`] uses [`RefCell`], `Rc<dyn Any>` and `Rc<dyn Fn>` invokers.
//!   There is no synchronization at all, and the bus is `!Send + !Sync`, so
//!   the compiler proves it never leaves the thread that created it. Its
//!   receivers may be `Rc`, `Rc<RefCell<_>>` or hold `Cell`s.

use crate::bus::Event;
use crate::handlers::HandlerList;
use parking_lot::RwLock;
use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

/// A value guarded by some form of mutual exclusion.
///
/// Access is scoped to a closure so no guard can outlive the call.
pub trait Guard<T> {
    fn new(value: T) -> Self;

    /// Runs `f` with shared access to the value.
    fn with_read<O>(&self, f: impl FnOnce(&T) -> O) -> O;

    /// Runs `f` with exclusive access to the value.
    fn with_write<O>(&self, f: impl FnOnce(&mut T) -> O) -> O;
}

impl<T> Guard<T> for RwLock<T> {
    fn new(value: T) -> Self {
        Self::new(value)
    }

    fn with_read<O>(&self, f: impl FnOnce(&T) -> O) -> O {
        f(&self.read())
    }

    fn with_write<O>(&self, f: impl FnOnce(&mut T) -> O) -> O {
        f(&mut self.write())
    }
}

/// Borrow conflicts panic instead of deadlocking. They can only happen when a
/// callback re-enters [`HandlerList`] mutation from inside
/// [`HandlerList::invoke_all`].
impl<T> Guard<T> for RefCell<T> {
    fn new(value: T) -> Self {
        Self::new(value)
    }

    fn with_read<O>(&self, f: impl FnOnce(&T) -> O) -> O {
        f(&self.borrow())
    }

    fn with_write<O>(&self, f: impl FnOnce(&mut T) -> O) -> O {
        f(&mut self.borrow_mut())
    }
}

/// Locking strategy of a bus, selected at construction through its type.
pub trait LockPolicy: Sized + 'static {
    /// Lock guarding the registry and each handler list.
    type Lock<T>: Guard<T>;

    /// Type-erased, cheaply clonable handle to one handler list.
    type Handle: Clone;

    /// Type-erased entry point of one callback.
    type Invoker<E, R>: Clone;

    /// Wraps a free function into an invoker.
    fn function<E: 'static, R: 'static>(func: fn(&mut E) -> R) -> Self::Invoker<E, R>;

    /// Runs `invoker`; `None` means its target is gone.
    fn call<E, R>(invoker: &Self::Invoker<E, R>, event: &mut E) -> Option<R>;

    /// Erases a handler list so it can live in the registry.
    fn share<E: Event, R: 'static>(list: HandlerList<E, R, Self>) -> Self::Handle;

    /// Restores the concrete handler list behind `handle` and runs `f` on it.
    ///
    /// Returns `None` if the handle holds a list for another event type.
    fn with_list<E: Event, R: 'static, O>(
        handle: &Self::Handle,
        f: impl FnOnce(&HandlerList<E, R, Self>) -> O,
    ) -> Option<O>;
}

/// Thread-safe policy backed by `parking_lot`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Shared;

impl LockPolicy for Shared {
    type Lock<T> = RwLock<T>;
    type Handle = Arc<dyn Any + Send + Sync>;
    type Invoker<E, R> = Arc<dyn Fn(&mut E) -> Option<R> + Send + Sync>;

    fn function<E: 'static, R: 'static>(func: fn(&mut E) -> R) -> Self::Invoker<E, R> {
        Arc::new(move |event: &mut E| Some(func(event)))
    }

    fn call<E, R>(invoker: &Self::Invoker<E, R>, event: &mut E) -> Option<R> {
        invoker(event)
    }

    fn share<E: Event, R: 'static>(list: HandlerList<E, R, Self>) -> Self::Handle {
        Arc::new(list)
    }

    fn with_list<E: Event, R: 'static, O>(
        handle: &Self::Handle,
        f: impl FnOnce(&HandlerList<E, R, Self>) -> O,
    ) -> Option<O> {
        (**handle).downcast_ref::<HandlerList<E, R, Self>>().map(f)
    }
}

/// Single-threaded policy with no synchronization cost.
#[derive(Debug, Clone, Copy, Default)]
pub struct Local;

impl LockPolicy for Local {
    type Lock<T> = RefCell<T>;
    type Handle = Rc<dyn Any>;
    type Invoker<E, R> = Rc<dyn Fn(&mut E) -> Option<R>>;

    fn function<E: 'static, R: 'static>(func: fn(&mut E) -> R) -> Self::Invoker<E, R> {
        Rc::new(move |event: &mut E| Some(func(event)))
    }

    fn call<E, R>(invoker: &Self::Invoker<E, R>, event: &mut E) -> Option<R> {
        invoker(event)
    }

    fn share<E: Event, R: 'static>(list: HandlerList<E, R, Self>) -> Self::Handle {
        Rc::new(list)
    }

    fn with_list<E: Event, R: 'static, O>(
        handle: &Self::Handle,
        f: impl FnOnce(&HandlerList<E, R, Self>) -> O,
    ) -> Option<O> {
        (**handle).downcast_ref::<HandlerList<E, R, Self>>().map(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ping;
    struct Pong;

    fn roundtrip<P: LockPolicy>() {
        let handle = P::share(HandlerList::<Ping, (), P>::new());
        assert_eq!(P::with_list::<Ping, (), _>(&handle, HandlerList::len), Some(0));
        assert!(P::with_list::<Pong, (), _>(&handle, HandlerList::len).is_none());
        assert!(P::with_list::<Ping, u8, _>(&handle, HandlerList::len).is_none());
    }

    #[test]
    fn test_shared_handle_downcasts_only_to_its_own_list() {
        roundtrip::<Shared>();
    }

    #[test]
    fn test_local_handle_downcasts_only_to_its_own_list() {
        roundtrip::<Local>();
    }

    #[test]
    fn test_guards_give_scoped_access() {
        let shared: RwLock<Vec<u8>> = Guard::new(vec![1]);
        shared.with_write(|v| v.push(2));
        assert_eq!(shared.with_read(Vec::len), 2);

        let local: RefCell<Vec<u8>> = Guard::new(vec![1]);
        local.with_write(|v| v.push(2));
        assert_eq!(local.with_read(|v| v.iter().sum::<u8>()), 3);
    }
}
