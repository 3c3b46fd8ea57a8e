use crate::lock::{Local, LockPolicy, Shared};
use parking_lot::Mutex;
use std::any::TypeId;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Comparable fingerprint of a subscriber.
///
/// Two callbacks are the same subscription iff their ids are equal. The
/// invocation thunk never takes part in the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackId {
    /// A free function, identified by its address.
    Function { addr: usize },
    /// A method bound to a receiver.
    ///
    /// `owner` keeps methods of unrelated receiver types apart even when the
    /// receiver and method addresses happen to coincide.
    Method { receiver: usize, method: usize, owner: TypeId },
}

impl CallbackId {
    #[must_use]
    pub const fn is_function(&self) -> bool {
        matches!(self, Self::Function { .. })
    }

    #[must_use]
    pub const fn is_method(&self) -> bool {
        matches!(self, Self::Method { .. })
    }
}

/// A handle to a receiver whose `&self` methods can be bound under policy `P`.
///
/// | Handle   | [`Shared`]             | [`Local`] |
/// |----------|------------------------|-----------|
/// | `Arc<C>` | `C: Send + Sync`       | any `C`   |
/// | `Rc<C>`  | no                     | any `C`   |
pub trait Receiver<C, P: LockPolicy> {
    /// Address of the receiver allocation.
    fn addr(&self) -> usize;

    /// Binds `method` to a weak reference to the receiver.
    fn bind<E: 'static, R: 'static>(&self, method: fn(&C, &mut E) -> R) -> P::Invoker<E, R>;
}

/// A handle to a receiver whose `&mut self` methods can be bound under policy `P`.
///
/// | Handle              | [`Shared`]  | [`Local`] |
/// |---------------------|-------------|-----------|
/// | `Arc<Mutex<C>>`     | `C: Send`   | any `C`   |
/// | `Rc<RefCell<C>>`    | no          | any `C`   |
pub trait ReceiverMut<C, P: LockPolicy> {
    /// Address of the receiver allocation.
    fn addr(&self) -> usize;

    /// Binds `method` to a weak reference to the receiver.
    fn bind_mut<E: 'static, R: 'static>(
        &self,
        method: fn(&mut C, &mut E) -> R,
    ) -> P::Invoker<E, R>;
}

impl<C: Send + Sync + 'static> Receiver<C, Shared> for Arc<C> {
    fn addr(&self) -> usize {
        Arc::as_ptr(self).addr()
    }

    fn bind<E: 'static, R: 'static>(
        &self,
        method: fn(&C, &mut E) -> R,
    ) -> <Shared as LockPolicy>::Invoker<E, R> {
        let target = Arc::downgrade(self);
        Arc::new(move |event: &mut E| target.upgrade().map(|receiver| method(&receiver, event)))
    }
}

impl<C: 'static> Receiver<C, Local> for Arc<C> {
    fn addr(&self) -> usize {
        Arc::as_ptr(self).addr()
    }

    fn bind<E: 'static, R: 'static>(
        &self,
        method: fn(&C, &mut E) -> R,
    ) -> <Local as LockPolicy>::Invoker<E, R> {
        let target = Arc::downgrade(self);
        Rc::new(move |event: &mut E| target.upgrade().map(|receiver| method(&receiver, event)))
    }
}

impl<C: 'static> Receiver<C, Local> for Rc<C> {
    fn addr(&self) -> usize {
        Rc::as_ptr(self).addr()
    }

    fn bind<E: 'static, R: 'static>(
        &self,
        method: fn(&C, &mut E) -> R,
    ) -> <Local as LockPolicy>::Invoker<E, R> {
        let target = Rc::downgrade(self);
        Rc::new(move |event: &mut E| target.upgrade().map(|receiver| method(&receiver, event)))
    }
}

/// The receiver stays locked while the method runs, so the method must not
/// publish an event that reaches the same receiver again.
impl<C: Send + 'static> ReceiverMut<C, Shared> for Arc<Mutex<C>> {
    fn addr(&self) -> usize {
        Arc::as_ptr(self).addr()
    }

    fn bind_mut<E: 'static, R: 'static>(
        &self,
        method: fn(&mut C, &mut E) -> R,
    ) -> <Shared as LockPolicy>::Invoker<E, R> {
        let target = Arc::downgrade(self);
        Arc::new(move |event: &mut E| {
            target.upgrade().map(|receiver| {
                let mut guard = receiver.lock();
                method(&mut guard, event)
            })
        })
    }
}

impl<C: 'static> ReceiverMut<C, Local> for Arc<Mutex<C>> {
    fn addr(&self) -> usize {
        Arc::as_ptr(self).addr()
    }

    fn bind_mut<E: 'static, R: 'static>(
        &self,
        method: fn(&mut C, &mut E) -> R,
    ) -> <Local as LockPolicy>::Invoker<E, R> {
        let target = Arc::downgrade(self);
        Rc::new(move |event: &mut E| {
            target.upgrade().map(|receiver| {
                let mut guard = receiver.lock();
                method(&mut guard, event)
            })
        })
    }
}

/// A receiver that is already borrowed is skipped: a delivery that re-enters
/// the same receiver returns `None` instead of panicking.
impl<C: 'static> ReceiverMut<C, Local> for Rc<RefCell<C>> {
    fn addr(&self) -> usize {
        Rc::as_ptr(self).addr()
    }

    fn bind_mut<E: 'static, R: 'static>(
        &self,
        method: fn(&mut C, &mut E) -> R,
    ) -> <Local as LockPolicy>::Invoker<E, R> {
        let target = Rc::downgrade(self);
        Rc::new(move |event: &mut E| {
            let receiver = target.upgrade()?;
            let mut guard = receiver.try_borrow_mut().ok()?;
            Some(method(&mut guard, event))
        })
    }
}

/// A subscriber that can be invoked uniformly and compared for removal.
///
/// There are exactly two ways to build one:
///
/// * [`Callback::function`] wraps a plain function pointer (non-capturing
///   closures coerce to one).
/// * [`Callback::method`] / [`Callback::method_mut`] wrap a method together
///   with a [`Receiver`] / [`ReceiverMut`] handle.
///
/// Capturing closures are rejected by the types on purpose: they have no
/// stable identity, so they could never be unsubscribed.
///
/// The policy `P` decides how the callback is stored, so it must match the
/// bus it is handed to. Inside `bus.subscribe(..)` it is inferred; standalone
/// callbacks name it, as in `Callback::<Hit>::function(..)` for [`Shared`].
///
/// Receivers are held through a weak reference; the bus never keeps them
/// alive. Once the receiver is dropped, invoking the callback does nothing
/// and returns `None`. The weak reference still pins the allocation, so the
/// receiver address recorded in the [`CallbackId`] is not reused while the
/// callback exists.
///
/// Function identity is the function's address, which is not a perfect
/// notion of identity in either direction:
///
/// * Distinct functions with identical machine code may be folded into one
///   address, so unsubscribing one may remove the other.
/// * One generic function instantiated in two crates (or codegen units) may
///   get two addresses, so a callback built in one crate may not match the
///   subscription made in another, and unsubscribing it does nothing.
///
/// Build the callback used for unsubscribing in the same place as the one
/// that was subscribed, or keep a clone of it.
///
/// # Examples
///
/// ```rust
/// use herald_event_bus::{Callback, make_func, make_method};
/// use std::sync::Arc;
///
/// struct Hit { damage: i32 }
///
/// struct Armor { absorb: i32 }
///
/// impl Armor {
///     fn soak(&self, hit: &mut Hit) { hit.damage -= self.absorb; }
/// }
///
/// fn crit(hit: &mut Hit) { hit.damage *= 2; }
///
/// let armor = Arc::new(Armor { absorb: 3 });
/// let soak: Callback<Hit> = make_method(&armor, Armor::soak);
/// assert_eq!(soak, Callback::method(&armor, Armor::soak));
///
/// let critical: Callback<Hit> = make_func(crit);
/// assert_ne!(soak.id(), critical.id());
///
/// let mut hit = Hit { damage: 10 };
/// critical.invoke(&mut hit);
/// soak.invoke(&mut hit);
/// assert_eq!(hit.damage, 17);
/// ```
pub struct Callback<E, R = (), P: LockPolicy = Shared> {
    id: CallbackId,
    invoker: Option<P::Invoker<E, R>>,
}

impl<E: 'static, R: 'static, P: LockPolicy> Callback<E, R, P> {
    /// Wraps a free function.
    #[must_use]
    pub fn function(func: fn(&mut E) -> R) -> Self {
        Self { id: CallbackId::Function { addr: func as usize }, invoker: Some(P::function(func)) }
    }

    /// Wraps a method taking `&self`, bound to `receiver`.
    #[must_use]
    pub fn method<C, H>(receiver: &H, method: fn(&C, &mut E) -> R) -> Self
    where
        C: 'static,
        H: Receiver<C, P>,
    {
        Self {
            id: CallbackId::Method {
                receiver: Receiver::addr(receiver),
                method: method as usize,
                owner: TypeId::of::<C>(),
            },
            invoker: Some(receiver.bind(method)),
        }
    }

    /// Wraps a method taking `&mut self`, bound to `receiver`.
    #[must_use]
    pub fn method_mut<C, H>(receiver: &H, method: fn(&mut C, &mut E) -> R) -> Self
    where
        C: 'static,
        H: ReceiverMut<C, P>,
    {
        Self {
            id: CallbackId::Method {
                receiver: ReceiverMut::addr(receiver),
                method: method as usize,
                owner: TypeId::of::<C>(),
            },
            invoker: Some(receiver.bind_mut(method)),
        }
    }
}

impl<E, R, P: LockPolicy> Callback<E, R, P> {
    /// Calls the wrapped function or method.
    ///
    /// Returns `None` without doing anything if the callback was released or
    /// its receiver no longer exists.
    pub fn invoke(&self, event: &mut E) -> Option<R> {
        self.invoker.as_ref().and_then(|invoker| P::call(invoker, event))
    }

    /// Drops the invocation target but keeps the identity.
    pub fn release(&mut self) {
        self.invoker = None;
    }

    #[must_use]
    pub const fn is_released(&self) -> bool {
        self.invoker.is_none()
    }

    #[must_use]
    pub const fn id(&self) -> CallbackId {
        self.id
    }
}

impl<E, R, P: LockPolicy> Clone for Callback<E, R, P> {
    fn clone(&self) -> Self {
        Self { id: self.id, invoker: self.invoker.clone() }
    }
}

impl<E, R, P: LockPolicy> PartialEq for Callback<E, R, P> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<E, R, P: LockPolicy> Eq for Callback<E, R, P> {}

impl<E, R, P: LockPolicy> fmt::Debug for Callback<E, R, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("event", &std::any::type_name::<E>())
            .field("id", &self.id)
            .field("released", &self.is_released())
            .finish()
    }
}

/// Shorthand for [`Callback::function`].
#[must_use]
pub fn make_func<E, R, P>(func: fn(&mut E) -> R) -> Callback<E, R, P>
where
    E: 'static,
    R: 'static,
    P: LockPolicy,
{
    Callback::function(func)
}

/// Shorthand for [`Callback::method`].
#[must_use]
pub fn make_method<H, C, E, R, P>(receiver: &H, method: fn(&C, &mut E) -> R) -> Callback<E, R, P>
where
    H: Receiver<C, P>,
    C: 'static,
    E: 'static,
    R: 'static,
    P: LockPolicy,
{
    Callback::method(receiver, method)
}

/// Shorthand for [`Callback::method_mut`].
#[must_use]
pub fn make_method_mut<H, C, E, R, P>(
    receiver: &H,
    method: fn(&mut C, &mut E) -> R,
) -> Callback<E, R, P>
where
    H: ReceiverMut<C, P>,
    C: 'static,
    E: 'static,
    R: 'static,
    P: LockPolicy,
{
    Callback::method_mut(receiver, method)
}
