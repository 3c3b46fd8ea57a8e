use crate::bus::Event;
use crate::callback::Callback;
use crate::lock::{Guard, LockPolicy, Shared};
use crate::priority::Priority;
use std::cmp::Reverse;
use std::fmt;

/// One registered subscriber: a callback and the priority it was added with.
pub struct Subscription<E, R = (), P: LockPolicy = Shared> {
    callback: Callback<E, R, P>,
    priority: Priority,
}

impl<E, R, P: LockPolicy> Subscription<E, R, P> {
    #[must_use]
    pub const fn callback(&self) -> &Callback<E, R, P> {
        &self.callback
    }

    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    #[must_use]
    pub fn into_parts(self) -> (Callback<E, R, P>, Priority) {
        (self.callback, self.priority)
    }
}

impl<E, R, P: LockPolicy> Clone for Subscription<E, R, P> {
    fn clone(&self) -> Self {
        Self { callback: self.callback.clone(), priority: self.priority }
    }
}

impl<E, R, P: LockPolicy> fmt::Debug for Subscription<E, R, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("callback", &self.callback)
            .field("priority", &self.priority)
            .finish()
    }
}

/// Priority-ordered subscribers of a single event type.
///
/// Entries are kept in non-increasing priority order; entries with equal
/// priority keep their insertion order. Every operation takes the list's own
/// lock for its whole duration.
pub struct HandlerList<E, R = (), P: LockPolicy = Shared> {
    entries: P::Lock<Vec<Subscription<E, R, P>>>,
}

impl<E: Event, R: 'static, P: LockPolicy> HandlerList<E, R, P> {
    #[must_use]
    pub fn new() -> Self {
        Self { entries: Guard::new(Vec::new()) }
    }

    /// Appends a subscriber and restores priority order.
    ///
    /// The same callback may be added more than once; every copy is invoked.
    pub fn add(&self, callback: Callback<E, R, P>, priority: Priority) {
        self.entries.with_write(|entries| {
            entries.push(Subscription { callback, priority });
            entries.sort_by_key(|entry| Reverse(entry.priority));
        });
    }

    /// Position of the first entry whose callback equals `callback`.
    #[must_use]
    pub fn find(&self, callback: &Callback<E, R, P>) -> Option<usize> {
        self.entries.with_read(|entries| position(entries, callback))
    }

    /// Removes the first entry equal to `callback`.
    ///
    /// Returns `false` if no such entry exists. The retired entry is
    /// released before it is dropped.
    pub fn remove(&self, callback: &Callback<E, R, P>) -> bool {
        self.entries.with_write(|entries| {
            let Some(index) = position(entries, callback) else {
                return false;
            };
            let mut retired = entries.remove(index);
            retired.callback.release();
            true
        })
    }

    /// Invokes every entry in order while holding the list's lock.
    ///
    /// Returns the result of the last callback that actually ran, or `None`
    /// when none did. Callbacks must not add to or remove from this list:
    /// with [`Shared`] that deadlocks, with [`Local`](crate::Local) it panics.
    /// [`EventBus::publish`](crate::EventBus::publish) delivers from a
    /// [`snapshot`](Self::snapshot) instead and has no such restriction.
    pub fn invoke_all(&self, event: &mut E) -> Option<R> {
        self.entries.with_read(|entries| {
            let mut last = None;
            for entry in entries {
                if let Some(result) = entry.callback.invoke(event) {
                    last = Some(result);
                }
            }
            last
        })
    }

    /// Copies the current entries, in delivery order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Subscription<E, R, P>> {
        self.entries.with_read(Clone::clone)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.with_read(Vec::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.with_read(Vec::is_empty)
    }
}

fn position<E, R, P: LockPolicy>(
    entries: &[Subscription<E, R, P>],
    callback: &Callback<E, R, P>,
) -> Option<usize> {
    entries.iter().position(|entry| entry.callback == *callback)
}

impl<E: Event, R: 'static, P: LockPolicy> Default for HandlerList<E, R, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event, R: 'static, P: LockPolicy> fmt::Debug for HandlerList<E, R, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerList")
            .field("event", &std::any::type_name::<E>())
            .field("len", &self.len())
            .finish()
    }
}
