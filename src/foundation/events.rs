use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Callback<E> = Box<dyn FnMut(&E)>;

struct Slots<E> {
    next_id: u64,
    live: Vec<(u64, Callback<E>)>,
    // Ids disposed while `emit` had the callbacks checked out.
    disposed_during_emit: Vec<u64>,
    emitting: bool,
}

/// Single-threaded listener list with disposer-based unsubscription.
///
/// Listeners may subscribe or dispose other subscriptions from inside a callback; such changes
/// take effect from the next `emit`.
pub struct Listeners<E> {
    slots: Rc<RefCell<Slots<E>>>,
}

impl<E: 'static> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> Listeners<E> {
    /// Create an empty listener list.
    pub fn new() -> Self {
        Self {
            slots: Rc::new(RefCell::new(Slots {
                next_id: 0,
                live: Vec::new(),
                disposed_during_emit: Vec::new(),
                emitting: false,
            })),
        }
    }

    /// Register `f` and return the disposer that removes it again.
    pub fn subscribe(&self, f: impl FnMut(&E) + 'static) -> Subscription {
        let id = {
            let mut slots = self.slots.borrow_mut();
            let id = slots.next_id;
            slots.next_id += 1;
            slots.live.push((id, Box::new(f)));
            id
        };

        let weak: Weak<RefCell<Slots<E>>> = Rc::downgrade(&self.slots);
        Subscription {
            detach: Some(Box::new(move || {
                let Some(slots) = weak.upgrade() else {
                    return;
                };
                let mut slots = slots.borrow_mut();
                if slots.emitting {
                    slots.disposed_during_emit.push(id);
                }
                slots.live.retain(|(sid, _)| *sid != id);
            })),
        }
    }

    /// Invoke every live listener with `event`, in subscription order.
    pub fn emit(&self, event: &E) {
        let mut running = {
            let mut slots = self.slots.borrow_mut();
            slots.emitting = true;
            std::mem::take(&mut slots.live)
        };

        for (id, cb) in running.iter_mut() {
            let disposed = self.slots.borrow().disposed_during_emit.contains(id);
            if !disposed {
                cb(event);
            }
        }

        let mut slots = self.slots.borrow_mut();
        let disposed = std::mem::take(&mut slots.disposed_during_emit);
        running.retain(|(id, _)| !disposed.contains(id));
        let added = std::mem::take(&mut slots.live);
        running.extend(added);
        slots.live = running;
        slots.emitting = false;
    }

    /// Number of live listeners.
    pub fn len(&self) -> usize {
        self.slots.borrow().live.len()
    }

    /// Return `true` when no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E> std::fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slots = self.slots.borrow();
        f.debug_struct("Listeners")
            .field("live", &slots.live.len())
            .finish()
    }
}

/// Disposer returned by every `subscribe` in this crate.
///
/// Dropping the subscription detaches the listener. Use [`Subscription::keep`] for listeners that
/// live as long as their source.
#[must_use = "dropping a Subscription detaches the listener immediately"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// A subscription that owns nothing, for sources that already fired their one-shot event.
    pub(crate) fn inert() -> Self {
        Self { detach: None }
    }

    /// Detach now.
    pub fn dispose(mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }

    /// Keep the listener attached for the lifetime of its source.
    pub fn keep(mut self) {
        self.detach = None;
    }

    /// Return `true` while this subscription still owns its detach path.
    pub fn is_active(&self) -> bool {
        self.detach.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/events.rs"]
mod tests;
