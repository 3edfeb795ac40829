//! Single-threaded listener registry with detachable subscriptions.
//!
//! Used for navigation changes, auth-state changes and session-state changes.
//! Listeners are snapshotted before each emit, so a listener may subscribe,
//! unsubscribe or trigger a nested emit without tripping the `RefCell`.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Callback<T> = Rc<dyn Fn(&T)>;
type Slots<T> = RefCell<Vec<(u64, Callback<T>)>>;

/// A set of callbacks that all receive every emitted value.
pub struct Listeners<T> {
    slots: Rc<Slots<T>>,
    next_id: Cell<u64>,
}

impl<T: 'static> Listeners<T> {
    pub fn new() -> Self {
        Self {
            slots: Rc::new(RefCell::new(Vec::new())),
            next_id: Cell::new(0),
        }
    }

    /// Register `listener`. It stays registered until the returned
    /// [`Subscription`] is dropped or unsubscribed.
    pub fn add(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.slots.borrow_mut().push((id, Rc::new(listener)));

        let slots: Weak<Slots<T>> = Rc::downgrade(&self.slots);
        Subscription::new(move || {
            if let Some(slots) = slots.upgrade() {
                slots.borrow_mut().retain(|(slot, _)| *slot != id);
            }
        })
    }

    /// Call every registered listener with `value`, in registration order.
    pub fn emit(&self, value: &T) {
        let snapshot: Vec<Callback<T>> = self
            .slots
            .borrow()
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();
        for cb in snapshot {
            cb(value);
        }
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: 'static> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle returned by a `subscribe`-style call. Dropping it detaches the listener.
#[must_use = "dropping a Subscription detaches the listener immediately"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(detach: impl FnOnce() + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    /// A subscription with nothing to detach.
    pub fn noop() -> Self {
        Self { detach: None }
    }

    pub fn unsubscribe(mut self) {
        self.detach_now();
    }

    fn detach_now(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_reaches_every_listener() {
        let listeners = Listeners::<u32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let a = {
            let seen = seen.clone();
            listeners.add(move |v| seen.borrow_mut().push(("a", *v)))
        };
        let b = {
            let seen = seen.clone();
            listeners.add(move |v| seen.borrow_mut().push(("b", *v)))
        };

        listeners.emit(&7);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
        drop((a, b));
    }

    #[test]
    fn test_unsubscribe_and_drop_detach() {
        let listeners = Listeners::<()>::new();
        let count = Rc::new(Cell::new(0));

        let first = {
            let count = count.clone();
            listeners.add(move |_| count.set(count.get() + 1))
        };
        let second = {
            let count = count.clone();
            listeners.add(move |_| count.set(count.get() + 10))
        };
        assert_eq!(listeners.len(), 2);

        first.unsubscribe();
        listeners.emit(&());
        assert_eq!(count.get(), 10);

        drop(second);
        listeners.emit(&());
        assert_eq!(count.get(), 10);
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_listener_can_unsubscribe_during_emit() {
        let listeners = Rc::new(Listeners::<()>::new());
        let held: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let sub = {
            let held = held.clone();
            listeners.add(move |_| {
                held.borrow_mut().take();
            })
        };
        *held.borrow_mut() = Some(sub);

        listeners.emit(&());
        assert!(listeners.is_empty());
    }
}
