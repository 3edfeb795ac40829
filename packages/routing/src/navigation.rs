//! # Navigation primitive — current path, history and listeners
//!
//! [`Navigator`] owns the process-wide current path. [`Navigator::navigate`] pushes a
//! history entry and synchronously notifies every subscriber; back and forward moves
//! notify the same way, so routers re-evaluate without anyone calling `navigate`.
//!
//! The platform side is the [`History`] trait:
//!
//! | Implementation | `back` / `forward` |
//! |----------------|--------------------|
//! | [`MemoryHistory`] | Applied immediately; the new location is returned and the navigator notifies at once. |
//! | Browser history (`ui` crate) | Asynchronous; returns `None` and the browser later fires `popstate`, which calls [`Navigator::sync_from_history`]. |
//!
//! There is no queuing. A `navigate` issued from inside a listener pushes and
//! notifies again; listeners must be idempotent on the current path.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use store::{Listeners, Subscription};

/// Platform session history.
pub trait History {
    /// Path of the current entry.
    fn location(&self) -> String;

    fn push(&self, path: &str);

    fn replace(&self, path: &str);

    /// Step back one entry. Returns the new location if the move completed
    /// synchronously, `None` if there was nothing to go back to or the platform
    /// reports it later.
    fn back(&self) -> Option<String>;

    fn forward(&self) -> Option<String>;
}

/// In-process history: a stack of entries and a cursor.
pub struct MemoryHistory {
    entries: RefCell<Vec<String>>,
    index: Cell<usize>,
}

impl MemoryHistory {
    pub fn new(initial: &str) -> Self {
        Self {
            entries: RefCell::new(vec![initial.to_string()]),
            index: Cell::new(0),
        }
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl History for MemoryHistory {
    fn location(&self) -> String {
        self.entries.borrow()[self.index.get()].clone()
    }

    fn push(&self, path: &str) {
        let mut entries = self.entries.borrow_mut();
        let index = self.index.get();
        entries.truncate(index + 1);
        entries.push(path.to_string());
        self.index.set(index + 1);
    }

    fn replace(&self, path: &str) {
        self.entries.borrow_mut()[self.index.get()] = path.to_string();
    }

    fn back(&self) -> Option<String> {
        let index = self.index.get();
        if index == 0 {
            return None;
        }
        self.index.set(index - 1);
        Some(self.location())
    }

    fn forward(&self) -> Option<String> {
        let index = self.index.get();
        if index + 1 >= self.entries.borrow().len() {
            return None;
        }
        self.index.set(index + 1);
        Some(self.location())
    }
}

struct NavigatorInner {
    history: Box<dyn History>,
    current: RefCell<String>,
    listeners: Listeners<String>,
}

/// Handle to the current path. Clones share the same history and listeners.
#[derive(Clone)]
pub struct Navigator {
    inner: Rc<NavigatorInner>,
}

impl Navigator {
    pub fn new(history: impl History + 'static) -> Self {
        let current = history.location();
        Self {
            inner: Rc::new(NavigatorInner {
                history: Box::new(history),
                current: RefCell::new(current),
                listeners: Listeners::new(),
            }),
        }
    }

    /// Navigator over a fresh [`MemoryHistory`] starting at `initial`.
    pub fn in_memory(initial: &str) -> Self {
        Self::new(MemoryHistory::new(initial))
    }

    pub fn current_path(&self) -> String {
        self.inner.current.borrow().clone()
    }

    /// Push `path` onto the history and notify subscribers.
    pub fn navigate(&self, path: &str) {
        tracing::debug!(path, "Navigating");
        self.inner.history.push(path);
        self.set_current(path.to_string());
    }

    /// Replace the current history entry with `path` and notify subscribers.
    pub fn replace(&self, path: &str) {
        tracing::debug!(path, "Replacing location");
        self.inner.history.replace(path);
        self.set_current(path.to_string());
    }

    pub fn back(&self) {
        if let Some(path) = self.inner.history.back() {
            self.set_current(path);
        }
    }

    pub fn forward(&self) {
        if let Some(path) = self.inner.history.forward() {
            self.set_current(path);
        }
    }

    /// Re-read the location from the history, e.g. after a browser `popstate`.
    pub fn sync_from_history(&self) {
        self.set_current(self.inner.history.location());
    }

    /// Call `listener` with the new path after every change.
    pub fn subscribe(&self, listener: impl Fn(&str) + 'static) -> Subscription {
        self.inner.listeners.add(move |path: &String| listener(path))
    }

    fn set_current(&self, path: String) {
        *self.inner.current.borrow_mut() = path.clone();
        self.inner.listeners.emit(&path);
    }
}

impl PartialEq for Navigator {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("current", &self.current_path())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorded(nav: &Navigator) -> (Rc<RefCell<Vec<String>>>, Subscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sub = {
            let seen = seen.clone();
            nav.subscribe(move |p| seen.borrow_mut().push(p.to_string()))
        };
        (seen, sub)
    }

    #[test]
    fn test_navigate_then_back_restores_prior_path() {
        let nav = Navigator::in_memory("/");
        let (seen, _sub) = recorded(&nav);

        nav.navigate("/x");
        assert_eq!(nav.current_path(), "/x");
        nav.back();
        assert_eq!(nav.current_path(), "/");

        // one notification per transition
        assert_eq!(*seen.borrow(), vec!["/x".to_string(), "/".to_string()]);
    }

    #[test]
    fn test_back_at_start_does_nothing() {
        let nav = Navigator::in_memory("/login");
        let (seen, _sub) = recorded(&nav);
        nav.back();
        assert_eq!(nav.current_path(), "/login");
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_push_after_back_drops_forward_entries() {
        let history = Rc::new(MemoryHistory::new("/"));
        let nav = Navigator::new(SharedHistory(history.clone()));

        nav.navigate("/a");
        nav.navigate("/b");
        nav.back();
        nav.navigate("/c");
        assert_eq!(history.entries(), vec!["/", "/a", "/c"]);

        nav.forward();
        assert_eq!(nav.current_path(), "/c");
        nav.back();
        nav.back();
        assert_eq!(nav.current_path(), "/");
        nav.forward();
        assert_eq!(nav.current_path(), "/a");
    }

    #[test]
    fn test_replace_keeps_history_length() {
        let history = Rc::new(MemoryHistory::new("/"));
        let nav = Navigator::new(SharedHistory(history.clone()));
        nav.navigate("/login");
        nav.replace("/student/dashboard");
        assert_eq!(history.entries(), vec!["/", "/student/dashboard"]);
        assert_eq!(nav.current_path(), "/student/dashboard");
    }

    #[test]
    fn test_same_path_still_notifies() {
        let nav = Navigator::in_memory("/");
        let (seen, _sub) = recorded(&nav);
        nav.navigate("/login");
        nav.navigate("/login");
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_listener_may_navigate() {
        let nav = Navigator::in_memory("/");
        let redirect = {
            let nav2 = nav.clone();
            nav.subscribe(move |p| {
                if p == "/old" {
                    nav2.navigate("/new");
                }
            })
        };
        nav.navigate("/old");
        assert_eq!(nav.current_path(), "/new");
        drop(redirect);
    }

    /// History whose back/forward complete later, like the browser's.
    struct DeferredHistory {
        inner: MemoryHistory,
    }

    impl History for DeferredHistory {
        fn location(&self) -> String {
            self.inner.location()
        }
        fn push(&self, path: &str) {
            self.inner.push(path)
        }
        fn replace(&self, path: &str) {
            self.inner.replace(path)
        }
        fn back(&self) -> Option<String> {
            self.inner.back();
            None
        }
        fn forward(&self) -> Option<String> {
            self.inner.forward();
            None
        }
    }

    #[test]
    fn test_deferred_back_notifies_on_sync() {
        let nav = Navigator::new(DeferredHistory {
            inner: MemoryHistory::new("/"),
        });
        let (seen, _sub) = recorded(&nav);

        nav.navigate("/x");
        nav.back();
        assert_eq!(nav.current_path(), "/x");
        assert_eq!(seen.borrow().len(), 1);

        // popstate
        nav.sync_from_history();
        assert_eq!(nav.current_path(), "/");
        assert_eq!(seen.borrow().len(), 2);
    }

    struct SharedHistory(Rc<MemoryHistory>);

    impl History for SharedHistory {
        fn location(&self) -> String {
            self.0.location()
        }
        fn push(&self, path: &str) {
            self.0.push(path)
        }
        fn replace(&self, path: &str) {
            self.0.replace(path)
        }
        fn back(&self) -> Option<String> {
            self.0.back()
        }
        fn forward(&self) -> Option<String> {
            self.0.forward()
        }
    }
}
