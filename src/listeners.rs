//! Ordered lists of gesture event listeners, unregistered by handle.

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_LISTENER: AtomicU64 = AtomicU64::new(0);

/// Identifies one registered listener
///
/// Handles are unique for the whole process, so a handle returned by one list
/// never removes a listener from another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerHandle(u64);

impl ListenerHandle {
    pub(crate) fn next() -> Self {
        ListenerHandle(NEXT_LISTENER.fetch_add(1, Ordering::Relaxed))
    }
}

/// A callback registered on a [`Listeners`] list
pub type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// An ordered list of callbacks for one kind of gesture event
///
/// Listeners are invoked in the order they were added.
///
/// # Example
/// ```rust
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use leafwing_touch::listeners::Listeners;
///
/// let calls = Arc::new(AtomicUsize::new(0));
/// let mut listeners = Listeners::<u32>::default();
///
/// let counter = calls.clone();
/// let handle = listeners.add(move |_| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// listeners.notify(&7);
/// assert!(listeners.remove(handle));
/// listeners.notify(&7);
///
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
/// ```
pub struct Listeners<T: ?Sized> {
    entries: Vec<(ListenerHandle, Listener<T>)>,
}

impl<T: ?Sized> Listeners<T> {
    /// Registers `listener` at the end of the list
    pub fn add(&mut self, listener: impl Fn(&T) + Send + Sync + 'static) -> ListenerHandle {
        let handle = ListenerHandle::next();
        self.entries.push((handle, Arc::new(listener)));
        handle
    }

    /// Unregisters the listener registered under `handle`
    ///
    /// Returns `false` if no such listener is registered on this list.
    pub fn remove(&mut self, handle: ListenerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(existing, _)| *existing != handle);
        self.entries.len() != before
    }

    /// Unregisters every listener
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Invokes every listener, in registration order
    pub fn notify(&self, value: &T) {
        for (_, listener) in &self.entries {
            listener(value);
        }
    }

    /// The number of registered listeners
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Are there no registered listeners?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Deriving default induces an undesired bound on the generic
impl<T: ?Sized> Default for Listeners<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: ?Sized> Clone for Listeners<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<T: ?Sized> Debug for Listeners<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(handle, _)| handle))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn identical_listeners_are_removed_by_handle() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut listeners = Listeners::<&str>::default();

        let first_log = log.clone();
        let first = listeners.add(move |value| first_log.lock().unwrap().push(*value));
        let second_log = log.clone();
        let second = listeners.add(move |value| second_log.lock().unwrap().push(*value));

        listeners.notify(&"a");
        assert!(listeners.remove(first));
        listeners.notify(&"b");

        assert_eq!(*log.lock().unwrap(), vec!["a", "a", "b"]);
        assert_eq!(listeners.len(), 1);

        // Removing twice is a no-op
        assert!(!listeners.remove(first));
        assert!(listeners.remove(second));
        assert!(listeners.is_empty());
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut listeners = Listeners::<u8>::default();

        for tag in 0..3u8 {
            let log = log.clone();
            listeners.add(move |value| log.lock().unwrap().push((tag, *value)));
        }

        listeners.notify(&9);
        assert_eq!(*log.lock().unwrap(), vec![(0, 9), (1, 9), (2, 9)]);
    }
}
