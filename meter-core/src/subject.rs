//! A value stream with explicit subscribe and unsubscribe.

use std::fmt;

/// Returned by [`Subject::on_next`]; pass it back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

type Listener<T> = Box<dyn FnMut(&T)>;

/// Holds a current value and pushes every new one to its listeners. A new
/// listener is called with the current value right away.
pub struct Subject<T> {
    value: T,
    next_id: u64,
    listeners: Vec<(SubscriptionHandle, Listener<T>)>,
}

impl<T> Subject<T> {
    pub fn new(initial: T) -> Self {
        Self {
            value: initial,
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn emit(&mut self, value: T) {
        self.value = value;
        for (_, listener) in &mut self.listeners {
            listener(&self.value);
        }
    }

    pub fn on_next(&mut self, mut listener: impl FnMut(&T) + 'static) -> SubscriptionHandle {
        let handle = SubscriptionHandle(self.next_id);
        self.next_id += 1;
        listener(&self.value);
        self.listeners.push((handle, Box::new(listener)));
        handle
    }

    /// Returns `false` when the handle was already released.
    pub fn unsubscribe(&mut self, handle: SubscriptionHandle) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != handle);
        self.listeners.len() != before
    }

    /// Drops every listener.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<T: fmt::Debug> fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("value", &self.value)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
