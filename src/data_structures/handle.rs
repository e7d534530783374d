//! Swappable shared handles.
//!
//! A [`HandleSlot`] always holds a usable value. Readers take a cheap `Arc`
//! clone of whatever is current, a background task may replace it at any time
//! with [`HandleSlot::swap`]. Readers that already cloned the old `Arc` keep it
//! alive until they are done with it, so a frame that started drawing with
//! the old value finishes with it.

use std::sync::{
    Arc, PoisonError, RwLock,
    atomic::{AtomicUsize, Ordering},
};

#[derive(Debug)]
pub struct HandleSlot<T> {
    current: RwLock<Arc<T>>,
    swaps: AtomicUsize,
}

impl<T> HandleSlot<T> {
    pub fn new(initial: T) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
            swaps: AtomicUsize::new(0),
        }
    }

    /// The value readers should use right now.
    pub fn current(&self) -> Arc<T> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the current value. Visible to every `current()` call that
    /// happens after this returns.
    pub fn swap(&self, next: T) {
        let next = Arc::new(next);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = next;
        self.swaps.fetch_add(1, Ordering::Release);
    }

    /// How many times the initial value has been replaced.
    pub fn swaps(&self) -> usize {
        self.swaps.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readers_keep_their_snapshot_across_a_swap() {
        let slot = HandleSlot::new("placeholder");
        let before = slot.current();
        slot.swap("decoded");
        assert_eq!(*before, "placeholder");
        assert_eq!(*slot.current(), "decoded");
        assert_eq!(slot.swaps(), 1);
    }

    #[test]
    fn swap_is_visible_across_threads() {
        let slot = Arc::new(HandleSlot::new(0u32));
        let writer = {
            let slot = slot.clone();
            std::thread::spawn(move || slot.swap(42))
        };
        writer.join().expect("writer thread panicked");
        assert_eq!(*slot.current(), 42);
        assert_eq!(slot.swaps(), 1);
    }
}
