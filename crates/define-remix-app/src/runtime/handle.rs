use std::sync::{Arc, PoisonError, RwLock};

/// Shared slot whose value can be replaced while readers hold the old one
///
/// `get` hands out the current value; `set` swaps in a new one without
/// disturbing readers of the previous value.
///
/// # Examples
///
/// ```
/// use define_remix_app::SwapHandle;
///
/// let handle = SwapHandle::new(1);
/// let reader = handle.clone();
/// let before = reader.get();
/// handle.set(2);
/// assert_eq!(*before, 1);
/// assert_eq!(*reader.get(), 2);
/// ```
#[derive(Debug)]
pub struct SwapHandle<T> {
    slot: Arc<RwLock<Arc<T>>>,
}

impl<T> SwapHandle<T> {
    pub fn new(value: T) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Arc::new(value))),
        }
    }

    pub fn get(&self) -> Arc<T> {
        Arc::clone(&self.slot.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn set(&self, value: T) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(value);
    }
}

impl<T> Clone for SwapHandle<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T: Default> Default for SwapHandle<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
