// Shared handle ownership
//
// A `Handle<T>` is a reference-counted owner of a raw Vulkan handle. The
// deleter is bound when the handle is created (it captures whatever parent
// object the destroy call needs) and runs exactly once, when the last
// clone drops.

use std::fmt;
use std::sync::Arc;

pub(crate) type Deleter<T> = Box<dyn FnOnce(T) + Send + Sync>;

struct Owned<T: Copy> {
    raw: T,
    deleter: Option<Deleter<T>>,
}

impl<T: Copy> Drop for Owned<T> {
    fn drop(&mut self) {
        if let Some(deleter) = self.deleter.take() {
            deleter(self.raw);
        }
    }
}

pub struct Handle<T: Copy> {
    inner: Arc<Owned<T>>,
}

impl<T: Copy> Handle<T> {
    pub(crate) fn new(raw: T, deleter: impl FnOnce(T) + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(Owned {
                raw,
                deleter: Some(Box::new(deleter)),
            }),
        }
    }

    /// A handle whose lifetime is managed elsewhere (e.g. swapchain images).
    pub(crate) fn unowned(raw: T) -> Self {
        Self {
            inner: Arc::new(Owned { raw, deleter: None }),
        }
    }

    pub fn raw(&self) -> T {
        self.inner.raw
    }

    /// Number of live owners of this handle.
    pub fn owner_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl<T: Copy> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.inner.raw).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ash::vk::{self, Handle as _};
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    #[test]
    fn deleter_runs_once_on_last_drop() {
        let calls = Arc::new(AtomicUsize::new(0));
        let deleted = Arc::new(AtomicU64::new(0));

        let handle = {
            let calls = calls.clone();
            let deleted = deleted.clone();
            Handle::new(vk::Fence::from_raw(0x42), move |fence: vk::Fence| {
                calls.fetch_add(1, Ordering::SeqCst);
                deleted.store(fence.as_raw(), Ordering::SeqCst);
            })
        };

        let second = handle.clone();
        assert_eq!(handle.owner_count(), 2);

        drop(handle);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(second.raw(), vk::Fence::from_raw(0x42));

        drop(second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(deleted.load(Ordering::SeqCst), 0x42);
    }

    #[test]
    fn unowned_handle_never_deletes() {
        let image = Handle::unowned(vk::Image::from_raw(7));
        let copy = image.clone();
        drop(image);
        assert_eq!(copy.raw().as_raw(), 7);
        assert_eq!(copy.owner_count(), 1);
    }
}
