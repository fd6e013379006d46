//! Cross-target thread-safety bounds and the shared cell behind the
//! resolution cache.
//!
//! Policies and registries may be shared across threads on native targets,
//! while `wasm32-unknown-unknown` is single threaded. On wasm the traits below
//! add no bound at all; elsewhere they mean `Send` or `Send + Sync`.

#[allow(missing_docs)]
#[cfg(not(target_arch = "wasm32"))]
pub trait ConditionalSend: Send {}

#[cfg(not(target_arch = "wasm32"))]
impl<S> ConditionalSend for S where S: Send {}

#[allow(missing_docs)]
#[cfg(not(target_arch = "wasm32"))]
pub trait ConditionalSync: Send + Sync {}

#[cfg(not(target_arch = "wasm32"))]
impl<S> ConditionalSync for S where S: Send + Sync {}

#[allow(missing_docs)]
#[cfg(target_arch = "wasm32")]
pub trait ConditionalSend {}

#[cfg(target_arch = "wasm32")]
impl<S> ConditionalSend for S {}

#[allow(missing_docs)]
#[cfg(target_arch = "wasm32")]
pub trait ConditionalSync {}

#[cfg(target_arch = "wasm32")]
impl<S> ConditionalSync for S {}

/// Platform-appropriate shared interior mutability cell.
///
/// - Native: `std::sync::RwLock` (multi-threaded read-write lock)
/// - WASM: `std::cell::RefCell` (single-threaded borrow checking)
///
/// A panic raised while a guard is held does not render the cell unusable:
/// the native variant recovers the guard from a poisoned lock.
///
/// # Example
/// ```
/// use pundit_common::SharedCell;
///
/// let cell = SharedCell::new(vec!["Post"]);
///
/// cell.write().push("Comment");
/// assert_eq!(cell.read().len(), 2);
/// ```
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct SharedCell<T>(std::sync::RwLock<T>);

#[cfg(not(target_arch = "wasm32"))]
impl<T> SharedCell<T> {
    /// Cell holding `value`.
    pub fn new(value: T) -> Self {
        Self(std::sync::RwLock::new(value))
    }

    /// Shared view of the value. Blocks while a writer holds the cell.
    pub fn read(&self) -> std::sync::RwLockReadGuard<'_, T> {
        self.0
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Exclusive view of the value. Blocks until readers and writers are
    /// gone.
    pub fn write(&self) -> std::sync::RwLockWriteGuard<'_, T> {
        self.0
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct SharedCell<T>(std::cell::RefCell<T>);

#[cfg(target_arch = "wasm32")]
impl<T> SharedCell<T> {
    /// Cell holding `value`.
    pub fn new(value: T) -> Self {
        Self(std::cell::RefCell::new(value))
    }

    /// Shared view of the value. A resolver that reads the cache while the
    /// dispatcher is writing to it is a re-entrancy bug and panics here.
    pub fn read(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }

    /// Exclusive view of the value. Guards are never held across policy or
    /// resolver calls, so a live borrow here means re-entrancy and panics.
    pub fn write(&self) -> std::cell::RefMut<'_, T> {
        self.0.borrow_mut()
    }
}
