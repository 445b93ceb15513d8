//! # Opaque Handles
//!
//! A forward pass hands its saved state to the caller as a `ContextHandle`:
//! an owning, type-erased box plus a tag naming what kind of value is
//! inside. The matching backward pass presents the tag it expects and gets
//! the value back only if both the tag and the concrete type agree.
//!
//! Ownership is strictly single:
//!
//! - a handle cannot be cloned, so exactly one handle exists per value
//! - dropping the handle runs its destructor callback exactly once
//! - [`ContextHandle::into_inner`] moves the value out instead, and the
//!   destructor does not run
//!
//! Tags are registered at runtime from a process-wide counter and compared
//! by id, so two tags with the same name are still distinct kinds.

use std::any::{type_name, Any};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use signatory_core::{Result, SigError};
use tracing::{trace, warn};

static NEXT_TAG_ID: AtomicU64 = AtomicU64::new(0);

/// Identifies one kind of value that can live behind a [`ContextHandle`].
#[derive(Debug, Clone, Copy)]
pub struct HandleTag {
    id: u64,
    name: &'static str,
}

impl HandleTag {
    /// Allocate a fresh tag. Call once per kind and keep the result, e.g.
    /// in a `once_cell::sync::Lazy`.
    pub fn register(name: &'static str) -> Self {
        let id = NEXT_TAG_ID.fetch_add(1, Ordering::Relaxed);
        trace!(id, name, "registered handle tag");
        Self { id, name }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for HandleTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for HandleTag {}

impl fmt::Display for HandleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.id)
    }
}

/// Called with the boxed value when a handle is dropped.
pub type Destructor = fn(Box<dyn Any + Send>);

/// Owning, type-tagged, single-owner box.
pub struct ContextHandle {
    tag: HandleTag,
    type_name: &'static str,
    payload: Option<Box<dyn Any + Send>>,
    destructor: Destructor,
}

impl ContextHandle {
    /// Box `value` behind `tag`; `destructor` runs when the handle is dropped.
    pub fn new<T: Any + Send>(value: T, tag: HandleTag, destructor: Destructor) -> Self {
        Self {
            tag,
            type_name: type_name::<T>(),
            payload: Some(Box::new(value)),
            destructor,
        }
    }

    pub fn tag(&self) -> HandleTag {
        self.tag
    }

    /// Borrow the value, checking tag and type.
    pub fn downcast_ref<T: Any>(&self, expected: HandleTag) -> Result<&T> {
        self.check_tag(expected)?;
        let found = self.type_name;
        self.payload
            .as_deref()
            .and_then(|payload| payload.downcast_ref::<T>())
            .ok_or_else(|| type_mismatch::<T>(expected, found))
    }

    /// Mutably borrow the value, checking tag and type.
    pub fn downcast_mut<T: Any>(&mut self, expected: HandleTag) -> Result<&mut T> {
        self.check_tag(expected)?;
        let found = self.type_name;
        self.payload
            .as_deref_mut()
            .and_then(|payload| payload.downcast_mut::<T>())
            .ok_or_else(|| type_mismatch::<T>(expected, found))
    }

    /// Move the value out. On mismatch the handle is dropped as usual, so
    /// its destructor still runs.
    pub fn into_inner<T: Any>(mut self, expected: HandleTag) -> Result<T> {
        self.check_tag(expected)?;
        let found = self.type_name;
        match self.payload.take().map(|payload| payload.downcast::<T>()) {
            Some(Ok(value)) => Ok(*value),
            Some(Err(payload)) => {
                self.payload = Some(payload);
                Err(type_mismatch::<T>(expected, found))
            }
            None => Err(type_mismatch::<T>(expected, found)),
        }
    }

    fn check_tag(&self, expected: HandleTag) -> Result<()> {
        if self.tag == expected {
            return Ok(());
        }
        warn!(expected = %expected, found = %self.tag, "handle retrieved with the wrong tag");
        Err(SigError::TypeTagMismatch {
            expected: expected.to_string(),
            found: self.tag.to_string(),
        })
    }
}

fn type_mismatch<T>(expected: HandleTag, found: &str) -> SigError {
    warn!(expected = type_name::<T>(), found, "handle payload has the wrong type");
    SigError::TypeTagMismatch {
        expected: format!("{} ({})", expected, type_name::<T>()),
        found: format!("{} ({})", expected, found),
    }
}

impl Drop for ContextHandle {
    fn drop(&mut self) {
        if let Some(payload) = self.payload.take() {
            trace!(tag = %self.tag, "running handle destructor");
            (self.destructor)(payload);
        }
    }
}

impl fmt::Debug for ContextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextHandle")
            .field("tag", &self.tag)
            .field("type_name", &self.type_name)
            .field("live", &self.payload.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    static DROPS: AtomicUsize = AtomicUsize::new(0);

    fn counting_destructor(payload: Box<dyn Any + Send>) {
        DROPS.fetch_add(1, Ordering::SeqCst);
        drop(payload);
    }

    fn plain_destructor(payload: Box<dyn Any + Send>) {
        drop(payload);
    }

    #[test]
    fn test_tags_compare_by_id() {
        let a = HandleTag::register("same");
        let b = HandleTag::register("same");
        assert_ne!(a, b);
        assert_eq!(a, a);
        assert_eq!(a.name(), b.name());
    }

    #[test]
    fn test_downcast_with_matching_tag() {
        let tag = HandleTag::register("numbers");
        let mut handle = ContextHandle::new(vec![1u32, 2, 3], tag, plain_destructor);
        handle.downcast_mut::<Vec<u32>>(tag).unwrap().push(4);
        assert_eq!(handle.downcast_ref::<Vec<u32>>(tag).unwrap(), &vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_wrong_tag_rejected() {
        let tag = HandleTag::register("numbers");
        let other = HandleTag::register("letters");
        let handle = ContextHandle::new(7u8, tag, plain_destructor);
        let err = handle.downcast_ref::<u8>(other).unwrap_err();
        assert!(matches!(err, SigError::TypeTagMismatch { .. }));
    }

    #[test]
    fn test_wrong_type_rejected() {
        let tag = HandleTag::register("numbers");
        let handle = ContextHandle::new(7u8, tag, plain_destructor);
        let err = handle.downcast_ref::<u16>(tag).unwrap_err();
        assert!(err.to_string().contains("u16"));
    }

    #[test]
    fn test_destructor_runs_once_on_drop_not_on_take() {
        let tag = HandleTag::register("counted");
        let before = DROPS.load(Ordering::SeqCst);

        let handle = ContextHandle::new(String::from("saved"), tag, counting_destructor);
        drop(handle);
        assert_eq!(DROPS.load(Ordering::SeqCst), before + 1);

        let handle = ContextHandle::new(String::from("saved"), tag, counting_destructor);
        let value: String = handle.into_inner(tag).unwrap();
        assert_eq!(value, "saved");
        assert_eq!(DROPS.load(Ordering::SeqCst), before + 1);

        let handle = ContextHandle::new(String::from("saved"), tag, counting_destructor);
        assert!(handle.into_inner::<u64>(tag).is_err());
        assert_eq!(DROPS.load(Ordering::SeqCst), before + 2);
    }
}
