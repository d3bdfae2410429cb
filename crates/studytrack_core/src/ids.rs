//! Identifier generation for new notes and PYQ items.
//!
//! # Responsibility
//! - Supply opaque unique id strings through a swappable generator.
//! - Fall back to a timestamp + random suffix when the generator fails.
//!
//! # Invariants
//! - Core never parses ids or assumes a format or length.
//! - `next_id` never panics and always returns a non-empty string.

use log::warn;
use std::collections::hash_map::RandomState;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::hash::{BuildHasher, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

static FALLBACK_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generator failure; recovered by [`next_id`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdError(pub String);

impl Display for IdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "id generation failed: {}", self.0)
    }
}

impl Error for IdError {}

/// Source of globally unique id strings.
pub trait IdGenerator {
    fn generate(&self) -> Result<String, IdError>;
}

/// Random (v4) UUID generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn generate(&self) -> Result<String, IdError> {
        Ok(Uuid::new_v4().to_string())
    }
}

/// Returns a fresh id, falling back to [`fallback_id`] on failure or on an
/// empty id.
pub fn next_id(generator: &dyn IdGenerator) -> String {
    match generator.generate() {
        Ok(id) if !id.is_empty() => id,
        Ok(_) => {
            warn!("event=id_generate module=ids status=fallback reason=empty_id");
            fallback_id()
        }
        Err(err) => {
            warn!("event=id_generate module=ids status=fallback reason={err}");
            fallback_id()
        }
    }
}

/// `<millis-hex>-<random-hex>` id for use when the generator is unavailable.
pub fn fallback_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    let sequence = FALLBACK_SEQUENCE.fetch_add(1, Ordering::Relaxed);

    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u128(millis);
    hasher.write_u64(sequence);
    hasher.write_u32(std::process::id());

    format!("{millis:x}-{:016x}", hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::{fallback_id, next_id, IdError, IdGenerator, UuidIdGenerator};
    use std::collections::HashSet;

    struct BrokenGenerator;

    impl IdGenerator for BrokenGenerator {
        fn generate(&self) -> Result<String, IdError> {
            Err(IdError("entropy source unavailable".to_string()))
        }
    }

    struct EmptyGenerator;

    impl IdGenerator for EmptyGenerator {
        fn generate(&self) -> Result<String, IdError> {
            Ok(String::new())
        }
    }

    #[test]
    fn uuid_generator_yields_distinct_ids() {
        let first = next_id(&UuidIdGenerator);
        let second = next_id(&UuidIdGenerator);
        assert_ne!(first, second);
        assert_eq!(first.len(), 36);
    }

    #[test]
    fn failing_generators_fall_back_without_panicking() {
        let broken = next_id(&BrokenGenerator);
        let empty = next_id(&EmptyGenerator);
        assert!(broken.contains('-'));
        assert!(!empty.is_empty());
        assert_ne!(broken, empty);
    }

    #[test]
    fn fallback_ids_are_unique_in_a_tight_loop() {
        let ids: HashSet<String> = (0..500).map(|_| fallback_id()).collect();
        assert_eq!(ids.len(), 500);
    }
}
