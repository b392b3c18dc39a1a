//! Cache Entry Module
//!
//! Defines the structure for individual in-process cache entries.

use std::time::{Duration, Instant};

use crate::error::CacheError;

// == Cache Entry ==
/// A stored value with its expiry deadline.
///
/// Every entry expires; there is no "keep forever" mode.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: String,
    /// Time after which the entry is no longer visible
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry expiring `ttl_secs` seconds from now.
    ///
    /// Fails with [`CacheError::InvalidExpiry`] if the deadline is not
    /// representable.
    pub fn new(value: String, ttl_secs: u64) -> Result<Self, CacheError> {
        let expires_at = Instant::now()
            .checked_add(Duration::from_secs(ttl_secs))
            .ok_or(CacheError::InvalidExpiry)?;

        Ok(Self { value, expires_at })
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches its deadline.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation() {
        let before = Instant::now();
        let entry = CacheEntry::new("test_value".to_string(), 60).unwrap();

        assert_eq!(entry.value, "test_value");
        assert!(entry.expires_at >= before + Duration::from_secs(60));
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_unrepresentable_deadline_rejected() {
        let result = CacheEntry::new("test_value".to_string(), u64::MAX);
        assert!(matches!(result, Err(CacheError::InvalidExpiry)));
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("test_value".to_string(), 1).unwrap();

        assert!(!entry.is_expired());
        sleep(Duration::from_millis(1100));
        assert!(entry.is_expired());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new("test".to_string(), 5).unwrap();

        assert!(entry.is_expired_at(entry.expires_at));
        assert!(!entry.is_expired_at(entry.expires_at - Duration::from_millis(1)));
    }
}
