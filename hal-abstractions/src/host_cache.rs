//! Remembered host name lookups
//!
//! Transports whose DNS is asynchronous resolve outside the poll loop and
//! keep the answer here. The entry can be dropped when the address stops
//! answering so the next lookup starts fresh.

use heapless::String;

use crate::network::TransportError;

/// Longest host name a cache entry holds
pub const MAX_HOST_NAME_LEN: usize = 64;

/// One host name and its resolved address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostCache<A> {
    entry: Option<(String<MAX_HOST_NAME_LEN>, A)>,
}

impl<A: Copy> HostCache<A> {
    pub const fn new() -> Self {
        Self { entry: None }
    }

    /// Remember `address` for `host`, replacing any previous entry
    pub fn store(&mut self, host: &str, address: A) -> Result<(), TransportError> {
        let mut name = String::new();
        name.push_str(host)
            .map_err(|_| TransportError::Unresolved)?;
        self.entry = Some((name, address));
        Ok(())
    }

    /// Address stored for `host`, if any
    pub fn lookup(&self, host: &str) -> Option<A> {
        match &self.entry {
            Some((name, address)) if name.as_str() == host => Some(*address),
            _ => None,
        }
    }

    /// Drop the stored entry
    pub fn forget(&mut self) {
        self.entry = None;
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }
}

impl<A: Copy> Default for HostCache<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_matches_host_only() {
        let mut cache = HostCache::new();
        cache.store("pool.ntp.org", [162, 159, 200, 1]).unwrap();
        assert_eq!(cache.lookup("pool.ntp.org"), Some([162, 159, 200, 1]));
        assert_eq!(cache.lookup("time.google.com"), None);
    }

    #[test]
    fn test_forget_clears_entry() {
        let mut cache = HostCache::new();
        cache.store("pool.ntp.org", 7u32).unwrap();
        cache.forget();
        assert!(cache.is_empty());
        assert_eq!(cache.lookup("pool.ntp.org"), None);

        cache.store("pool.ntp.org", 9u32).unwrap();
        assert_eq!(cache.lookup("pool.ntp.org"), Some(9));
    }

    #[test]
    fn test_store_replaces_previous_address() {
        let mut cache = HostCache::new();
        cache.store("pool.ntp.org", 1u8).unwrap();
        cache.store("pool.ntp.org", 2u8).unwrap();
        assert_eq!(cache.lookup("pool.ntp.org"), Some(2));
    }

    #[test]
    fn test_overlong_name_keeps_old_entry() {
        let mut cache = HostCache::new();
        cache.store("pool.ntp.org", 1u8).unwrap();
        let long = "a".repeat(MAX_HOST_NAME_LEN + 1);
        assert_eq!(cache.store(&long, 2), Err(TransportError::Unresolved));
        assert_eq!(cache.lookup("pool.ntp.org"), Some(1));
    }
}
