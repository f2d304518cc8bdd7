// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::time::{SystemTime, UNIX_EPOCH};

use crate::constants::{CONFIG_EXPIRY_STORAGE_KEY, CONFIG_STORAGE_KEY};
use crate::remote_config::RemoteConfigResponse;
use crate::storage::KeyValueStorage;
use crate::{fp_debug, fp_warn};

const MILLIS_PER_HOUR: u64 = 3_600_000;

pub(crate) fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// TTL cache for the fetched config, layered over a [`KeyValueStorage`]
///
/// Two opaque keys: the serialized response blob and an expiry timestamp in
/// milliseconds. A blob is valid strictly before its expiry; a timestamp equal
/// to the current time is already stale.
pub(crate) struct ConfigCache<'a, S: KeyValueStorage> {
    storage: &'a S,
}

impl<'a, S: KeyValueStorage> ConfigCache<'a, S> {
    pub(crate) fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    pub(crate) fn load(&self) -> Option<RemoteConfigResponse> {
        self.load_at(unix_millis())
    }

    /// Reads the cached response, treating anything malformed, missing or
    /// expired as a miss. Never errors.
    fn load_at(&self, now_ms: u64) -> Option<RemoteConfigResponse> {
        let expiry: u64 = self
            .storage
            .get(CONFIG_EXPIRY_STORAGE_KEY)?
            .parse()
            .ok()?;
        if now_ms >= expiry {
            fp_debug!("ConfigCache: cached config expired at {}", expiry);
            return None;
        }
        let blob = self.storage.get(CONFIG_STORAGE_KEY)?;
        match serde_json::from_str(&blob) {
            Ok(response) => Some(response),
            Err(e) => {
                fp_warn!("ConfigCache: discarding corrupt cached config: {}", e);
                None
            }
        }
    }

    /// Persists the response with an expiry of now + ttl. Best effort: storage
    /// failures are logged and swallowed.
    pub(crate) fn store(&self, response: &RemoteConfigResponse, ttl_hours: u64) {
        self.store_at(response, ttl_hours, unix_millis())
    }

    fn store_at(&self, response: &RemoteConfigResponse, ttl_hours: u64, now_ms: u64) {
        let blob = match serde_json::to_string(response) {
            Ok(blob) => blob,
            Err(e) => {
                fp_debug!("ConfigCache: failed to serialize config: {}", e);
                return;
            }
        };
        let expiry = now_ms + ttl_hours * MILLIS_PER_HOUR;
        if let Err(e) = self.storage.set(CONFIG_STORAGE_KEY, &blob) {
            fp_debug!("ConfigCache: failed to persist config: {}", e);
            return;
        }
        if let Err(e) = self
            .storage
            .set(CONFIG_EXPIRY_STORAGE_KEY, &expiry.to_string())
        {
            fp_debug!("ConfigCache: failed to persist config expiry: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigCache, MILLIS_PER_HOUR};
    use crate::constants::{CONFIG_EXPIRY_STORAGE_KEY, CONFIG_STORAGE_KEY};
    use crate::remote_config::{RemoteConfigResponse, RemoteConfigTemplate};
    use crate::storage::{KeyValueStorage, MemoryStorage, StorageError};

    fn sample_response() -> RemoteConfigResponse {
        RemoteConfigResponse {
            entries: Some(RemoteConfigTemplate {
                fpr_enabled: Some("true".to_string()),
                fpr_log_source: Some("462".to_string()),
                ..Default::default()
            }),
            state: Some("UPDATE".to_string()),
        }
    }

    #[test]
    fn test_store_then_load_before_expiry() {
        let storage = MemoryStorage::new();
        let cache = ConfigCache::new(&storage);

        cache.store_at(&sample_response(), 12, 1_000);
        assert_eq!(cache.load_at(1_001), Some(sample_response()));
        assert_eq!(
            storage.get(CONFIG_EXPIRY_STORAGE_KEY).unwrap(),
            (1_000 + 12 * MILLIS_PER_HOUR).to_string()
        );
    }

    #[test]
    fn test_expiry_boundary_is_a_miss() {
        let storage = MemoryStorage::new();
        let cache = ConfigCache::new(&storage);

        cache.store_at(&sample_response(), 1, 0);
        // valid strictly before the expiry timestamp
        assert!(cache.load_at(MILLIS_PER_HOUR - 1).is_some());
        assert!(cache.load_at(MILLIS_PER_HOUR).is_none());
        assert!(cache.load_at(MILLIS_PER_HOUR + 1).is_none());
    }

    #[test]
    fn test_missing_keys_are_a_miss() {
        let storage = MemoryStorage::new();
        let cache = ConfigCache::new(&storage);
        assert!(cache.load_at(0).is_none());

        // expiry present but no blob
        storage.set(CONFIG_EXPIRY_STORAGE_KEY, "9999999999").unwrap();
        assert!(cache.load_at(0).is_none());
    }

    #[test]
    fn test_corrupt_blob_is_a_miss() {
        let storage = MemoryStorage::new();
        storage.set(CONFIG_EXPIRY_STORAGE_KEY, "9999999999").unwrap();
        storage.set(CONFIG_STORAGE_KEY, "not json {").unwrap();

        let cache = ConfigCache::new(&storage);
        assert!(cache.load_at(0).is_none());
    }

    #[test]
    fn test_unparsable_expiry_is_a_miss() {
        let storage = MemoryStorage::new();
        storage.set(CONFIG_EXPIRY_STORAGE_KEY, "tomorrow").unwrap();
        storage
            .set(
                CONFIG_STORAGE_KEY,
                &serde_json::to_string(&sample_response()).unwrap(),
            )
            .unwrap();

        let cache = ConfigCache::new(&storage);
        assert!(cache.load_at(0).is_none());
    }

    struct ReadOnlyStorage;

    impl KeyValueStorage for ReadOnlyStorage {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    #[test]
    fn test_store_swallows_write_failures() {
        let storage = ReadOnlyStorage;
        let cache = ConfigCache::new(&storage);
        cache.store_at(&sample_response(), 12, 0);
        assert!(cache.load_at(0).is_none());
    }
}
