// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::{collections::HashMap, fmt, sync::Mutex};

/// Key-value storage backing the local config cache
///
/// Implementations wrap whatever persistent store the host platform offers.
/// Failures are soft: a failed read is treated as a cache miss and a failed
/// write leaves the previous cache state in place.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Clone)]
pub enum StorageError {
    Unavailable,
    WriteFailed(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "storage unavailable"),
            Self::WriteFailed(msg) => write!(f, "storage write failed: {}", msg),
        }
    }
}

/// In-process storage backed by a HashMap
///
/// Used by tests and by embedders that have no persistent store; the cache
/// then only lasts for the process lifetime.
#[derive(Default)]
pub struct MemoryStorage {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.map.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.map
            .lock()
            .map_err(|_| StorageError::Unavailable)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
