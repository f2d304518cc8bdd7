// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

mod cache;
pub mod constants;
pub mod log;
pub mod remote_config;
pub mod rollout;
mod sampling;
pub mod settings;
pub mod storage;

pub use remote_config::{
    ConfigResolver, InstallationTokenProvider, RemoteConfigResponse, RemoteConfigTemplate,
    StaticTokenProvider,
};
pub use settings::{PerfSettings, PerfSettingsBuilder};
pub use storage::{KeyValueStorage, MemoryStorage, StorageError};
