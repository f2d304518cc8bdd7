// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Storage key for the serialized remote config blob.
pub const CONFIG_STORAGE_KEY: &str = "@firebase/performance/config";
/// Storage key for the cache expiry timestamp, in milliseconds since the epoch.
pub const CONFIG_EXPIRY_STORAGE_KEY: &str = "@firebase/performance/configexpire";

pub const REMOTE_CONFIG_BASE_URL: &str = "https://firebaseremoteconfig.googleapis.com";
pub const FIS_AUTH_PREFIX: &str = "FIREBASE_INSTALLATIONS_AUTH";

pub const DEFAULT_CONFIG_TIME_TO_LIVE_HOURS: u64 = 12;

pub const DEFAULT_LOG_SOURCE: u32 = 462;
pub const DEFAULT_LOG_ENDPOINT_URL: &str =
    "https://firebaselogging.googleapis.com/v0cc/log?format=json_proto";
pub const DEFAULT_TRANSPORT_KEY: &str = "AzSC8r6ReiGqFMyfvgow";

// Secondary defaults applied when the remote template omits a field. Fields
// without an entry here keep whatever value the settings already hold.
pub const SECONDARY_LOGGING_ENABLED: bool = true;
pub const SECONDARY_SHOULD_SEND_TO_TRANSPORT: bool = true;

/// Values of `RemoteConfigResponse::state` that mean the installation has no
/// active config template and must fall back to the legacy endpoint.
pub const STATE_UNSPECIFIED: &str = "INSTANCE_STATE_UNSPECIFIED";
pub const STATE_NO_TEMPLATE: &str = "NO_TEMPLATE";
