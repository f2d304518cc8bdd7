// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::constants::{
    DEFAULT_CONFIG_TIME_TO_LIVE_HOURS, DEFAULT_LOG_ENDPOINT_URL, DEFAULT_LOG_SOURCE,
    DEFAULT_TRANSPORT_KEY, SDK_VERSION,
};

#[derive(Debug, Clone)]
#[non_exhaustive]
/// Settings for the performance monitoring SDK
///
/// Holds the deployment identity used to fetch the remote config template, plus
/// the effective values derived from it. There is no global instance: callers
/// own the struct and pass it `&mut` into [`crate::ConfigResolver::resolve`],
/// which overwrites the effective fields on each resolution pass.
///
/// # Usage
/// ```
/// use fireperf_config::PerfSettings;
///
/// let mut builder = PerfSettings::builder();
/// builder
///     .set_project_id("my-project".to_string())
///     .set_api_key("my-api-key".to_string())
///     .set_app_id("1:111:web:abc".to_string());
/// let settings = builder.build();
/// ```
pub struct PerfSettings {
    // # Deployment identity
    project_id: String,
    api_key: String,
    app_id: String,
    app_version: String,
    sdk_version: &'static str,

    /// How long a fetched config stays valid in the local cache
    config_ttl_hours: u64,

    /// The log level for the SDK
    log_level: crate::log::LevelFilter,

    // # Effective values, overwritten by config application
    pub(crate) logging_enabled: bool,
    pub(crate) log_source: u32,
    pub(crate) log_endpoint_url: String,
    pub(crate) transport_key: String,
    pub(crate) should_send_to_transport: bool,
    pub(crate) network_requests_sampling_rate: f64,
    pub(crate) traces_sampling_rate: f64,

    // # Per-session sampling decisions
    pub(crate) log_trace_after_sampling: bool,
    pub(crate) log_network_after_sampling: bool,
}

impl PerfSettings {
    /// Creates a new builder to set the deployment identity
    pub fn builder() -> PerfSettingsBuilder {
        PerfSettingsBuilder {
            settings: PerfSettings::default(),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn app_version(&self) -> &str {
        &self.app_version
    }

    pub fn sdk_version(&self) -> &str {
        self.sdk_version
    }

    pub fn config_ttl_hours(&self) -> u64 {
        self.config_ttl_hours
    }

    pub fn log_level(&self) -> crate::log::LevelFilter {
        self.log_level
    }

    pub fn logging_enabled(&self) -> bool {
        self.logging_enabled
    }

    pub fn log_source(&self) -> u32 {
        self.log_source
    }

    pub fn log_endpoint_url(&self) -> &str {
        &self.log_endpoint_url
    }

    pub fn transport_key(&self) -> &str {
        &self.transport_key
    }

    pub fn should_send_to_transport(&self) -> bool {
        self.should_send_to_transport
    }

    pub fn network_requests_sampling_rate(&self) -> f64 {
        self.network_requests_sampling_rate
    }

    pub fn traces_sampling_rate(&self) -> f64 {
        self.traces_sampling_rate
    }

    pub fn log_trace_after_sampling(&self) -> bool {
        self.log_trace_after_sampling
    }

    pub fn log_network_after_sampling(&self) -> bool {
        self.log_network_after_sampling
    }
}

impl Default for PerfSettings {
    fn default() -> Self {
        PerfSettings {
            project_id: String::new(),
            api_key: String::new(),
            app_id: String::new(),
            app_version: String::new(),
            sdk_version: SDK_VERSION,
            config_ttl_hours: DEFAULT_CONFIG_TIME_TO_LIVE_HOURS,
            log_level: crate::log::LevelFilter::default(),

            logging_enabled: false,
            log_source: DEFAULT_LOG_SOURCE,
            log_endpoint_url: DEFAULT_LOG_ENDPOINT_URL.to_string(),
            transport_key: DEFAULT_TRANSPORT_KEY.to_string(),
            should_send_to_transport: false,
            network_requests_sampling_rate: 1.0,
            traces_sampling_rate: 1.0,

            log_trace_after_sampling: false,
            log_network_after_sampling: false,
        }
    }
}

pub struct PerfSettingsBuilder {
    settings: PerfSettings,
}

impl PerfSettingsBuilder {
    /// Finalizes the builder and returns the settings
    pub fn build(self) -> PerfSettings {
        crate::log::set_max_level(self.settings.log_level);
        self.settings
    }

    pub fn set_project_id(&mut self, project_id: String) -> &mut Self {
        self.settings.project_id = project_id;
        self
    }

    pub fn set_api_key(&mut self, api_key: String) -> &mut Self {
        self.settings.api_key = api_key;
        self
    }

    pub fn set_app_id(&mut self, app_id: String) -> &mut Self {
        self.settings.app_id = app_id;
        self
    }

    pub fn set_app_version(&mut self, app_version: String) -> &mut Self {
        self.settings.app_version = app_version;
        self
    }

    pub fn set_config_ttl_hours(&mut self, ttl_hours: u64) -> &mut Self {
        self.settings.config_ttl_hours = ttl_hours;
        self
    }

    pub fn set_log_level(&mut self, log_level: crate::log::LevelFilter) -> &mut Self {
        self.settings.log_level = log_level;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::PerfSettings;
    use crate::constants::{
        DEFAULT_CONFIG_TIME_TO_LIVE_HOURS, DEFAULT_LOG_ENDPOINT_URL, DEFAULT_LOG_SOURCE,
        DEFAULT_TRANSPORT_KEY,
    };

    #[test]
    fn test_defaults() {
        let settings = PerfSettings::default();
        assert!(!settings.logging_enabled());
        assert_eq!(settings.log_source(), DEFAULT_LOG_SOURCE);
        assert_eq!(settings.log_endpoint_url(), DEFAULT_LOG_ENDPOINT_URL);
        assert_eq!(settings.transport_key(), DEFAULT_TRANSPORT_KEY);
        assert!(!settings.should_send_to_transport());
        assert_eq!(settings.network_requests_sampling_rate(), 1.0);
        assert_eq!(settings.traces_sampling_rate(), 1.0);
        assert_eq!(
            settings.config_ttl_hours(),
            DEFAULT_CONFIG_TIME_TO_LIVE_HOURS
        );
    }

    #[test]
    #[serial_test::serial]
    fn test_builder_overrides() {
        let saved_level = crate::log::max_level();

        let mut builder = PerfSettings::builder();
        builder
            .set_project_id("test-project".to_string())
            .set_api_key("test-key".to_string())
            .set_app_id("1:111:web:abc".to_string())
            .set_app_version("2.3.4".to_string())
            .set_config_ttl_hours(1)
            .set_log_level(crate::log::LevelFilter::Debug);
        let settings = builder.build();

        assert_eq!(settings.project_id(), "test-project");
        assert_eq!(settings.api_key(), "test-key");
        assert_eq!(settings.app_id(), "1:111:web:abc");
        assert_eq!(settings.app_version(), "2.3.4");
        assert_eq!(settings.config_ttl_hours(), 1);
        assert_eq!(settings.log_level(), crate::log::LevelFilter::Debug);
        assert_eq!(settings.sdk_version(), env!("CARGO_PKG_VERSION"));

        crate::log::set_max_level(saved_level);
    }

    #[test]
    #[serial_test::serial]
    fn test_build_applies_log_level() {
        let saved_level = crate::log::max_level();

        let mut builder = PerfSettings::builder();
        builder.set_log_level(crate::log::LevelFilter::Debug);
        builder.build();
        assert_eq!(crate::log::max_level(), crate::log::LevelFilter::Debug);

        crate::log::set_max_level(saved_level);
    }
}
