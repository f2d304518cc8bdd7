// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::borrow::Cow;
use std::future::Future;
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::cache::ConfigCache;
use crate::constants::{
    FIS_AUTH_PREFIX, REMOTE_CONFIG_BASE_URL, SECONDARY_LOGGING_ENABLED,
    SECONDARY_SHOULD_SEND_TO_TRANSPORT, STATE_NO_TEMPLATE, STATE_UNSPECIFIED,
};
use crate::rollout::is_dest_transport;
use crate::sampling;
use crate::settings::PerfSettings;
use crate::storage::KeyValueStorage;
use crate::{fp_debug, fp_info};

const FETCH_TIMEOUT: Duration = Duration::from_secs(3);

/// Raw fields of the remote config template. All optional strings; the server
/// omits fields that have no value for this deployment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfigTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fpr_enabled: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fpr_log_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fpr_log_endpoint_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fpr_log_transport_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fpr_log_transport_web_percent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fpr_vc_network_request_sampling_rate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fpr_vc_trace_sampling_rate: Option<String>,
}

/// Wire-level payload of the config endpoint, also the cached-on-disk
/// representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfigResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<RemoteConfigTemplate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl RemoteConfigResponse {
    pub fn is_empty(&self) -> bool {
        self.entries.is_none() && self.state.is_none()
    }
}

/// Request body sent to the config endpoint
#[derive(Debug, Serialize)]
struct FetchRequest<'a> {
    app_instance_id: &'a str,
    app_instance_id_token: &'a str,
    app_id: &'a str,
    app_version: &'a str,
    sdk_version: &'a str,
}

/// Provider of per-installation auth tokens
///
/// The token authorizes the config fetch and doubles as the installation id
/// token in the request body. Retrieval is asynchronous and may fail; a
/// failure downgrades the resolution to defaults, it never surfaces.
pub trait InstallationTokenProvider: Send + Sync {
    fn installation_token(&self) -> impl Future<Output = Result<String>> + Send;
}

/// Token provider returning a fixed token, for tests and embedders that
/// manage installation auth themselves.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider(String);

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl InstallationTokenProvider for StaticTokenProvider {
    fn installation_token(&self) -> impl Future<Output = Result<String>> + Send {
        let token = self.0.clone();
        async move { Ok(token) }
    }
}

fn http_client() -> &'static reqwest::Client {
    static HTTP_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    HTTP_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .expect("failed to create HTTP client")
    })
}

/// Resolves the effective settings for an installation.
///
/// Control flow per resolution pass: valid cached config -> apply and return;
/// otherwise fetch -> apply whatever came back -> persist best-effort. The
/// whole pass is infallible from the caller's point of view: every failure
/// degrades to defaults so the host application is never blocked on config
/// availability.
pub struct ConfigResolver<S, T> {
    storage: S,
    tokens: T,
    endpoint_base: Cow<'static, str>,
    // serializes overlapping resolutions so only one of them fetches
    flight: tokio::sync::Mutex<()>,
}

impl<S: KeyValueStorage, T: InstallationTokenProvider> ConfigResolver<S, T> {
    pub fn new(storage: S, tokens: T) -> Self {
        Self {
            storage,
            tokens,
            endpoint_base: Cow::Borrowed(REMOTE_CONFIG_BASE_URL),
            flight: tokio::sync::Mutex::new(()),
        }
    }

    /// Overrides the config service host, mainly for tests
    pub fn with_endpoint_base(mut self, base: impl Into<Cow<'static, str>>) -> Self {
        self.endpoint_base = base.into();
        self
    }

    /// Consumes the resolver and hands back the underlying storage
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Resolves and applies the config for `installation_id`, mutating
    /// `settings` in place. Always completes successfully.
    pub async fn resolve(&self, installation_id: &str, settings: &mut PerfSettings) {
        let _flight = self.flight.lock().await;

        let cache = ConfigCache::new(&self.storage);
        if let Some(cached) = cache.load() {
            fp_debug!("ConfigResolver: applying cached config");
            apply_config(installation_id, Some(cached), settings);
            return;
        }

        let fetched = self.fetch_remote_config(installation_id, settings).await;
        if let Some(response) = apply_config(installation_id, fetched, settings) {
            if !response.is_empty() {
                cache.store(&response, settings.config_ttl_hours());
            }
        }
    }

    /// Fetches the config template, resolving to `None` on any failure. The
    /// error path never rejects: it is logged at info and swallowed.
    async fn fetch_remote_config(
        &self,
        installation_id: &str,
        settings: &PerfSettings,
    ) -> Option<RemoteConfigResponse> {
        match self.try_fetch(installation_id, settings).await {
            Ok(response) => {
                fp_debug!("ConfigResolver: fetched remote config template");
                Some(response)
            }
            Err(e) => {
                fp_info!("ConfigResolver: remote config fetch failed: {}", e);
                None
            }
        }
    }

    async fn try_fetch(
        &self,
        installation_id: &str,
        settings: &PerfSettings,
    ) -> Result<RemoteConfigResponse> {
        let token = self.tokens.installation_token().await?;

        let url = format!(
            "{}/v1/projects/{}/namespaces/fireperf:fetch?key={}",
            self.endpoint_base,
            settings.project_id(),
            settings.api_key(),
        );
        let body = FetchRequest {
            app_instance_id: installation_id,
            app_instance_id_token: &token,
            app_id: settings.app_id(),
            app_version: settings.app_version(),
            sdk_version: settings.sdk_version(),
        };

        let response = http_client()
            .post(&url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("{FIS_AUTH_PREFIX} {token}"),
            )
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!(
                "config endpoint returned status {}",
                response.status()
            );
        }

        Ok(response.json().await?)
    }
}

/// Applies a fetched or cached response to the settings.
///
/// An absent response leaves every field untouched. Otherwise each recognized
/// field resolves as: explicit template value, then hardcoded secondary
/// default, then the value the settings already hold. Returns the response so
/// the caller can persist it.
pub fn apply_config(
    installation_id: &str,
    response: Option<RemoteConfigResponse>,
    settings: &mut PerfSettings,
) -> Option<RemoteConfigResponse> {
    let response = response?;
    let no_entries = RemoteConfigTemplate::default();
    let entries = response.entries.as_ref().unwrap_or(&no_entries);

    settings.logging_enabled = match &entries.fpr_enabled {
        Some(raw) => raw == "true",
        None => SECONDARY_LOGGING_ENABLED,
    };
    if let Some(source) = parse_field::<u32>(&entries.fpr_log_source) {
        settings.log_source = source;
    }
    if let Some(url) = non_empty(&entries.fpr_log_endpoint_url) {
        settings.log_endpoint_url = url.to_string();
    }
    if let Some(key) = non_empty(&entries.fpr_log_transport_key) {
        settings.transport_key = key.to_string();
    }
    if let Some(rate) = parse_field::<f64>(&entries.fpr_vc_network_request_sampling_rate) {
        settings.network_requests_sampling_rate = rate;
    }
    if let Some(rate) = parse_field::<f64>(&entries.fpr_vc_trace_sampling_rate) {
        settings.traces_sampling_rate = rate;
    }

    settings.should_send_to_transport = match response.state.as_deref() {
        // no active template for this installation: legacy endpoint, whatever
        // the rollout field says
        None | Some(STATE_UNSPECIFIED) | Some(STATE_NO_TEMPLATE) => false,
        _ => match &entries.fpr_log_transport_web_percent {
            Some(raw) => {
                let percent = raw.parse::<f64>().unwrap_or(f64::NAN);
                is_dest_transport(installation_id, percent)
            }
            // no rollout field means the rollout is complete
            None => SECONDARY_SHOULD_SEND_TO_TRANSPORT,
        },
    };

    let (log_trace, log_network) = sampling::session_flags(
        settings.traces_sampling_rate,
        settings.network_requests_sampling_rate,
    );
    settings.log_trace_after_sampling = log_trace;
    settings.log_network_after_sampling = log_network;

    Some(response)
}

fn parse_field<T: std::str::FromStr>(raw: &Option<String>) -> Option<T> {
    raw.as_deref().and_then(|v| v.parse().ok())
}

fn non_empty(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().filter(|v| !v.is_empty())
}
