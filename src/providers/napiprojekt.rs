use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use log::{debug, error, info, trace, warn};
use parking_lot::RwLock;
use reqwest::Client;
use std::collections::HashSet;
use std::time::Duration;

use super::Provider;
use crate::app_config::{FailurePolicy, ProviderSettings};
use crate::conversion::Transcoder;
use crate::errors::ProviderError;
use crate::language_utils;
use crate::subhash::derive_subhash;
use crate::subtitle::{MatchKind, NapiProjektSubtitle, PROVIDER_NAME};
use crate::video::{NAPIPROJEKT_HASH, Video};

/// Body prefix the service answers with when it has no subtitle
pub const NOT_FOUND_SENTINEL: &[u8; 4] = b"NPc0";

/// Client identifier the service expects
const CLIENT_ID: &str = "dreambox";

/// Operating system tag sent with every lookup
const CLIENT_OS: &str = "Linux";

/// Default log target for provider messages
pub const DEFAULT_LOG_TARGET: &str = "napiprojekt";

/// Whether a response body is the service's "nothing found" answer
pub fn is_not_found(body: &[u8]) -> bool {
    body.starts_with(NOT_FOUND_SENTINEL)
}

/// NapiProjekt client for hash based subtitle lookups
#[derive(Debug)]
pub struct NapiProjektProvider {
    /// Lookup endpoint URL
    endpoint: String,
    /// User-Agent of the session
    user_agent: String,
    /// Per-request timeout
    timeout: Duration,
    /// Maximum lookups in flight during a batch
    concurrent_requests: usize,
    /// Batch behaviour when one language fails
    failure_policy: FailurePolicy,
    /// Languages the service serves
    languages: Vec<String>,
    /// Payload to SRT conversion
    transcoder: Transcoder,
    /// Target of every log record this instance emits
    log_target: String,
    /// HTTP session, present between initialize and terminate
    session: RwLock<Option<Client>>,
}

impl NapiProjektProvider {
    /// Create a provider from settings; call `initialize` before searching
    pub fn new(settings: &ProviderSettings, transcoder: Transcoder) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            user_agent: settings.user_agent.clone(),
            timeout: settings.timeout(),
            concurrent_requests: settings.concurrent_requests.max(1),
            failure_policy: settings.failure_policy,
            languages: settings.languages.clone(),
            transcoder,
            log_target: DEFAULT_LOG_TARGET.to_string(),
            session: RwLock::new(None),
        }
    }

    /// Use a different lookup endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set how many lookups may run at once in a batch
    pub fn with_concurrent_requests(mut self, concurrent_requests: usize) -> Self {
        self.concurrent_requests = concurrent_requests.max(1);
        self
    }

    /// Set what a batch does when one language fails
    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    /// Route this instance's log records to `target`
    pub fn with_log_target(mut self, target: impl Into<String>) -> Self {
        self.log_target = target.into();
        self
    }

    /// Lookup endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Batch behaviour when one language fails
    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Log target used by this instance
    pub fn log_target(&self) -> &str {
        &self.log_target
    }

    /// Whether a session is currently open
    pub fn is_initialized(&self) -> bool {
        self.session.read().is_some()
    }

    fn session(&self) -> Result<Client, ProviderError> {
        self.session.read().clone().ok_or(ProviderError::NotInitialized)
    }

    /// Query parameters of a lookup for `language` and `hash`
    pub fn build_query_params(language: &str, hash: &str) -> Result<Vec<(&'static str, String)>, ProviderError> {
        let language_code = language_utils::to_provider_code(language)
            .map_err(|_| ProviderError::UnsupportedLanguage(language.to_string()))?;
        let subhash = derive_subhash(hash)?;

        Ok(vec![
            ("v", CLIENT_ID.to_string()),
            ("kolejka", "false".to_string()),
            ("nick", String::new()),
            ("pass", String::new()),
            ("napios", CLIENT_OS.to_string()),
            ("l", language_code),
            ("f", hash.to_string()),
            ("t", subhash),
        ])
    }

    /// Look up the subtitle for one language and content hash.
    ///
    /// Returns `Ok(None)` when the service answers with the not-found sentinel.
    /// Any other body is taken as the subtitle payload and converted before the
    /// record is returned.
    pub async fn query(&self, language: &str, hash: &str) -> Result<Option<NapiProjektSubtitle>, ProviderError> {
        let params = Self::build_query_params(language, hash)?;
        let language = language_utils::normalize_to_part1(language)
            .map_err(|_| ProviderError::UnsupportedLanguage(language.to_string()))?;
        let client = self.session()?;

        info!(target: self.log_target.as_str(), "Searching subtitle {:?}", params);
        let response = client.get(self.endpoint.as_str()).query(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!(target: self.log_target.as_str(), "NapiProjekt API error ({}): {}", status, error_text);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let body = response.bytes().await?;
        if is_not_found(&body) {
            debug!(target: self.log_target.as_str(), "No subtitles found for {} [{}]", hash, language);
            return Ok(None);
        }

        let subtitle = NapiProjektSubtitle::from_payload(language, hash.to_string(), body, &self.transcoder).await?;
        debug!(target: self.log_target.as_str(), "Found subtitle {}", subtitle);

        Ok(Some(subtitle))
    }
}

#[async_trait]
impl Provider for NapiProjektProvider {
    type Subtitle = NapiProjektSubtitle;

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn languages(&self) -> &[String] {
        &self.languages
    }

    fn required_hash(&self) -> Option<&'static str> {
        Some(NAPIPROJEKT_HASH)
    }

    async fn initialize(&self) -> Result<(), ProviderError> {
        let mut session = self.session.write();
        if session.is_some() {
            debug!(target: self.log_target.as_str(), "Session already initialized");
            return Ok(());
        }

        let client = Client::builder()
            .user_agent(self.user_agent.as_str())
            .timeout(self.timeout)
            .build()
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to create HTTP client: {}", e)))?;

        *session = Some(client);
        debug!(target: self.log_target.as_str(), "Session initialized for {}", self.endpoint);
        Ok(())
    }

    async fn terminate(&self) -> Result<(), ProviderError> {
        self.session
            .write()
            .take()
            .map(|_| debug!(target: self.log_target.as_str(), "Session terminated"))
            .ok_or(ProviderError::NotInitialized)
    }

    async fn list_subtitles(&self, video: &Video, languages: &[String]) -> Result<Vec<NapiProjektSubtitle>, ProviderError> {
        let hash = video
            .napiprojekt_hash()
            .ok_or_else(|| ProviderError::MissingHash(video.name.clone()))?;

        // buffered() keeps results in input order whatever order they finish in
        let mut lookups = stream::iter(languages.iter().cloned())
            .map(|language| async move {
                let result = self.query(&language, hash).await;
                (language, result)
            })
            .buffered(self.concurrent_requests);

        let mut subtitles = Vec::new();
        while let Some((language, result)) = lookups.next().await {
            match result {
                Ok(Some(subtitle)) => subtitles.push(subtitle),
                Ok(None) => {}
                Err(e) => match self.failure_policy {
                    FailurePolicy::Abort => return Err(e),
                    FailurePolicy::Skip => {
                        warn!(target: self.log_target.as_str(), "Skipping language {} for {}: {}", language, video.name, e);
                    }
                },
            }
        }

        Ok(subtitles)
    }

    async fn download_subtitle(&self, subtitle: &mut NapiProjektSubtitle) -> Result<(), ProviderError> {
        // content is filled while listing, there is nothing left to fetch
        trace!(target: self.log_target.as_str(), "Nothing to download for {}", subtitle);
        Ok(())
    }

    fn get_matches(&self, subtitle: &NapiProjektSubtitle, video: &Video) -> HashSet<MatchKind> {
        subtitle.get_matches(video)
    }
}
