use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::conversion::Transcoder;
use crate::errors::ConversionError;
use crate::video::Video;

// @module: Subtitle records returned by the provider

/// Name under which this provider's records are reported
pub const PROVIDER_NAME: &str = "napiprojekt";

/// Reasons a subtitle is considered relevant to a video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// The subtitle was found by the video's own content hash
    Hash,
}

impl MatchKind {
    /// Tag used by the aggregation layer
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hash => "hash",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A subtitle found on napiprojekt for one content hash and language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NapiProjektSubtitle {
    language: String,
    hash: String,
    raw_payload: Option<Bytes>,
    content: Option<Vec<u8>>,
}

impl NapiProjektSubtitle {
    /// Create an empty record for `language` (ISO 639-1) and `hash`
    pub fn new(language: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            hash: hash.into(),
            raw_payload: None,
            content: None,
        }
    }

    /// Build a record and derive its content from `payload` in one go
    pub async fn from_payload(
        language: impl Into<String>,
        hash: impl Into<String>,
        payload: Bytes,
        transcoder: &Transcoder,
    ) -> Result<Self, ConversionError> {
        let mut subtitle = Self::new(language, hash);
        subtitle.assign_payload(Some(payload), transcoder).await?;
        Ok(subtitle)
    }

    /// Store a raw payload and derive the SRT content from it.
    ///
    /// `None` leaves the record untouched. The payload is only stored once
    /// conversion has succeeded, so a failed conversion never leaves a record
    /// holding a payload without content.
    pub async fn assign_payload(
        &mut self,
        payload: Option<Bytes>,
        transcoder: &Transcoder,
    ) -> Result<(), ConversionError> {
        let Some(payload) = payload else {
            return Ok(());
        };

        let content = transcoder.derive_content(&payload).await?;
        self.raw_payload = Some(payload);
        self.content = Some(content);
        Ok(())
    }

    /// ISO 639-1 code of the subtitle language
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Content hash the subtitle was fetched with
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Unique id within this provider; the content hash
    pub fn id(&self) -> &str {
        &self.hash
    }

    /// Short human readable description
    pub fn info(&self) -> &str {
        &self.hash
    }

    /// Name of the provider that produced this record
    pub fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    /// Payload exactly as served, if fetched
    pub fn raw_payload(&self) -> Option<&Bytes> {
        self.raw_payload.as_ref()
    }

    /// UTF-8 SRT content, if derived
    pub fn content(&self) -> Option<&[u8]> {
        self.content.as_deref()
    }

    /// Content as text, if derived
    pub fn text(&self) -> Option<&str> {
        self.content().and_then(|c| std::str::from_utf8(c).ok())
    }

    /// Relevance of this subtitle for `video`
    pub fn get_matches(&self, video: &Video) -> HashSet<MatchKind> {
        let mut matches = HashSet::new();

        if video.napiprojekt_hash() == Some(self.hash.as_str()) {
            matches.insert(MatchKind::Hash);
        }

        matches
    }
}

impl fmt::Display for NapiProjektSubtitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} [{}] {}>", PROVIDER_NAME, self.language, self.hash)
    }
}
