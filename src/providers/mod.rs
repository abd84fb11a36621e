/*!
 * Subtitle provider interface.
 *
 * Every provider plugged into the aggregation layer exposes the same lifecycle
 * (initialize, work, terminate) and the same listing, download and matching
 * operations. This crate ships one implementation:
 * - NapiProjekt: hash based lookups against napiprojekt.pl
 */

use async_trait::async_trait;
use std::collections::HashSet;
use std::fmt::Debug;

use crate::errors::ProviderError;
use crate::subtitle::MatchKind;
use crate::video::Video;

/// Common trait for all subtitle providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be driven interchangeably by the aggregation layer.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The subtitle record type produced by this provider
    type Subtitle: Send + Sync;

    /// Provider name
    fn name(&self) -> &'static str;

    /// ISO 639-1 codes of the languages this provider serves
    fn languages(&self) -> &[String];

    /// Hash scheme the provider needs on a video, if any
    fn required_hash(&self) -> Option<&'static str>;

    /// Whether the provider can search for `video` at all
    fn check(&self, video: &Video) -> bool {
        match self.required_hash() {
            Some(scheme) => video.hashes.contains_key(scheme),
            None => true,
        }
    }

    /// Acquire the resources (HTTP session) needed for searching
    async fn initialize(&self) -> Result<(), ProviderError>;

    /// Release the resources acquired by `initialize`
    async fn terminate(&self) -> Result<(), ProviderError>;

    /// List the subtitles available for `video` in the given languages
    ///
    /// # Arguments
    /// * `video` - The video to search for
    /// * `languages` - ISO language codes, results follow this order
    ///
    /// # Returns
    /// * `Result<Vec<Self::Subtitle>, ProviderError>` - Found subtitles or an error
    async fn list_subtitles(&self, video: &Video, languages: &[String]) -> Result<Vec<Self::Subtitle>, ProviderError>;

    /// Fill in the content of a listed subtitle
    async fn download_subtitle(&self, subtitle: &mut Self::Subtitle) -> Result<(), ProviderError>;

    /// Relevance signals of `subtitle` for `video`
    fn get_matches(&self, subtitle: &Self::Subtitle, video: &Video) -> HashSet<MatchKind>;
}

pub mod napiprojekt;

pub use napiprojekt::NapiProjektProvider;
