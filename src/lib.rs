/*!
 * # napiprojekt - NapiProjekt subtitle provider
 *
 * A Rust library for fetching Polish (and other) subtitles from napiprojekt.pl
 * by video content hash.
 *
 * ## Features
 *
 * - Compute the napiprojekt hash of a video file (MD5 of the first 10 MiB)
 * - Derive the subhash the lookup API requires
 * - Look subtitles up per language, concurrently, with order preserved
 * - Detect the payload character set and convert the legacy format to SRT
 * - Uniform provider interface for an aggregation layer
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `subhash`: subhash derivation from a content hash
 * - `video`: video description and content hashing
 * - `subtitle`: subtitle records and match signals
 * - `conversion`: payload decoding, SRT conversion and text normalization
 * - `providers`: provider trait and the NapiProjekt client:
 *   - `providers::napiprojekt`: lookup client
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod conversion;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod subhash;
pub mod subtitle;
pub mod video;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use conversion::{SubtitleConverter, Transcoder};
pub use errors::{AppError, ConversionError, HashError, ProviderError};
pub use language_utils::{get_language_name, language_codes_match, normalize_to_part1};
pub use providers::{NapiProjektProvider, Provider};
pub use subhash::derive_subhash;
pub use subtitle::{MatchKind, NapiProjektSubtitle};
pub use video::Video;
