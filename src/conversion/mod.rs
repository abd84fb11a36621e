/*!
 * Conversion of raw subtitle payloads into SRT text.
 *
 * The service returns subtitles in a legacy line-based format and in an
 * unknown character set. Turning that into UTF-8 SRT takes three steps:
 * - `encoding`: best-effort charset detection and decoding
 * - a `SubtitleConverter` (ffmpeg in production) that rewrites the text as SRT
 * - `normalize`: fix-ups applied to the converter output
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::errors::ConversionError;

pub mod encoding;
pub mod ffmpeg;
pub mod normalize;

pub use encoding::best_guess_text;
pub use ffmpeg::FfmpegConverter;
pub use normalize::normalize_converted_text;

/// File name of the converter output inside the scratch directory
const OUTPUT_FILE_NAME: &str = "tmp.srt";

/// External tool that rewrites a subtitle file as SRT
#[async_trait]
pub trait SubtitleConverter: Send + Sync + Debug {
    /// Short name used in log messages
    fn name(&self) -> &str;

    /// Convert the file at `input` and write SRT to `output`
    ///
    /// # Arguments
    /// * `input` - UTF-8 text file in the source subtitle format
    /// * `output` - Path the SRT result must be written to
    async fn convert(&self, input: &Path, output: &Path) -> Result<(), ConversionError>;
}

/// Derives subtitle content from raw payloads using a converter
#[derive(Debug, Clone)]
pub struct Transcoder {
    converter: Arc<dyn SubtitleConverter>,
}

impl Default for Transcoder {
    fn default() -> Self {
        Self::new(Arc::new(FfmpegConverter::default()))
    }
}

impl Transcoder {
    /// Create a transcoder around `converter`
    pub fn new(converter: Arc<dyn SubtitleConverter>) -> Self {
        Self { converter }
    }

    /// The converter doing the format conversion
    pub fn converter(&self) -> &Arc<dyn SubtitleConverter> {
        &self.converter
    }

    /// Turn a raw payload into normalized UTF-8 SRT bytes.
    ///
    /// The decoded text goes to a uniquely named temporary file and the
    /// converter writes into a fresh temporary directory. Both are removed when
    /// this function returns, whether or not the conversion succeeded.
    pub async fn derive_content(&self, raw_payload: &[u8]) -> Result<Vec<u8>, ConversionError> {
        let text = best_guess_text(raw_payload);

        let mut input = tempfile::Builder::new()
            .prefix("napiprojekt-")
            .suffix(".txt")
            .tempfile()
            .map_err(|e| ConversionError::TempFile(e.to_string()))?;
        input
            .write_all(text.as_bytes())
            .map_err(|e| ConversionError::TempFile(e.to_string()))?;
        input.flush().map_err(|e| ConversionError::TempFile(e.to_string()))?;

        let output_dir = tempfile::Builder::new()
            .prefix("napiprojekt-")
            .tempdir()
            .map_err(|e| ConversionError::TempFile(e.to_string()))?;
        let output_path = output_dir.path().join(OUTPUT_FILE_NAME);

        self.converter.convert(input.path(), &output_path).await?;

        let converted = tokio::fs::read(&output_path)
            .await
            .map_err(|e| ConversionError::UnreadableOutput(e.to_string()))?;
        let converted = String::from_utf8(converted)
            .map_err(|e| ConversionError::UnreadableOutput(e.to_string()))?;

        Ok(normalize_converted_text(&converted).into_bytes())
    }
}
