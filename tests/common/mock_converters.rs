/*!
 * Converter doubles standing in for ffmpeg
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

use napiprojekt::conversion::SubtitleConverter;
use napiprojekt::errors::ConversionError;

/// Input and output paths of one conversion
#[derive(Debug, Clone)]
pub struct ConversionCall {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Text of the input file at conversion time
    pub input_text: String,
}

/// What the mock does with a conversion request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConverterBehavior {
    /// Copy the input to the output unchanged
    Copy,
    /// Report a converter failure
    Fail,
    /// Succeed without writing any output
    NoOutput,
    /// Write bytes that are not UTF-8
    InvalidUtf8,
}

/// Converter double that records every call
#[derive(Debug)]
pub struct MockConverter {
    behavior: ConverterBehavior,
    calls: Mutex<Vec<ConversionCall>>,
}

impl MockConverter {
    pub fn new(behavior: ConverterBehavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Converter that copies input to output
    pub fn copying() -> Self {
        Self::new(ConverterBehavior::Copy)
    }

    /// Converter that always fails
    pub fn failing() -> Self {
        Self::new(ConverterBehavior::Fail)
    }

    /// Calls received so far
    pub fn calls(&self) -> Vec<ConversionCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl SubtitleConverter for MockConverter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn convert(&self, input: &Path, output: &Path) -> Result<(), ConversionError> {
        let input_text = tokio::fs::read_to_string(input)
            .await
            .map_err(|e| ConversionError::Launch(e.to_string()))?;

        self.calls.lock().push(ConversionCall {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            input_text: input_text.clone(),
        });

        match self.behavior {
            ConverterBehavior::Copy => tokio::fs::write(output, input_text)
                .await
                .map_err(|e| ConversionError::Failed(e.to_string())),
            ConverterBehavior::Fail => Err(ConversionError::Failed("mock failure".to_string())),
            ConverterBehavior::NoOutput => Ok(()),
            ConverterBehavior::InvalidUtf8 => tokio::fs::write(output, [0xFF, 0xFE, 0xFD])
                .await
                .map_err(|e| ConversionError::Failed(e.to_string())),
        }
    }
}
