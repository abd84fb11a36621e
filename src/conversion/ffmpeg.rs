use async_trait::async_trait;
use log::{debug, error};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

use super::SubtitleConverter;
use crate::errors::ConversionError;

/// Converter backed by the ffmpeg command line tool
///
/// ffmpeg recognizes the MicroDVD and MPL2 layouts served by napiprojekt and
/// writes SubRip when the output format is forced to `srt`.
#[derive(Debug, Clone)]
pub struct FfmpegConverter {
    /// ffmpeg executable, resolved through PATH when not absolute
    binary: PathBuf,
    /// Upper bound for a single conversion
    timeout: Duration,
}

impl Default for FfmpegConverter {
    fn default() -> Self {
        Self::new("ffmpeg", Duration::from_secs(60))
    }
}

impl FfmpegConverter {
    /// Create a converter using `binary` with the given time limit
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    /// The ffmpeg executable this converter runs
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Keep only the stderr lines that say what went wrong, dropping the
    /// version banner, build configuration and stream listings.
    pub fn filter_stderr(stderr: &str) -> String {
        let noise_prefixes = [
            "ffmpeg version",
            "built with",
            "configuration:",
            "Input #",
            "Metadata:",
            "Duration:",
            "Stream #",
            "Output #",
            "Stream mapping:",
            "Press [q]",
        ];

        // library version lines are only noise in the indented banner
        let meaningful: Vec<&str> = stderr
            .lines()
            .filter(|line| !(line.starts_with(char::is_whitespace) && line.trim_start().starts_with("lib")))
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter(|line| !noise_prefixes.iter().any(|p| line.starts_with(p)))
            .collect();

        if meaningful.is_empty() {
            "unknown ffmpeg error (stderr was empty after filtering)".to_string()
        } else {
            meaningful.join("\n")
        }
    }
}

#[async_trait]
impl SubtitleConverter for FfmpegConverter {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn convert(&self, input: &Path, output: &Path) -> Result<(), ConversionError> {
        debug!("Converting {:?} to {:?} with {:?}", input, output, self.binary);

        let run = Command::new(&self.binary)
            .arg("-y")
            .arg("-loglevel")
            .arg("error")
            .arg("-i")
            .arg(input)
            .arg("-f")
            .arg("srt")
            .arg(output)
            .kill_on_drop(true)
            .output();

        let result = match tokio::time::timeout(self.timeout, run).await {
            Ok(result) => result.map_err(|e| {
                ConversionError::Launch(format!("{}: {}", self.binary.display(), e))
            })?,
            Err(_) => return Err(ConversionError::Timeout(self.timeout.as_secs())),
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let filtered = Self::filter_stderr(&stderr);
            error!("Subtitle conversion failed: {}", filtered);
            return Err(ConversionError::Failed(filtered));
        }

        Ok(())
    }
}
