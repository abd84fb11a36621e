use anyhow::{Context, Result, anyhow};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::conversion::{FfmpegConverter, Transcoder};
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::providers::{NapiProjektProvider, Provider};
use crate::subtitle::NapiProjektSubtitle;
use crate::video::{NAPIPROJEKT_HASH, Video};

// @module: Application controller for subtitle downloads

/// Extension of the files written for downloaded subtitles
const SUBTITLE_EXTENSION: &str = "srt";

/// Outcome of a controller run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Videos looked at
    pub videos: usize,
    /// Subtitle files written
    pub written: Vec<PathBuf>,
    /// Videos skipped because every requested subtitle already existed
    pub skipped: usize,
    /// Videos that failed
    pub failed: usize,
}

/// Main application controller for subtitle downloads
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Lookup provider
    provider: NapiProjektProvider,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let converter = FfmpegConverter::new(&config.converter.ffmpeg_path, config.converter.timeout());
        let provider = NapiProjektProvider::new(&config.provider, Transcoder::new(Arc::new(converter)));

        Ok(Self::with_provider(config, provider))
    }

    /// Create a controller around an already configured provider
    pub fn with_provider(config: Config, provider: NapiProjektProvider) -> Self {
        Self { config, provider }
    }

    /// The provider used for lookups
    pub fn provider(&self) -> &NapiProjektProvider {
        &self.provider
    }

    /// Normalize requested languages, falling back to the configured ones.
    ///
    /// Duplicates are dropped and the first-seen order is kept. Languages the
    /// service is not known to serve are still requested, with a warning.
    pub fn resolve_languages(&self, requested: &[String]) -> Result<Vec<String>> {
        let source: &[String] = if requested.is_empty() { &self.config.languages } else { requested };

        let mut languages: Vec<String> = Vec::new();
        for code in source {
            let code = language_utils::normalize_to_part1(code)?;
            if languages.contains(&code) {
                continue;
            }

            let served = self
                .provider
                .languages()
                .iter()
                .any(|served| language_utils::language_codes_match(served, &code));
            if !served {
                warn!("Language {} is not known to be served by {}", code, self.provider.name());
            }

            languages.push(code);
        }

        if languages.is_empty() {
            return Err(anyhow!("No languages requested"));
        }

        Ok(languages)
    }

    /// Download subtitles for a video file or every video under a directory.
    ///
    /// The provider session is opened before the first lookup and closed
    /// afterwards, also when processing fails.
    pub async fn run(
        &self,
        input_path: &Path,
        output_dir: Option<&Path>,
        languages: &[String],
        force_overwrite: bool,
    ) -> Result<RunSummary> {
        let languages = self.resolve_languages(languages)?;

        self.provider.initialize().await?;
        let result = self.process_input(input_path, output_dir, &languages, force_overwrite).await;
        if let Err(e) = self.provider.terminate().await {
            warn!("Failed to terminate provider session: {}", e);
        }

        result
    }

    /// Download subtitles for a known content hash, without a video file.
    ///
    /// Files are named after the hash. Existing ones are kept unless
    /// `force_overwrite` is set.
    pub async fn run_hash(
        &self,
        hash: &str,
        output_dir: &Path,
        languages: &[String],
        force_overwrite: bool,
    ) -> Result<RunSummary> {
        let languages = self.resolve_languages(languages)?;
        let naming_path = Path::new(hash);

        let pending = Self::pending_languages(naming_path, output_dir, &languages, force_overwrite);
        if pending.is_empty() {
            warn!("Skipping {}, subtitles already exist (use -f to force overwrite)", hash);
            return Ok(RunSummary {
                videos: 1,
                skipped: 1,
                ..Default::default()
            });
        }

        let video = Video::new(hash).with_hash(NAPIPROJEKT_HASH, hash);

        self.provider.initialize().await?;
        let result = self.download_for_video(&video, naming_path, output_dir, &pending).await;
        if let Err(e) = self.provider.terminate().await {
            warn!("Failed to terminate provider session: {}", e);
        }

        let written = result?;
        Ok(RunSummary {
            videos: 1,
            written,
            ..Default::default()
        })
    }

    /// Languages whose output file is missing, or all of them when forced
    fn pending_languages(
        naming_path: &Path,
        output_dir: &Path,
        languages: &[String],
        force_overwrite: bool,
    ) -> Vec<String> {
        languages
            .iter()
            .filter(|language| {
                let output_path =
                    FileManager::generate_output_path(naming_path, output_dir, language, SUBTITLE_EXTENSION);
                force_overwrite || !output_path.exists()
            })
            .cloned()
            .collect()
    }

    async fn process_input(
        &self,
        input_path: &Path,
        output_dir: Option<&Path>,
        languages: &[String],
        force_overwrite: bool,
    ) -> Result<RunSummary> {
        if FileManager::dir_exists(input_path) {
            return self.process_folder(input_path, output_dir, languages, force_overwrite).await;
        }

        if !FileManager::file_exists(input_path) {
            return Err(anyhow!("Input path does not exist: {:?}", input_path));
        }

        let written = self.process_video(input_path, output_dir, languages, force_overwrite).await?;
        Ok(RunSummary {
            videos: 1,
            skipped: usize::from(written.is_none()),
            written: written.unwrap_or_default(),
            failed: 0,
        })
    }

    async fn process_folder(
        &self,
        input_dir: &Path,
        output_dir: Option<&Path>,
        languages: &[String],
        force_overwrite: bool,
    ) -> Result<RunSummary> {
        let videos = FileManager::find_video_files(input_dir)?;
        info!("Found {} video files in {:?}", videos.len(), input_dir);

        let mut summary = RunSummary::default();
        for video_path in videos {
            summary.videos += 1;
            match self.process_video(&video_path, output_dir, languages, force_overwrite).await {
                Ok(Some(written)) => summary.written.extend(written),
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    error!("Failed to process {:?}: {:#}", video_path, e);
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }

    /// Fetch the missing subtitles of one video file.
    ///
    /// Returns `None` when every requested subtitle already exists and
    /// `force_overwrite` is off.
    pub async fn process_video(
        &self,
        video_path: &Path,
        output_dir: Option<&Path>,
        languages: &[String],
        force_overwrite: bool,
    ) -> Result<Option<Vec<PathBuf>>> {
        let output_dir = output_dir
            .map(Path::to_path_buf)
            .or_else(|| video_path.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));

        let pending = Self::pending_languages(video_path, &output_dir, languages, force_overwrite);

        if pending.is_empty() {
            warn!("Skipping {:?}, subtitles already exist (use -f to force overwrite)", video_path);
            return Ok(None);
        }

        let path = video_path.to_path_buf();
        let video = tokio::task::spawn_blocking(move || Video::from_path(path))
            .await
            .context("Hashing task failed")??;

        self.download_for_video(&video, video_path, &output_dir, &pending)
            .await
            .map(Some)
    }

    async fn download_for_video(
        &self,
        video: &Video,
        naming_path: &Path,
        output_dir: &Path,
        languages: &[String],
    ) -> Result<Vec<PathBuf>> {
        if !self.provider.check(video) {
            return Err(anyhow!("Video {} cannot be searched by {}", video.name, self.provider.name()));
        }

        let mut subtitles = self.provider.list_subtitles(video, languages).await?;
        if subtitles.is_empty() {
            info!("No subtitles found for {}", video.name);
        }

        let mut written = Vec::with_capacity(subtitles.len());
        for subtitle in subtitles.iter_mut() {
            self.provider.download_subtitle(subtitle).await?;
            written.push(self.write_subtitle(subtitle, naming_path, output_dir)?);
        }

        Ok(written)
    }

    fn write_subtitle(&self, subtitle: &NapiProjektSubtitle, naming_path: &Path, output_dir: &Path) -> Result<PathBuf> {
        let content = subtitle
            .content()
            .ok_or_else(|| anyhow!("Subtitle {} has no content", subtitle))?;

        let output_path =
            FileManager::generate_output_path(naming_path, output_dir, subtitle.language(), SUBTITLE_EXTENSION);
        FileManager::write_bytes(&output_path, content)?;
        info!("Saved {} subtitle to {:?}", subtitle.language(), output_path);

        Ok(output_path)
    }
}
