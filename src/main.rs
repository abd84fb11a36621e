// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::io::Write;
use std::path::PathBuf;

use napiprojekt::app_config::{self, Config, FailurePolicy};
use napiprojekt::video::Video;
use napiprojekt::{Controller, derive_subhash};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for FailurePolicy to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliFailurePolicy {
    Abort,
    Skip,
}

impl From<CliFailurePolicy> for FailurePolicy {
    fn from(cli_policy: CliFailurePolicy) -> Self {
        match cli_policy {
            CliFailurePolicy::Abort => FailurePolicy::Abort,
            CliFailurePolicy::Skip => FailurePolicy::Skip,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download subtitles for a video file, a directory or a known hash (default command)
    Fetch(FetchArgs),

    /// Print the napiprojekt hash and subhash of a video file
    Hash {
        /// Video file to hash
        #[arg(value_name = "VIDEO")]
        video: PathBuf,
    },

    /// Generate shell completions for napiprojekt
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct FetchArgs {
    /// Input video file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Fetch by a known napiprojekt hash instead of hashing a file
    #[arg(long, conflicts_with = "input_path")]
    hash: Option<String>,

    /// Subtitle language code, may be repeated (e.g. 'pl', 'en')
    #[arg(short, long = "language")]
    languages: Vec<String>,

    /// Directory to write subtitles to (defaults to the video's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing subtitle files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long)]
    config_path: Option<PathBuf>,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// What to do when one language fails
    #[arg(long, value_enum)]
    failure_policy: Option<CliFailurePolicy>,
}

/// napiprojekt - subtitles from napiprojekt.pl by video hash
#[derive(Parser, Debug)]
#[command(name = "napiprojekt")]
#[command(version)]
#[command(about = "Download subtitles from napiprojekt.pl by video hash")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "Hashes video files, looks their subtitles up on napiprojekt.pl and saves them as SRT.

EXAMPLES:
    napiprojekt movie.mkv                        # Polish subtitles next to the movie
    napiprojekt -l pl -l en movie.mkv            # Several languages
    napiprojekt -o subs/ /movies/                # Whole directory, output elsewhere
    napiprojekt fetch --hash <HASH> -o subs/     # Known hash, no video file needed
    napiprojekt hash movie.mkv                   # Print hash and subhash
    napiprojekt completions bash > napiprojekt.bash

CONFIGURATION:
    Configuration is read from conf.json in the working directory, or from
    the user config directory. If no config file exists, a default one is
    created automatically.

REQUIREMENTS:
    ffmpeg must be installed to convert subtitles to SRT.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    fetch: FetchArgs,
}

// @struct: Custom logger implementation, filtered by the global max level
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} [{}] {}\x1B[0m",
                color,
                now,
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "napiprojekt", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Hash { video }) => print_hash(video).await,
        Some(Commands::Fetch(args)) => run_fetch(args).await,
        None => run_fetch(cli.fetch).await,
    }
}

async fn print_hash(path: PathBuf) -> Result<()> {
    let video = tokio::task::spawn_blocking(move || Video::from_path(path))
        .await
        .context("Hashing task failed")??;

    let hash = video
        .napiprojekt_hash()
        .ok_or_else(|| anyhow!("No hash computed for {}", video.name))?;
    let subhash = derive_subhash(hash)?;

    println!("{}  {}  {}", hash, subhash, video.name);
    Ok(())
}

async fn run_fetch(options: FetchArgs) -> Result<()> {
    // Command line log level applies right away
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config_path = options.config_path.clone().unwrap_or_else(app_config::default_config_path);
    let mut config = Config::load_or_create(&config_path)?;

    // Override config with CLI options if provided
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Some(policy) = &options.failure_policy {
        config.provider.failure_policy = policy.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;

    let summary = if let Some(hash) = &options.hash {
        let output_dir = options.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        controller
            .run_hash(hash, &output_dir, &options.languages, options.force_overwrite)
            .await?
    } else {
        let input_path = options
            .input_path
            .clone()
            .ok_or_else(|| anyhow!("INPUT_PATH or --hash is required"))?;
        controller
            .run(&input_path, options.output_dir.as_deref(), &options.languages, options.force_overwrite)
            .await?
    };

    info!(
        "Done: {} video(s), {} subtitle(s) written, {} skipped, {} failed",
        summary.videos,
        summary.written.len(),
        summary.skipped,
        summary.failed
    );

    if summary.failed > 0 {
        return Err(anyhow!("{} video(s) failed", summary.failed));
    }

    Ok(())
}
