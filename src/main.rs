// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{error, warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use chunkscribe::app_config::{self, Config, TranscriptionProvider};
use chunkscribe::app_controller::Controller;
use chunkscribe::media_tools::is_remote_locator;

/// CLI Wrapper for TranscriptionProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliProvider {
    Groq,
    OpenAI,
    Custom,
}

impl From<CliProvider> for TranscriptionProvider {
    fn from(cli_provider: CliProvider) -> Self {
        match cli_provider {
            CliProvider::Groq => TranscriptionProvider::Groq,
            CliProvider::OpenAI => TranscriptionProvider::OpenAI,
            CliProvider::Custom => TranscriptionProvider::Custom,
        }
    }
}

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

/// Options shared by every command that reads the config
#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// Force overwrite of existing output files
    #[arg(short, long, global = true)]
    force_overwrite: bool,

    /// Minimum characters per subtitle block when lengthening
    #[arg(long, global = true)]
    min_chars: Option<usize>,

    /// Keep the short entries as transcribed
    #[arg(long, global = true)]
    no_lengthen: bool,
}

#[derive(Args, Debug, Clone)]
struct TranscribeArgs {
    /// Local audio/video file or http(s) URL
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output subtitle file (defaults to <input stem>.srt)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Transcription provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliProvider>,

    /// Model name to use for transcription
    #[arg(short, long)]
    model: Option<String>,

    /// Spoken language code (e.g., 'ja', 'en') or 'auto'
    #[arg(short, long)]
    language: Option<String>,

    /// API key for the transcription service
    #[arg(long, env = "CHUNKSCRIBE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Number of segments transcribed at once
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    /// Keep audio chunks, segment subtitles and downloaded audio
    #[arg(long)]
    keep_intermediates: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Transcribe audio into one subtitle file (default command)
    #[command(alias = "transcribe")]
    Run(TranscribeArgs),

    /// Combine per-segment subtitle files into one track
    Combine {
        /// Segment subtitle files, in any order
        #[arg(value_name = "SRT_FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output subtitle file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Merge short entries of an existing subtitle file
    Lengthen {
        /// Subtitle file to lengthen
        #[arg(value_name = "SRT_FILE")]
        input: PathBuf,

        /// Output subtitle file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Generate shell completions for chunkscribe
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// chunkscribe - long-form audio to subtitles
///
/// Splits long recordings into chunks, transcribes each chunk with a
/// Whisper-compatible service and stitches the results into one subtitle file.
#[derive(Parser, Debug)]
#[command(name = "chunkscribe")]
#[command(version)]
#[command(about = "Transcribe long audio into a single, continuous subtitle file")]
#[command(long_about = "chunkscribe cuts audio into fixed-length chunks, transcribes them and rebuilds one timeline.

EXAMPLES:
    chunkscribe talk.mp3                                  # Transcribe using default config
    chunkscribe -f talk.mp3 -o talk.srt                   # Force overwrite existing output
    chunkscribe -p openai -l en talk.mp3                  # Use OpenAI with English audio
    chunkscribe https://www.youtube.com/watch?v=ID -o v.srt  # Download and transcribe
    chunkscribe combine talk_segment_*.srt -o talk.srt    # Rebuild from segment subtitles
    chunkscribe lengthen raw.srt -o readable.srt          # Merge short entries only
    chunkscribe completions bash > chunkscribe.bash       # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED PROVIDERS:
    groq   - Groq hosted Whisper (GROQ_API_KEY, default model whisper-large-v3)
    openai - OpenAI Whisper API (OPENAI_API_KEY, default model whisper-1)
    custom - Any OpenAI-compatible endpoint (default http://localhost:8000/v1)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    common: CommonArgs,

    /// Local audio/video file or http(s) URL
    #[arg(value_name = "INPUT")]
    input: Option<String>,

    /// Output subtitle file (defaults to <input stem>.srt)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Transcription provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliProvider>,

    /// Model name to use for transcription
    #[arg(short, long)]
    model: Option<String>,

    /// Spoken language code (e.g., 'ja', 'en') or 'auto'
    #[arg(short, long)]
    language: Option<String>,

    /// API key for the transcription service
    #[arg(long, env = "CHUNKSCRIBE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Number of segments transcribed at once
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    /// Keep audio chunks, segment subtitles and downloaded audio
    #[arg(long)]
    keep_intermediates: bool,
}

// @struct: Custom logger implementation
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and tag for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
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
            let (colour, tag) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "{}{} {} {}\x1B[0m",
                colour, now, tag, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = CustomLogger::init(LevelFilter::Info) {
        eprintln!("Failed to initialise logging: {}", e);
    }

    if let Err(e) = dispatch(CommandLineOptions::parse()).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn dispatch(cli: CommandLineOptions) -> Result<()> {
    let common = cli.common.clone();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "chunkscribe", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Run(args)) => run_transcribe(args, common).await,
        Some(Commands::Combine { inputs, output }) => {
            let controller = Controller::with_config(load_config(&common, None)?)?;
            let summary = controller.combine_files(&inputs, &output, common.force_overwrite)?;
            info!(
                "Combined {}/{} file(s) into {} entries: {:?}",
                summary.segments_transcribed, summary.segments_total, summary.entries_written, summary.output_path
            );
            Ok(())
        }
        Some(Commands::Lengthen { input, output }) => {
            let controller = Controller::with_config(load_config(&common, None)?)?;
            controller.lengthen_file(&input, &output, common.force_overwrite)?;
            Ok(())
        }
        None => {
            // Default behavior - top-level args
            let input = cli.input.ok_or_else(|| {
                anyhow!("INPUT is required when no subcommand is specified")
            })?;

            let args = TranscribeArgs {
                input,
                output: cli.output,
                provider: cli.provider,
                model: cli.model,
                language: cli.language,
                api_key: cli.api_key,
                concurrency: cli.concurrency,
                keep_intermediates: cli.keep_intermediates,
            };
            run_transcribe(args, common).await
        }
    }
}

async fn run_transcribe(args: TranscribeArgs, common: CommonArgs) -> Result<()> {
    let config = load_config(&common, Some(&args))?;
    config.validate().context("Configuration validation failed")?;

    let output = args.output.clone().unwrap_or_else(|| default_output_path(&args.input));
    let controller = Controller::with_config(config)?;
    let summary = controller.run(&args.input, output, common.force_overwrite).await?;

    if summary.segments_transcribed < summary.segments_total {
        warn!(
            "{} of {} segment(s) could not be transcribed and are missing from the output",
            summary.segments_total - summary.segments_transcribed,
            summary.segments_total
        );
    }
    info!("Success: {:?}", summary.output_path);
    Ok(())
}

/// Load (or create) the config file and apply command-line overrides
fn load_config(common: &CommonArgs, args: Option<&TranscribeArgs>) -> Result<Config> {
    // Apply the command-line log level before anything gets logged
    if let Some(level) = &common.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config_path = Path::new(&common.config_path);
    if !config_path.exists() {
        warn!("Config file not found at '{}', creating default config.", common.config_path);
    }
    let mut config = Config::load_or_create(config_path)?;

    if let Some(level) = &common.log_level {
        config.log_level = level.clone().into();
    } else {
        log::set_max_level(config.log_level.to_level_filter());
    }

    if let Some(min_chars) = common.min_chars {
        config.subtitles.min_chars = min_chars;
    }
    if common.no_lengthen {
        config.subtitles.lengthen = false;
    }

    if let Some(args) = args {
        if let Some(provider) = &args.provider {
            config.transcription.provider = provider.clone().into();
        }
        if let Some(model) = &args.model {
            config.transcription.model = model.clone();
        }
        if let Some(language) = &args.language {
            config.language = language.clone();
        }
        if let Some(api_key) = &args.api_key {
            config.transcription.api_key = api_key.clone();
        }
        if let Some(concurrency) = args.concurrency {
            config.transcription.concurrent_requests = concurrency;
        }
        if args.keep_intermediates {
            config.cleanup.delete_segments = false;
            config.cleanup.delete_segment_srts = false;
            config.cleanup.delete_downloaded_audio = false;
        }
    }

    Ok(config)
}

/// `<stem>.srt` next to a local input, `transcript.srt` in the working directory for URLs
fn default_output_path(input: &str) -> PathBuf {
    if is_remote_locator(input) {
        return PathBuf::from("transcript.srt");
    }
    Path::new(input).with_extension("srt")
}
