// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{info, warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::sync::Arc;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};

use subcraft::app_config::{self, Config};
use subcraft::markup::{StyleSpec, VideoGeometry};
use subcraft::pipeline::{read_cues_file, write_cues_file, CaptionJob};
use subcraft::providers::{PassthroughTranslator, TranslationTable, Translator};
use subcraft::transcript::Transcript;
use subcraft::{language_utils, CaptionCue, MarkupDocument};

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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate and chunk a transcript into caption cues (JSON)
    Captions(CaptionsArgs),

    /// Compile caption cues into an ASS subtitle script
    Render(RenderArgs),

    /// Transcript to ASS script in one go
    Run(RunArgs),

    /// Generate shell completions for subcraft
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct TranslationArgs {
    /// JSON translations: an array (one entry per segment) or an object (source text -> translation)
    #[arg(long, value_name = "FILE")]
    translations: Option<PathBuf>,

    /// Source language code or name (e.g., 'en', 'English')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code or name (e.g., 'hi', 'Hindi')
    #[arg(short, long)]
    target_language: Option<String>,
}

#[derive(Args, Debug)]
struct RenderOptions {
    /// Style JSON file (font_family, font_size, text_color, has_background, ...)
    #[arg(long, value_name = "FILE")]
    style: Option<PathBuf>,

    /// Video to read the target geometry from (requires ffprobe)
    #[arg(long, value_name = "FILE", conflicts_with_all = ["width", "height"])]
    video: Option<PathBuf>,

    /// Target video width in pixels
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Target video height in pixels
    #[arg(long, requires = "width")]
    height: Option<u32>,
}

#[derive(Parser, Debug)]
struct CaptionsArgs {
    /// Whisper-style transcript JSON
    #[arg(value_name = "TRANSCRIPT")]
    transcript: PathBuf,

    #[command(flatten)]
    translation: TranslationArgs,

    /// Output file for the cues (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Caption cues JSON
    #[arg(value_name = "CUES")]
    cues: PathBuf,

    #[command(flatten)]
    render: RenderOptions,

    /// Output script (defaults to <job id>.ass in the current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Whisper-style transcript JSON
    #[arg(value_name = "TRANSCRIPT")]
    transcript: PathBuf,

    #[command(flatten)]
    translation: TranslationArgs,

    #[command(flatten)]
    render: RenderOptions,

    /// Output script (defaults to <job id>.ass in the current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// subcraft - caption segmentation and subtitle rendering
///
/// Chunks time-stamped transcripts into short captions and compiles them,
/// together with a caption style, into ASS scripts ready to be burned into video.
#[derive(Parser, Debug)]
#[command(name = "subcraft")]
#[command(version)]
#[command(about = "Caption segmentation and styled subtitle rendering")]
#[command(long_about = "subcraft turns time-stamped transcripts into styled ASS subtitle scripts.

EXAMPLES:
    subcraft captions talk.json -o cues.json                  # Chunk a transcript into cues
    subcraft captions talk.json --translations hi.json -t hi  # Use supplied Hindi translations
    subcraft render cues.json --style style.json --video talk.mp4 -o talk.ass
    subcraft run talk.json --width 1920 --height 1080 -o talk.ass
    subcraft completions bash > subcraft.bash                 # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and marker for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "✖"),
            Level::Warn => ("\x1B[1;33m", "!"),
            Level::Info => ("\x1B[1;32m", " "),
            Level::Debug => ("\x1B[1;36m", "·"),
            Level::Trace => ("\x1B[1;35m", "…"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, marker) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "{}{} {} {}\x1B[0m",
                colour, now, marker, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Accept everything here; the effective level is set once options are known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "subcraft", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli.config_path, cli.log_level.clone())?;

    match cli.command {
        Commands::Captions(args) => run_captions(config, args).await,
        Commands::Render(args) => run_render(config, args).await,
        Commands::Run(args) => run_all(config, args).await,
        Commands::Completions { .. } => Ok(()),
    }
}

fn load_config(config_path: &str, cli_log_level: Option<CliLogLevel>) -> Result<Config> {
    if let Some(level) = &cli_log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(config_path)?;

    match cli_log_level {
        Some(level) => config.log_level = level.into(),
        None => log::set_max_level(config.log_level.to_level_filter()),
    }

    Ok(config)
}

fn apply_translation_args(config: &mut Config, args: &TranslationArgs) -> Result<Arc<dyn Translator>> {
    if let Some(source_lang) = &args.source_language {
        config.source_language = source_lang.clone();
    }
    if let Some(target_lang) = &args.target_language {
        config.target_language = target_lang.clone();
    }

    config.validate().context("Configuration validation failed")?;

    match &args.translations {
        Some(path) => {
            let table = TranslationTable::from_file(path)?;
            info!("Loaded {} translations from {}", table.len(), path.display());
            Ok(Arc::new(table))
        }
        None => {
            if !language_utils::language_codes_match(&config.source_language, &config.target_language) {
                warn!(
                    "No translations supplied, captions keep their {} text",
                    config.source_language
                );
            }
            Ok(Arc::new(PassthroughTranslator))
        }
    }
}

fn translation_progress_bar(total: usize) -> ProgressBar {
    let progress_bar = ProgressBar::new(total as u64);
    let template_result = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} segments ({percent}%) {msg}")
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(template_result.progress_chars("█▓▒░"));
    progress_bar
}

async fn generate_cues(job: &CaptionJob, transcript_path: &Path, translator: Arc<dyn Translator>) -> Result<Vec<CaptionCue>> {
    let transcript = Transcript::from_file(transcript_path)?;
    if transcript.is_blank() {
        warn!("Transcript {} contains no speech", transcript_path.display());
    }

    let progress_bar = translation_progress_bar(transcript.segments.len());
    let pb = progress_bar.clone();
    let output = job
        .generate_captions(&transcript, translator, move |current, _total| pb.set_position(current as u64))
        .await;
    progress_bar.finish_and_clear();

    Ok(output.cues)
}

async fn resolve_style_and_geometry(job: &CaptionJob, options: &RenderOptions) -> Result<(StyleSpec, Option<VideoGeometry>)> {
    let style = match &options.style {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read style file: {}", path.display()))?;
            StyleSpec::from_json_str(&content)
        }
        None => job.config().render.style.clone(),
    };

    let geometry = match (&options.video, options.width, options.height) {
        (Some(video), _, _) => Some(job.video_geometry(video).await),
        (None, Some(width), Some(height)) => Some(VideoGeometry::new(width, height)),
        _ => None,
    };

    Ok((style, geometry))
}

fn write_document(job: &CaptionJob, document: &MarkupDocument, output: Option<&Path>) -> Result<()> {
    let path = match output {
        Some(path) => {
            document.write_to_file(path)?;
            path.to_path_buf()
        }
        None => job.export(document, Path::new("."))?,
    };
    info!("Success: {:?}", path);
    Ok(())
}

async fn run_captions(mut config: Config, args: CaptionsArgs) -> Result<()> {
    let translator = apply_translation_args(&mut config, &args.translation)?;
    let job = CaptionJob::new(config);

    let cues = generate_cues(&job, &args.transcript, translator).await?;

    match &args.output {
        Some(path) => {
            write_cues_file(path, &cues)?;
            info!("Success: {:?}", path);
        }
        None => {
            let json = serde_json::to_string_pretty(&cues).context("Failed to serialize captions")?;
            println!("{}", json);
        }
    }
    Ok(())
}

async fn run_render(config: Config, args: RenderArgs) -> Result<()> {
    config.validate().context("Configuration validation failed")?;
    let job = CaptionJob::new(config);

    if !args.cues.exists() {
        return Err(anyhow!("Captions file does not exist: {:?}", args.cues));
    }
    let cues = read_cues_file(&args.cues)?;
    let (style, geometry) = resolve_style_and_geometry(&job, &args.render).await?;

    let document = job.render(&style, geometry, &cues);
    write_document(&job, &document, args.output.as_deref())
}

async fn run_all(mut config: Config, args: RunArgs) -> Result<()> {
    let translator = apply_translation_args(&mut config, &args.translation)?;
    let job = CaptionJob::new(config);

    let cues = generate_cues(&job, &args.transcript, translator).await?;
    let (style, geometry) = resolve_style_and_geometry(&job, &args.render).await?;

    let document = job.render(&style, geometry, &cues);
    write_document(&job, &document, args.output.as_deref())
}
