// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::io::Write;
use std::path::PathBuf;

use lrckit::app_config::{self, Config};
use lrckit::app_controller::{Controller, FileOutcome};

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
    /// Convert LRC to SRT (or SRT to LRC) for a file or a directory (default command)
    Convert(ConvertArgs),

    /// Convert an SRT file to LRC
    ToLrc {
        /// SRT file to convert
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Output LRC file (defaults to the input name with .lrc)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not write the [ar:]/[ti:]/... header
        #[arg(long)]
        no_metadata: bool,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// Merge two LRC files, pairing lines with close timestamps
    Merge {
        /// Primary LRC file; its timestamps win
        primary: PathBuf,

        /// Secondary LRC file (e.g. a translation)
        secondary: PathBuf,

        /// Output file (defaults to <primary>_merged.lrc)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pairing tolerance in milliseconds
        #[arg(long)]
        tolerance_ms: Option<u64>,
    },

    /// Split a lyric file into parts of N lines
    Split {
        input_path: PathBuf,

        /// Lines per part
        #[arg(short = 'n', long)]
        lines: Option<usize>,
    },

    /// Generate shell completions for lrckit
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug, Clone)]
struct ConvertArgs {
    /// Input LRC/SRT file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output base path (LRC input) or output file (SRT input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Keep same-timestamp lines in one file instead of splitting them
    #[arg(long)]
    no_split: bool,

    /// Duration of the last subtitle of each file, in milliseconds
    #[arg(long)]
    tail_ms: Option<u64>,
}

/// lrckit - LRC lyrics and SRT subtitles converter
#[derive(Parser, Debug)]
#[command(name = "lrckit")]
#[command(version)]
#[command(about = "LRC lyrics <-> SRT subtitles conversion toolkit")]
#[command(long_about = "lrckit converts timed LRC lyrics into SRT subtitles and back.

When several lyric lines share a timestamp (for example an original line
followed by its translation), each of them goes to its own output file:
song_1.srt, song_2.srt, ... Use --no-split to keep them together.

EXAMPLES:
    lrckit song.lrc                          # song.srt (or song_1.srt, song_2.srt, ...)
    lrckit -f song.lrc                       # Force overwrite existing files
    lrckit --no-split song.lrc               # Never split, join duplicate lines
    lrckit song.srt                          # song.lrc
    lrckit /music/lyrics/                    # Convert every .lrc in a directory
    lrckit merge jp.lrc cn.lrc -o both.lrc   # Build a bilingual LRC
    lrckit split long.lrc --lines 300        # long_part1.lrc, long_part2.lrc, ...
    lrckit completions bash > lrckit.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in lrckit.json by default. You can specify a
    different file with --config-path. If it doesn't exist, a default one
    is created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input LRC/SRT file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output base path (LRC input) or output file (SRT input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Keep same-timestamp lines in one file instead of splitting them
    #[arg(long)]
    no_split: bool,

    /// Duration of the last subtitle of each file, in milliseconds
    #[arg(long)]
    tail_ms: Option<u64>,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "lrckit.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
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

    // @returns: ANSI colour and prefix for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "❌ "),
            Level::Warn => ("\x1B[1;33m", "🚧 "),
            Level::Info => ("\x1B[1;32m", ""),
            Level::Debug => ("\x1B[1;36m", "🔍 "),
            Level::Trace => ("\x1B[1;35m", "📋 "),
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
            let (colour, prefix) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}{}\x1B[0m", colour, now, prefix, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set via set_max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "lrckit", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    } else {
        log::set_max_level(config.log_level.to_level_filter());
    }

    match cli.command {
        Some(Commands::Convert(args)) => run_convert(config, args),
        Some(Commands::ToLrc { input_path, output, no_metadata, force_overwrite }) => {
            if no_metadata {
                config.srt_to_lrc.add_metadata = false;
            }
            let controller = Controller::with_config(config)?;
            report_outcome(controller.srt_to_lrc(&input_path, output, force_overwrite)?);
            Ok(())
        }
        Some(Commands::Merge { primary, secondary, output, tolerance_ms }) => {
            if let Some(tolerance_ms) = tolerance_ms {
                config.merge.tolerance_ms = tolerance_ms;
            }
            let controller = Controller::with_config(config)?;
            controller.merge(&primary, &secondary, output)?;
            Ok(())
        }
        Some(Commands::Split { input_path, lines }) => {
            if let Some(lines) = lines {
                config.split.lines_per_file = lines;
            }
            let controller = Controller::with_config(config)?;
            let parts = controller.split(&input_path)?;
            info!("Split {} into {} parts", input_path.display(), parts.len());
            Ok(())
        }
        Some(Commands::Completions { .. }) => Ok(()),
        None => {
            // Default behavior - use top-level args
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            let args = ConvertArgs {
                input_path,
                output: cli.output,
                force_overwrite: cli.force_overwrite,
                no_split: cli.no_split,
                tail_ms: cli.tail_ms,
            };
            run_convert(config, args)
        }
    }
}

fn run_convert(mut config: Config, options: ConvertArgs) -> Result<()> {
    if options.no_split {
        config.converter.split_duplicates = false;
    }
    if let Some(tail_ms) = options.tail_ms {
        config.converter.tail_ms = tail_ms;
    }

    let controller = Controller::with_config(config)?;

    if options.input_path.is_file() {
        report_outcome(controller.run(&options.input_path, options.output, options.force_overwrite)?);
    } else if options.input_path.is_dir() {
        if options.output.is_some() {
            return Err(anyhow!("--output cannot be used with a directory input"));
        }
        let summary = controller.run_folder(&options.input_path, options.force_overwrite)?;
        if summary.errors > 0 {
            return Err(anyhow!("{} file(s) failed to convert", summary.errors));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    }

    Ok(())
}

fn report_outcome(outcome: FileOutcome) {
    if let FileOutcome::Converted(paths) = outcome {
        info!("Converted into {} file(s)", paths.len());
    }
}
