//! tailorx CLI: garment measurements from recorded pose captures.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use tailorx::io::{AnalysisConfig, AnalysisReport, ServiceInfo};
use tailorx::measure::{
    ConfidenceMode, GarmentMeasurementEngine, MeasurementParams, RandomBodyTypeClassifier,
};
use tailorx::{AnalysisRequest, BodyAnalyzer, Gender, RecordedPoseDetector};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "tailorx")]
#[command(about = "Estimate shirt and pants measurements from front/side pose captures")]
#[command(version)]
struct Cli {
    /// Log verbosity on stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    /// Log through tracing-subscriber instead (needs the `tracing` feature).
    #[arg(long, global = true)]
    trace: bool,

    /// With --trace, emit JSON log lines.
    #[arg(long, global = true, requires = "trace")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse one subject and print the response JSON.
    Analyze(AnalyzeArgs),

    /// Analyse using a JSON config and write a report.
    Run {
        /// Path to the config JSON.
        #[arg(long)]
        config: PathBuf,
    },

    /// Write a config template with every option spelled out.
    InitConfig {
        /// Where to write the template.
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value = "front.json")]
        front: String,
        #[arg(long, default_value = "side.json")]
        side: String,
    },

    /// Print the service description.
    Info,
}

#[derive(Debug, Clone, Args)]
struct AnalyzeArgs {
    /// Front-view pose capture (JSON).
    #[arg(long)]
    front: Option<PathBuf>,

    /// Side-view pose capture (JSON).
    #[arg(long)]
    side: Option<PathBuf>,

    /// Subject height in centimetres.
    #[arg(long, default_value_t = tailorx::core::DEFAULT_HEIGHT_CM, allow_negative_numbers = true)]
    height: f32,

    /// `male` or `female`.
    #[arg(long, default_value = "male")]
    gender: Gender,

    /// Seed for the body-type classifier.
    #[arg(long)]
    seed: Option<u64>,

    /// Report landmark visibility instead of fixed per-formula confidence.
    #[arg(long, value_enum, default_value_t = ConfidenceArg::Fixed)]
    confidence: ConfidenceArg,

    /// Write the response here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ConfidenceArg {
    Fixed,
    Visibility,
}

impl From<ConfidenceArg> for ConfidenceMode {
    fn from(arg: ConfidenceArg) -> Self {
        match arg {
            ConfidenceArg::Fixed => ConfidenceMode::Fixed,
            ConfidenceArg::Visibility => ConfidenceMode::Visibility,
        }
    }
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    match cli.command {
        Commands::Analyze(args) => run_analyze(&args),
        Commands::Run { config } => run_config(&config),
        Commands::InitConfig { out, front, side } => run_init_config(&out, front, side),
        Commands::Info => run_info(),
    }
}

fn init_logging(cli: &Cli) -> CliResult<()> {
    if cli.trace {
        #[cfg(feature = "tracing")]
        {
            tailorx::init_tracing(cli.log_json);
            return Ok(());
        }
        #[cfg(not(feature = "tracing"))]
        eprintln!("tailorx: built without the `tracing` feature, ignoring --trace");
    }
    tailorx::core::init_with_level(cli.log_level.into())?;
    Ok(())
}

// ── analyze ────────────────────────────────────────────────────────────

fn run_analyze(args: &AnalyzeArgs) -> CliResult<()> {
    let params = MeasurementParams {
        confidence: args.confidence.into(),
        ..MeasurementParams::default()
    };

    let classifier = match args.seed {
        Some(seed) => RandomBodyTypeClassifier::with_seed(seed),
        None => RandomBodyTypeClassifier::from_entropy(),
    };
    let analyzer = BodyAnalyzer::new(
        RecordedPoseDetector::default(),
        GarmentMeasurementEngine::new(params)?,
        classifier,
    );

    let request = AnalysisRequest::new(args.front.as_deref(), args.side.as_deref())
        .with_height(args.height)
        .with_gender(args.gender);
    let response = analyzer.respond(&request);

    let json = serde_json::to_string_pretty(&response)?;
    match &args.out {
        Some(out) => {
            std::fs::write(out, &json)?;
            log::info!("response written to {}", out.display());
        }
        None => println!("{json}"),
    }

    if response.success {
        Ok(())
    } else {
        Err(response.message.into())
    }
}

// ── run ────────────────────────────────────────────────────────────────

fn run_config(config_path: &Path) -> CliResult<()> {
    let cfg = AnalysisConfig::load_json(config_path)?;
    let analyzer = cfg.build_analyzer()?;

    let front = PathBuf::from(&cfg.front_capture);
    let side = PathBuf::from(&cfg.side_capture);
    let request = AnalysisRequest::new(Some(front.as_path()), Some(side.as_path()))
        .with_height(cfg.height_cm)
        .with_gender(cfg.gender);

    let mut report = AnalysisReport::new(&cfg, config_path);
    let outcome = analyzer.try_analyze(&request);
    let failure = match outcome {
        Ok(analysis) => {
            println!("{}", analysis.summary());
            report.set_analysis(analysis);
            None
        }
        Err(err) => {
            report.set_error(&err);
            Some(err)
        }
    };

    let out = cfg.output_path();
    report.write_json(&out)?;
    log::info!("report written to {}", out.display());

    match failure {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

// ── init-config ────────────────────────────────────────────────────────

fn run_init_config(out: &Path, front: String, side: String) -> CliResult<()> {
    AnalysisConfig::template(front, side).write_json(out)?;
    println!("wrote config template to {}", out.display());
    Ok(())
}

// ── info ───────────────────────────────────────────────────────────────

fn run_info() -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(&ServiceInfo::current())?);
    Ok(())
}
