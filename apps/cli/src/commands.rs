//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use dealbrief_core::{BatchOutcome, CompanyOutcome, Pipeline, PipelineConfig, ProgressReporter};
use dealbrief_report::{RenderedReport, ReportType};
use dealbrief_shared::{
    AppConfig, CompanyRecord, config_file_path, init_config, load_config, resolve_api_key,
};
use dealbrief_synthesis::SynthesisConfig;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// DealBrief — investor research reports from intake records.
#[derive(Parser)]
#[command(
    name = "dealbrief",
    version,
    about = "Generate one-pager and deep-dive research reports for intake companies.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Which report variants to emit.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum ReportSelection {
    #[value(name = "one_pager")]
    OnePager,
    #[value(name = "deep_dive")]
    DeepDive,
    #[value(name = "both")]
    Both,
}

impl ReportSelection {
    fn includes(self, report_type: ReportType) -> bool {
        matches!(
            (self, report_type),
            (Self::Both, _)
                | (Self::OnePager, ReportType::OnePager)
                | (Self::DeepDive, ReportType::DeepDive)
        )
    }
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate reports for a single company record.
    Generate {
        /// Path to a company record JSON file.
        record: PathBuf,

        /// Pitch-deck URL or local path (overrides the record's own).
        #[arg(long)]
        deck: Option<String>,

        /// Path to a plain-text internal notes file (overrides the record's own).
        #[arg(long)]
        notes: Option<PathBuf>,

        /// Output directory for rendered Markdown.
        #[arg(short, long, default_value = "reports")]
        out: PathBuf,

        /// Which report variants to emit.
        #[arg(long, default_value = "both")]
        report: ReportSelection,
    },

    /// Generate reports for every record in a batch file (JSON array).
    Batch {
        /// Path to a JSON file containing an array of company records.
        records: PathBuf,

        /// Output directory for rendered Markdown.
        #[arg(short, long, default_value = "reports")]
        out: PathBuf,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "dealbrief=info",
        1 => "dealbrief=debug",
        _ => "dealbrief=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate {
            record,
            deck,
            notes,
            out,
            report,
        } => generate(record, deck, notes, out, report).await,
        Command::Batch { records, out } => batch(records, out).await,
        Command::Config { action } => config_command(action),
    }
}

async fn generate(
    record_path: PathBuf,
    deck: Option<String>,
    notes: Option<PathBuf>,
    out: PathBuf,
    selection: ReportSelection,
) -> Result<()> {
    let config = load_config()?;
    let mut record = read_record(&record_path)?;

    if let Some(deck) = deck {
        record.pitch_deck_url = Some(deck);
    }
    if let Some(notes_path) = notes {
        record.internal_notes = std::fs::read_to_string(&notes_path)
            .map_err(|e| eyre!("failed to read notes file {}: {e}", notes_path.display()))?;
    }

    let pipeline = build_pipeline(&config)?;
    let outcome = pipeline.process(&record).await;

    if !outcome.succeeded() {
        return Err(eyre!(
            "no reports generated for {:?}: {}",
            outcome.company_name,
            outcome.errors.join("; ")
        ));
    }

    let written = write_outcome(&out, &outcome, selection)?;
    for path in &written {
        println!("wrote {}", path.display());
    }
    if let Some(source) = outcome.brief_source {
        println!("brief source: {source:?}");
    }

    Ok(())
}

async fn batch(records_path: PathBuf, out: PathBuf) -> Result<()> {
    let config = load_config()?;
    let records = read_records(&records_path)?;
    if records.is_empty() {
        println!("no records in {}", records_path.display());
        return Ok(());
    }

    let pipeline = Arc::new(build_pipeline(&config)?);
    let progress = BarProgress::new(records.len());

    let batch = pipeline.process_many(records, &progress).await;
    progress.finish();

    let mut written = 0usize;
    for outcome in &batch.outcomes {
        if outcome.succeeded() {
            written += write_outcome(&out, outcome, ReportSelection::Both)?.len();
        }
    }

    print_batch_summary(&batch, written, &out);
    Ok(())
}

fn config_command(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = init_config()?;
            println!("wrote {}", path.display());
        }
        ConfigAction::Show => {
            let config = load_config()?;
            println!("# resolved from {}", config_file_path()?.display());
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn build_pipeline(config: &AppConfig) -> Result<Pipeline> {
    let api_key = resolve_api_key(config);
    if api_key.is_none() {
        eprintln!(
            "warning: {} is not set — reports will use synthetic fallback briefs",
            config.synthesis.api_key_env
        );
    }

    let pipeline_config = PipelineConfig {
        synthesis: SynthesisConfig::from_settings(&config.synthesis, api_key),
        fetch_timeout_secs: config.defaults.fetch_timeout_secs,
        max_concurrency: config.defaults.max_concurrency,
    };

    Ok(Pipeline::new(pipeline_config)?)
}

fn read_record(path: &Path) -> Result<CompanyRecord> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| eyre!("failed to read record file {}: {e}", path.display()))?;
    serde_json::from_str(&content)
        .map_err(|e| eyre!("failed to parse record file {}: {e}", path.display()))
}

fn read_records(path: &Path) -> Result<Vec<CompanyRecord>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| eyre!("failed to read records file {}: {e}", path.display()))?;
    serde_json::from_str(&content)
        .map_err(|e| eyre!("failed to parse records file {}: {e}", path.display()))
}

/// Write an outcome's selected reports to the output directory. Returns the
/// written paths.
fn write_outcome(
    out_dir: &Path,
    outcome: &CompanyOutcome,
    selection: ReportSelection,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .map_err(|e| eyre!("failed to create {}: {e}", out_dir.display()))?;

    let reports = [&outcome.one_pager, &outcome.deep_dive];
    let mut written = Vec::new();

    for report in reports.into_iter().flatten() {
        if !selection.includes(report.report_type) {
            continue;
        }
        let path = out_dir.join(report_file_name(&outcome.company_name, report));
        std::fs::write(&path, &report.markdown)
            .map_err(|e| eyre!("failed to write {}: {e}", path.display()))?;
        info!(path = %path.display(), "report written");
        written.push(path);
    }

    Ok(written)
}

/// Filesystem-safe report file name: `Acme_Inc_one_pager.md`.
fn report_file_name(company_name: &str, report: &RenderedReport) -> String {
    let safe_name: String = company_name
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '.' | '/' | '\\' => '_',
            c => c,
        })
        .collect();
    format!("{safe_name}_{}.md", report.report_type)
}

fn print_batch_summary(batch: &BatchOutcome, written: usize, out_dir: &Path) {
    println!(
        "run {}: {} succeeded, {} failed, {} files written to {} in {:.1}s",
        batch.run_id,
        batch.succeeded(),
        batch.failed(),
        written,
        out_dir.display(),
        batch.elapsed.as_secs_f64()
    );

    for outcome in &batch.outcomes {
        for error in &outcome.errors {
            println!("  error [{}]: {error}", outcome.company_name);
        }
    }
}

// ---------------------------------------------------------------------------
// Progress bar adapter
// ---------------------------------------------------------------------------

/// Bridges the pipeline's progress callbacks to an indicatif bar.
struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{pos}/{len}] {msg}")
                .expect("valid progress template"),
        );
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressReporter for BarProgress {
    fn phase(&self, name: &str) {
        self.bar.set_message(name.to_string());
    }

    fn company_finished(&self, outcome: &CompanyOutcome, _completed: usize, _total: usize) {
        self.bar.set_message(outcome.company_name.clone());
        self.bar.inc(1);
    }
}
