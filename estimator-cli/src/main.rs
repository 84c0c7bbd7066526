mod config;
mod explain;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use clap::{Parser, Subcommand};
use config::{ConfigMerger, QuoteCliArgs};
use estimator_core::EditMode;
use estimator_core::adapters::{CatalogPresetSource, FsProjectSource, FsWritePort};
use estimator_core::pipeline::{
    QUOTE_FILE_NAME, QuoteOutcome, ToolError, run_edit, run_quote, write_project,
    write_quote_artifacts,
};
use estimator_core::ports::PresetSource;
use estimator_core::settings::{EditSettings, QuoteSettings};
use estimator_types::pricing::{Confidence, LockState};
use estimator_types::quote::ToolInfo;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "estimator",
    version,
    about = "Price project estimates and flag cohesion debt between deliverables."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Price a project and write quote.json.
    Quote(QuoteArgs),
    /// Explain the cohesion floors and the debt they produce.
    Explain(ExplainArgs),
    /// List available pricing presets.
    Presets(PresetsArgs),
    /// Write the demo project to start from.
    Init(InitArgs),
    /// Edit items of a project file.
    Edit(EditArgs),
}

#[derive(Debug, Parser)]
struct PricingArgs {
    /// Project file to price.
    #[arg(long, default_value = "project.json")]
    project: Utf8PathBuf,

    /// Price with this preset instead of the project's own.
    #[arg(long)]
    preset: Option<String>,

    /// Extra preset JSON files to make available.
    #[arg(long = "preset-file")]
    preset_files: Vec<Utf8PathBuf>,

    /// Project-management percentage as a fraction (e.g. 0.05).
    #[arg(long)]
    pm_percent: Option<f64>,

    /// Unit rate override as unit=value (repeatable).
    #[arg(long = "rate")]
    rates: Vec<String>,

    /// Disable cohesion-debt derivation.
    #[arg(long, default_value_t = false)]
    no_cohesion: bool,
}

#[derive(Debug, Parser)]
struct QuoteArgs {
    #[command(flatten)]
    pricing: PricingArgs,

    /// Output directory for quote artifacts (default: artifacts/estimator).
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,

    /// Output format for the summary (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Parser)]
struct ExplainArgs {
    #[command(flatten)]
    pricing: PricingArgs,
}

#[derive(Debug, Parser)]
struct PresetsArgs {
    /// Extra preset JSON files to list next to the built-ins.
    #[arg(long = "preset-file")]
    preset_files: Vec<Utf8PathBuf>,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Parser)]
struct InitArgs {
    /// Where to write the project.
    #[arg(long, default_value = "project.json")]
    path: Utf8PathBuf,

    /// Overwrite an existing file.
    #[arg(long, default_value_t = false)]
    force: bool,
}

#[derive(Debug, Parser)]
struct EditArgs {
    /// Project file to edit in place.
    #[arg(long, default_value = "project.json")]
    project: Utf8PathBuf,

    /// Id of the item to edit.
    #[arg(long)]
    item: Option<String>,

    /// New resolution (clamped to the item's minimum and to 1..=7).
    #[arg(long)]
    resolution: Option<u8>,

    /// New confidence (high, medium, low).
    #[arg(long)]
    confidence: Option<Confidence>,

    /// New instance count.
    #[arg(long)]
    count: Option<u32>,

    /// Change the instance count by this amount (may be negative).
    #[arg(long, allow_hyphen_values = true)]
    add_count: Option<i64>,

    /// Lock state for the item (truth, spec).
    #[arg(long)]
    lock: Option<LockState>,

    /// Lock state for every item (truth, spec).
    #[arg(long)]
    all_locks: Option<LockState>,

    /// Who is editing; client edits never lock anything.
    #[arg(long, default_value = "studio")]
    mode: EditMode,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        error!("{:#}", e);
        return ExitCode::from(exit_code_for(&e));
    }
    ExitCode::from(0)
}

/// 2 when the engine rejected the input or configuration, 1 otherwise.
fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<ToolError>()
        .map(ToolError::exit_code)
        .unwrap_or(1)
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Quote(args) => cmd_quote(args),
        Command::Explain(args) => cmd_explain(args),
        Command::Presets(args) => cmd_presets(args),
        Command::Init(args) => cmd_init(args),
        Command::Edit(args) => cmd_edit(args),
    }
}

/// Merge `estimator.toml` with the pricing flags and run the quote pipeline.
fn quote_project(pricing: &PricingArgs, out_dir: Option<Utf8PathBuf>) -> anyhow::Result<(QuoteOutcome, Utf8PathBuf)> {
    let file_config =
        config::load_or_default(Utf8Path::new(".")).context("load estimator.toml config")?;
    let cli = QuoteCliArgs {
        preset: pricing.preset.clone(),
        preset_files: pricing.preset_files.clone(),
        pm_percent: pricing.pm_percent,
        rates: config::parse_cli_rates(&pricing.rates)?,
        no_cohesion: pricing.no_cohesion,
        out_dir,
    };
    let merged = ConfigMerger::new(file_config).merge_quote_args(&cli)?;
    debug!(
        "merged config: preset={:?}, preset_files={:?}, overrides={:?}",
        merged.preset_id, merged.preset_files, merged.overrides
    );

    let presets = CatalogPresetSource::new().with_files(&merged.preset_files)?;
    let settings = QuoteSettings {
        project_path: pricing.project.clone(),
        out_dir: merged.out_dir.clone(),
        preset_id: merged.preset_id,
        overrides: merged.overrides,
    };
    let projects = FsProjectSource::new(settings.project_path.clone());

    let outcome = run_quote(&settings, &projects, &presets, tool_info())?;
    Ok((outcome, merged.out_dir))
}

fn cmd_quote(args: QuoteArgs) -> anyhow::Result<()> {
    let (outcome, out_dir) = quote_project(&args.pricing, args.out_dir)?;

    write_quote_artifacts(&outcome, &out_dir, &FsWritePort)
        .with_context(|| format!("write quote artifacts to {}", out_dir))?;

    match args.format {
        OutputFormat::Text => print!("{}", explain::render_quote_summary(&outcome.quote)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome.quote)?),
    }

    info!("wrote {} to {}", QUOTE_FILE_NAME, out_dir);
    Ok(())
}

fn cmd_explain(args: ExplainArgs) -> anyhow::Result<()> {
    let (outcome, _) = quote_project(&args.pricing, None)?;
    print!(
        "{}",
        explain::render_cohesion(&outcome.quote.cohesion, &outcome.quote.currency)
    );
    Ok(())
}

fn cmd_presets(args: PresetsArgs) -> anyhow::Result<()> {
    let file_config =
        config::load_or_default(Utf8Path::new(".")).context("load estimator.toml config")?;
    let mut files = file_config.preset.files;
    files.extend(args.preset_files);

    let presets = CatalogPresetSource::new()
        .with_files(&files)?
        .list_presets()?;

    match args.format {
        OutputFormat::Text => {
            print!("{}", explain::render_presets(&presets));
            println!();
            println!("Use 'estimator quote --preset <id>' to price with one.");
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&presets)?),
    }
    Ok(())
}

fn cmd_init(args: InitArgs) -> anyhow::Result<()> {
    if args.path.exists() && !args.force {
        anyhow::bail!("{} already exists; use --force to overwrite", args.path);
    }

    let project_id = format!("proj-{}", uuid::Uuid::new_v4());
    let project = estimator_domain::demo_project(Utc::now(), project_id);
    write_project(&project, &args.path, &FsWritePort)?;

    println!(
        "Wrote demo project '{}' ({} items) to {}",
        project.meta.name,
        project.estimate.items.len(),
        args.path
    );
    Ok(())
}

fn cmd_edit(args: EditArgs) -> anyhow::Result<()> {
    let settings = EditSettings {
        project_path: args.project.clone(),
        item_id: args.item,
        resolution: args.resolution,
        confidence: args.confidence,
        count: args.count,
        count_delta: args.add_count,
        lock: args.lock,
        all_locks: args.all_locks,
        mode: args.mode,
    };
    if !settings.has_item_edits() && settings.all_locks.is_none() {
        anyhow::bail!(
            "nothing to edit; pass --resolution, --confidence, --count, --add-count, --lock or --all-locks"
        );
    }

    let projects = FsProjectSource::new(settings.project_path.clone());
    let outcome = run_edit(&settings, &projects, Utc::now())?;

    if outcome.changed.is_empty() {
        println!("No changes.");
        return Ok(());
    }

    write_project(&outcome.project, &settings.project_path, &FsWritePort)?;
    println!("Updated {} item(s): {}", outcome.changed.len(), outcome.changed.join(", "));
    Ok(())
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "estimator".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    }
}
