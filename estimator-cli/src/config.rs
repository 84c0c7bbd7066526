//! Configuration file loading for the estimator.
//!
//! Discovers and loads `estimator.toml` from the working directory.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use estimator_types::pricing::{
    CohesionOverrides, ConfigOverrides, DebtPricingMode, ResolutionLevel, UnitType,
};
use fs_err as fs;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "estimator.toml";

pub const DEFAULT_OUT_DIR: &str = "artifacts/estimator";

/// Top-level configuration from estimator.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub preset: PresetConfig,
    pub overrides: OverridesConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PresetConfig {
    /// Preset to price with instead of the project's own.
    pub id: Option<String>,

    /// Extra preset JSON files to register next to the built-ins.
    pub files: Vec<Utf8PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OverridesConfig {
    pub pm_percent: Option<f64>,

    /// Unit type name to rate, e.g. `template = 520`.
    pub unit_rates: BTreeMap<String, f64>,

    pub cohesion: CohesionConfigFile,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CohesionConfigFile {
    pub enabled: Option<bool>,
    pub core_floor_delta: Option<u8>,
    pub utility_floor_delta: Option<u8>,
    pub min_core_floor: Option<u8>,
    pub min_utility_floor: Option<u8>,
    pub debt_factor_per_notch: Option<f64>,
    pub debt_pricing_mode: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory quote artifacts are written to.
    pub out_dir: Option<Utf8PathBuf>,
}

/// Discover the estimator.toml config file in `root`.
pub fn discover_config(root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse an estimator.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<EstimatorConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

pub fn parse_config(contents: &str) -> anyhow::Result<EstimatorConfig> {
    let config: EstimatorConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from `root`, or return default if not found.
pub fn load_or_default(root: &Utf8Path) -> anyhow::Result<EstimatorConfig> {
    match discover_config(root) {
        Some(path) => load_config(&path),
        None => Ok(EstimatorConfig::default()),
    }
}

/// Pricing-related CLI flags, as parsed.
#[derive(Debug, Clone, Default)]
pub struct QuoteCliArgs {
    pub preset: Option<String>,
    pub preset_files: Vec<Utf8PathBuf>,
    pub pm_percent: Option<f64>,
    pub rates: BTreeMap<UnitType, f64>,
    pub no_cohesion: bool,
    pub out_dir: Option<Utf8PathBuf>,
}

/// Merged configuration combining config file and CLI arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedConfig {
    pub preset_id: Option<String>,

    /// Config file presets first, then CLI ones.
    pub preset_files: Vec<Utf8PathBuf>,

    pub overrides: ConfigOverrides,
    pub out_dir: Utf8PathBuf,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: EstimatorConfig,
}

impl ConfigMerger {
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    /// Merge with pricing CLI arguments.
    ///
    /// Scalars from the CLI replace config values; CLI rates extend the
    /// config rate table key-wise; `--no-cohesion` forces cohesion off.
    pub fn merge_quote_args(self, cli: &QuoteCliArgs) -> anyhow::Result<MergedConfig> {
        let file = self.config;

        let mut unit_rates = parse_rate_table(&file.overrides.unit_rates)?;
        unit_rates.extend(cli.rates.iter().map(|(k, v)| (*k, *v)));

        let mut cohesion = cohesion_overrides(&file.overrides.cohesion)?;
        if cli.no_cohesion {
            cohesion.enabled = Some(false);
        }

        let overrides = ConfigOverrides {
            pm_percent: cli.pm_percent.or(file.overrides.pm_percent),
            unit_rates: (!unit_rates.is_empty()).then_some(unit_rates),
            cohesion: (!cohesion.is_empty()).then_some(cohesion),
        };

        let mut preset_files = file.preset.files.clone();
        for path in &cli.preset_files {
            if !preset_files.contains(path) {
                preset_files.push(path.clone());
            }
        }

        Ok(MergedConfig {
            preset_id: cli.preset.clone().or(file.preset.id),
            preset_files,
            overrides,
            out_dir: cli
                .out_dir
                .clone()
                .or(file.output.out_dir)
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_OUT_DIR)),
        })
    }
}

fn parse_rate_table(table: &BTreeMap<String, f64>) -> anyhow::Result<BTreeMap<UnitType, f64>> {
    table
        .iter()
        .map(|(name, rate)| {
            let unit = name
                .parse::<UnitType>()
                .with_context(|| format!("[overrides.unit_rates] key '{name}'"))?;
            Ok((unit, *rate))
        })
        .collect()
}

fn cohesion_overrides(file: &CohesionConfigFile) -> anyhow::Result<CohesionOverrides> {
    let debt_pricing_mode = file
        .debt_pricing_mode
        .as_deref()
        .map(str::parse::<DebtPricingMode>)
        .transpose()
        .context("[overrides.cohesion] debt_pricing_mode")?;

    Ok(CohesionOverrides {
        enabled: file.enabled,
        core_floor_delta: file.core_floor_delta,
        utility_floor_delta: file.utility_floor_delta,
        min_core_floor: file.min_core_floor.map(ResolutionLevel),
        min_utility_floor: file.min_utility_floor.map(ResolutionLevel),
        debt_factor_per_notch: file.debt_factor_per_notch,
        debt_pricing_mode,
    })
}

/// Parse CLI rate overrides from `unit=value` strings.
pub fn parse_cli_rates(entries: &[String]) -> anyhow::Result<BTreeMap<UnitType, f64>> {
    let mut out = BTreeMap::new();
    for entry in entries {
        let mut parts = entry.splitn(2, '=');
        let key = parts
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow::anyhow!("invalid rate '{}': missing unit type", entry))?;
        let value = parts
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow::anyhow!("invalid rate '{}': missing value", entry))?;

        let unit: UnitType = key
            .parse()
            .with_context(|| format!("invalid rate '{}'", entry))?;
        let rate: f64 = value
            .parse()
            .with_context(|| format!("invalid rate '{}': '{}' is not a number", entry, value))?;
        if !rate.is_finite() || rate < 0.0 {
            anyhow::bail!("invalid rate '{}': must be a finite, non-negative number", entry);
        }
        out.insert(unit, rate);
    }
    Ok(out)
}
