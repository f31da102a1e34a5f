use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitsConfig {
    /// Maximum accepted size of a single uploaded snapshot, in bytes.
    /// Oversized uploads are rejected before any decoding happens.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

/// Pricing knobs. Defaults reproduce the historical sheet behaviour; override
/// them only when the whole store agrees to a new tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PricingConfig {
    /// Multiplier assigned when an item has no usable history.
    #[serde(default = "default_multiplier")]
    pub default_multiplier: f64,
    /// Per-run multiplier increase while stock is growing.
    #[serde(default = "default_step_up")]
    pub step_up: f64,
    /// Per-run multiplier decrease while it has headroom above 1.0.
    #[serde(default = "default_decay")]
    pub decay: f64,
    /// Per-run multiplier decrease once it is near the 1.0 floor.
    #[serde(default = "default_floor_decay")]
    pub floor_decay: f64,
    /// Sentinel base price when neither market nor low price is available.
    /// Deliberately huge so anomalous rows stand out downstream.
    #[serde(default = "default_fallback_base_price")]
    pub fallback_base_price: f64,
    /// Price floors by current quantity, highest threshold first.
    #[serde(default = "default_bump_tiers")]
    pub bump_tiers: Vec<BumpTier>,
    /// Floor applied below the smallest tier threshold.
    #[serde(default = "default_base_bump")]
    pub base_bump: f64,
}

/// A quantity threshold and the price floor it grants. Larger stock gets a
/// smaller floor.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct BumpTier {
    pub min_qty: i64,
    pub bump: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            default_multiplier: default_multiplier(),
            step_up: default_step_up(),
            decay: default_decay(),
            floor_decay: default_floor_decay(),
            fallback_base_price: default_fallback_base_price(),
            bump_tiers: default_bump_tiers(),
            base_bump: default_base_bump(),
        }
    }
}

impl PricingConfig {
    /// Price floor for a row with `qty` copies in stock: first matching tier
    /// wins, otherwise the base bump applies.
    pub fn bump_for_qty(&self, qty: i64) -> f64 {
        self.bump_tiers
            .iter()
            .find(|tier| qty >= tier.min_qty)
            .map(|tier| tier.bump)
            .unwrap_or(self.base_bump)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_upload_bytes() -> usize {
    100 * 1024 * 1024
}

fn default_multiplier() -> f64 {
    1.2
}

fn default_step_up() -> f64 {
    0.01
}

fn default_decay() -> f64 {
    0.05
}

fn default_floor_decay() -> f64 {
    0.01
}

fn default_fallback_base_price() -> f64 {
    50000.0
}

fn default_bump_tiers() -> Vec<BumpTier> {
    vec![
        BumpTier {
            min_qty: 40,
            bump: 0.05,
        },
        BumpTier {
            min_qty: 20,
            bump: 0.15,
        },
    ]
}

fn default_base_bump() -> f64 {
    0.25
}

/// Load configuration from an optional TOML file plus environment overrides
/// (`TCG_REPRICER__SERVER__PORT` etc.). Every field has a default, so running
/// without a config file is supported.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("TCG_REPRICER").separator("__"))
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if cfg.limits.max_upload_bytes == 0 {
        anyhow::bail!("limits.max_upload_bytes must be greater than zero");
    }

    let pricing = &cfg.pricing;
    if pricing.default_multiplier < 1.0 {
        anyhow::bail!("pricing.default_multiplier must be at least 1.0");
    }
    if pricing.step_up <= 0.0 || pricing.decay <= 0.0 || pricing.floor_decay <= 0.0 {
        anyhow::bail!("pricing multiplier steps must be positive");
    }
    if pricing.fallback_base_price <= 0.0 {
        anyhow::bail!("pricing.fallback_base_price must be positive");
    }
    if pricing.base_bump < 0.0 || pricing.bump_tiers.iter().any(|t| t.bump < 0.0) {
        anyhow::bail!("price bumps must not be negative");
    }

    // Tiers are evaluated first-match-wins, so they must be sorted by
    // descending threshold.
    let sorted = pricing
        .bump_tiers
        .windows(2)
        .all(|pair| pair[0].min_qty > pair[1].min_qty);
    if !sorted {
        anyhow::bail!("pricing.bump_tiers must be sorted by descending min_qty");
    }

    Ok(())
}
