// =============================================================================
// Runtime Configuration — Hot-reloadable service settings with atomic save
// =============================================================================
//
// Screener, crossover and analysis parameters live here so the dashboard
// backend can be retuned at runtime without a restart. Chart enrichment is
// fixed and has no section.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash. All fields carry `#[serde(default)]` so that adding new fields never
// breaks loading an older config file.
//
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::AnalysisParams;
use crate::signals::ScreenerParams;

fn default_cross_fast() -> usize {
    50
}

fn default_cross_slow() -> usize {
    200
}

/// SMA periods compared by the crossover signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossoverParams {
    #[serde(default = "default_cross_fast")]
    pub fast: usize,
    #[serde(default = "default_cross_slow")]
    pub slow: usize,
}

impl Default for CrossoverParams {
    fn default() -> Self {
        Self {
            fast: default_cross_fast(),
            slow: default_cross_slow(),
        }
    }
}

impl CrossoverParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.fast == 0 {
            return Err("fast must be at least 1".to_string());
        }
        if self.fast >= self.slow {
            return Err(format!("fast ({}) must be below slow ({})", self.fast, self.slow));
        }
        Ok(())
    }
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level runtime configuration.
///
/// Every field has a serde default so that older JSON files missing new fields
/// will still deserialise correctly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub screener: ScreenerParams,

    #[serde(default)]
    pub crossover: CrossoverParams,

    #[serde(default)]
    pub analysis: AnalysisParams,
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            analysis = ?config.analysis,
            crossover = ?config.crossover,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Reset every section that fails validation to its defaults.
    ///
    /// Returns one message per section that was reset.
    pub fn sanitize(&mut self) -> Vec<String> {
        let mut reset = Vec::new();

        if let Err(msg) = self.screener.validate() {
            reset.push(format!("screener: {msg}"));
            self.screener = ScreenerParams::default();
        }
        if let Err(msg) = self.crossover.validate() {
            reset.push(format!("crossover: {msg}"));
            self.crossover = CrossoverParams::default();
        }
        if let Err(msg) = self.analysis.validate() {
            reset.push(format!("analysis: {msg}"));
            self.analysis = AnalysisParams::default();
        }

        reset
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }
}
