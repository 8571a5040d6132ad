use std::path::Path;

use anyhow::Context as _;

use crate::{
    foundation::{
        core::Rgba8,
        error::{FolioError, FolioResult},
    },
    helix::menu::HelixConfig,
    tree::field::TreeConfig,
};

/// Environment variable that overrides [`SceneConfig::seed`].
pub const SEED_ENV: &str = "PHYLOFOLIO_SEED";

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Rotation ticker period (about 20 Hz by default).
    pub rotation_period_ms: f64,
    pub rotation_step_deg: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            rotation_period_ms: 50.0,
            rotation_step_deg: 0.3,
        }
    }
}

/// Everything needed to build a stage. Unknown JSON fields are rejected, missing ones default.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    pub seed: u64,
    pub background: Option<Rgba8>,
    pub tree: TreeConfig,
    pub helix: HelixConfig,
    pub timing: TimingConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            background: Some(Rgba8::rgb(0x0a, 0x0e, 0x1a)),
            tree: TreeConfig::default(),
            helix: HelixConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl SceneConfig {
    pub fn validate(&self) -> FolioResult<()> {
        self.tree.validate()?;
        self.helix.validate()?;
        let t = &self.timing;
        if !t.rotation_period_ms.is_finite() || t.rotation_period_ms <= 0.0 {
            return Err(FolioError::validation(
                "timing rotation_period_ms must be finite and > 0",
            ));
        }
        if !t.rotation_step_deg.is_finite() {
            return Err(FolioError::validation(
                "timing rotation_step_deg must be finite",
            ));
        }
        Ok(())
    }

    pub fn from_json_str(s: &str) -> FolioResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    #[tracing::instrument]
    pub fn load(path: &Path) -> FolioResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read scene config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Apply `PHYLOFOLIO_SEED` if set. A value that does not parse as `u64` is an error rather
    /// than being ignored.
    pub fn apply_env_overrides(&mut self) -> FolioResult<()> {
        self.apply_seed_override(std::env::var(SEED_ENV).ok().as_deref())
    }

    pub(crate) fn apply_seed_override(&mut self, value: Option<&str>) -> FolioResult<()> {
        let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Ok(());
        };
        self.seed = raw.parse::<u64>().map_err(|_| {
            FolioError::validation(format!("{SEED_ENV} must be an unsigned integer (got '{raw}')"))
        })?;
        tracing::debug!(seed = self.seed, "seed overridden from environment");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/scene.rs"]
mod tests;
