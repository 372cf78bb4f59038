use std::path::Path;

use anyhow::Context;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{RainError, RainResult};

/// Largest accepted upper bound for `scale_range` and `stretch_range`.
pub const MAX_FACTOR: f32 = 16.0;

/// Inclusive range a random factor is drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FactorRange {
    /// Lower bound (inclusive).
    pub min: f32,
    /// Upper bound (inclusive).
    pub max: f32,
}

impl FactorRange {
    /// Build a range; call [`RainConfig::validate`] before sampling from user input.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// A degenerate range that always yields `v`.
    pub const fn fixed(v: f32) -> Self {
        Self { min: v, max: v }
    }

    /// Draw one value uniformly from `[min, max]`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.min >= self.max {
            // Still consume a draw so the stream position does not depend on the range width.
            let _: f32 = rng.r#gen();
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }

    fn validate(&self, field: &str) -> RainResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(RainError::validation(format!(
                "{field} bounds must be finite"
            )));
        }
        if self.min <= 0.0 {
            return Err(RainError::validation(format!("{field}.min must be > 0")));
        }
        if self.min > self.max {
            return Err(RainError::validation(format!(
                "{field}.min must be <= {field}.max"
            )));
        }
        if self.max > MAX_FACTOR {
            return Err(RainError::validation(format!(
                "{field}.max must be <= {MAX_FACTOR}"
            )));
        }
        Ok(())
    }
}

/// Vertical band droplet origins are drawn from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementBounds {
    /// `y` in the upper half of the canvas: droplets fall from above.
    #[default]
    UpperHalf,
    /// `y` anywhere on the canvas.
    FullCanvas,
}

impl PlacementBounds {
    /// Exclusive upper bound for the sampled `y` coordinate on a canvas of `height` rows.
    pub fn y_limit(self, height: u32) -> u32 {
        match self {
            Self::UpperHalf => (height / 2).max(1),
            Self::FullCanvas => height.max(1),
        }
    }
}

/// Encoded format of the pipeline result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputFormat {
    /// Lossless PNG with alpha.
    #[default]
    Png,
    /// JPEG at `quality` (1..=100); alpha is flattened away.
    Jpeg {
        /// Encoder quality.
        quality: u8,
    },
}

/// Every tunable of the droplet-rain pipeline.
///
/// Deployments differ only in these values; there is one pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RainConfig {
    /// Number of droplets placed on the overlay field.
    pub droplet_count: u32,
    /// Uniform scale applied to the base sprite.
    pub scale_range: FactorRange,
    /// Extra vertical stretch applied after scaling.
    pub stretch_range: FactorRange,
    /// Alpha multiplier reached at the bottom row of each droplet.
    pub min_alpha: f32,
    /// Darkening strength of the wetting pass, in `[0, 1]`.
    pub wet_intensity: f32,
    /// Field alpha strictly above this value counts as droplet contact.
    pub contact_threshold: u8,
    /// Gaussian blur radius for the field ("sticky" droplets). `None` disables the pass.
    pub blur_radius: Option<u32>,
    /// Where droplet origins may land.
    pub placement: PlacementBounds,
    /// Processing budget for one request.
    pub timeout_ms: Option<u64>,
    /// Result encoding used by [`crate::RainPipeline::composite`].
    pub output_format: OutputFormat,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            droplet_count: 40,
            scale_range: FactorRange::new(0.1, 0.8),
            stretch_range: FactorRange::new(1.3, 2.0),
            min_alpha: 0.6,
            wet_intensity: 0.35,
            contact_threshold: 30,
            blur_radius: None,
            placement: PlacementBounds::UpperHalf,
            timeout_ms: None,
            output_format: OutputFormat::Png,
        }
    }
}

impl RainConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> RainResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| RainError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_path(path: &Path) -> RainResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read rain config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> RainResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| RainError::serde(e.to_string()))
    }

    /// Check ranges and unit intervals.
    pub fn validate(&self) -> RainResult<()> {
        self.scale_range.validate("scale_range")?;
        self.stretch_range.validate("stretch_range")?;

        for (name, value) in [
            ("min_alpha", self.min_alpha),
            ("wet_intensity", self.wet_intensity),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(RainError::validation(format!(
                    "{name} must be finite and within [0, 1]"
                )));
            }
        }

        if let Some(r) = self.blur_radius
            && r == 0
        {
            return Err(RainError::validation(
                "blur_radius must be >= 1 when set",
            ));
        }

        if let OutputFormat::Jpeg { quality } = self.output_format
            && !(1..=100).contains(&quality)
        {
            return Err(RainError::validation(
                "jpeg quality must be within 1..=100",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
