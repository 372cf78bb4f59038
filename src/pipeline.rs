use image::{GrayImage, RgbaImage};
use rand::Rng;

use crate::{
    assets::{
        decode::{decode_image, encode_image},
        selector::{AssetSelector, SpriteSource},
    },
    config::RainConfig,
    effects::{
        composite::over_in_place,
        mask::{covered_pixels, extract_contact_mask},
        wetting::apply_wetting,
    },
    field::compositor::{canvas_center, generate_field},
    foundation::{deadline::Deadline, error::RainResult},
};

/// Aggregated counters for one pipeline run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RainStats {
    /// Droplets requested by the configuration.
    pub droplets_requested: u32,
    /// Droplets pasted onto the field.
    pub droplets_placed: u32,
    /// Droplets skipped as degenerate.
    pub droplets_skipped: u32,
    /// Pixels marked in the contact mask.
    pub covered_pixels: u64,
}

/// Everything one run produces; the caller owns all of it.
#[derive(Clone, Debug)]
pub struct RainOutput {
    /// Wetted base image with the field composited on top.
    pub image: RgbaImage,
    /// The overlay field on its own.
    pub field: RgbaImage,
    /// Binary contact mask derived from the field.
    pub mask: GrayImage,
    /// Run counters.
    pub stats: RainStats,
}

/// Run the droplet-rain effect on an already decoded `base` with a known `sprite`.
///
/// Pipeline:
/// 1. generate the overlay field
/// 2. extract the contact mask
/// 3. darken the base under the mask
/// 4. composite the field over the wetted base
#[tracing::instrument(skip_all, fields(width = base.width(), height = base.height()))]
pub fn render_rain<R: Rng + ?Sized>(
    base: &RgbaImage,
    sprite: &RgbaImage,
    cfg: &RainConfig,
    rng: &mut R,
    deadline: &Deadline,
) -> RainResult<RainOutput> {
    cfg.validate()?;
    let (width, height) = base.dimensions();

    let field = generate_field(
        sprite,
        (width, height),
        canvas_center(width, height),
        cfg,
        rng,
        deadline,
    )?;

    deadline.check("mask")?;
    let mask = extract_contact_mask(&field.canvas, cfg.contact_threshold);

    deadline.check("wetting")?;
    let mut image = base.clone();
    apply_wetting(&mut image, &mask, cfg.wet_intensity)?;

    deadline.check("composite")?;
    over_in_place(&mut image, &field.canvas)?;

    let stats = RainStats {
        droplets_requested: cfg.droplet_count,
        droplets_placed: field.placed,
        droplets_skipped: field.skipped,
        covered_pixels: covered_pixels(&mask),
    };
    tracing::info!(
        placed = stats.droplets_placed,
        skipped = stats.droplets_skipped,
        covered = stats.covered_pixels,
        elapsed_ms = deadline.elapsed().as_millis() as u64,
        "droplet rain rendered"
    );

    Ok(RainOutput {
        image,
        field: field.canvas,
        mask,
        stats,
    })
}

/// Configured droplet-rain pipeline bound to a sprite source.
///
/// Holds no per-request state; one instance can serve concurrent requests as long as each brings
/// its own random source.
#[derive(Clone, Debug)]
pub struct RainPipeline<S> {
    config: RainConfig,
    selector: AssetSelector<S>,
}

impl<S: SpriteSource> RainPipeline<S> {
    /// Validate `config` and bind it to `source`.
    pub fn new(config: RainConfig, source: S) -> RainResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            selector: AssetSelector::new(source),
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &RainConfig {
        &self.config
    }

    /// Sprite selector used for each request.
    pub fn selector(&self) -> &AssetSelector<S> {
        &self.selector
    }

    /// Decode `base_bytes`, run the effect and encode the result with the configured format.
    pub fn composite<R: Rng + ?Sized>(&self, base_bytes: &[u8], rng: &mut R) -> RainResult<Vec<u8>> {
        self.composite_with_output(base_bytes, rng).map(|(encoded, _)| encoded)
    }

    /// Like [`RainPipeline::composite`], but also hands back the field, mask and counters.
    pub fn composite_with_output<R: Rng + ?Sized>(
        &self,
        base_bytes: &[u8],
        rng: &mut R,
    ) -> RainResult<(Vec<u8>, RainOutput)> {
        let deadline = Deadline::from_millis(self.config.timeout_ms);
        let base = decode_image(base_bytes)?;
        let out = self.run(&base, rng, &deadline)?;
        deadline.check("encode")?;
        let encoded = encode_image(&out.image, self.config.output_format)?;
        Ok((encoded, out))
    }

    /// Run the effect on a decoded image and return every intermediate product.
    pub fn composite_image<R: Rng + ?Sized>(
        &self,
        base: &RgbaImage,
        rng: &mut R,
    ) -> RainResult<RainOutput> {
        let deadline = Deadline::from_millis(self.config.timeout_ms);
        self.run(base, rng, &deadline)
    }

    fn run<R: Rng + ?Sized>(
        &self,
        base: &RgbaImage,
        rng: &mut R,
        deadline: &Deadline,
    ) -> RainResult<RainOutput> {
        let (_name, sprite) = self.selector.select(rng)?;
        deadline.check("select")?;
        render_rain(base, &sprite, &self.config, rng, deadline)
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline/pipeline.rs"]
mod tests;
