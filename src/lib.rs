//! slime-rain composites a procedurally placed rain of droplets onto a portrait image and stains
//! the places the droplets touch.
//!
//! # Pipeline overview
//!
//! 1. **Select**: pick one droplet sprite at random from a [`SpriteSource`]
//! 2. **Field**: paste `droplet_count` scaled, stretched, shaded and rotated copies of the sprite
//!    onto a transparent canvas the size of the input
//! 3. **Mask**: threshold the field's alpha into a binary contact mask
//! 4. **Wetting**: darken the input's colour channels under the mask
//! 5. **Composite**: lay the field over the wetted input
//!
//! Constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Injected randomness**: every random draw comes from a caller-provided [`rand::Rng`]; seed
//!   it with [`seeded_rng`] for reproducible output.
//! - **Straight RGBA8** at the API boundary; premultiplication is internal to resampling.
//! - **No shared mutable state**: each request owns its buffers.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod config;
mod droplet;
mod effects;
mod field;
mod foundation;
mod pipeline;

pub use assets::decode::{decode_image, encode_image};
pub use assets::selector::{
    AssetSelector, DEFAULT_SPRITE_EXTENSIONS, DirSpriteSource, MemorySpriteSource, SpriteSource,
};
pub use config::{FactorRange, MAX_FACTOR, OutputFormat, PlacementBounds, RainConfig};
pub use droplet::rotate::{rotate_expand, rotated_bounds};
pub use droplet::transform::{
    DegenerateSprite, DropletOutcome, DropletParams, MAX_DROPLET_PIXELS, TransformStage,
    orientation_deg, place_droplet, place_random_droplet, render_droplet, scale_sprite,
    shade_alpha_gradient, stretch_vertically,
};
pub use effects::blur::blur_field;
pub use effects::composite::{StraightRgba8, over, over_in_place, paste_over};
pub use effects::mask::{DEFAULT_CONTACT_THRESHOLD, covered_pixels, extract_contact_mask};
pub use effects::wetting::apply_wetting;
pub use field::compositor::{OverlayField, canvas_center, generate_field};
pub use foundation::deadline::Deadline;
pub use foundation::error::{RainError, RainResult};
pub use foundation::rng::{RainRng, entropy_rng, seeded_rng};
pub use pipeline::{RainOutput, RainPipeline, RainStats, render_rain};
