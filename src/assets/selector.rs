use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use image::RgbaImage;
use rand::Rng;

use crate::{
    assets::decode::decode_image,
    foundation::error::{RainError, RainResult},
};

/// File extensions accepted for droplet sprites when none are configured.
pub const DEFAULT_SPRITE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Read-only store of droplet sprites.
///
/// Implementations must be safe to share between concurrent requests.
pub trait SpriteSource: Send + Sync {
    /// Human-readable location used in error messages.
    fn location(&self) -> PathBuf;

    /// Candidate sprite names, in a stable order.
    fn list(&self) -> RainResult<Vec<String>>;

    /// Load one sprite by a name returned from [`SpriteSource::list`].
    fn open(&self, name: &str) -> RainResult<RgbaImage>;
}

/// Sprites stored as image files in one directory (not recursive).
#[derive(Clone, Debug)]
pub struct DirSpriteSource {
    root: PathBuf,
    extensions: Vec<String>,
}

impl DirSpriteSource {
    /// Source over `root` accepting [`DEFAULT_SPRITE_EXTENSIONS`].
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_extensions(root, DEFAULT_SPRITE_EXTENSIONS.iter().copied())
    }

    /// Source over `root` accepting the given extensions (case-insensitive, leading dot optional).
    pub fn with_extensions<I, S>(root: impl Into<PathBuf>, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self {
            root: root.into(),
            extensions,
        }
    }

    /// Directory the sprites are read from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn accepts(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            return false;
        };
        let ext = ext.to_ascii_lowercase();
        self.extensions.iter().any(|e| *e == ext)
    }
}

impl SpriteSource for DirSpriteSource {
    fn location(&self) -> PathBuf {
        self.root.clone()
    }

    fn list(&self) -> RainResult<Vec<String>> {
        let rd = match std::fs::read_dir(&self.root) {
            Ok(rd) => rd,
            Err(err) => {
                tracing::warn!(dir = %self.root.display(), %err, "sprite directory unreadable");
                return Err(RainError::no_assets(&self.root));
            }
        };

        let mut names = Vec::new();
        for entry in rd.flatten() {
            let path = entry.path();
            if !path.is_file() || !self.accepts(&path) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn open(&self, name: &str) -> RainResult<RgbaImage> {
        let path = self.root.join(name);
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read sprite bytes from '{}'", path.display()))?;
        decode_image(&bytes)
    }
}

/// Sprites held in memory, keyed by name.
#[derive(Clone, Debug, Default)]
pub struct MemorySpriteSource {
    sprites: BTreeMap<String, Arc<RgbaImage>>,
}

impl MemorySpriteSource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a sprite.
    pub fn insert(&mut self, name: impl Into<String>, sprite: RgbaImage) {
        self.sprites.insert(name.into(), Arc::new(sprite));
    }

    /// Builder-style [`MemorySpriteSource::insert`].
    pub fn with(mut self, name: impl Into<String>, sprite: RgbaImage) -> Self {
        self.insert(name, sprite);
        self
    }
}

impl SpriteSource for MemorySpriteSource {
    fn location(&self) -> PathBuf {
        PathBuf::from("<memory>")
    }

    fn list(&self) -> RainResult<Vec<String>> {
        Ok(self.sprites.keys().cloned().collect())
    }

    fn open(&self, name: &str) -> RainResult<RgbaImage> {
        self.sprites
            .get(name)
            .map(|s| s.as_ref().clone())
            .ok_or_else(|| RainError::validation(format!("unknown sprite '{name}'")))
    }
}

/// Picks one droplet sprite uniformly at random from a [`SpriteSource`].
#[derive(Clone, Debug)]
pub struct AssetSelector<S> {
    source: S,
}

impl<S: SpriteSource> AssetSelector<S> {
    /// Wrap a sprite source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Underlying sprite source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Choose a sprite name; fails with [`RainError::NoAssetsFound`] when there is none.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> RainResult<String> {
        let mut names = self.source.list()?;
        if names.is_empty() {
            return Err(RainError::no_assets(self.source.location()));
        }
        let idx = rng.gen_range(0..names.len());
        Ok(names.swap_remove(idx))
    }

    /// Choose a sprite and load it.
    pub fn select<R: Rng + ?Sized>(&self, rng: &mut R) -> RainResult<(String, RgbaImage)> {
        let name = self.choose(rng)?;
        let sprite = self.source.open(&name)?;
        tracing::debug!(
            sprite = %name,
            width = sprite.width(),
            height = sprite.height(),
            "selected droplet sprite"
        );
        Ok((name, sprite))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/selector.rs"]
mod tests;
