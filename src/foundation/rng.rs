use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Random source used by the pipeline when the caller does not bring its own.
pub type RainRng = ChaCha8Rng;

/// Deterministic random source: identical seeds replay identical droplet fields.
pub fn seeded_rng(seed: u64) -> RainRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Random source seeded from operating-system entropy.
pub fn entropy_rng() -> RainRng {
    ChaCha8Rng::from_entropy()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/rng.rs"]
mod tests;
