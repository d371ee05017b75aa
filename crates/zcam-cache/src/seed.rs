//! Hash seeding.

use std::sync::OnceLock;

static RUNTIME_SEED: OnceLock<u32> = OnceLock::new();

/// Additive seed mixed into every bucket hash.
///
/// Tables created with [`HashSeed::runtime`] share one seed per process,
/// drawn once from the thread RNG. Tests use [`HashSeed::fixed`] to get
/// reproducible bucket layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashSeed(u32);

impl HashSeed {
    /// The process-wide random seed.
    pub fn runtime() -> Self {
        Self(*RUNTIME_SEED.get_or_init(rand::random::<u32>))
    }

    /// A caller-chosen seed.
    pub const fn fixed(seed: u32) -> Self {
        Self(seed)
    }

    /// The raw seed value.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for HashSeed {
    fn default() -> Self {
        Self::runtime()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_seed_is_stable() {
        assert_eq!(HashSeed::runtime(), HashSeed::runtime());
        assert_eq!(HashSeed::default(), HashSeed::runtime());
    }

    #[test]
    fn test_fixed_seed() {
        assert_eq!(HashSeed::fixed(0x61c9_7bfd).get(), 0x61c9_7bfd);
    }
}
