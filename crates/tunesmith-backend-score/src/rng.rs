//! Deterministic RNG using PCG32 with BLAKE3 seed derivation.
//!
//! All randomness in the score backend flows through this module. The two
//! random decisions the engine makes (progression selection and chord
//! coloring) draw from generators built here, so a composition is fully
//! reproducible from its request plus one `u32` seed.

use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Creates a PCG32 RNG from a 32-bit seed.
///
/// The 32-bit seed is expanded to 64 bits by duplicating the value in both
/// halves, as required by PCG32's state initialization.
pub fn create_rng(seed: u32) -> Pcg32 {
    let seed64 = (seed as u64) | ((seed as u64) << 32);
    Pcg32::seed_from_u64(seed64)
}

/// Derives a seed for a named engine component from the base seed.
///
/// Uses BLAKE3 to hash the base seed concatenated with the component key,
/// producing an independent random stream per component (e.g. "harmony")
/// that stays stable when other components change their draw counts.
pub fn derive_component_seed(base_seed: u32, key: &str) -> u32 {
    let mut input = Vec::with_capacity(4 + key.len());
    input.extend_from_slice(&base_seed.to_le_bytes());
    input.extend_from_slice(key.as_bytes());

    let hash = blake3::hash(&input);
    let bytes: [u8; 4] = hash.as_bytes()[0..4].try_into().unwrap();
    u32::from_le_bytes(bytes)
}

/// Creates an RNG for a named engine component.
pub fn component_rng(base_seed: u32, key: &str) -> Pcg32 {
    create_rng(derive_component_seed(base_seed, key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_rng_determinism() {
        let mut rng1 = create_rng(42);
        let mut rng2 = create_rng(42);

        let values1: Vec<f64> = (0..100).map(|_| rng1.gen()).collect();
        let values2: Vec<f64> = (0..100).map(|_| rng2.gen()).collect();

        assert_eq!(values1, values2);
    }

    #[test]
    fn test_different_seeds_produce_different_sequences() {
        let mut rng1 = create_rng(42);
        let mut rng2 = create_rng(43);

        let values1: Vec<f64> = (0..10).map(|_| rng1.gen()).collect();
        let values2: Vec<f64> = (0..10).map(|_| rng2.gen()).collect();

        assert_ne!(values1, values2);
    }

    #[test]
    fn test_component_seeds_are_independent() {
        let base = 42u32;
        assert_eq!(
            derive_component_seed(base, "harmony"),
            derive_component_seed(base, "harmony")
        );
        assert_ne!(
            derive_component_seed(base, "harmony"),
            derive_component_seed(base, "bass")
        );
        assert_ne!(
            derive_component_seed(base, "harmony"),
            derive_component_seed(base + 1, "harmony")
        );
    }
}
