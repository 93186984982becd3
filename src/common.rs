use num_bigint::BigUint;

/// Computes `(a + b) mod n`.
///
/// Inputs larger than `n` are reduced; the result is always in `[0, n)`.
pub(crate) fn add_mod(a: &BigUint, b: &BigUint, n: &BigUint) -> BigUint {
    (a + b) % n
}

#[cfg(test)]
pub(crate) mod testutil {
    use num_bigint::BigUint;
    use rand::{thread_rng, Rng};
    use rand_xoshiro::rand_core::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    /// This will generate a fast deterministic rng and will print the seed,
    /// if a test fails, pass in the printed seed to reproduce.
    pub fn deterministic_fast_rand(name: &str, seed: Option<u64>) -> impl Rng {
        let seed = seed.unwrap_or_else(|| thread_rng().gen());
        println!("{} seed: {}", name, seed);
        Xoshiro256PlusPlus::seed_from_u64(seed)
    }

    /// A random secret scalar whose minimal big-endian encoding is exactly
    /// 32 bytes and which stays below the order of every supported scheme,
    /// so sums of two of them never wrap around.
    pub fn random_scalar(rng: &mut impl Rng) -> BigUint {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        bytes[0] = bytes[0] % 0x20 + 0x10;
        BigUint::from_bytes_be(&bytes)
    }
}
