//!    Module defining the scheme-agnostic tweaker contract

use crate::signature::Signature;
use crate::Error;
use num_bigint::BigUint;

/// The capability set shared by every tweaking scheme.
///
/// The canonical flow is `tweak` (pure, typically run once, wherever the real
/// key lives), then `initialize` with the tweaked key and the tweak, then any
/// number of `sign` calls. The real secret key never leaves the stack frame of
/// a single `sign` call.
pub trait Tweaker {
    /// Computes `real + tweak` modulo the scheme's group order.
    ///
    /// Pure; does not touch instance state and performs no validation beyond
    /// what the modular addition requires.
    fn tweak(&self, real: &BigUint, tweak: &BigUint) -> BigUint;

    /// Validates both values against the scheme's secret-key constraints
    /// (exact byte length, `0 < d < N`) and stores them as the signing state.
    ///
    /// Re-initializing overwrites the previous state. On failure the previous
    /// state is left untouched.
    fn initialize(&mut self, tweaked: &BigUint, tweak: &BigUint) -> Result<(), Error>;

    /// Reconstructs the real secret key, signs `digest` with it and wipes the
    /// reconstruction before returning.
    ///
    /// Fails with [`Error::NotInitialized`] until `initialize` has succeeded.
    fn sign(&self, digest: &[u8]) -> Result<Signature, Error>;
}
