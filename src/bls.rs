//!    Module implementing the tweaker over BLS12-381 (min-pk, signatures in G2)

use crate::common::add_mod;
use crate::signature::{PairingSignature, Signature};
use crate::tweaker::Tweaker;
use crate::Error;
use blst::min_pk::SecretKey;
use blst::{
    blst_bendian_from_scalar, blst_scalar, blst_scalar_from_bendian, blst_sk_sub_n_check,
    BLST_ERROR,
};
use num_bigint::BigUint;
use zeroize::{Zeroize, Zeroizing};

/// Order of the BLS12-381 scalar field, big-endian.
const ORDER_BE: [u8; 32] = [
    0x73, 0xed, 0xa7, 0x53, 0x29, 0x9d, 0x7d, 0x48, 0x33, 0x39, 0xd8, 0x08, 0x09, 0xa1, 0xd8,
    0x05, 0x53, 0xbd, 0xe4, 0x02, 0xff, 0xfe, 0x5b, 0xfe, 0xff, 0xff, 0xff, 0xff, 0x00, 0x00,
    0x00, 0x01,
];

const SECRET_KEY_LEN: usize = 32;

/// A tweaker for BLS12-381 signatures.
///
/// The domain-separation tag is fixed at construction and forwarded to the
/// hash-to-curve step of every `sign` call; it plays no role in the tweak
/// arithmetic itself.
pub struct BlsTweaker {
    dst: Vec<u8>,
    state: Option<State>,
}

struct State {
    tweaked: SecretKey,
    tweak: SecretKey,
}

impl BlsTweaker {
    /// Create a tweaker signing under the given domain-separation tag.
    pub fn new(dst: Vec<u8>) -> Self {
        Self { dst, state: None }
    }

    fn scalar_field_order() -> BigUint {
        BigUint::from_bytes_be(&ORDER_BE)
    }
}

/// Converts a big-endian integer into a blst secret key.
/// The minimal encoding must be exactly 32 bytes and the value in `(0, r)`.
fn to_secret_key(d: &BigUint) -> Result<SecretKey, Error> {
    let be = Zeroizing::new(d.to_bytes_be());
    if be.len() != SECRET_KEY_LEN {
        return Err(Error::InvalidKeyEncoding);
    }
    SecretKey::from_bytes(&be).map_err(|_| Error::InvalidKeyEncoding)
}

impl Tweaker for BlsTweaker {
    fn tweak(&self, real: &BigUint, tweak: &BigUint) -> BigUint {
        add_mod(real, tweak, &Self::scalar_field_order())
    }

    fn initialize(&mut self, tweaked: &BigUint, tweak: &BigUint) -> Result<(), Error> {
        let tweaked = to_secret_key(tweaked)?;
        let tweak = to_secret_key(tweak)?;
        self.state = Some(State { tweaked, tweak });
        Ok(())
    }

    fn sign(&self, digest: &[u8]) -> Result<Signature, Error> {
        let state = self.state.as_ref().ok_or(Error::NotInitialized)?;

        // real = tweaked - tweak (mod r), entirely in stack buffers so every
        // intermediate can be wiped.
        let mut tweaked_be = state.tweaked.serialize();
        let mut tweak_be = state.tweak.serialize();
        let mut tweaked_scalar = blst_scalar::default();
        let mut tweak_scalar = blst_scalar::default();
        let mut real_scalar = blst_scalar::default();
        let mut real_be = [0u8; SECRET_KEY_LEN];
        let in_range = unsafe {
            blst_scalar_from_bendian(&mut tweaked_scalar, tweaked_be.as_ptr());
            blst_scalar_from_bendian(&mut tweak_scalar, tweak_be.as_ptr());
            let ok = blst_sk_sub_n_check(&mut real_scalar, &tweaked_scalar, &tweak_scalar);
            blst_bendian_from_scalar(real_be.as_mut_ptr(), &real_scalar);
            ok
        };
        tweaked_be.zeroize();
        tweak_be.zeroize();
        tweaked_scalar.b.zeroize();
        tweak_scalar.b.zeroize();
        real_scalar.b.zeroize();

        // The key object wipes itself on drop.
        let real = SecretKey::from_bytes(&real_be);
        real_be.zeroize();
        if !in_range {
            return Err(Error::PairingSigning(BLST_ERROR::BLST_BAD_SCALAR));
        }
        let real = real.map_err(Error::PairingSigning)?;

        let sig = real.sign(digest, &self.dst, &[]);
        Ok(Signature::Pairing(PairingSignature(sig)))
    }
}
