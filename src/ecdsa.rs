//!    Module implementing the tweaker over the supported ECDSA curves

use crate::common::add_mod;
use crate::signature::{RecoverableSignature, Signature, StandardSignature, RECOVERY_ID_OFFSET};
use crate::tweaker::Tweaker;
use crate::Error;
use k256::elliptic_curve::bigint::ArrayEncoding;
use k256::elliptic_curve::generic_array::typenum::Unsigned;
use k256::elliptic_curve::{Curve, FieldBytes, SecretKey};
use k256::Secp256k1;
use num_bigint::BigUint;
use p256::ecdsa::signature::hazmat::RandomizedPrehashSigner;
use p256::NistP256;
use rand::rngs::OsRng;
use zeroize::{Zeroize, Zeroizing};

/// The curves an [`EcdsaTweaker`] can be built for.
///
/// The curve also selects the signature encoding: secp256k1 signs with the
/// Ethereum recoverable encoding, P-256 with the standard `(r, s)` encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveId {
    /// secp256k1, deterministic signing, recoverable output.
    Secp256k1,
    /// NIST P-256, randomized signing, standard output.
    NistP256,
}

/// A tweaker for ECDSA signatures over one of the supported curves.
pub struct EcdsaTweaker {
    curve: CurveId,
    state: Option<State>,
}

enum State {
    Secp256k1 {
        tweaked: SecretKey<Secp256k1>,
        tweak: SecretKey<Secp256k1>,
    },
    NistP256 {
        tweaked: SecretKey<NistP256>,
        tweak: SecretKey<NistP256>,
    },
}

impl EcdsaTweaker {
    /// Create a tweaker for the given curve.
    pub fn new(curve: CurveId) -> Self {
        Self { curve, state: None }
    }

    fn order(&self) -> BigUint {
        match self.curve {
            CurveId::Secp256k1 => {
                BigUint::from_bytes_be(Secp256k1::ORDER.to_be_byte_array().as_slice())
            }
            CurveId::NistP256 => {
                BigUint::from_bytes_be(NistP256::ORDER.to_be_byte_array().as_slice())
            }
        }
    }
}

/// Converts a big-endian integer into a validated secret key for the curve.
///
/// The minimal encoding must be exactly the curve's field width and the value
/// in `(0, n)`; the corresponding public point is then guaranteed to exist and
/// not be the identity.
fn to_secret_key<C: Curve>(d: &BigUint) -> Result<SecretKey<C>, Error> {
    let be = Zeroizing::new(d.to_bytes_be());
    if be.len() != C::FieldBytesSize::USIZE {
        return Err(Error::InvalidKeyEncoding);
    }
    SecretKey::from_bytes(FieldBytes::<C>::from_slice(&be)).map_err(|_| Error::InvalidKeyEncoding)
}

impl Tweaker for EcdsaTweaker {
    fn tweak(&self, real: &BigUint, tweak: &BigUint) -> BigUint {
        add_mod(real, tweak, &self.order())
    }

    fn initialize(&mut self, tweaked: &BigUint, tweak: &BigUint) -> Result<(), Error> {
        self.state = Some(match self.curve {
            CurveId::Secp256k1 => State::Secp256k1 {
                tweaked: to_secret_key::<Secp256k1>(tweaked)?,
                tweak: to_secret_key::<Secp256k1>(tweak)?,
            },
            CurveId::NistP256 => State::NistP256 {
                tweaked: to_secret_key::<NistP256>(tweaked)?,
                tweak: to_secret_key::<NistP256>(tweak)?,
            },
        });
        Ok(())
    }

    fn sign(&self, digest: &[u8]) -> Result<Signature, Error> {
        match self.state.as_ref().ok_or(Error::NotInitialized)? {
            State::Secp256k1 { tweaked, tweak } => sign_recoverable(tweaked, tweak, digest),
            State::NistP256 { tweaked, tweak } => sign_standard(tweaked, tweak, digest),
        }
    }
}

/// Ethereum-style signing: the digest must be exactly 32 bytes, the nonce is
/// deterministic (RFC 6979) and the output is 65 bytes with the recovery id
/// moved to the end.
fn sign_recoverable(
    tweaked: &SecretKey<Secp256k1>,
    tweak: &SecretKey<Secp256k1>,
    digest: &[u8],
) -> Result<Signature, Error> {
    if digest.len() != 32 {
        return Err(Error::InvalidDigestLength);
    }

    let mut real = *tweaked.to_nonzero_scalar() - *tweak.to_nonzero_scalar();
    let mut real_be: [u8; 32] = real.to_bytes().into();
    real.zeroize();
    let signed = k256::ecdsa::SigningKey::from_bytes(k256::FieldBytes::from_slice(&real_be))
        .and_then(|key| key.sign_prehash_recoverable(digest));
    real_be.zeroize();
    let (sig, recovery_id) = signed.map_err(Error::EcdsaSigning)?;

    let mut out = [0u8; 65];
    out[..RECOVERY_ID_OFFSET].copy_from_slice(sig.to_bytes().as_slice());
    out[RECOVERY_ID_OFFSET] = recovery_id.to_byte();
    Ok(Signature::Recoverable(RecoverableSignature(out)))
}

/// Standard signing: randomized nonce from the OS entropy source, `(r, s)`
/// output normalized to low-s. The digest length is whatever the underlying
/// signer accepts.
fn sign_standard(
    tweaked: &SecretKey<NistP256>,
    tweak: &SecretKey<NistP256>,
    digest: &[u8],
) -> Result<Signature, Error> {
    let mut real = *tweaked.to_nonzero_scalar() - *tweak.to_nonzero_scalar();
    let mut real_be: [u8; 32] = real.to_bytes().into();
    real.zeroize();
    let signed = p256::ecdsa::SigningKey::from_bytes(p256::FieldBytes::from_slice(&real_be))
        .and_then(|key| key.sign_prehash_with_rng(&mut OsRng, digest));
    real_be.zeroize();
    let sig: p256::ecdsa::Signature = signed.map_err(Error::EcdsaSigning)?;
    let sig = sig.normalize_s().unwrap_or(sig);

    let (r, s) = sig.split_scalars();
    Ok(Signature::Standard(StandardSignature {
        r: BigUint::from_bytes_be(r.to_bytes().as_slice()),
        s: BigUint::from_bytes_be(s.to_bytes().as_slice()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::testutil::{deterministic_fast_rand, random_scalar};
    use k256::ecdsa::{RecoveryId, VerifyingKey};
    use p256::ecdsa::signature::hazmat::PrehashVerifier;
    use rand::Rng;

    // The digest the reference flow signs.
    const DIGEST_HEX: &str = "c301ba9de5d6053caad9f5eb46523f007702add2c62fa39de03146a36b8026b7";

    fn digest32() -> [u8; 32] {
        hex::decode(DIGEST_HEX).unwrap().try_into().unwrap()
    }

    fn tweaked_tweaker(curve: CurveId, rng: &mut impl Rng) -> (EcdsaTweaker, BigUint) {
        let real = random_scalar(rng);
        let tweak = random_scalar(rng);
        let mut tweaker = EcdsaTweaker::new(curve);
        let tweaked = tweaker.tweak(&real, &tweak);
        tweaker.initialize(&tweaked, &tweak).unwrap();
        (tweaker, real)
    }

    #[test]
    fn test_secp256k1_signature_recovers_the_real_key() {
        let mut rng = deterministic_fast_rand("test_secp256k1_signature_recovers_the_real_key", None);
        for _ in 0..8 {
            let (tweaker, real) = tweaked_tweaker(CurveId::Secp256k1, &mut rng);
            let Signature::Recoverable(sig) = tweaker.sign(&digest32()).unwrap() else {
                panic!("secp256k1 tweaker produced a non-recoverable signature");
            };

            assert_eq!(sig.to_bytes().len(), 65);
            assert!(sig.recovery_id() <= 1);

            let real_key = k256::ecdsa::SigningKey::from_bytes(k256::FieldBytes::from_slice(
                &real.to_bytes_be(),
            ))
            .unwrap();
            let parsed = k256::ecdsa::Signature::from_slice(sig.rs_bytes()).unwrap();
            let recovery_id = RecoveryId::from_byte(sig.recovery_id()).unwrap();
            let recovered =
                VerifyingKey::recover_from_prehash(&digest32(), &parsed, recovery_id).unwrap();
            assert_eq!(&recovered, real_key.verifying_key());
        }
    }

    #[test]
    fn test_secp256k1_matches_direct_signing() {
        // RFC 6979 makes both paths deterministic, so the tweaked signature
        // must be byte-identical to signing with the real key directly.
        let mut rng = deterministic_fast_rand("test_secp256k1_matches_direct_signing", None);
        let (tweaker, real) = tweaked_tweaker(CurveId::Secp256k1, &mut rng);
        let Signature::Recoverable(sig) = tweaker.sign(&digest32()).unwrap() else {
            panic!("secp256k1 tweaker produced a non-recoverable signature");
        };

        let real_key = k256::ecdsa::SigningKey::from_bytes(k256::FieldBytes::from_slice(
            &real.to_bytes_be(),
        ))
        .unwrap();
        let (direct, direct_id) = real_key.sign_prehash_recoverable(&digest32()).unwrap();
        assert_eq!(sig.rs_bytes(), direct.to_bytes().as_slice());
        assert_eq!(sig.recovery_id(), direct_id.to_byte());
    }

    #[test]
    fn test_secp256k1_requires_a_32_byte_digest() {
        let mut rng = deterministic_fast_rand("test_secp256k1_requires_a_32_byte_digest", None);
        let (tweaker, _) = tweaked_tweaker(CurveId::Secp256k1, &mut rng);
        for len in [31usize, 33] {
            assert!(matches!(
                tweaker.sign(&vec![7u8; len]),
                Err(Error::InvalidDigestLength)
            ));
        }
    }

    #[test]
    fn test_p256_signature_verifies_under_the_real_key() {
        let mut rng = deterministic_fast_rand("test_p256_signature_verifies_under_the_real_key", None);
        for _ in 0..8 {
            let (tweaker, real) = tweaked_tweaker(CurveId::NistP256, &mut rng);
            let Signature::Standard(sig) = tweaker.sign(&digest32()).unwrap() else {
                panic!("p256 tweaker produced a non-standard signature");
            };

            let real_key = p256::ecdsa::SigningKey::from_bytes(p256::FieldBytes::from_slice(
                &real.to_bytes_be(),
            ))
            .unwrap();
            let parsed = p256::ecdsa::Signature::from_slice(&sig.serialize()).unwrap();
            real_key
                .verifying_key()
                .verify_prehash(&digest32(), &parsed)
                .unwrap();

            // low-s is enforced on the standard encoding
            assert!(sig.s() <= &(tweaker.order() >> 1));
        }
    }

    #[test]
    fn test_p256_signing_is_randomized() {
        let mut rng = deterministic_fast_rand("test_p256_signing_is_randomized", None);
        let (tweaker, _) = tweaked_tweaker(CurveId::NistP256, &mut rng);
        let first = tweaker.sign(&digest32()).unwrap();
        let second = tweaker.sign(&digest32()).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_p256_accepts_other_digest_lengths() {
        let mut rng = deterministic_fast_rand("test_p256_accepts_other_digest_lengths", None);
        let (tweaker, _) = tweaked_tweaker(CurveId::NistP256, &mut rng);
        assert!(tweaker.sign(&[7u8; 20]).is_ok());
        assert!(tweaker.sign(&[7u8; 48]).is_ok());
    }

    #[test]
    fn test_sign_before_initialize_fails() {
        for curve in [CurveId::Secp256k1, CurveId::NistP256] {
            let tweaker = EcdsaTweaker::new(curve);
            assert!(matches!(
                tweaker.sign(&digest32()),
                Err(Error::NotInitialized)
            ));
        }
    }

    #[test]
    fn test_initialize_rejects_out_of_range_scalars() {
        let mut rng = deterministic_fast_rand("test_initialize_rejects_out_of_range_scalars", None);
        let valid = random_scalar(&mut rng);

        for curve in [CurveId::Secp256k1, CurveId::NistP256] {
            let zero = BigUint::default();
            let order = EcdsaTweaker::new(curve).order();
            let short = BigUint::from(1u32) << 240; // 31-byte encoding
            let long = BigUint::from(1u32) << 256; // 33-byte encoding

            for bad in [&zero, &order, &short, &long] {
                let mut tweaker = EcdsaTweaker::new(curve);
                assert!(matches!(
                    tweaker.initialize(bad, &valid),
                    Err(Error::InvalidKeyEncoding)
                ));
                assert!(matches!(
                    tweaker.initialize(&valid, bad),
                    Err(Error::InvalidKeyEncoding)
                ));
                assert!(matches!(
                    tweaker.sign(&digest32()),
                    Err(Error::NotInitialized)
                ));
            }
        }
    }

    #[test]
    fn test_initialize_is_idempotent_and_overwrites() {
        let mut rng = deterministic_fast_rand("test_initialize_is_idempotent_and_overwrites", None);
        let real = random_scalar(&mut rng);
        let tweak = random_scalar(&mut rng);

        let mut tweaker = EcdsaTweaker::new(CurveId::Secp256k1);
        let tweaked = tweaker.tweak(&real, &tweak);
        tweaker.initialize(&tweaked, &tweak).unwrap();
        let first = tweaker.sign(&digest32()).unwrap();
        tweaker.initialize(&tweaked, &tweak).unwrap();
        let second = tweaker.sign(&digest32()).unwrap();
        assert_eq!(first, second);

        // a fresh pair replaces the old state entirely
        let real2 = random_scalar(&mut rng);
        let tweak2 = random_scalar(&mut rng);
        let tweaked2 = tweaker.tweak(&real2, &tweak2);
        tweaker.initialize(&tweaked2, &tweak2).unwrap();
        let Signature::Recoverable(sig) = tweaker.sign(&digest32()).unwrap() else {
            panic!("secp256k1 tweaker produced a non-recoverable signature");
        };
        let real2_key = k256::ecdsa::SigningKey::from_bytes(k256::FieldBytes::from_slice(
            &real2.to_bytes_be(),
        ))
        .unwrap();
        let parsed = k256::ecdsa::Signature::from_slice(sig.rs_bytes()).unwrap();
        let recovery_id = RecoveryId::from_byte(sig.recovery_id()).unwrap();
        let recovered =
            VerifyingKey::recover_from_prehash(&digest32(), &parsed, recovery_id).unwrap();
        assert_eq!(&recovered, real2_key.verifying_key());
    }

    #[test]
    fn test_tweak_round_trips_through_complement() {
        let mut rng = deterministic_fast_rand("test_tweak_round_trips_through_complement", None);
        for curve in [CurveId::Secp256k1, CurveId::NistP256] {
            let tweaker = EcdsaTweaker::new(curve);
            let order = tweaker.order();
            for _ in 0..32 {
                let real = random_scalar(&mut rng);
                let tweak = random_scalar(&mut rng);
                let tweaked = tweaker.tweak(&real, &tweak);
                assert_eq!(add_mod(&tweaked, &(&order - &tweak), &order), real);
            }
        }
    }
}
