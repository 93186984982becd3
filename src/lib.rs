/*
    Additive private-key tweaking for digital signatures.
    A real secret key is split into a publicly storable tweaked key and a tweak such that
    tweaked = real + tweak (mod N) over the scheme's scalar field.
    A tweaker holds only the tweaked key and the tweak; inside sign() it transiently
    reconstructs real = tweaked - tweak (mod N), signs with it, and wipes every copy of the
    reconstructed secret before returning.
    Supported schemes: BLS12-381 (min-pk, blst), ECDSA over secp256k1 with the Ethereum
    recoverable encoding, and ECDSA over NIST P-256 with the standard (r, s) encoding.
*/

mod bls;
mod common;
mod ecdsa;
mod serde;
mod signature;
mod tweaker;

pub use crate::bls::BlsTweaker;
pub use crate::ecdsa::{CurveId, EcdsaTweaker};
pub use crate::signature::{
    PairingSignature, RecoverableSignature, Signature, StandardSignature, RECOVERY_ID_OFFSET,
};
pub use crate::tweaker::Tweaker;

use core::fmt;

/// An error in one of the tweaker operations.
#[derive(Debug)]
pub enum Error {
    /// The secret value has the wrong byte length for the scheme, is zero,
    /// or is not below the group order.
    InvalidKeyEncoding,
    /// `sign` was called before a successful `initialize`.
    NotInitialized,
    /// The message digest does not have the length the signature encoding requires.
    InvalidDigestLength,
    /// The BLS signing primitive rejected the reconstructed secret.
    PairingSigning(blst::BLST_ERROR),
    /// The ECDSA signing primitive rejected its inputs.
    EcdsaSigning(k256::ecdsa::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidKeyEncoding => f.write_str("invalid secret key encoding for the scheme"),
            Error::NotInitialized => f.write_str("initialize must be called before sign"),
            Error::InvalidDigestLength => f.write_str("digest is required to be exactly 32 bytes"),
            Error::PairingSigning(e) => write!(f, "bls signing primitive failed: {e:?}"),
            Error::EcdsaSigning(e) => write!(f, "ecdsa signing primitive failed: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::EcdsaSigning(e) => Some(e),
            _ => None,
        }
    }
}
