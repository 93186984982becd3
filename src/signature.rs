//!    Module handling the signature objects produced by the tweaker schemes

use blst::min_pk::Signature as BlsSignature;
use core::fmt;
use num_bigint::BigUint;

/// Byte offset of the recovery id within a recoverable signature.
pub const RECOVERY_ID_OFFSET: usize = 64;

/// A signature tagged with the scheme that produced it.
///
/// The variant is fixed per tweaker instance, so consumers can match
/// exhaustively and treat anything else as unreachable for their scheme.
#[derive(Debug, Clone, PartialEq)]
pub enum Signature {
    /// BLS12-381 signature (min-pk convention, signature in G2).
    Pairing(PairingSignature),
    /// Standard ECDSA `(r, s)` signature.
    Standard(StandardSignature),
    /// Compact ECDSA signature with a trailing recovery byte, Ethereum layout.
    Recoverable(RecoverableSignature),
}

/// A BLS12-381 signature, stored as a G2 group element.
#[derive(Clone)]
pub struct PairingSignature(pub(crate) BlsSignature);

impl PairingSignature {
    /// Borrow the underlying blst signature, e.g. to hand it to a verifier.
    pub fn as_inner(&self) -> &BlsSignature {
        &self.0
    }

    /// Serialize to the 96-byte compressed G2 encoding.
    pub fn serialize(&self) -> [u8; 96] {
        self.0.compress()
    }

    /// Deserialize from the compressed encoding.
    /// Returns `None` unless the bytes decode to a point in the right subgroup.
    pub fn deserialize(bytes: [u8; 96]) -> Option<Self> {
        let sig = BlsSignature::uncompress(&bytes).ok()?;
        sig.validate(true).ok()?;
        Some(Self(sig))
    }
}

impl fmt::Debug for PairingSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PairingSignature")
            .field(&self.serialize())
            .finish()
    }
}

impl PartialEq for PairingSignature {
    fn eq(&self, other: &Self) -> bool {
        self.serialize() == other.serialize()
    }
}

impl Eq for PairingSignature {}

/// A standard ECDSA signature as the `(r, s)` scalar pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardSignature {
    pub(crate) r: BigUint,
    pub(crate) s: BigUint,
}

impl StandardSignature {
    /// The `r` component.
    pub fn r(&self) -> &BigUint {
        &self.r
    }

    /// The `s` component.
    pub fn s(&self) -> &BigUint {
        &self.s
    }

    /// Serialize as `r || s`, each zero-padded to 32 big-endian bytes.
    pub fn serialize(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        let r = self.r.to_bytes_be();
        let s = self.s.to_bytes_be();
        out[32 - r.len()..32].copy_from_slice(&r);
        out[64 - s.len()..].copy_from_slice(&s);
        out
    }

    /// Deserialize from `r || s`. Returns `None` if either component is zero.
    pub fn deserialize(bytes: [u8; 64]) -> Option<Self> {
        let r = BigUint::from_bytes_be(&bytes[..32]);
        let s = BigUint::from_bytes_be(&bytes[32..]);
        if r == BigUint::default() || s == BigUint::default() {
            return None;
        }
        Some(Self { r, s })
    }
}

/// A compact ECDSA signature in the Ethereum layout: 64 bytes of `r || s`
/// followed by one recovery byte in `{0, 1}` at [`RECOVERY_ID_OFFSET`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoverableSignature(pub(crate) [u8; 65]);

impl RecoverableSignature {
    /// The full 65-byte signature.
    pub fn to_bytes(self) -> [u8; 65] {
        self.0
    }

    /// The recovery byte.
    pub fn recovery_id(&self) -> u8 {
        self.0[RECOVERY_ID_OFFSET]
    }

    /// The 64 `r || s` bytes without the recovery byte.
    pub fn rs_bytes(&self) -> &[u8] {
        &self.0[..RECOVERY_ID_OFFSET]
    }

    /// Serialize the signature.
    pub fn serialize(&self) -> [u8; 65] {
        self.0
    }

    /// Deserialize the signature.
    /// Returns `None` if the recovery byte is outside `{0, 1}`.
    pub fn deserialize(bytes: [u8; 65]) -> Option<Self> {
        if bytes[RECOVERY_ID_OFFSET] > 1 {
            return None;
        }
        Some(Self(bytes))
    }
}
