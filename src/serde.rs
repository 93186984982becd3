#![cfg(feature = "serde")]

/// Serde support for the signature payload types, implemented in terms of
/// their `serialize`/`deserialize` byte forms. This keeps the wire format
/// stable and platform independent, and funnels every deserialization through
/// the same validations (subgroup membership, recovery-byte range etc.).
use serde::{
    de::{Error, SeqAccess, Visitor},
    ser::SerializeTuple,
    Deserialize, Deserializer, Serialize, Serializer,
};
use std::fmt;

use crate::signature::{PairingSignature, RecoverableSignature, StandardSignature};

macro_rules! serialization {
    ($({name: $name:ident, len: $len:expr, error: $error:expr}),+ $(,)?) => {
        $(
            impl Serialize for $name {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    let serialized = self.serialize();
                    let mut tup = serializer.serialize_tuple($len)?;
                    for byte in &serialized {
                        tup.serialize_element(byte)?;
                    }
                    tup.end()
                }
            }
            impl<'de> Deserialize<'de> for $name {
                fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    let visitor = ArrayVisitor::<$len> {
                        purpose: stringify!($name),
                    };
                    let array = deserializer.deserialize_tuple($len, visitor)?;
                    Self::deserialize(array).ok_or_else(|| D::Error::custom($error))
                }
            }
        )+
    }
}

serialization!(
    {name: PairingSignature, len: 96, error: "Invalid pairing signature"},
    {name: StandardSignature, len: 64, error: "Invalid standard signature"},
    {name: RecoverableSignature, len: 65, error: "Invalid recoverable signature"},
);

/// A visitor made to simply deserialize arrays,
/// needed because serde doesn't support arrays longer than 32 bytes.
struct ArrayVisitor<const N: usize> {
    purpose: &'static str,
}
impl<'de, const N: usize> Visitor<'de> for ArrayVisitor<N> {
    type Value = [u8; N];

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(
            formatter,
            "a valid {} byte array representing a {}",
            N, self.purpose
        )
    }

    #[inline(always)]
    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut bytes = [0u8; N];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = seq
                .next_element()?
                .ok_or_else(|| A::Error::invalid_length(i, &self))?;
        }
        Ok(bytes)
    }
}
