use num_bigint::BigUint;
use rand::{thread_rng, Rng};
use sha2::{Digest, Sha256};
use tweak_sign::{BlsTweaker, CurveId, EcdsaTweaker, Signature, Tweaker};

const MESSAGE: &[u8] = b"Message To Be signed";
const DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_NUL_";

/// A uniformly random secret with a full 32-byte encoding, comfortably below
/// the order of every scheme used here.
fn random_secret() -> BigUint {
    let mut bytes = [0u8; 32];
    thread_rng().fill(&mut bytes);
    bytes[0] = bytes[0] % 0x20 + 0x10;
    BigUint::from_bytes_be(&bytes)
}

/// Split `real` into a (tweaked, tweak) pair, load only that pair into the
/// tweaker, and sign. The real key is never handed to the signing side.
fn tweak_and_sign(mut tweaker: Box<dyn Tweaker>, real: &BigUint, digest: &[u8]) -> Signature {
    let tweak = random_secret();

    // The tweaked key and the tweak can be stored or transmitted separately;
    // neither one alone reveals the real key.
    let tweaked = tweaker.tweak(real, &tweak);

    tweaker
        .initialize(&tweaked, &tweak)
        .expect("freshly tweaked keys are valid");
    tweaker.sign(digest).expect("initialized tweaker signs")
}

fn main() {
    let digest: [u8; 32] = Sha256::digest(MESSAGE).into();

    // BLS12-381 takes the raw message and hashes it to the curve internally.
    let real = random_secret();
    let sig = tweak_and_sign(Box::new(BlsTweaker::new(DST.to_vec())), &real, MESSAGE);
    let Signature::Pairing(sig) = sig else {
        unreachable!()
    };
    let real_pk = blst::min_pk::SecretKey::from_bytes(&real.to_bytes_be())
        .unwrap()
        .sk_to_pk();
    let err = sig.as_inner().verify(true, MESSAGE, DST, &[], &real_pk, true);
    assert_eq!(err, blst::BLST_ERROR::BLST_SUCCESS);
    println!("bls signature:       {}", hex::encode(sig.serialize()));

    // secp256k1 signs a 32-byte digest and yields the Ethereum 65-byte layout.
    let real = random_secret();
    let sig = tweak_and_sign(
        Box::new(EcdsaTweaker::new(CurveId::Secp256k1)),
        &real,
        &digest,
    );
    let Signature::Recoverable(sig) = sig else {
        unreachable!()
    };
    let real_key =
        k256::ecdsa::SigningKey::from_bytes(k256::FieldBytes::from_slice(&real.to_bytes_be()))
            .unwrap();
    let parsed = k256::ecdsa::Signature::from_slice(sig.rs_bytes()).unwrap();
    let recovery_id = k256::ecdsa::RecoveryId::from_byte(sig.recovery_id()).unwrap();
    let recovered =
        k256::ecdsa::VerifyingKey::recover_from_prehash(&digest, &parsed, recovery_id).unwrap();
    assert_eq!(&recovered, real_key.verifying_key());
    println!("secp256k1 signature: {}", hex::encode(sig.serialize()));

    // P-256 yields a standard (r, s) pair.
    let real = random_secret();
    let sig = tweak_and_sign(
        Box::new(EcdsaTweaker::new(CurveId::NistP256)),
        &real,
        &digest,
    );
    let Signature::Standard(sig) = sig else {
        unreachable!()
    };
    let real_key =
        p256::ecdsa::SigningKey::from_bytes(p256::FieldBytes::from_slice(&real.to_bytes_be()))
            .unwrap();
    let parsed = p256::ecdsa::Signature::from_slice(&sig.serialize()).unwrap();
    use p256::ecdsa::signature::hazmat::PrehashVerifier;
    real_key
        .verifying_key()
        .verify_prehash(&digest, &parsed)
        .unwrap();
    println!("p256 signature:      r={:x} s={:x}", sig.r(), sig.s());
}

#[test]
fn test_main() {
    main()
}
