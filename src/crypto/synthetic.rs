//! Synthetic Secret Keys (BLS12-381, hidden puzzle scheme)
//!
//! A Chia coin locked by the standard transaction puzzle is spent with a
//! signature from the *synthetic* key, i.e. the raw secret exponent shifted by
//! an offset committed to the public key and the hidden puzzle hash:
//!
//! ```text
//! offset    = signed(SHA-256(pk || hidden_puzzle_hash)) mod r
//! synthetic = (sk + offset) mod r
//! ```
//!
//! `signed` reads the 32-byte digest as a sign-complement integer.

use blst::min_pk::SecretKey;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::curves::CurveError;

/// Hash of the default hidden puzzle `(=)`
pub const DEFAULT_HIDDEN_PUZZLE_HASH: [u8; 32] = [
    0x71, 0x1d, 0x6c, 0x4e, 0x32, 0xc9, 0x2e, 0x53, 0x17, 0x9b, 0x19, 0x94, 0x84, 0xcf, 0x8c, 0x89,
    0x75, 0x42, 0xbc, 0x57, 0xf2, 0xb2, 0x25, 0x82, 0x79, 0x9f, 0x9d, 0x65, 0x7e, 0xec, 0x46, 0x99,
];

/// BLS12-381 scalar field order r, big-endian
pub const GROUP_ORDER: [u8; 32] = [
    0x73, 0xed, 0xa7, 0x53, 0x29, 0x9d, 0x7d, 0x48, 0x33, 0x39, 0xd8, 0x08, 0x09, 0xa1, 0xd8, 0x05,
    0x53, 0xbd, 0xa4, 0x02, 0xff, 0xfe, 0x5b, 0xfe, 0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x01,
];

fn group_order() -> BigUint {
    BigUint::from_bytes_be(&GROUP_ORDER)
}

/// Left-pad a scalar already reduced mod r to 32 bytes
fn to_scalar_bytes(value: &BigUint) -> [u8; 32] {
    let bytes = value.to_bytes_be();
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    out
}

/// Reduce a raw secret exponent of 1..=32 bytes mod r
fn reduce_secret_exponent(private_key: &[u8]) -> Result<BigUint, CurveError> {
    if private_key.is_empty() || private_key.len() > 32 {
        return Err(CurveError::InvalidPrivateKey(format!(
            "Secret exponent must be 1 to 32 bytes, got {}",
            private_key.len()
        )));
    }

    let exponent = BigUint::from_bytes_be(private_key) % group_order();
    if exponent.is_zero() {
        return Err(CurveError::SigningFailed(
            "Secret exponent is zero modulo the group order".into(),
        ));
    }
    Ok(exponent)
}

fn public_key_bytes(exponent: &BigUint) -> Result<[u8; 48], CurveError> {
    let scalar = Zeroizing::new(to_scalar_bytes(exponent));
    let sk = SecretKey::from_bytes(scalar.as_slice())
        .map_err(|e| CurveError::InvalidPrivateKey(format!("Invalid BLS scalar: {:?}", e)))?;
    Ok(sk.sk_to_pk().compress())
}

/// Decode a sign-complement integer.
///
/// With the top bit clear the bytes are a plain big-endian integer. With it
/// set: clear it, subtract one, complement the minimal big-endian magnitude
/// of the result, clear the top bit again and negate. Only the significant
/// bytes are complemented, so a magnitude with leading zero bytes decodes
/// differently from plain two's complement.
fn complement_bytes_to_bigint(data: &[u8; 32]) -> BigInt {
    if data[0] & 0x80 == 0 {
        return BigInt::from_bytes_be(Sign::Plus, data);
    }

    let mut cleared = *data;
    cleared[0] &= 0x7f;

    // 0x80 00..00 steps below zero; only the magnitude of -1 is kept
    let value = BigUint::from_bytes_be(&cleared);
    let less_one = if value.is_zero() { BigUint::one() } else { value - 1u32 };
    if less_one.is_zero() {
        return BigInt::zero();
    }

    let mut bytes = less_one.to_bytes_be();
    for byte in bytes.iter_mut() {
        *byte = !*byte;
    }
    bytes[0] &= 0x7f;

    -BigInt::from_bytes_be(Sign::Plus, &bytes)
}

/// The offset `signed(SHA-256(pk || hidden_puzzle_hash)) mod r`
pub fn synthetic_offset(public_key: &[u8], hidden_puzzle_hash: &[u8; 32]) -> BigUint {
    let digest: [u8; 32] = Sha256::new()
        .chain_update(public_key)
        .chain_update(hidden_puzzle_hash)
        .finalize()
        .into();

    let order = BigInt::from(group_order());
    let offset = complement_bytes_to_bigint(&digest) % &order;
    let offset = if offset.sign() == Sign::Minus { offset + &order } else { offset };

    // non-negative and below r after the adjustment above
    offset.magnitude().clone()
}

/// Convert a raw BLS secret exponent into the synthetic secret key used to
/// sign, with the default hidden puzzle hash.
///
/// Accepts 1 to 32 big-endian bytes; exponents at or above r are reduced
/// first. The result is always exactly 32 bytes.
pub fn synthetic_secret_key(private_key: &[u8]) -> Result<[u8; 32], CurveError> {
    synthetic_secret_key_with_hidden_puzzle(private_key, &DEFAULT_HIDDEN_PUZZLE_HASH)
}

pub fn synthetic_secret_key_with_hidden_puzzle(
    private_key: &[u8],
    hidden_puzzle_hash: &[u8; 32],
) -> Result<[u8; 32], CurveError> {
    let exponent = reduce_secret_exponent(private_key)?;
    let public_key = public_key_bytes(&exponent)?;
    let offset = synthetic_offset(&public_key, hidden_puzzle_hash);

    let synthetic = (exponent + offset) % group_order();
    Ok(to_scalar_bytes(&synthetic))
}

/// Public key of the synthetic secret key (what a verifier checks against)
pub fn synthetic_public_key(private_key: &[u8]) -> Result<[u8; 48], CurveError> {
    let synthetic = Zeroizing::new(synthetic_secret_key(private_key)?);
    let exponent = BigUint::from_bytes_be(synthetic.as_slice());
    if exponent.is_zero() {
        return Err(CurveError::SigningFailed("Synthetic secret key is zero".into()));
    }
    public_key_bytes(&exponent)
}

// MARK: - Tests

#[cfg(test)]
mod tests {
    use super::*;

    fn one_then_zeros() -> [u8; 32] {
        let mut k = [0u8; 32];
        k[0] = 0x01;
        k
    }

    #[test]
    fn test_pinned_synthetic_key() {
        let key = synthetic_secret_key(&one_then_zeros()).unwrap();
        assert_eq!(
            hex::encode(key),
            "0717099392e9808d3411c4b0809c2991a52f5ad38a767ef7890e5c1a30360be5"
        );
    }

    #[test]
    fn test_pinned_public_key() {
        let pk = synthetic_public_key(&one_then_zeros()).unwrap();
        assert_eq!(
            hex::encode(pk),
            "94cb713c90bb4c730097e50ccadfbfef560fff03dbf6e8c8ab682a2b565537a470418a99273027b1479e2b6d0deaf423"
        );
    }

    #[test]
    fn test_short_exponents() {
        assert_eq!(
            hex::encode(synthetic_secret_key(&[0x01]).unwrap()),
            "2a4dcd94d9fcf0b3ad81d6a6f3d0d01c9d435ab6bc429f7b2d78e74e1330fd7c"
        );
        // offset digest has the top bit clear
        assert_eq!(
            hex::encode(synthetic_secret_key(&[0x03]).unwrap()),
            "6e8ae4d126a4cd41c34aa69159e447ae8cd5fa69a9160af344baf3cd62cfbec0"
        );
        assert_eq!(
            hex::encode(synthetic_secret_key(&[0x2a]).unwrap()),
            "6fc945d4b23c07d6bb38a8c52c4719361fc5ca3aeb82cb5d83695b833eca7514"
        );
    }

    #[test]
    fn test_short_magnitude_offset() {
        // offset digest 80 12 ae..: the complement spans 31 bytes, not 32
        assert_eq!(
            hex::encode(synthetic_secret_key(&[0x11]).unwrap()),
            "73805613c97d720b5b8cdb103225ec64bd984fdea92ba8356d6d0c90e55db595"
        );
        assert_eq!(
            hex::encode(synthetic_public_key(&[0x11]).unwrap()),
            "b5759fdca4647a182fe6adcf2d2f819e6c5df91ed4b6b952947531fad0aea83de596cf784bb78f51cd713def9b1a2660"
        );
    }

    #[test]
    fn test_leading_zeros_do_not_matter() {
        let mut padded = [0u8; 32];
        padded[31] = 0x01;
        assert_eq!(
            synthetic_secret_key(&padded).unwrap(),
            synthetic_secret_key(&[0x01]).unwrap()
        );
    }

    #[test]
    fn test_exponent_above_order_is_reduced() {
        let mut above = GROUP_ORDER;
        above[31] += 1; // r + 1
        assert_eq!(
            synthetic_secret_key(&above).unwrap(),
            synthetic_secret_key(&[0x01]).unwrap()
        );
    }

    #[test]
    fn test_invalid_lengths() {
        assert!(matches!(synthetic_secret_key(&[]), Err(CurveError::InvalidPrivateKey(_))));
        assert!(matches!(synthetic_secret_key(&[1u8; 33]), Err(CurveError::InvalidPrivateKey(_))));
    }

    #[test]
    fn test_zero_exponent() {
        assert!(matches!(synthetic_secret_key(&[0u8; 32]), Err(CurveError::SigningFailed(_))));
        assert!(matches!(synthetic_secret_key(&GROUP_ORDER), Err(CurveError::SigningFailed(_))));
    }

    #[test]
    fn test_complement_decoding() {
        let mut positive = [0u8; 32];
        positive[31] = 5;
        assert_eq!(complement_bytes_to_bigint(&positive), BigInt::from(5));

        // 0xff..ff is -1 in two's complement
        assert_eq!(complement_bytes_to_bigint(&[0xff; 32]), BigInt::from(-1));

        // 0xff..fe is -2
        let mut minus_two = [0xff; 32];
        minus_two[31] = 0xfe;
        assert_eq!(complement_bytes_to_bigint(&minus_two), BigInt::from(-2));
    }

    #[test]
    fn test_complement_decoding_zero_second_byte() {
        // 80 00 ff..ff: magnitude 00 00 ff..fe is complemented as ff..fe only
        let mut data = [0xff; 32];
        data[0] = 0x80;
        data[1] = 0x00;
        assert_eq!(complement_bytes_to_bigint(&data), BigInt::from(-1));

        // 80 00..00: -1 keeps magnitude 01, complemented to 7e
        let mut bottom = [0u8; 32];
        bottom[0] = 0x80;
        assert_eq!(complement_bytes_to_bigint(&bottom), BigInt::from(-126));

        // 80 00..01: nothing left to complement
        let mut one = bottom;
        one[31] = 0x01;
        assert_eq!(complement_bytes_to_bigint(&one), BigInt::zero());
    }
}
