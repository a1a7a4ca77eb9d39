use openw_signer::crypto::curves::{public_key_from_private, verify, CurveType};
use openw_signer::crypto::synthetic::{synthetic_secret_key, GROUP_ORDER};
use openw_signer::signing::policy::sign;
use openw_signer::wallet::derivation_path::{DerivationComponent, DerivationPath};
use proptest::prelude::*;

fn any_curve() -> impl Strategy<Value = CurveType> {
    prop::sample::select(CurveType::ALL.to_vec())
}

/// 32-byte scalars valid on every curve: non-zero and below the BLS order
fn any_private_key() -> impl Strategy<Value = [u8; 32]> {
    prop::array::uniform32(any::<u8>()).prop_filter("non-zero scalar below r", |bytes| {
        bytes.iter().any(|b| *b != 0) && bytes[..] < GROUP_ORDER[..]
    })
}

fn any_exponent() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..=32).prop_filter("non-zero exponent", |bytes| {
        bytes.iter().any(|b| *b != 0) && (bytes.len() < 32 || bytes[..] < GROUP_ORDER[..])
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn synthetic_key_is_always_32_bytes(exponent in any_exponent()) {
        let key = synthetic_secret_key(&exponent).expect("synthetic key");
        prop_assert_eq!(key.len(), 32);
        prop_assert!(key[..] < GROUP_ORDER[..]);
    }

    #[test]
    fn synthetic_key_ignores_leading_zeros(exponent in any_exponent()) {
        let mut padded = vec![0u8; 32 - exponent.len()];
        padded.extend_from_slice(&exponent);
        prop_assert_eq!(
            synthetic_secret_key(&padded).expect("padded"),
            synthetic_secret_key(&exponent).expect("raw")
        );
    }

    #[test]
    fn signature_length_tracks_recovery_flag(
        curve in any_curve(),
        key in any_private_key(),
        digest in prop::array::uniform32(any::<u8>()),
        rsv in any::<bool>(),
    ) {
        let result = sign(&key, &digest, curve, rsv);
        if curve == CurveType::Ed25519 && rsv {
            prop_assert!(result.is_err());
        } else {
            let signature = result.expect("signature");
            prop_assert_eq!(signature.len(), curve.encoded_signature_size(rsv));
            if rsv && curve.supports_recovery() {
                prop_assert_eq!(signature.len(), curve.signature_size() + 1);
            }
        }
    }

    #[test]
    fn signing_is_deterministic_and_verifies(
        curve in any_curve(),
        key in any_private_key(),
        digest in prop::array::uniform32(any::<u8>()),
    ) {
        let first = sign(&key, &digest, curve, false).expect("first");
        let second = sign(&key, &digest, curve, false).expect("second");
        prop_assert_eq!(&first, &second);

        let public_key = public_key_from_private(curve, &key).expect("public key");
        prop_assert!(verify(curve, &public_key, &digest, &first).expect("verify"));

        let mut other = digest;
        other[31] ^= 0x01;
        prop_assert!(!verify(curve, &public_key, &other, &first).expect("verify other"));
    }

    #[test]
    fn derivation_paths_display_and_parse(
        components in prop::collection::vec((0u32..0x8000_0000, any::<bool>()), 0..8)
    ) {
        let path = DerivationPath {
            components: components
                .into_iter()
                .map(|(index, hardened)| DerivationComponent::new(index, hardened))
                .collect(),
        };
        let parsed: DerivationPath = path.to_string().parse().expect("parse");
        prop_assert_eq!(parsed, path);
    }
}
