//! Proptest generators for property-based testing.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use proptest::prelude::*;

use pairguard_core::{issue_pair, Identity, OriginIp, Secret, TokenPair};

/// Generate a random secret.
pub fn secret() -> impl Strategy<Value = Secret> {
    any::<[u8; 32]>().prop_map(Secret::from_bytes)
}

/// Generate a UUID identity.
pub fn identity() -> impl Strategy<Value = Identity> {
    any::<[u8; 16]>().prop_map(|bytes| Identity::from(uuid::Uuid::from_bytes(bytes)))
}

/// Generate an IPv4 origin.
pub fn ipv4() -> impl Strategy<Value = OriginIp> {
    any::<[u8; 4]>().prop_map(|octets| OriginIp::from(IpAddr::V4(Ipv4Addr::from(octets))))
}

/// Generate an IPv4 or IPv6 origin.
pub fn origin() -> impl Strategy<Value = OriginIp> {
    prop_oneof![
        ipv4(),
        any::<[u8; 16]>().prop_map(|b| OriginIp::from(IpAddr::V6(Ipv6Addr::from(b)))),
    ]
}

/// Generate a reasonable issuance time.
pub fn timestamp() -> impl Strategy<Value = i64> {
    0i64..=4_102_444_800
}

/// Everything needed to issue a pair.
#[derive(Debug, Clone)]
pub struct PairParams {
    pub secret: Secret,
    pub subject: Identity,
    pub ip: OriginIp,
    pub now: i64,
}

impl Arbitrary for PairParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (secret(), identity(), origin(), timestamp())
            .prop_map(|(secret, subject, ip, now)| PairParams {
                secret,
                subject,
                ip,
                now,
            })
            .boxed()
    }
}

/// Issue a pair from generated parameters.
pub fn pair_from_params(params: &PairParams) -> TokenPair {
    issue_pair(&params.secret, &params.subject, &params.ip, params.now)
        .expect("issuing with a valid secret cannot fail")
}

/// Flip bit `bit` (0..=6, so text stays ASCII) of byte `index` in `token`.
///
/// `index` wraps around the token length. An empty token is returned as is.
pub fn flip_bit(token: &str, index: usize, bit: u8) -> String {
    if token.is_empty() {
        return String::new();
    }
    let mut bytes = token.as_bytes().to_vec();
    let i = index % bytes.len();
    bytes[i] ^= 1 << (bit % 7);
    String::from_utf8(bytes).expect("ASCII stays ASCII")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairguard_core::validate_pair;

    #[test]
    fn test_flip_bit_edges() {
        assert_eq!(flip_bit("", 7, 3), "");
        assert_eq!(flip_bit("a", 5, 0), "`");
        assert_eq!(flip_bit("ab", 1, 7), "ac");
    }

    proptest! {
        #[test]
        fn issued_pair_validates(params: PairParams) {
            let pair = pair_from_params(&params);
            let (claims, payload) = validate_pair(&params.secret, &pair).unwrap();
            prop_assert_eq!(claims.subject.as_deref(), Some(params.subject.as_str()));
            prop_assert_eq!(claims.ip.as_deref(), Some(params.ip.as_str()));
            prop_assert_eq!(payload.ip.as_str(), params.ip.as_str());
            prop_assert_eq!(payload.iat, params.now);
        }

        #[test]
        fn envelope_round_trip(params: PairParams) {
            let pair = pair_from_params(&params);
            let back = TokenPair::from_json(&pair.to_json().unwrap()).unwrap();
            prop_assert_eq!(back, pair);
        }

        #[test]
        fn cross_pair_rejected(a: PairParams, b in identity()) {
            let first = pair_from_params(&a);
            let second = issue_pair(&a.secret, &b, &a.ip, a.now).unwrap();
            let mixed = TokenPair::new(first.access().to_string(), second.refresh().to_string());
            prop_assert!(validate_pair(&a.secret, &mixed).is_err());
        }

        #[test]
        fn tampered_access_rejected(params: PairParams, index: usize, bit in 0u8..7) {
            let pair = pair_from_params(&params);
            let tampered = TokenPair::new(
                flip_bit(pair.access(), index, bit),
                pair.refresh().to_string(),
            );
            prop_assert!(validate_pair(&params.secret, &tampered).is_err());
        }

        #[test]
        fn tampered_refresh_rejected(params: PairParams, index: usize, bit in 0u8..7) {
            let pair = pair_from_params(&params);
            let tampered = TokenPair::new(
                pair.access().to_string(),
                flip_bit(pair.refresh(), index, bit),
            );
            prop_assert!(validate_pair(&params.secret, &tampered).is_err());
        }
    }
}
