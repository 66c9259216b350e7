//! Fixed scenario values and request vectors.
//!
//! The scenario values reproduce the reference walkthrough: an all-zero
//! secret, one known identity, a home address and a foreign one.

use pairguard::Status;
use pairguard_core::{Identity, OriginIp, Secret};

/// 32 zero bytes.
pub const SCENARIO_SECRET: [u8; 32] = [0u8; 32];

pub const SCENARIO_IDENTITY: &str = "11111111-1111-1111-1111-111111111111";

/// Address the pair is issued to.
pub const SCENARIO_IP: &str = "10.0.0.1";

/// Address a stolen pair is replayed from.
pub const FOREIGN_IP: &str = "10.0.0.2";

pub const SCENARIO_CONTACT: &str = "owner@example.com";

/// 2023-11-14T22:13:20Z
pub const SCENARIO_NOW: i64 = 1_700_000_000;

pub fn scenario_secret() -> Secret {
    Secret::from_bytes(SCENARIO_SECRET)
}

pub fn scenario_identity() -> Identity {
    Identity::new(SCENARIO_IDENTITY)
}

pub fn scenario_ip() -> OriginIp {
    OriginIp::from(std::net::IpAddr::from([10, 0, 0, 1]))
}

pub fn foreign_ip() -> OriginIp {
    OriginIp::from(std::net::IpAddr::from([10, 0, 0, 2]))
}

/// A refresh request body that never reaches token validation, and the
/// status it must produce.
#[derive(Debug, Clone)]
pub struct EnvelopeVector {
    pub name: &'static str,
    pub body: &'static [u8],
    pub expected: Status,
}

/// Envelope bodies covering the unparsable and incomplete cases.
pub fn envelope_vectors() -> Vec<EnvelopeVector> {
    vec![
        EnvelopeVector {
            name: "empty body",
            body: b"",
            expected: Status::UnsupportedMediaType,
        },
        EnvelopeVector {
            name: "not json",
            body: b"access_token=a&refresh_token=b",
            expected: Status::UnsupportedMediaType,
        },
        EnvelopeVector {
            name: "wrong field type",
            body: br#"{"access_token": 1, "refresh_token": 2}"#,
            expected: Status::UnsupportedMediaType,
        },
        EnvelopeVector {
            name: "empty object",
            body: b"{}",
            expected: Status::BadRequest,
        },
        EnvelopeVector {
            name: "access only",
            body: br#"{"access_token": "a.b.c"}"#,
            expected: Status::BadRequest,
        },
        EnvelopeVector {
            name: "refresh only",
            body: br#"{"refresh_token": "AAAA"}"#,
            expected: Status::BadRequest,
        },
        EnvelopeVector {
            name: "empty strings",
            body: br#"{"access_token": "", "refresh_token": ""}"#,
            expected: Status::BadRequest,
        },
        EnvelopeVector {
            name: "unsigned garbage pair",
            body: br#"{"access_token": "aaaa.bbbb.cccccccccccc", "refresh_token": "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"}"#,
            expected: Status::BadRequest,
        },
    ]
}
