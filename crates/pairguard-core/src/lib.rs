//! # Pairguard Core
//!
//! Pure primitives for Pairguard: the bound access/refresh token pair codec
//! and the data model the handshake moves around.
//!
//! This crate contains no I/O, no storage, no networking. It is pure computation
//! over a shared secret and the current time supplied by the caller.
//!
//! ## Key Types
//!
//! - [`TokenPair`] - An access token and its sibling refresh token
//! - [`AccessClaims`] - Signed claims carried by the access token
//! - [`RefreshPayload`] - Sealed payload carried by the refresh token
//! - [`Secret`] - The symmetric key used for both signing and sealing
//! - [`CredentialRecord`] - The server-side row that makes a refresh token usable
//!
//! ## Binding
//!
//! The trailing [`BINDER_LEN`] bytes of the signed access token are fed to
//! ChaCha20-Poly1305 as associated data when the refresh token is sealed. A
//! refresh token therefore only opens next to the access token it was issued
//! with. See the [`codec`] module.

pub mod claims;
pub mod codec;
pub mod error;
pub mod identity;
pub mod pair;
pub mod record;
pub mod secret;

pub use claims::{AccessClaims, Jti, RefreshPayload, MAX_CLAIM_EXTENSIONS};
pub use codec::{
    binder, issue_pair, issue_pair_with_claims, validate_pair, verify_access, BINDER_LEN,
    NONCE_LEN, TAG_LEN,
};
pub use error::{CodecError, Result};
pub use identity::{Identity, OriginIp};
pub use pair::{PairEnvelope, TokenPair};
pub use record::CredentialRecord;
pub use secret::{Secret, SECRET_LEN};
