//! Issuing and validating bound token pairs.
//!
//! The access token is a compact HS512 JWT. The refresh token is
//! `base64(nonce || ChaCha20-Poly1305(payload))` with the last [`BINDER_LEN`]
//! bytes of the access token as associated data, so it cannot be opened next
//! to any other access token.
//!
//! Validation never says *why* a refresh token failed to open: cross-pairing,
//! truncation and tampering all surface as [`CodecError::BindingMismatch`].

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine as _;
use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    ChaCha20Poly1305, Nonce,
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;

use crate::claims::{AccessClaims, Jti, RefreshPayload};
use crate::error::{CodecError, Result};
use crate::identity::{Identity, OriginIp};
use crate::pair::TokenPair;
use crate::secret::Secret;

/// Number of trailing access-token bytes used as associated data.
pub const BINDER_LEN: usize = 12;

/// AEAD nonce length.
pub const NONCE_LEN: usize = 12;

/// AEAD authentication tag length.
pub const TAG_LEN: usize = 16;

// ─────────────────────────────────────────────────────────────────────────────
// Issuing
// ─────────────────────────────────────────────────────────────────────────────

/// Issue a fresh pair for `subject` seen at `ip`, stamped with `now`.
pub fn issue_pair(secret: &Secret, subject: &Identity, ip: &OriginIp, now: i64) -> Result<TokenPair> {
    let claims = AccessClaims::new(subject.as_str(), ip.as_str(), Jti::generate()?, now);
    let payload = RefreshPayload {
        ip: ip.as_str().to_string(),
        iat: now,
    };
    issue_pair_with_claims(secret, &claims, &payload)
}

/// Issue a pair from explicit claims.
///
/// The caller is responsible for a fresh `jti`; [`issue_pair`] is the normal
/// entry point.
pub fn issue_pair_with_claims(
    secret: &Secret,
    claims: &AccessClaims,
    payload: &RefreshPayload,
) -> Result<TokenPair> {
    claims.check_extensions()?;
    let access = sign_access(secret, claims)?;
    let refresh = seal_refresh(secret, &access, payload)?;
    Ok(TokenPair::new(access, refresh))
}

/// Sign access claims into a compact HS512 token.
pub fn sign_access(secret: &Secret, claims: &AccessClaims) -> Result<String> {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS512),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| CodecError::Signing(e.to_string()))
}

/// Seal a refresh payload against the given access token.
pub fn seal_refresh(secret: &Secret, access: &str, payload: &RefreshPayload) -> Result<String> {
    let aad = binder(access)?;
    let cipher = ChaCha20Poly1305::new_from_slice(secret.as_bytes())
        .map_err(|e| CodecError::CipherInit(e.to_string()))?;

    let mut nonce = [0u8; NONCE_LEN];
    rand::rngs::OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|e| CodecError::Randomness(e.to_string()))?;

    let msg = serde_json::to_vec(payload).map_err(|e| CodecError::Signing(e.to_string()))?;
    let sealed = cipher
        .encrypt(Nonce::from_slice(&nonce), Payload { msg: &msg, aad: &aad })
        .map_err(|e| CodecError::CipherInit(e.to_string()))?;

    let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&sealed);
    Ok(STANDARD_NO_PAD.encode(out))
}

// ─────────────────────────────────────────────────────────────────────────────
// Validation
// ─────────────────────────────────────────────────────────────────────────────

/// The trailing [`BINDER_LEN`] bytes of an access token.
pub fn binder(access: &str) -> Result<[u8; BINDER_LEN]> {
    let bytes = access.as_bytes();
    if bytes.len() < BINDER_LEN {
        return Err(CodecError::Malformed(format!(
            "access token shorter than {} bytes",
            BINDER_LEN
        )));
    }
    let mut out = [0u8; BINDER_LEN];
    out.copy_from_slice(&bytes[bytes.len() - BINDER_LEN..]);
    Ok(out)
}

/// Verify the signature of an access token and decode its claims.
///
/// Expiry is not checked here; see [`verify_access`].
pub fn decode_access(secret: &Secret, access: &str) -> Result<AccessClaims> {
    let mut validation = Validation::new(Algorithm::HS512);
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = jsonwebtoken::decode::<AccessClaims>(
        access,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| CodecError::SignatureInvalid)?;
    data.claims.check_extensions()?;
    Ok(data.claims)
}

/// Open a refresh token next to the access token it claims to belong to.
pub fn open_refresh(secret: &Secret, access: &str, refresh: &str) -> Result<RefreshPayload> {
    let aad = binder(access)?;
    let cipher = ChaCha20Poly1305::new_from_slice(secret.as_bytes())
        .map_err(|e| CodecError::CipherInit(e.to_string()))?;

    let raw = STANDARD_NO_PAD
        .decode(refresh.as_bytes())
        .map_err(|_| CodecError::BindingMismatch)?;
    if raw.len() < NONCE_LEN + TAG_LEN {
        return Err(CodecError::BindingMismatch);
    }
    let (nonce, sealed) = raw.split_at(NONCE_LEN);

    let msg = cipher
        .decrypt(Nonce::from_slice(nonce), Payload { msg: sealed, aad: &aad })
        .map_err(|_| CodecError::BindingMismatch)?;
    serde_json::from_slice(&msg).map_err(|_| CodecError::BindingMismatch)
}

/// Validate both halves of a pair and return their decoded contents.
pub fn validate_pair(secret: &Secret, pair: &TokenPair) -> Result<(AccessClaims, RefreshPayload)> {
    // Checked before anything else reads the suffix.
    if pair.access().len() < BINDER_LEN {
        return Err(CodecError::Malformed(format!(
            "access token shorter than {} bytes",
            BINDER_LEN
        )));
    }
    let claims = decode_access(secret, pair.access())?;
    let payload = open_refresh(secret, pair.access(), pair.refresh())?;
    Ok((claims, payload))
}

/// Verify an access token on its own, enforcing a maximum age in seconds.
pub fn verify_access(secret: &Secret, access: &str, now: i64, max_age_secs: i64) -> Result<AccessClaims> {
    let claims = decode_access(secret, access)?;
    if claims.age(now) >= max_age_secs {
        return Err(CodecError::Expired);
    }
    Ok(claims)
}
