//! The create/refresh handshake.
//!
//! Each call is stateless: the only shared state is the secret and the
//! configuration, and everything that changes lives in the store. A
//! credential is consumed by deleting its record; the caller whose delete
//! reports a removed row is the only one allowed to continue.

use std::sync::Arc;

use pairguard_core::{
    issue_pair, validate_pair, AccessClaims, CodecError, CredentialRecord, Identity, OriginIp,
    PairEnvelope, TokenPair,
};
use pairguard_store::CredentialStore;
use tracing::{debug, error, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::{HandshakeConfig, SecretProvider};
use crate::directory::IdentityDirectory;
use crate::error::{Denial, HandshakeError, Rejection, Result};
use crate::hasher::CredentialHasher;
use crate::notify::{CompromiseAlert, Notifier};
use crate::reply::Reply;

/// Outcome of trying to consume the presented refresh credential.
enum Consumption {
    Consumed,
    Denied(Denial),
}

/// Issues, rotates and revokes bound token pairs.
pub struct RefreshHandshake<S, D, N> {
    secret: Arc<dyn SecretProvider>,
    store: Arc<S>,
    directory: D,
    notifier: N,
    clock: Arc<dyn Clock>,
    hasher: CredentialHasher,
    config: HandshakeConfig,
}

impl<S, D, N> RefreshHandshake<S, D, N>
where
    S: CredentialStore,
    D: IdentityDirectory,
    N: Notifier,
{
    /// Create a handshake over the given collaborators.
    ///
    /// Fails if `config` does not validate.
    pub fn new(
        secret: impl SecretProvider + 'static,
        store: Arc<S>,
        directory: D,
        notifier: N,
        config: HandshakeConfig,
    ) -> Result<Self> {
        config.validate()?;
        let hasher = CredentialHasher::new(&config.hashing)?;
        Ok(Self {
            secret: Arc::new(secret),
            store,
            directory,
            notifier,
            clock: Arc::new(SystemClock),
            hasher,
            config,
        })
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn config(&self) -> &HandshakeConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Create
    // ─────────────────────────────────────────────────────────────────────────

    /// Issue the first pair for a known identity.
    pub async fn create(&self, identity: &Identity, origin: &OriginIp) -> Result<TokenPair> {
        match self.directory.lookup(identity).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(owner = %identity, ip = %origin, "create for unknown identity");
                return Err(HandshakeError::Unauthorized(Denial::UnknownIdentity));
            }
            Err(e) => {
                error!(owner = %identity, ip = %origin, error = %e, "identity lookup failed");
                return Err(HandshakeError::Unauthorized(Denial::UnknownIdentity));
            }
        }

        self.issue(identity, origin).await
    }

    /// Issue a pair, hash its refresh token and persist the record.
    async fn issue(&self, owner: &Identity, origin: &OriginIp) -> Result<TokenPair> {
        let now = self.clock.now();

        let pair = issue_pair(self.secret.secret(), owner, origin, now).map_err(|e| {
            error!(owner = %owner, ip = %origin, error = %e, "failed to issue token pair");
            HandshakeError::Internal(e.to_string())
        })?;

        let hash = self.hasher.hash(pair.refresh()).await.map_err(|e| {
            error!(owner = %owner, error = %e, "failed to hash refresh token");
            e
        })?;

        self.store
            .insert(&CredentialRecord::new(owner.clone(), hash, now))
            .await
            .map_err(|e| {
                error!(owner = %owner, ip = %origin, error = %e, "failed to persist credential");
                HandshakeError::from(e)
            })?;

        debug!(owner = %owner, ip = %origin, "issued token pair");
        Ok(pair)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Refresh
    // ─────────────────────────────────────────────────────────────────────────

    /// Refresh from a raw envelope body.
    pub async fn refresh_raw(&self, body: &[u8], origin: &OriginIp) -> Result<TokenPair> {
        let pair = PairEnvelope::from_slice(body)
            .map_err(|e| {
                warn!(ip = %origin, error = %e, "unparsable pair envelope");
                HandshakeError::UnsupportedPayload(e.to_string())
            })
            .and_then(|env| {
                TokenPair::try_from(env).map_err(|e| {
                    warn!(ip = %origin, error = %e, "incomplete pair envelope");
                    HandshakeError::BadRequest(Rejection::Codec(e))
                })
            })?;

        self.refresh(&pair, origin).await
    }

    /// Rotate a pair: consume its credential and issue a new pair.
    pub async fn refresh(&self, pair: &TokenPair, origin: &OriginIp) -> Result<TokenPair> {
        let (claims, payload) = validate_pair(self.secret.secret(), pair).map_err(|e| {
            if e.is_fatal() {
                error!(ip = %origin, error = %e, "pair validation failed internally");
            } else {
                warn!(ip = %origin, error = %e, "rejected token pair");
            }
            HandshakeError::from(e)
        })?;

        let now = self.clock.now();
        if !payload.is_fresh(now, self.config.refresh_lifetime()) {
            warn!(ip = %origin, "refresh token expired");
            return Err(HandshakeError::BadRequest(Rejection::Expired));
        }

        let token_ip = match claims.ip.as_deref() {
            Some(ip) if ip == payload.ip => ip.to_string(),
            _ => {
                warn!(ip = %origin, "token payload mismatch");
                return Err(HandshakeError::BadRequest(Rejection::PayloadMismatch));
            }
        };

        let subject = subject_of(&claims).ok_or_else(|| {
            warn!(ip = %origin, "access token carries no subject");
            HandshakeError::Unauthorized(Denial::MissingSubject)
        })?;

        let consumption = self.consume(&subject, pair.refresh(), now).await?;

        if origin.as_str() != token_ip {
            error!(
                owner = %subject,
                ip = %origin,
                token_ip = %token_ip,
                "token pair presented from a foreign address; credential revoked"
            );
            self.report_compromise(&subject, origin, &token_ip, now).await;
            return Err(HandshakeError::Unauthorized(Denial::Compromised));
        }

        if let Consumption::Denied(denial) = consumption {
            warn!(owner = %subject, ip = %origin, reason = denial.as_str(), "refresh denied");
            return Err(HandshakeError::Unauthorized(denial));
        }

        self.issue(&subject, origin).await
    }

    /// Find the record matching `refresh` among the owner's live records and
    /// delete it. Store failures and an owner with no records at all are
    /// returned as errors; every other outcome is a denial the caller weighs
    /// against the origin check.
    async fn consume(&self, owner: &Identity, refresh: &str, now: i64) -> Result<Consumption> {
        let records = self.store.list_live(owner).await.map_err(|e| {
            error!(owner = %owner, error = %e, "failed to load credentials");
            HandshakeError::from(e)
        })?;
        if records.is_empty() {
            // Nothing to revoke, so there is no theft to report either.
            warn!(owner = %owner, "refresh denied: no stored credentials");
            return Err(HandshakeError::Unauthorized(Denial::NoLiveCredential));
        }

        let lifetime = self.config.refresh_lifetime();
        let live: Vec<CredentialRecord> = records
            .into_iter()
            .filter(|r| r.is_live(now, lifetime))
            .collect();

        let Some(matched) = self.hasher.find_match(refresh, live).await? else {
            return Ok(Consumption::Denied(Denial::InvalidCredential));
        };

        let removed = self.store.delete_by_hash(&matched.hash).await.map_err(|e| {
            error!(owner = %owner, error = %e, "failed to consume credential");
            HandshakeError::from(e)
        })?;

        if removed {
            Ok(Consumption::Consumed)
        } else {
            // Another request consumed it first.
            Ok(Consumption::Denied(Denial::InvalidCredential))
        }
    }

    async fn report_compromise(
        &self,
        owner: &Identity,
        origin: &OriginIp,
        token_ip: &str,
        now: i64,
    ) {
        let contact = match self.directory.contact_for(owner).await {
            Ok(contact) => contact,
            Err(e) => {
                error!(owner = %owner, error = %e, "could not resolve contact for compromise alert");
                None
            }
        };

        let alert = CompromiseAlert {
            identity: owner.clone(),
            contact,
            origin_ip: origin.clone(),
            token_ip: token_ip.to_string(),
            detected_at: now,
        };

        let timeout = self.config.notify_timeout();
        match tokio::time::timeout(timeout, self.notifier.send_compromise_alert(&alert)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                error!(owner = %owner, error = %e, "failed to send compromise alert");
            }
            Err(_) => {
                error!(owner = %owner, timeout_secs = timeout.as_secs(), "compromise alert timed out");
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Access tokens
    // ─────────────────────────────────────────────────────────────────────────

    /// Verify a bare access token for a resource server.
    pub fn verify_access(&self, access: &str) -> Result<AccessClaims> {
        pairguard_core::verify_access(
            self.secret.secret(),
            access,
            self.clock.now(),
            self.config.access_lifetime(),
        )
        .map_err(|e| match e {
            CodecError::Expired => HandshakeError::BadRequest(Rejection::Expired),
            e if e.is_fatal() => HandshakeError::Internal(e.to_string()),
            _ => HandshakeError::Unauthorized(Denial::InvalidAccessToken),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transport surface
    // ─────────────────────────────────────────────────────────────────────────

    /// `create` for a transport: identity as text, raw remote address.
    pub async fn handle_create(&self, identity: &str, remote_addr: &str) -> Reply {
        let result = async {
            let identity = Identity::parse_uuid(identity).map_err(|e| {
                warn!(remote = remote_addr, error = %e, "invalid identity");
                HandshakeError::BadRequest(Rejection::InvalidIdentity)
            })?;
            let origin = parse_origin(remote_addr)?;
            self.create(&identity, &origin).await
        }
        .await;

        self.reply(result)
    }

    /// `refresh` for a transport: raw body, raw remote address.
    pub async fn handle_refresh(&self, body: &[u8], remote_addr: &str) -> Reply {
        let result = async {
            let origin = parse_origin(remote_addr)?;
            self.refresh_raw(body, &origin).await
        }
        .await;

        self.reply(result)
    }

    fn reply(&self, result: Result<TokenPair>) -> Reply {
        let body = result.and_then(|pair| {
            pair.to_json()
                .map_err(|e| HandshakeError::Internal(e.to_string()))
        });
        match body {
            Ok(body) => Reply::created(body),
            Err(e) => Reply::error(e.status()),
        }
    }
}

fn subject_of(claims: &AccessClaims) -> Option<Identity> {
    claims
        .subject
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(Identity::new)
}

fn parse_origin(remote_addr: &str) -> Result<OriginIp> {
    OriginIp::parse(remote_addr).map_err(|e| {
        warn!(remote = remote_addr, error = %e, "invalid remote address");
        HandshakeError::BadRequest(Rejection::InvalidOrigin)
    })
}
