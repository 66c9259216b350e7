//! Strong types for the credential owner and the request origin.

use std::fmt;
use std::net::{IpAddr, SocketAddr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CodecError, Result};

/// Opaque owner identifier, resolved by an external directory.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Wrap an identifier as-is.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parse a UUID identifier and store it in canonical hyphenated form.
    pub fn parse_uuid(s: &str) -> Result<Self> {
        let uuid = Uuid::parse_str(s.trim())
            .map_err(|e| CodecError::InvalidIdentity(e.to_string()))?;
        Ok(Self(uuid.hyphenated().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self.0)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Uuid> for Identity {
    fn from(uuid: Uuid) -> Self {
        Self(uuid.hyphenated().to_string())
    }
}

/// The address a request came from, as a bare IP (no port).
///
/// This is the string embedded in issued tokens and compared on refresh, so
/// it is always kept in the canonical textual form of [`IpAddr`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct OriginIp(String);

impl OriginIp {
    /// Parse `ip`, `ip:port` or `[v6]:port`; any port is dropped.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let ip = match s.parse::<SocketAddr>() {
            Ok(addr) => addr.ip(),
            Err(_) => s
                .parse::<IpAddr>()
                .map_err(|_| CodecError::InvalidOrigin(s.to_string()))?,
        };
        Ok(Self::from(ip))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<IpAddr> for OriginIp {
    fn from(ip: IpAddr) -> Self {
        Self(ip.to_string())
    }
}

impl fmt::Debug for OriginIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OriginIp({})", self.0)
    }
}

impl fmt::Display for OriginIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
