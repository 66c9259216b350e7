//! Transport-facing replies.
//!
//! The handshake does not speak HTTP, but it decides statuses and bodies so
//! that any transport only has to copy them out.

use std::fmt;

/// The statuses the handshake can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Created,
    BadRequest,
    Unauthorized,
    UnsupportedMediaType,
    InternalServerError,
}

impl Status {
    pub fn code(&self) -> u16 {
        match self {
            Status::Created => 201,
            Status::BadRequest => 400,
            Status::Unauthorized => 401,
            Status::UnsupportedMediaType => 415,
            Status::InternalServerError => 500,
        }
    }

    /// Canonical reason phrase.
    pub fn reason(&self) -> &'static str {
        match self {
            Status::Created => "Created",
            Status::BadRequest => "Bad Request",
            Status::Unauthorized => "Unauthorized",
            Status::UnsupportedMediaType => "Unsupported Media Type",
            Status::InternalServerError => "Internal Server Error",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Status::Created)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.reason())
    }
}

/// A status and the body to send with it.
///
/// Success bodies are the pretty-printed pair envelope; error bodies are the
/// reason phrase and nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: Status,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn created(body: Vec<u8>) -> Self {
        Self {
            status: Status::Created,
            body,
        }
    }

    pub fn error(status: Status) -> Self {
        Self {
            status,
            body: status.reason().as_bytes().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_is_reason_phrase() {
        let reply = Reply::error(Status::Unauthorized);
        assert_eq!(reply.status.code(), 401);
        assert_eq!(reply.body, b"Unauthorized");
        assert_eq!(Status::UnsupportedMediaType.to_string(), "415 Unsupported Media Type");
    }
}
