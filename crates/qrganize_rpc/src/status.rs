//! Transport-level failure status.
//!
//! # Invariants
//! - Numeric codes follow the gRPC status code table so existing clients can
//!   interpret them.
//! - `message` is always a fixed, user-safe text; storage details never leak.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure categories surfaced to RPC clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    NotFound,
    AlreadyExists,
    Internal,
}

impl Code {
    /// gRPC numeric value of this code.
    pub fn as_i32(self) -> i32 {
        match self {
            Self::NotFound => 5,
            Self::AlreadyExists => 6,
            Self::Internal => 13,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::AlreadyExists => "already_exists",
            Self::Internal => "internal",
        }
    }
}

/// Failed RPC outcome: one code plus a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    code: Code,
    message: String,
}

impl Status {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Code::NotFound, message)
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(Code::AlreadyExists, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(Code::Internal, message)
    }

    pub fn code(&self) -> Code {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl Error for Status {}

#[cfg(test)]
mod tests {
    use super::{Code, Status};

    #[test]
    fn codes_use_grpc_numbering() {
        assert_eq!(Code::NotFound.as_i32(), 5);
        assert_eq!(Code::AlreadyExists.as_i32(), 6);
        assert_eq!(Code::Internal.as_i32(), 13);
    }

    #[test]
    fn display_includes_code_and_message() {
        let status = Status::not_found("Given box was not found");
        assert_eq!(status.to_string(), "not_found: Given box was not found");
    }
}
