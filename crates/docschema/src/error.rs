// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Errors returned by type system operations.
//!
//! Only hard failures live here. Validation never fails with an error:
//! [`Type::validate`](crate::Type::validate) returns `false` and leaves the
//! reporting to the caller. Construction preconditions (such as a simple
//! type without a supertype) are assertions, not variants of this enum.

use std::fmt;

/// Errors returned by docschema operations.
#[derive(Debug)]
pub enum Error {
    // ========================================================================
    // Value Errors
    // ========================================================================
    /// The runtime shape of a value does not match the target type
    /// (wrong container kind, unknown field key, incompatible scalar).
    TypeMismatch(String),
    /// Text could not be decoded by a primitive codec.
    Decode { type_name: String, text: String },

    // ========================================================================
    // Structural Errors
    // ========================================================================
    /// The operation is not supported by this kind of type.
    Unsupported(String),
    /// A type referenced by name is not known to the resolver.
    UnknownType { schema: String, name: String },

    // ========================================================================
    // Loading Errors
    // ========================================================================
    /// A schema document is malformed or inconsistent.
    Load(String),
    /// I/O error while reading a schema document.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TypeMismatch(msg) => write!(f, "Type mismatch: {}", msg),
            Error::Decode { type_name, text } => {
                write!(f, "Cannot decode {:?} as {}", text, type_name)
            }
            Error::Unsupported(msg) => write!(f, "Unsupported operation: {}", msg),
            Error::UnknownType { schema, name } => {
                write!(f, "Unknown type: {}:{}", schema, name)
            }
            Error::Load(msg) => write!(f, "Schema load failed: {}", msg),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

/// Convenient alias for results using the crate [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
