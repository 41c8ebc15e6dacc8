// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Qualified field names and schema namespaces.

use std::fmt;

/// Namespace of a schema: a URI plus the short prefix used in field names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Namespace {
    /// Namespace URI (may be empty).
    pub uri: String,
    /// Prefix used to qualify field names (empty = no prefix).
    pub prefix: String,
}

impl Namespace {
    /// Create a namespace.
    pub fn new(uri: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            prefix: prefix.into(),
        }
    }

    /// The unprefixed namespace.
    pub fn none() -> Self {
        Self::default()
    }

    /// Check if this namespace carries a prefix.
    pub fn has_prefix(&self) -> bool {
        !self.prefix.is_empty()
    }
}

/// A `(prefix, local name)` pair identifying a field across schemas.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    prefix: String,
    local_name: String,
}

impl QualifiedName {
    /// Create a qualified name from its parts.
    pub fn new(prefix: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            local_name: local_name.into(),
        }
    }

    /// Parse `prefix:local` or a bare `local` name.
    ///
    /// A bare name takes `default_prefix`.
    pub fn parse(name: &str, default_prefix: &str) -> Self {
        match name.split_once(':') {
            Some((prefix, local)) => Self::new(prefix, local),
            None => Self::new(default_prefix, name),
        }
    }

    /// Namespace prefix (empty when unqualified).
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Local part of the name.
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// `prefix:local`, or just `local` when there is no prefix.
    pub fn prefixed_name(&self) -> String {
        if self.prefix.is_empty() {
            self.local_name.clone()
        } else {
            format!("{}:{}", self.prefix, self.local_name)
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.prefix.is_empty() {
            f.write_str(&self.local_name)
        } else {
            write!(f, "{}:{}", self.prefix, self.local_name)
        }
    }
}
