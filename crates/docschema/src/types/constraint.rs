// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Value constraints attached to simple types.
//!
//! A simple type validates a value by running its constraints in
//! registration order, stopping at the first one that rejects the value.
//! Constraints are never asked about `Null`.

use crate::error::{Error, Result};
use crate::value::Value;
use regex::Regex;
use std::fmt;

/// A predicate over non-null values.
pub trait Constraint: fmt::Debug + Send + Sync {
    /// Check a value. Must not panic for values of an unexpected shape.
    fn validate(&self, value: &Value) -> bool;

    /// Human-readable description (used in validation reports).
    fn description(&self) -> String;
}

/// Value must be one of a fixed set of literals.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumConstraint {
    allowed: Vec<String>,
}

impl EnumConstraint {
    /// Create enum constraint.
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    /// Allowed literals.
    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }
}

impl Constraint for EnumConstraint {
    fn validate(&self, value: &Value) -> bool {
        let literal = match value {
            Value::String(s) => s.clone(),
            Value::Long(v) => v.to_string(),
            Value::Double(v) => v.to_string(),
            Value::Boolean(v) => v.to_string(),
            _ => return false,
        };
        self.allowed.iter().any(|a| *a == literal)
    }

    fn description(&self) -> String {
        format!("one of [{}]", self.allowed.join(", "))
    }
}

/// String length bounds, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LengthConstraint {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl LengthConstraint {
    /// Create length constraint.
    pub fn new(min: Option<usize>, max: Option<usize>) -> Self {
        Self { min, max }
    }

    /// Upper bound only.
    pub fn max(max: usize) -> Self {
        Self::new(None, Some(max))
    }
}

impl Constraint for LengthConstraint {
    fn validate(&self, value: &Value) -> bool {
        let Value::String(s) = value else {
            return false;
        };
        let len = s.chars().count();
        self.min.map_or(true, |min| len >= min) && self.max.map_or(true, |max| len <= max)
    }

    fn description(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("length in [{}, {}]", min, max),
            (Some(min), None) => format!("length >= {}", min),
            (None, Some(max)) => format!("length <= {}", max),
            (None, None) => "any length".to_string(),
        }
    }
}

/// Numeric bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NumericIntervalConstraint {
    pub min: Option<f64>,
    pub min_inclusive: bool,
    pub max: Option<f64>,
    pub max_inclusive: bool,
}

impl NumericIntervalConstraint {
    /// Closed interval `[min, max]`; either bound may be open-ended.
    pub fn inclusive(min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            min,
            min_inclusive: true,
            max,
            max_inclusive: true,
        }
    }

    /// Make the lower bound exclusive.
    pub fn min_exclusive(mut self) -> Self {
        self.min_inclusive = false;
        self
    }

    /// Make the upper bound exclusive.
    pub fn max_exclusive(mut self) -> Self {
        self.max_inclusive = false;
        self
    }
}

impl Constraint for NumericIntervalConstraint {
    fn validate(&self, value: &Value) -> bool {
        #[allow(clippy::cast_precision_loss)]
        let v = match value {
            Value::Long(v) => *v as f64,
            Value::Double(v) => *v,
            _ => return false,
        };
        let above_min = match self.min {
            Some(min) if self.min_inclusive => v >= min,
            Some(min) => v > min,
            None => true,
        };
        let below_max = match self.max {
            Some(max) if self.max_inclusive => v <= max,
            Some(max) => v < max,
            None => true,
        };
        above_min && below_max
    }

    fn description(&self) -> String {
        let lower = match self.min {
            Some(min) => format!("{}{}", if self.min_inclusive { '[' } else { '(' }, min),
            None => "(-inf".to_string(),
        };
        let upper = match self.max {
            Some(max) => format!("{}{}", max, if self.max_inclusive { ']' } else { ')' }),
            None => "+inf)".to_string(),
        };
        format!("value in {}, {}", lower, upper)
    }
}

/// String must match a regular expression in full.
#[derive(Debug, Clone)]
pub struct PatternConstraint {
    source: String,
    regex: Regex,
}

impl PatternConstraint {
    /// Compile a pattern. The match is anchored at both ends.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{})$", pattern))
            .map_err(|e| Error::Load(format!("invalid pattern {:?}: {}", pattern, e)))?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Pattern as written.
    pub fn pattern(&self) -> &str {
        &self.source
    }
}

impl Constraint for PatternConstraint {
    fn validate(&self, value: &Value) -> bool {
        match value {
            Value::String(s) => self.regex.is_match(s),
            _ => false,
        }
    }

    fn description(&self) -> String {
        format!("matches /{}/", self.source)
    }
}
