// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Simple types: constraints layered over a primitive.

use crate::types::{Constraint, Type};
use crate::value::Value;
use std::sync::{Arc, OnceLock};

/// State of a simple type.
///
/// Validation runs the local constraints first, then the supertype's
/// validation. Codec operations are forwarded to the primitive at the end
/// of the supertype chain, which is looked up once and memoized.
#[derive(Debug)]
pub struct SimpleType {
    constraints: Vec<Arc<dyn Constraint>>,
    primitive: OnceLock<Arc<Type>>,
}

impl SimpleType {
    pub(crate) fn new(constraints: Vec<Arc<dyn Constraint>>) -> Self {
        Self {
            constraints,
            primitive: OnceLock::new(),
        }
    }

    /// Local constraints, in evaluation order.
    pub fn constraints(&self) -> &[Arc<dyn Constraint>] {
        &self.constraints
    }

    /// The first local constraint rejecting `value`, if any.
    pub fn failing_constraint(&self, value: &Value) -> Option<&Arc<dyn Constraint>> {
        self.constraints.iter().find(|c| !c.validate(value))
    }

    pub(crate) fn check_constraints(&self, value: &Value) -> bool {
        self.failing_constraint(value).is_none()
    }

    pub(crate) fn cached_primitive(&self) -> Option<Arc<Type>> {
        self.primitive.get().cloned()
    }

    /// Memoize the resolved primitive. Concurrent first callers race
    /// harmlessly: every one of them resolved the same chain.
    pub(crate) fn cache_primitive(&self, primitive: Arc<Type>) -> Arc<Type> {
        self.primitive.get_or_init(|| primitive).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LengthConstraint, PrimitiveKind, TypeInfo, TypeRef};

    #[test]
    fn test_failing_constraint_stops_at_first() {
        let string = Type::primitive(PrimitiveKind::String);
        let ty = Type::simple(
            TypeInfo::new("dc", "code").extending(TypeRef::direct(&string)),
            vec![
                Arc::new(LengthConstraint::max(3)),
                Arc::new(LengthConstraint::new(Some(2), None)),
            ],
        );
        let simple = ty.as_simple().expect("simple type");

        assert_eq!(simple.constraints().len(), 2);
        assert!(simple.failing_constraint(&"ab".into()).is_none());

        let failing = simple.failing_constraint(&"abcd".into()).expect("rejected");
        assert_eq!(failing.description(), "length <= 3");
    }

    #[test]
    fn test_primitive_is_memoized() {
        let long = Type::primitive(PrimitiveKind::Long);
        let ty = Type::simple(
            TypeInfo::new("dc", "count").extending(TypeRef::direct(&long)),
            vec![],
        );
        assert!(ty.as_simple().and_then(SimpleType::cached_primitive).is_none());

        let primitive = ty.primitive_type().expect("resolves");
        assert!(Arc::ptr_eq(&primitive, &long));
        let cached = ty.as_simple().and_then(SimpleType::cached_primitive);
        assert!(cached.is_some_and(|p| Arc::ptr_eq(&p, &long)));
    }

    #[test]
    #[should_panic(expected = "requires a supertype")]
    fn test_simple_type_requires_supertype() {
        let _ = Type::simple(TypeInfo::new("dc", "orphan"), vec![]);
    }
}
