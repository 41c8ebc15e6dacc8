// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! List types: repeated sequences of one item type.
//!
//! A list is described by a single synthesized item field. Lists declared
//! without an item name are arrays: their item field is named
//! [`DEFAULT_ITEM_NAME`].
//!
//! The textual form of a list is its encoded items joined by one space:
//! `"a b c"` decodes to `["a", "b", "c"]` under a string item type.

use crate::error::{Error, Result};
use crate::types::{Field, FieldFlags, QualifiedName, Type, TypeRef, UNBOUNDED};
use crate::value::Value;
use std::sync::Arc;

/// Item name of lists declared without one.
pub const DEFAULT_ITEM_NAME: &str = "item";

const SEPARATOR: &str = " ";

#[derive(Debug, Clone)]
pub(crate) struct ListParams {
    pub(crate) item_type: TypeRef,
    pub(crate) item_name: Option<String>,
    pub(crate) default_value: Option<String>,
    pub(crate) min_occurs: i32,
    pub(crate) max_occurs: i32,
}

impl ListParams {
    pub(crate) fn new(item_type: TypeRef) -> Self {
        Self {
            item_type,
            item_name: None,
            default_value: None,
            min_occurs: 0,
            max_occurs: UNBOUNDED,
        }
    }
}

/// State of a list type.
#[derive(Debug)]
pub struct ListType {
    item_field: Arc<Field>,
    is_array: bool,
    default_value: Option<String>,
    min_occurs: i32,
    max_occurs: i32,
}

impl ListType {
    pub(crate) fn new(params: ListParams, this: TypeRef) -> Self {
        let is_array = params.item_name.is_none();
        let item_name = params
            .item_name
            .unwrap_or_else(|| DEFAULT_ITEM_NAME.to_string());
        let item_field = Field::new(
            QualifiedName::parse(&item_name, ""),
            params.item_type,
            this,
            None,
            FieldFlags::empty(),
        )
        .with_occurs(params.min_occurs, params.max_occurs);
        Self {
            item_field: Arc::new(item_field),
            is_array,
            default_value: params.default_value,
            min_occurs: params.min_occurs,
            max_occurs: params.max_occurs,
        }
    }

    /// The synthesized item field.
    pub fn item_field(&self) -> &Arc<Field> {
        &self.item_field
    }

    /// Unresolved handle on the item type.
    pub fn item_type_ref(&self) -> &TypeRef {
        self.item_field.field_type_ref()
    }

    /// Resolve the item type.
    pub fn item_type(&self) -> Option<Arc<Type>> {
        self.item_field.field_type()
    }

    /// Check if the list was declared without an item name.
    pub fn is_array(&self) -> bool {
        self.is_array
    }

    /// Check if the items are primitive or simple values.
    pub fn is_scalar_list(&self) -> bool {
        self.item_type().is_some_and(|ty| ty.is_simple_type())
    }

    /// Default value as written.
    pub fn default_value_text(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Minimum number of items.
    pub fn min_occurs(&self) -> i32 {
        self.min_occurs
    }

    /// Maximum number of items ([`UNBOUNDED`] for none).
    pub fn max_occurs(&self) -> i32 {
        self.max_occurs
    }

    pub(crate) fn decode(&self, text: Option<&str>) -> Result<Value> {
        let Some(text) = text else {
            return Ok(Value::Null);
        };
        let Some(item) = self.item_type() else {
            return Ok(Value::Null);
        };
        let items = text
            .split(SEPARATOR)
            .map(|part| item.decode(Some(part)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::Array(items))
    }

    pub(crate) fn encode(&self, value: &Value) -> Option<String> {
        let items = value.as_sequence()?;
        let item = self.item_type()?;
        let parts = items
            .iter()
            .map(|v| item.encode(v))
            .collect::<Option<Vec<_>>>()?;
        Some(parts.join(SEPARATOR))
    }

    pub(crate) fn new_instance(&self) -> Value {
        let Some(text) = self.default_value.as_deref() else {
            return Value::List(Vec::new());
        };
        match self.decode(Some(text)) {
            Ok(Value::Array(items)) => Value::List(items),
            Ok(_) => Value::List(Vec::new()),
            Err(e) => {
                log::warn!("[list] default value {:?} ignored: {}", text, e);
                Value::List(Vec::new())
            }
        }
    }

    pub(crate) fn convert(&self, value: Value) -> Result<Value> {
        let item = self.item_type();
        let convert_items = |items: Vec<Value>| -> Result<Vec<Value>> {
            match &item {
                Some(ty) => items.into_iter().map(|v| ty.convert(v)).collect(),
                None => Ok(items),
            }
        };
        match value {
            Value::Null => Ok(Value::Null),
            Value::List(items) => Ok(Value::List(convert_items(items)?)),
            Value::Array(items) => Ok(Value::Array(convert_items(items)?)),
            other => Err(Error::TypeMismatch(format!(
                "expected list, got {}",
                other.kind_name()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{ListTypeBuilder, PrimitiveKind, Type, TypeInfo, TypeRef, UNBOUNDED};
    use crate::value::Value;
    use std::sync::Arc;

    #[test]
    fn test_array_item_field() {
        let long = Type::primitive(PrimitiveKind::Long);
        let ty = Type::list(TypeInfo::new("s", "longs"), TypeRef::direct(&long));
        let list = ty.as_list().unwrap();

        assert!(list.is_array());
        assert!(list.is_scalar_list());
        assert_eq!(list.item_field().local_name(), "item");
        assert_eq!((list.min_occurs(), list.max_occurs()), (0, UNBOUNDED));
        let owner = list.item_field().declaring_type().expect("owner alive");
        assert!(Arc::ptr_eq(&owner, &ty));
    }

    #[test]
    fn test_decode_splits_on_space() {
        let long = Type::primitive(PrimitiveKind::Long);
        let ty = Type::list(TypeInfo::new("s", "longs"), TypeRef::direct(&long));

        let decoded = ty.decode(Some("1 2 3")).unwrap();
        assert_eq!(
            decoded,
            Value::Array(vec![Value::Long(1), Value::Long(2), Value::Long(3)])
        );
        assert!(ty.decode(None).unwrap().is_null());
        assert!(ty.decode(Some("1 two")).is_err());
        assert_eq!(ty.encode(&decoded).as_deref(), Some("1 2 3"));
    }

    #[test]
    fn test_new_instance_uses_default() {
        let string = Type::primitive(PrimitiveKind::String);
        let ty = ListTypeBuilder::new("s", "tags", TypeRef::direct(&string))
            .item_name("tag")
            .default_value("a b")
            .build();
        let list = ty.as_list().unwrap();
        assert!(!list.is_array());
        assert_eq!(list.item_field().local_name(), "tag");
        assert_eq!(
            ty.new_instance(),
            Value::List(vec![Value::from("a"), Value::from("b")])
        );

        let plain = Type::list(TypeInfo::new("s", "plain"), TypeRef::direct(&string));
        assert_eq!(plain.new_instance(), Value::List(vec![]));
    }

    #[test]
    fn test_validate_and_convert() {
        let double = Type::primitive(PrimitiveKind::Double);
        let ty = Type::list(TypeInfo::new("s", "doubles"), TypeRef::direct(&double));

        assert!(ty.validate(&Value::List(vec![])));
        assert!(ty.validate(&Value::Array(vec![])));
        assert!(!ty.validate(&Value::Long(1)));
        assert!(ty.validate(&Value::Null));

        let converted = ty.convert(Value::List(vec![Value::Long(2)])).unwrap();
        assert_eq!(converted, Value::List(vec![Value::Double(2.0)]));
        assert!(ty.convert(Value::from("1 2")).is_err());
    }
}
