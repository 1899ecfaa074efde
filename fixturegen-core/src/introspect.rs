//! Generic named-field access over structured records.
//!
//! A record exposes its fields in one or both of two ways:
//!
//! - **properties**: a fixed, describable list of named slots, typically
//!   implemented with `#[derive(Record)]`;
//! - **accessors**: a `get_field`/`set_field` pair reaching fields that are
//!   not part of the fixed list, such as the content fields of a content
//!   object.
//!
//! The functions in this module check which one applies to a name, so
//! callers read and write fields without caring how they are stored.

use crate::error::{FixtureError, Result};
use crate::value::{FieldMap, Value};
use std::fmt;

/// Accessor-style field capability.
pub trait FieldAccess {
    /// Read a field, `None` if the record has no such field.
    fn get_field(&self, name: &str) -> Option<Value>;

    /// Write a field. `Ok(false)` means the record has no such field.
    fn set_field(&mut self, name: &str, value: Value) -> Result<bool>;
}

/// A structured record whose fields are readable and writable by name.
pub trait Introspectable {
    /// Name of the record type, used in diagnostics.
    fn type_name(&self) -> &str;

    /// Every directly exposed property, in declaration order.
    fn property_names(&self) -> Vec<&str>;

    /// Read a property, `None` if there is no such property.
    fn property(&self, name: &str) -> Option<Value>;

    /// Write a property. `Ok(false)` means there is no such property.
    fn set_property(&mut self, name: &str, value: Value) -> Result<bool>;

    /// The accessor capability, if the record has one.
    fn accessors(&self) -> Option<&dyn FieldAccess> {
        None
    }

    fn accessors_mut(&mut self) -> Option<&mut dyn FieldAccess> {
        None
    }
}

enum Strategy {
    Property,
    Accessor,
}

fn strategy_for<T: Introspectable + ?Sized>(object: &T, name: &str) -> Option<Strategy> {
    if object.property_names().contains(&name) {
        Some(Strategy::Property)
    } else if object.accessors().is_some() {
        Some(Strategy::Accessor)
    } else {
        None
    }
}

/// Read the field `name`, as a property or through the accessors.
pub fn get_field<T: Introspectable + ?Sized>(object: &T, name: &str) -> Result<Value> {
    let value = match strategy_for(object, name) {
        Some(Strategy::Property) => object.property(name),
        Some(Strategy::Accessor) => object.accessors().and_then(|a| a.get_field(name)),
        None => None,
    };
    value.ok_or_else(|| FixtureError::field_not_found(name, object.type_name()))
}

/// Write the field `name` in place, as a property or through the accessors.
pub fn set_field<T: Introspectable + ?Sized>(object: &mut T, name: &str, value: Value) -> Result<()> {
    let written = match strategy_for(object, name) {
        Some(Strategy::Property) => object.set_property(name, value)?,
        Some(Strategy::Accessor) => match object.accessors_mut() {
            Some(accessors) => accessors.set_field(name, value)?,
            None => false,
        },
        None => false,
    };

    if written {
        Ok(())
    } else {
        Err(FixtureError::field_not_found(name, object.type_name()))
    }
}

/// Apply every entry of `values` with [`set_field`], in order.
///
/// Stops at the first failure. Entries applied before it stay applied.
pub fn set_fields<'a, T, I>(object: &mut T, values: I) -> Result<()>
where
    T: Introspectable + ?Sized,
    I: IntoIterator<Item = (&'a String, &'a Value)>,
{
    for (name, value) in values {
        set_field(object, name, value.clone())?;
    }
    Ok(())
}

/// Flatten a record into a name to value map.
///
/// Every property is read with [`get_field`]. Record-valued fields, and
/// lists made only of records, are flattened into the same map instead of
/// being stored under their own name. Same-named fields are not
/// disambiguated: a later one overwrites an earlier one.
pub fn to_map<T: Introspectable + ?Sized>(object: &T) -> Result<FieldMap> {
    let mut map = FieldMap::new();
    for name in object.property_names() {
        let value = get_field(object, name)?;
        flatten_into(&mut map, name, value);
    }
    Ok(map)
}

fn flatten_into(map: &mut FieldMap, name: &str, value: Value) {
    match value {
        Value::Record(record) => {
            for (child, child_value) in record.fields {
                flatten_into(map, &child, child_value);
            }
        }
        Value::List(items) if !items.is_empty() && items.iter().all(|v| v.as_record().is_some()) => {
            for item in items {
                flatten_into(map, name, item);
            }
        }
        other => {
            map.insert(name.to_string(), other);
        }
    }
}

/// Whether `identifier` is a single uppercase ASCII letter, the placeholder
/// alias tests use instead of a real identifier.
pub fn is_synthetic_identifier(identifier: &str) -> bool {
    matches!(identifier.as_bytes(), [b'A'..=b'Z'])
}

/// View a dynamic value as a record.
pub fn as_object(value: &Value) -> Result<&DynamicRecord> {
    match value {
        Value::Record(record) => Ok(record),
        other => Err(FixtureError::NotAnObject {
            kind: other.kind().to_string(),
        }),
    }
}

/// Mutable variant of [`as_object`].
pub fn as_object_mut(value: &mut Value) -> Result<&mut DynamicRecord> {
    match value {
        Value::Record(record) => Ok(record),
        other => Err(FixtureError::NotAnObject {
            kind: other.kind().to_string(),
        }),
    }
}

/// A plain record: an ordered list of named values.
///
/// Its property list is whatever was inserted; `set_property` only replaces
/// existing slots.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DynamicRecord {
    type_name: String,
    fields: Vec<(String, Value)>,
}

impl DynamicRecord {
    pub fn new(type_name: impl Into<String>) -> Self {
        DynamicRecord {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Builder form of [`DynamicRecord::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add a field, or replace the value of an existing one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let index = self.fields.iter().position(|(n, _)| n == name)?;
        Some(self.fields.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl Introspectable for DynamicRecord {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn property_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(n, _)| n.as_str()).collect()
    }

    fn property(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<bool> {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => {
                slot.1 = value;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl fmt::Display for DynamicRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.type_name)?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{}{}: {}", sep, name, value)?;
        }
        write!(f, " }}")
    }
}
