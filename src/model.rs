//! Resolved schema graph.
//!
//! Everything here is immutable once built. Named definitions are shared
//! through [`Definition`] handles, so a type referenced from many places (or
//! from itself) exists exactly once per [`crate::Document`].
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use once_cell::unsync::OnceCell;
use serde_json::Value;

// ————————————————————————————————————————————————————————————————————————————
// SCHEMA
// ————————————————————————————————————————————————————————————————————————————

/// One node of the resolved type graph.
#[derive(Debug, Clone)]
pub struct Schema {
    pub metadata: Metadata,
    pub ty: SchemaType,
}

/// General metadata shared by every schema kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub default: Option<Value>,
    /// Values listed under `enum`, kept opaque.
    pub enumerated_values: Option<Vec<Value>>,
    pub example: Option<Value>,
    /// `x-nullable`; `false` when absent.
    pub nullable: bool,
}

/// The discrete type defined by a schema.
#[derive(Debug, Clone)]
pub enum SchemaType {
    /// A resolved pointer to a named definition.
    Structure(Structure),
    Object(Box<ObjectSchema>),
    Array(Box<ArraySchema>),
    AllOf(Box<AllOfSchema>),
    OneOf(Box<OneOfSchema>),
    String(Option<StringFormat>, StringMetadata),
    Number(Option<NumberFormat>, NumericMetadata<f64>),
    Integer(Option<IntegerFormat>, NumericMetadata<i64>),
    /// Acceptable values live in [`Metadata::enumerated_values`].
    Enumeration,
    Boolean,
    File,
    Any,
    Null,
}

impl SchemaType {
    /// Keyword-style name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            SchemaType::Structure(_) => "structure",
            SchemaType::Object(_) => "object",
            SchemaType::Array(_) => "array",
            SchemaType::AllOf(_) => "allOf",
            SchemaType::OneOf(_) => "oneOf",
            SchemaType::String(..) => "string",
            SchemaType::Number(..) => "number",
            SchemaType::Integer(..) => "integer",
            SchemaType::Enumeration => "enumeration",
            SchemaType::Boolean => "boolean",
            SchemaType::File => "file",
            SchemaType::Any => "any",
            SchemaType::Null => "null",
        }
    }
}

/// Either an explicit boolean or a nested schema (`additionalProperties`,
/// `additionalItems`).
#[derive(Debug, Clone, PartialEq)]
pub enum BoolOr<S> {
    Bool(bool),
    Schema(S),
}

impl<S> Default for BoolOr<S> {
    fn default() -> Self {
        BoolOr::Bool(false)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// COMPOUND KINDS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone)]
pub struct ObjectSchema {
    pub metadata: ObjectMetadata,
    /// Property names that must be present. Not cross-checked against `properties`.
    pub required: Vec<String>,
    pub properties: BTreeMap<String, Schema>,
    /// Property names in source declaration order.
    pub all_properties: Vec<String>,
    pub additional_properties: BoolOr<Box<Schema>>,
}

impl ObjectSchema {
    /// Properties in declaration order.
    pub fn ordered_properties(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.all_properties
            .iter()
            .filter_map(|name| self.properties.get(name).map(|s| (name.as_str(), s)))
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectMetadata {
    pub min_properties: Option<u64>,
    pub max_properties: Option<u64>,
    pub discriminator: Option<String>,
    /// `x-abstract`: an interface rather than a concrete type.
    pub is_abstract: bool,
}

#[derive(Debug, Clone)]
pub struct ArraySchema {
    pub metadata: ArrayMetadata,
    pub items: ArrayItems,
    pub additional_items: BoolOr<Box<Schema>>,
}

/// `items` is either one schema for every element or a positional tuple.
#[derive(Debug, Clone)]
pub enum ArrayItems {
    One(Box<Schema>),
    Many(Vec<Schema>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayMetadata {
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub unique_items: bool,
}

/// Conjunction of subschemas.
#[derive(Debug, Clone)]
pub struct AllOfSchema {
    pub subschemas: Vec<Schema>,
    pub is_abstract: bool,
}

/// Exactly one subschema must match.
#[derive(Debug, Clone)]
pub struct OneOfSchema {
    pub subschemas: Vec<Schema>,
    /// `x-abstract`: an interface rather than a concrete type.
    pub is_abstract: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// LEAF METADATA
// ————————————————————————————————————————————————————————————————————————————

/// Bounds shared by `number` (`f64`) and `integer` (`i64`) schemas.
///
/// Copied as written; `minimum <= maximum` and `multiple_of > 0` are not checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericMetadata<T> {
    pub minimum: Option<T>,
    /// `false` (inclusive) when absent.
    pub exclusive_minimum: bool,
    pub maximum: Option<T>,
    /// `false` (inclusive) when absent.
    pub exclusive_maximum: bool,
    pub multiple_of: Option<T>,
}

impl<T> Default for NumericMetadata<T> {
    fn default() -> Self {
        Self {
            minimum: None,
            exclusive_minimum: false,
            maximum: None,
            exclusive_maximum: false,
            multiple_of: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringMetadata {
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringFormat {
    Byte,
    Binary,
    Date,
    DateTime,
    Password,
    Email,
    Uri,
    Hostname,
    Ipv4,
    Ipv6,
    Uuid,
    Other(String),
}

impl From<&str> for StringFormat {
    fn from(name: &str) -> Self {
        match name {
            "byte" => StringFormat::Byte,
            "binary" => StringFormat::Binary,
            "date" => StringFormat::Date,
            "date-time" => StringFormat::DateTime,
            "password" => StringFormat::Password,
            "email" => StringFormat::Email,
            "uri" => StringFormat::Uri,
            "hostname" => StringFormat::Hostname,
            "ipv4" => StringFormat::Ipv4,
            "ipv6" => StringFormat::Ipv6,
            "uuid" => StringFormat::Uuid,
            other => StringFormat::Other(other.to_string()),
        }
    }
}

impl StringFormat {
    pub fn as_str(&self) -> &str {
        match self {
            StringFormat::Byte => "byte",
            StringFormat::Binary => "binary",
            StringFormat::Date => "date",
            StringFormat::DateTime => "date-time",
            StringFormat::Password => "password",
            StringFormat::Email => "email",
            StringFormat::Uri => "uri",
            StringFormat::Hostname => "hostname",
            StringFormat::Ipv4 => "ipv4",
            StringFormat::Ipv6 => "ipv6",
            StringFormat::Uuid => "uuid",
            StringFormat::Other(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumberFormat {
    Float,
    Double,
    Other(String),
}

impl From<&str> for NumberFormat {
    fn from(name: &str) -> Self {
        match name {
            "float" => NumberFormat::Float,
            "double" => NumberFormat::Double,
            other => NumberFormat::Other(other.to_string()),
        }
    }
}

impl NumberFormat {
    pub fn as_str(&self) -> &str {
        match self {
            NumberFormat::Float => "float",
            NumberFormat::Double => "double",
            NumberFormat::Other(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegerFormat {
    Int32,
    Int64,
    Other(String),
}

impl From<&str> for IntegerFormat {
    fn from(name: &str) -> Self {
        match name {
            "int32" => IntegerFormat::Int32,
            "int64" => IntegerFormat::Int64,
            other => IntegerFormat::Other(other.to_string()),
        }
    }
}

impl IntegerFormat {
    pub fn as_str(&self) -> &str {
        match self {
            IntegerFormat::Int32 => "int32",
            IntegerFormat::Int64 => "int64",
            IntegerFormat::Other(name) => name,
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// NAMED DEFINITIONS
// ————————————————————————————————————————————————————————————————————————————

/// A named definition. Registered empty before its schema is built, then
/// filled exactly once.
pub struct Definition {
    name: String,
    schema: OnceCell<Schema>,
}

impl Definition {
    pub(crate) fn provisional(name: &str) -> Self {
        Self { name: name.to_string(), schema: OnceCell::new() }
    }

    /// Fill a provisional definition. Returns the schema back if already filled.
    pub(crate) fn complete(&self, schema: Schema) -> Result<(), Schema> {
        self.schema.set(schema)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The built schema. Always `Some` for definitions reachable from a
    /// [`crate::Document`].
    pub fn schema(&self) -> Option<&Schema> {
        self.schema.get()
    }

    pub fn is_complete(&self) -> bool {
        self.schema.get().is_some()
    }
}

impl fmt::Debug for Definition {
    // Cycles would make a derived impl recurse forever.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("name", &self.name)
            .field("kind", &self.schema.get().map(|s| s.ty.kind()))
            .finish()
    }
}

/// A resolved reference to a named definition.
///
/// References formed while their target was still being built close a cycle
/// and are held weakly; the owning document keeps every definition alive.
#[derive(Clone)]
pub struct Structure {
    name: String,
    link: Link,
}

#[derive(Clone)]
enum Link {
    Strong(Rc<Definition>),
    Back(Weak<Definition>),
}

impl Structure {
    /// Link to `definition`, weakly when it is still provisional.
    pub(crate) fn to(definition: &Rc<Definition>) -> Self {
        let link = if definition.is_complete() {
            Link::Strong(Rc::clone(definition))
        } else {
            Link::Back(Rc::downgrade(definition))
        };
        Self { name: definition.name().to_string(), link }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The shared definition handle. `None` only if the owning document was dropped.
    pub fn definition(&self) -> Option<Rc<Definition>> {
        match &self.link {
            Link::Strong(rc) => Some(Rc::clone(rc)),
            Link::Back(weak) => weak.upgrade(),
        }
    }

    /// Whether this reference closes a cycle.
    pub fn is_back_reference(&self) -> bool {
        matches!(self.link, Link::Back(_))
    }

    /// Identity comparison of the referenced definition.
    pub fn points_to(&self, definition: &Rc<Definition>) -> bool {
        self.definition().is_some_and(|d| Rc::ptr_eq(&d, definition))
    }
}

impl fmt::Debug for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Structure")
            .field("name", &self.name)
            .field("back", &self.is_back_reference())
            .finish()
    }
}
