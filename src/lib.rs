//! Swagger / JSON Schema definitions → strongly typed, fully resolved schema graph.
//!
//! Two passes:
//! 1. [`builder`] decodes raw nodes into reference-unaware builder values;
//! 2. [`lower`] builds the immutable [`model`] graph, resolving every pointer
//!    through one [`resolver::BuildContext`] per document.
//!
//! ```
//! use swagger_schema::{Document, SchemaType};
//!
//! let doc = Document::from_json_str(r##"{
//!     "definitions": {
//!         "Node": {
//!             "type": "object",
//!             "properties": {"next": {"$ref": "#/definitions/Node"}}
//!         }
//!     }
//! }"##).unwrap();
//!
//! let SchemaType::Object(node) = &doc.get("Node").unwrap().ty else { panic!() };
//! assert_eq!(node.all_properties, ["next"]);
//! ```
pub mod builder;
pub mod document;
pub mod emit;
pub mod error;
pub mod lower;
pub mod model;
pub mod raw;
pub mod resolver;

pub use document::{Document, ParseOptions};
pub use error::{Result, SchemaError};
pub use model::{
    AllOfSchema, ArrayItems, ArrayMetadata, ArraySchema, BoolOr, Definition, IntegerFormat, Metadata,
    NumberFormat, NumericMetadata, ObjectMetadata, ObjectSchema, OneOfSchema, Schema, SchemaType,
    StringFormat, StringMetadata, Structure,
};
pub use raw::RawNode;
