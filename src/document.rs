//! Top-level entry point: raw document → fully resolved definitions table.
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::builder::SchemaBuilder;
use crate::error::{Result, SchemaError};
use crate::model::{Definition, Schema};
use crate::raw::{RawNode, child_path};
use crate::resolver::BuildContext;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ParseOptions {
    /// JSON-pointer location of the definitions map. References must point
    /// under it (`#` + this path + `/Name`).
    pub definitions_path: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { definitions_path: "/definitions".to_string() }
    }
}

/// The resolved definitions of one document, in declaration order.
///
/// Owns every [`Definition`]; structures inside the graph stay valid for as
/// long as the document is alive.
#[derive(Debug)]
pub struct Document {
    definitions: IndexMap<String, Rc<Definition>>,
}

impl Document {
    pub fn from_json(value: &Value) -> Result<Self> {
        Self::from_node(value, &ParseOptions::default())
    }

    /// Parse JSON text. Syntax errors surface as a malformed root node.
    pub fn from_json_str(src: &str) -> Result<Self> {
        let value = serde_json::from_str::<Value>(src)
            .map_err(|error| SchemaError::malformed("", format!("invalid JSON: {error}")))?;
        Self::from_json(&value)
    }

    /// Decode every definition, then resolve each exactly once through a
    /// fresh [`BuildContext`].
    pub fn from_node<N: RawNode>(root: &N, options: &ParseOptions) -> Result<Self> {
        let path = options.definitions_path.as_str();
        let builders = decode_definitions(root, path)?;
        let ctx = BuildContext::new(path, builders);

        let mut definitions = IndexMap::with_capacity(ctx.builders().len());
        for name in ctx.builders().keys() {
            if let Some(definition) = ctx.definition(name)? {
                definitions.insert(name.clone(), definition);
            }
        }
        debug!(count = definitions.len(), "resolved document");
        Ok(Self { definitions })
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.definitions.get(name)?.schema()
    }

    /// Shared handle, for identity comparisons against [`crate::Structure`]s.
    pub fn definition(&self, name: &str) -> Option<&Rc<Definition>> {
        self.definitions.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.definitions
            .iter()
            .filter_map(|(name, def)| def.schema().map(|s| (name.as_str(), s)))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

fn decode_definitions<N: RawNode>(root: &N, path: &str) -> Result<IndexMap<String, SchemaBuilder>> {
    if !path.is_empty() && !path.starts_with('/') {
        return Err(SchemaError::malformed(
            path,
            "definitions path must be a JSON pointer starting with `/`",
        ));
    }
    let Some(node) = root.lookup(path) else {
        return Ok(IndexMap::new());
    };
    let entries = node.entries().ok_or_else(|| {
        SchemaError::malformed(path, format!("expected a map of definitions, found {}", node.kind()))
    })?;
    entries
        .into_iter()
        .map(|(name, def)| Ok((name.to_string(), SchemaBuilder::decode(def, &child_path(path, name))?)))
        .collect()
}
