//! Pointer resolution against a document's definitions table.
//!
//! A definition is registered in the cache *before* it is built, so a pointer
//! met again while that build is still running (a self- or mutually-recursive
//! type) gets the provisional handle instead of re-entering the build.
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::builder::SchemaBuilder;
use crate::error::{Result, SchemaError};
use crate::model::{Definition, Structure};
use crate::raw::unescape_segment;

/// Unresolved reference string, as written in the source (`#/definitions/Foo`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pointer {
    reference: String,
    at: String,
}

impl Pointer {
    pub fn new(reference: impl Into<String>, at: &str) -> Self {
        Self { reference: reference.into(), at: at.to_string() }
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Location of the `$ref` keyword in the source document.
    pub fn at(&self) -> &str {
        &self.at
    }

    /// Definition name targeted by this pointer, if it points under `prefix`
    /// (e.g. `#/definitions`).
    pub fn target_name(&self, prefix: &str) -> Option<String> {
        let rest = self.reference.strip_prefix(prefix)?.strip_prefix('/')?;
        if rest.is_empty() || rest.contains('/') {
            return None;
        }
        Some(unescape_segment(rest))
    }

    fn unresolved(&self) -> SchemaError {
        SchemaError::UnresolvedReference { at: self.at.clone(), reference: self.reference.clone() }
    }
}

/// State for one build pass over one document.
///
/// Owns the decoded definitions and the resolution cache. Not shared across
/// documents.
pub struct BuildContext {
    /// `#` + definitions location, e.g. `#/definitions`.
    prefix: String,
    builders: IndexMap<String, SchemaBuilder>,
    cache: RefCell<HashMap<String, Rc<Definition>>>,
}

impl BuildContext {
    pub fn new(definitions_path: &str, builders: IndexMap<String, SchemaBuilder>) -> Self {
        Self {
            prefix: format!("#{definitions_path}"),
            builders,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn builders(&self) -> &IndexMap<String, SchemaBuilder> {
        &self.builders
    }

    /// Resolve a pointer to its (possibly still provisional) definition.
    pub fn resolve(&self, pointer: &Pointer) -> Result<Structure> {
        let name = pointer.target_name(&self.prefix).ok_or_else(|| pointer.unresolved())?;
        trace!(reference = pointer.reference(), "resolving pointer");
        match self.definition(&name)? {
            Some(definition) => {
                let structure = Structure::to(&definition);
                trace!(name = %name, back = structure.is_back_reference(), "linked structure");
                Ok(structure)
            }
            None => Err(pointer.unresolved()),
        }
    }

    /// Materialize the definition called `name`, at most once per context.
    ///
    /// `Ok(None)` when no such definition exists.
    pub fn definition(&self, name: &str) -> Result<Option<Rc<Definition>>> {
        let cached = self.cache.borrow().get(name).cloned();
        if let Some(definition) = cached {
            return Ok(Some(definition));
        }
        let Some(builder) = self.builders.get(name) else {
            return Ok(None);
        };

        let definition = Rc::new(Definition::provisional(name));
        self.cache.borrow_mut().insert(name.to_string(), Rc::clone(&definition));

        let schema = builder.build(self)?;
        debug!(name, kind = schema.ty.kind(), "materialized definition");
        // only this frame completes the entry it registered
        let completed = definition.complete(schema).is_ok();
        debug_assert!(completed, "definition `{name}` completed twice");
        Ok(Some(definition))
    }

    /// Number of definitions materialized or in flight.
    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }
}
