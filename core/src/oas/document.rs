#![deny(missing_docs)]

//! # Document Arena
//!
//! Holds the raw OpenAPI document and resolves `$ref` slots to fragments.
//!
//! Every node of the document gets a stable `FragmentId` (its arena index) keyed by
//! its canonical JSON pointer. Two references that land on the same node therefore
//! yield the same id, which is what the modeler memoizes on.

use crate::error::{AppError, AppResult, ModelError, ModelResult};
use crate::oas::ref_utils::{
    canonical_pointer, declared_name, join_pointer, normalize_ref_to_local, ROOT,
};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Identity of a document node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FragmentId(usize);

impl FragmentId {
    /// Arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A slot after reference resolution.
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    /// Name declared by the reference target (`#/components/schemas/Pet` -> `Pet`).
    /// `None` for inline fragments.
    pub name: Option<&'a str>,
    /// Identity of the target node.
    pub id: FragmentId,
    /// Canonical pointer of the target node.
    pub pointer: &'a str,
    /// The target node itself.
    pub value: &'a Value,
}

/// A parsed document plus its node index.
#[derive(Debug, Clone)]
pub struct Document {
    root: Value,
    self_uri: Option<String>,
    pointers: Vec<String>,
    names: Vec<Option<String>>,
    index: HashMap<String, FragmentId>,
}

impl Document {
    /// Parses YAML or JSON text into a document.
    pub fn parse(text: &str) -> AppResult<Self> {
        let root: Value = serde_yaml::from_str(text)
            .map_err(|e| AppError::Parse(format!("Failed to parse OpenAPI document: {}", e)))?;
        Ok(Self::from_value(root))
    }

    /// Wraps an already parsed document.
    pub fn from_value(root: Value) -> Self {
        let self_uri = root
            .get("$self")
            .and_then(Value::as_str)
            .map(str::to_string);
        let mut doc = Self {
            root: Value::Null,
            self_uri,
            pointers: Vec::new(),
            names: Vec::new(),
            index: HashMap::new(),
        };
        doc.register(ROOT.to_string(), &root);
        doc.root = root;
        doc
    }

    /// The raw root node.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// The `$self` URI, if declared.
    pub fn self_uri(&self) -> Option<&str> {
        self.self_uri.as_deref()
    }

    /// Number of indexed nodes.
    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    /// True for an empty arena (never the case after construction).
    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }

    /// Canonical pointer of a fragment.
    pub fn pointer_of(&self, id: FragmentId) -> &str {
        &self.pointers[id.0]
    }

    /// The node at `pointer`, without following references.
    pub fn get(&self, pointer: &str) -> Option<&Value> {
        let path = pointer.trim_start_matches('#');
        if path.is_empty() {
            return Some(&self.root);
        }
        self.root.pointer(path)
    }

    /// Resolves the slot at `pointer`, following `$ref` chains.
    ///
    /// * `Ok(None)` - nothing is declared at `pointer`.
    /// * `Err(..)` - a reference in the chain points nowhere (or loops).
    pub fn resolve(&self, pointer: &str) -> ModelResult<Option<Resolved<'_>>> {
        if self.get(pointer).is_none() {
            return Ok(None);
        }

        let mut current = pointer.to_string();
        let mut seen = HashSet::new();
        loop {
            let value = self
                .get(&current)
                .ok_or_else(|| ModelError::UnresolvedReference(current.clone()))?;
            let reference = value.get("$ref").and_then(Value::as_str);
            match reference {
                Some(reference) => {
                    if !seen.insert(current.clone()) {
                        return Err(ModelError::UnresolvedReference(reference.to_string()));
                    }
                    current = normalize_ref_to_local(reference, self.self_uri())
                        .map(|local| canonical_pointer(&local))
                        .ok_or_else(|| ModelError::UnresolvedReference(reference.to_string()))?;
                }
                None => {
                    let id = *self
                        .index
                        .get(&current)
                        .ok_or_else(|| ModelError::UnresolvedReference(current.clone()))?;
                    let name = if seen.is_empty() {
                        None
                    } else {
                        self.names[id.0].as_deref()
                    };
                    return Ok(Some(Resolved {
                        name,
                        id,
                        pointer: &self.pointers[id.0],
                        value,
                    }));
                }
            }
        }
    }

    /// Resolves a child slot of `parent`.
    pub fn resolve_child(&self, parent: &str, key: &str) -> ModelResult<Option<Resolved<'_>>> {
        self.resolve(&join_pointer(parent, key))
    }

    /// The keys of the mapping at `pointer`, in document order, paired with their pointers.
    ///
    /// `x-` extension keys are skipped.
    pub fn entries(&self, pointer: &str) -> Vec<(String, String)> {
        match self.get(pointer) {
            Some(Value::Object(map)) => map
                .keys()
                .filter(|key| !key.starts_with("x-"))
                .map(|key| (key.clone(), join_pointer(pointer, key)))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// The pointers of the items of the sequence at `pointer`.
    pub fn items(&self, pointer: &str) -> Vec<String> {
        match self.get(pointer) {
            Some(Value::Array(items)) => (0..items.len())
                .map(|i| join_pointer(pointer, &i.to_string()))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn register(&mut self, pointer: String, value: &Value) {
        let id = FragmentId(self.pointers.len());
        self.names.push(declared_name(&pointer));
        self.index.insert(pointer.clone(), id);
        self.pointers.push(pointer.clone());

        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    self.register(join_pointer(&pointer, key), child);
                }
            }
            Value::Array(items) => {
                for (i, child) in items.iter().enumerate() {
                    self.register(join_pointer(&pointer, &i.to_string()), child);
                }
            }
            _ => {}
        }
    }
}
