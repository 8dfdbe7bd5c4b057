//! # Curie Resolution
//!
//! Every relation name a [`Resource`](crate::Resource) stores or looks up passes through
//! [`CurieResolver::resolve`], so `"ex:widget"` and its expanded form `"/rels/widget"` always
//! land on the same table entry.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::document::{LinkEntry, CURIES};
use crate::error::HalError;
use crate::template::{self, Expander};

/// Relation-name normalizer built from a document's `curies` links.
#[derive(Debug, Clone, Default)]
pub struct CurieResolver {
    /// Curie name (prefix) → URI template containing `{rel}`.
    by_prefix: HashMap<String, String>,
}

impl CurieResolver {
    /// Builds the resolver from a raw `_links` table. Curies without a name are ignored.
    pub fn from_links(links: Option<&Map<String, Value>>) -> Result<Self, HalError> {
        let mut by_prefix = HashMap::new();
        let Some(curies) = links.and_then(|links| links.get(CURIES)) else {
            return Ok(Self { by_prefix });
        };

        let entry: LinkEntry = serde_json::from_value(curies.clone())?;
        for curie in entry.as_slice() {
            match &curie.name {
                Some(name) => {
                    by_prefix.insert(name.clone(), curie.href.clone());
                }
                None => debug!(href = %curie.href, "Ignoring curie without name"),
            }
        }
        Ok(Self { by_prefix })
    }

    pub fn is_empty(&self) -> bool {
        self.by_prefix.is_empty()
    }

    /// Normalizes a relation name.
    ///
    /// The text before the first `:` is the prefix. A registered prefix expands its template
    /// with `rel` set to the text after the colon (empty when there is no colon). Anything
    /// else comes back unchanged.
    pub fn resolve(&self, maybe_curie: &str, expander: &dyn Expander) -> String {
        if self.by_prefix.is_empty() {
            return maybe_curie.to_string();
        }
        let (prefix, rel) = maybe_curie.split_once(':').unwrap_or((maybe_curie, ""));
        match self.by_prefix.get(prefix) {
            Some(href) => expander.expand(href, &template::single("rel", rel)),
            None => maybe_curie.to_string(),
        }
    }
}
