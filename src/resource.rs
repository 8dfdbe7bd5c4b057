//! # Resources
//!
//! A [`Resource`] is the parsed view of one HAL document. Construction happens in a fixed
//! order:
//!
//! 1. the [`CurieResolver`] is built from `_links.curies`
//! 2. every `_links` relation is normalized and stored in the link table
//! 3. every `_embedded` document is parsed and registered in the processor's cache before
//!    it is stored in the embedded table
//!
//! Following a relation whose target was embedded therefore never reaches the transport.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Arc, Weak};

use futures::future::try_join_all;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::curie::CurieResolver;
use crate::document::{self, LinkEntry, RawDocument, EMBEDDED, LINKS, SELF};
use crate::error::HalError;
use crate::link::{FetchOptions, Fetched, Link};
use crate::processor::{Context, Protect};
use crate::template::Expander;

/// A parsed HAL document bound to the processor that created it.
pub struct Resource {
    hal: Map<String, Value>,
    links: BTreeMap<String, LinkEntry>,
    embedded: BTreeMap<String, Vec<Arc<Resource>>>,
    curies: CurieResolver,
    protect: Protect,
    expander: Arc<dyn Expander>,
    ctx: Weak<Context>,
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource")
            .field("self", &self.self_href())
            .field("links", &self.links.keys().collect::<Vec<_>>())
            .field("embedded", &self.embedded.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Resource {
    pub(crate) fn parse(doc: RawDocument, ctx: &Arc<Context>) -> Result<Arc<Self>, HalError> {
        let hal = match doc {
            Value::Object(hal) => hal,
            other => {
                return Err(HalError::InvalidDocument(format!(
                    "expected a JSON object, got {}",
                    kind(&other)
                )))
            }
        };
        for key in [LINKS, EMBEDDED] {
            if let Some(value) = hal.get(key).filter(|value| !value.is_object()) {
                return Err(HalError::InvalidDocument(format!(
                    "{key} must be an object, got {}",
                    kind(value)
                )));
            }
        }

        let expander = ctx.config.expander().clone();
        let raw_links = document::table(&hal, LINKS);
        let curies = CurieResolver::from_links(raw_links)?;

        let mut links = BTreeMap::new();
        for (relation, entry) in raw_links.into_iter().flatten() {
            let entry: LinkEntry = serde_json::from_value(entry.clone())?;
            links.insert(curies.resolve(relation, expander.as_ref()), entry);
        }

        let mut embedded = BTreeMap::new();
        for (relation, docs) in document::table(&hal, EMBEDDED).into_iter().flatten() {
            let relation = curies.resolve(relation, expander.as_ref());
            let mut resources = Vec::new();
            for doc in document::one_or_many(docs) {
                let resource = Resource::parse(doc.clone(), ctx)?;
                ctx.cache.put(&resource, None);
                resources.push(resource);
            }
            debug!(%relation, count = resources.len(), "Registered embedded resources");
            embedded.insert(relation, resources);
        }

        Ok(Arc::new(Self {
            hal,
            links,
            embedded,
            curies,
            protect: ctx.config.protect().clone(),
            expander,
            ctx: Arc::downgrade(ctx),
        }))
    }

    // --- Document views ---

    /// The full original document, passed through the protection function.
    pub fn hal(&self) -> Value {
        (self.protect)(Value::Object(self.hal.clone()))
    }

    /// Every top-level key except `_links` and `_embedded`, each value protected.
    pub fn properties(&self) -> Map<String, Value> {
        self.hal
            .iter()
            .filter(|(key, _)| key.as_str() != LINKS && key.as_str() != EMBEDDED)
            .map(|(key, value)| (key.clone(), (self.protect)(value.clone())))
            .collect()
    }

    /// Normalizes a relation name through this document's curies.
    pub fn normalize(&self, relation: &str) -> String {
        self.curies.resolve(relation, self.expander.as_ref())
    }

    /// Href of the self-link, if the document has one.
    pub fn self_href(&self) -> Option<&str> {
        self.links
            .get(&self.normalize(SELF))
            .and_then(LinkEntry::first)
            .map(|link| link.href.as_str())
    }

    // --- Links ---

    /// The full normalized link table.
    pub fn link_table(&self) -> &BTreeMap<String, LinkEntry> {
        &self.links
    }

    fn entry(&self, relation: &str) -> Result<&LinkEntry, HalError> {
        let relation = self.normalize(relation);
        match self.links.get(&relation) {
            Some(entry) if !entry.as_slice().is_empty() => Ok(entry),
            _ => Err(HalError::RelationNotFound(relation)),
        }
    }

    fn wrap(&self, descriptor: &document::LinkDescriptor) -> Link {
        Link::new(descriptor, self.ctx.clone(), self.expander.clone())
    }

    /// The first (or only) link under `relation`.
    pub fn link(&self, relation: &str) -> Result<Link, HalError> {
        let entry = self.entry(relation)?;
        let first = entry
            .first()
            .ok_or_else(|| HalError::RelationNotFound(self.normalize(relation)))?;
        Ok(self.wrap(first))
    }

    /// Every link under `relation`, in document order.
    pub fn links(&self, relation: &str) -> Result<Vec<Link>, HalError> {
        let entry = self.entry(relation)?;
        Ok(entry.as_slice().iter().map(|link| self.wrap(link)).collect())
    }

    /// The first link under `relation` whose `name` is `name`.
    pub fn link_named(&self, relation: &str, name: &str) -> Result<Link, HalError> {
        let entry = self.entry(relation)?;
        entry
            .as_slice()
            .iter()
            .find(|link| link.name.as_deref() == Some(name))
            .map(|link| self.wrap(link))
            .ok_or_else(|| HalError::NameNotFound {
                relation: self.normalize(relation),
                name: name.to_string(),
            })
    }

    // --- Embedded resources ---

    /// Resources embedded under `relation`; a single embedded document is a list of one.
    pub fn embedded(&self, relation: &str) -> Result<&[Arc<Resource>], HalError> {
        let relation = self.normalize(relation);
        self.embedded
            .get(&relation)
            .map(Vec::as_slice)
            .ok_or(HalError::RelationNotFound(relation))
    }

    /// Normalized relations present in `_embedded`.
    pub fn embedded_relations(&self) -> impl Iterator<Item = &str> {
        self.embedded.keys().map(String::as_str)
    }

    // --- Traversal ---

    /// Fetches the first link under `relation`.
    pub async fn follow(&self, relation: &str) -> Result<Fetched, HalError> {
        self.follow_with(relation, FetchOptions::default()).await
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn follow_with(&self, relation: &str, options: FetchOptions) -> Result<Fetched, HalError> {
        self.link(relation)?.fetch(options).await
    }

    /// Fetches the first link named `name` under a one-to-many relation.
    pub async fn follow_named(&self, relation: &str, name: &str) -> Result<Fetched, HalError> {
        self.link_named(relation, name)?
            .fetch(FetchOptions::default())
            .await
    }

    /// One pending fetch per link under `relation`, in [`links`](Self::links) order.
    pub fn follow_each(
        &self,
        relation: &str,
    ) -> Result<Vec<impl Future<Output = Result<Fetched, HalError>> + Send + 'static>, HalError> {
        let links = self.links(relation)?;
        Ok(links
            .into_iter()
            .map(|link| async move { link.fetch(FetchOptions::default()).await })
            .collect())
    }

    /// Joins [`follow_each`](Self::follow_each); the result keeps link order.
    pub async fn follow_all(&self, relation: &str) -> Result<Vec<Fetched>, HalError> {
        try_join_all(self.follow_each(relation)?).await
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
