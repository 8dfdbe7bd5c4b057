//! # HAL Document Model
//!
//! Serde types for the parts of a HAL document the navigator interprets. Everything else
//! in a document stays an untyped [`serde_json::Value`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved key holding the relation → link table.
pub const LINKS: &str = "_links";

/// Reserved key holding the relation → embedded document table.
pub const EMBEDDED: &str = "_embedded";

/// Relation under which a document advertises its curies.
pub const CURIES: &str = "curies";

/// Relation identifying a resource's canonical location.
pub const SELF: &str = "self";

/// A HAL document as received from the transport.
pub type RawDocument = Value;

/// A single HAL link object (`{"href": ..., "templated": ..., "name": ...}`).
///
/// Unknown attributes (`title`, `type`, `deprecation`, ...) are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkDescriptor {
    pub href: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub templated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl LinkDescriptor {
    /// A plain, non-templated link.
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            templated: false,
            name: None,
            extra: Map::new(),
        }
    }

    /// A link whose href is an RFC6570 URI template.
    pub fn templated(href: impl Into<String>) -> Self {
        Self {
            templated: true,
            ..Self::new(href)
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// The value stored under one relation in `_links`: one link or an ordered list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkEntry {
    One(LinkDescriptor),
    Many(Vec<LinkDescriptor>),
}

impl LinkEntry {
    /// All descriptors under the relation, in document order.
    pub fn as_slice(&self) -> &[LinkDescriptor] {
        match self {
            LinkEntry::One(link) => std::slice::from_ref(link),
            LinkEntry::Many(links) => links,
        }
    }

    /// The first (or only) descriptor.
    pub fn first(&self) -> Option<&LinkDescriptor> {
        self.as_slice().first()
    }
}

/// Coerces a one-or-many JSON value into an ordered list.
pub(crate) fn one_or_many(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

/// Borrows a reserved table (`_links` / `_embedded`) of a document, if present.
pub(crate) fn table<'a>(doc: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    doc.get(key).and_then(Value::as_object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_link_entry_one_or_many() {
        let one: LinkEntry = serde_json::from_value(json!({ "href": "/orders" })).unwrap();
        assert_eq!(one.as_slice().len(), 1);
        assert_eq!(one.first().unwrap().href, "/orders");

        let many: LinkEntry = serde_json::from_value(json!([
            { "href": "/results/1", "name": "X" },
            { "href": "/results/2", "name": "Y" }
        ]))
        .unwrap();
        let names: Vec<_> = many.as_slice().iter().filter_map(|l| l.name.as_deref()).collect();
        assert_eq!(names, vec!["X", "Y"]);
    }

    #[test]
    fn test_descriptor_keeps_extra_attributes() {
        let link: LinkDescriptor = serde_json::from_value(json!({
            "href": "/orders{?id}",
            "templated": true,
            "title": "Find an order"
        }))
        .unwrap();
        assert!(link.templated);
        assert_eq!(link.extra["title"], "Find an order");
        assert_eq!(serde_json::to_value(&link).unwrap()["title"], "Find an order");
    }

    #[test]
    fn test_descriptor_without_href_is_rejected() {
        assert!(serde_json::from_value::<LinkEntry>(json!({ "title": "nope" })).is_err());
    }
}
