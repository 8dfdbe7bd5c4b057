//! # Resource Cache
//!
//! One [`ResourceCache`] per [`Processor`](crate::Processor). It maps hrefs to parsed
//! resources and is never shared between processors. Entries are never evicted; the cache
//! grows for the lifetime of its processor.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::debug;

use crate::resource::Resource;

/// href → [`Resource`] map with last-write-wins semantics.
#[derive(Default)]
pub struct ResourceCache {
    entries: RwLock<HashMap<String, Arc<Resource>>>,
    /// One async lock per href, held while that href is being fetched.
    flights: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Href-keyed lookup.
    pub fn get(&self, href: &str) -> Option<Arc<Resource>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(href).cloned()
    }

    /// Registers `resource` under `href` (if given) and under its own self-link (if any).
    pub fn put(&self, resource: &Arc<Resource>, href: Option<&str>) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(href) = href {
            entries.insert(href.to_string(), resource.clone());
        }
        if let Some(self_href) = resource.self_href() {
            entries.insert(self_href.to_string(), resource.clone());
        }
        debug!(?href, self_href = ?resource.self_href(), size = entries.len(), "Cached");
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The lock that serializes fetches of `href`.
    pub(crate) fn flight(&self, href: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut flights = self.flights.lock().unwrap_or_else(PoisonError::into_inner);
        flights.entry(href.to_string()).or_default().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;
    use crate::{Processor, ProcessorConfig};
    use serde_json::json;

    fn processor() -> Processor {
        Processor::new(Arc::new(MockTransport::new()), ProcessorConfig::default())
    }

    #[test]
    fn test_put_registers_href_and_self() {
        let hal = processor();
        let order = hal
            .resource(json!({ "_links": { "self": { "href": "/orders/523" } } }))
            .unwrap();

        let cache = ResourceCache::new();
        cache.put(&order, Some("/orders/latest"));

        assert_eq!(cache.len(), 2);
        assert!(Arc::ptr_eq(&cache.get("/orders/latest").unwrap(), &order));
        assert!(Arc::ptr_eq(&cache.get("/orders/523").unwrap(), &order));
    }

    #[test]
    fn test_put_without_href_or_self_is_noop() {
        let hal = processor();
        let anonymous = hal.resource(json!({ "total": 1 })).unwrap();

        let cache = ResourceCache::new();
        cache.put(&anonymous, None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_last_write_wins() {
        let hal = processor();
        let first = hal.resource(json!({ "_links": { "self": { "href": "/a" } }, "v": 1 })).unwrap();
        let second = hal.resource(json!({ "_links": { "self": { "href": "/a" } }, "v": 2 })).unwrap();

        let cache = ResourceCache::new();
        cache.put(&first, None);
        cache.put(&second, None);
        assert_eq!(cache.get("/a").unwrap().properties()["v"], 2);
    }

    #[test]
    fn test_flight_lock_is_shared_per_href() {
        let cache = ResourceCache::new();
        assert!(Arc::ptr_eq(&cache.flight("/a"), &cache.flight("/a")));
        assert!(!Arc::ptr_eq(&cache.flight("/a"), &cache.flight("/b")));
    }
}
