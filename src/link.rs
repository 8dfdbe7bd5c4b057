//! # Links
//!
//! A [`Link`] is a cheap, value-like handle around a [`LinkDescriptor`]. It is never cached;
//! resources hand out a fresh one on every lookup. [`Link::fetch`] is where the cache and the
//! transport meet:
//!
//! 1. cache hit (and no `revalidate`) → the cached resource, no transport call
//! 2. otherwise `GET href` → parse → register under `href` and the self-link
//! 3. on transport failure → one warning, then forward or reject per
//!    [`FailureMode`](crate::processor::FailureMode)

use std::sync::{Arc, Weak};

use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::document::LinkDescriptor;
use crate::error::HalError;
use crate::processor::{Context, FailureMode};
use crate::resource::Resource;
use crate::template::Expander;
use crate::transport::{RequestOptions, Transport, TransportFailure};

/// What a [`Processor::link`](crate::Processor::link) can be built from: a bare uri or a
/// HAL link object.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkSpec {
    Href(String),
    Descriptor(LinkDescriptor),
}

impl From<&str> for LinkSpec {
    fn from(href: &str) -> Self {
        LinkSpec::Href(href.to_string())
    }
}

impl From<String> for LinkSpec {
    fn from(href: String) -> Self {
        LinkSpec::Href(href)
    }
}

impl From<LinkDescriptor> for LinkSpec {
    fn from(link: LinkDescriptor) -> Self {
        LinkSpec::Descriptor(link)
    }
}

impl From<&LinkDescriptor> for LinkSpec {
    fn from(link: &LinkDescriptor) -> Self {
        LinkSpec::Descriptor(link.clone())
    }
}

impl From<LinkSpec> for LinkDescriptor {
    fn from(spec: LinkSpec) -> Self {
        match spec {
            LinkSpec::Href(href) => LinkDescriptor::new(href),
            LinkSpec::Descriptor(link) => link,
        }
    }
}

/// Options for [`Link::fetch`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Skip the cache lookup and always `GET`; the fresh result replaces the cache entry.
    pub revalidate: bool,
}

impl FetchOptions {
    pub fn revalidate() -> Self {
        Self { revalidate: true }
    }
}

/// Outcome of a fetch that reached the transport or the cache.
#[derive(Debug, Clone)]
pub enum Fetched {
    Resource(Arc<Resource>),
    /// The transport failed and the processor forwards failures as values.
    Failure { href: String, failure: TransportFailure },
}

impl Fetched {
    pub fn resource(&self) -> Option<&Arc<Resource>> {
        match self {
            Fetched::Resource(resource) => Some(resource),
            Fetched::Failure { .. } => None,
        }
    }

    pub fn failure(&self) -> Option<&TransportFailure> {
        match self {
            Fetched::Resource(_) => None,
            Fetched::Failure { failure, .. } => Some(failure),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Fetched::Failure { .. })
    }

    /// Turns a forwarded failure into [`HalError::Transport`].
    pub fn into_resource(self) -> Result<Arc<Resource>, HalError> {
        match self {
            Fetched::Resource(resource) => Ok(resource),
            Fetched::Failure { href, failure } => Err(HalError::Transport {
                href,
                status: failure.status,
            }),
        }
    }
}

/// A traversable link.
#[derive(Clone)]
pub struct Link {
    descriptor: LinkDescriptor,
    ctx: Weak<Context>,
    expander: Arc<dyn Expander>,
}

impl std::fmt::Debug for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Link").field("descriptor", &self.descriptor).finish()
    }
}

impl Link {
    pub(crate) fn new(spec: impl Into<LinkSpec>, ctx: Weak<Context>, expander: Arc<dyn Expander>) -> Self {
        let spec: LinkSpec = spec.into();
        Self {
            descriptor: spec.into(),
            ctx,
            expander,
        }
    }

    /// The literal (possibly templated) href.
    pub fn href(&self) -> &str {
        &self.descriptor.href
    }

    pub fn name(&self) -> Option<&str> {
        self.descriptor.name.as_deref()
    }

    pub fn is_templated(&self) -> bool {
        self.descriptor.templated
    }

    pub fn descriptor(&self) -> &LinkDescriptor {
        &self.descriptor
    }

    /// Expands a templated href with `parameters` (a JSON object); plain hrefs come back
    /// unchanged.
    pub fn instantiate(&self, parameters: &Value) -> String {
        if !self.descriptor.templated {
            return self.descriptor.href.clone();
        }
        let empty = Map::new();
        let params = parameters.as_object().unwrap_or(&empty);
        self.expander.expand(&self.descriptor.href, params)
    }

    /// Resolves the resource behind this link.
    ///
    /// Concurrent fetches of the same href wait for each other, so a non-revalidating fetch
    /// that arrives while another one is in flight is answered from the cache.
    #[instrument(level = "debug", skip_all, fields(href = %self.descriptor.href))]
    pub async fn fetch(&self, options: FetchOptions) -> Result<Fetched, HalError> {
        let ctx = self.ctx.upgrade().ok_or(HalError::ProcessorDropped)?;
        let href = self.href();

        if !options.revalidate {
            if let Some(hit) = ctx.cache.get(href) {
                debug!(%href, "Cache hit");
                return Ok(Fetched::Resource(hit));
            }
        }

        let flight = ctx.cache.flight(href);
        let _guard = flight.lock().await;
        if !options.revalidate {
            if let Some(hit) = ctx.cache.get(href) {
                debug!(%href, "Cache hit after concurrent fetch");
                return Ok(Fetched::Resource(hit));
            }
        }

        debug!(%href, revalidate = options.revalidate, "Cache miss");
        match ctx.transport.get(href, &RequestOptions::default()).await {
            Ok(response) => {
                let resource = Resource::parse(response.data, &ctx)?;
                ctx.cache.put(&resource, Some(href));
                info!(%href, status = response.status, "Fetched");
                Ok(Fetched::Resource(resource))
            }
            Err(failure) => {
                ctx.config
                    .logger()
                    .warn(&format!("GET failed for {} (status: {})", href, failure.status));
                match ctx.config.failure_mode() {
                    FailureMode::Forward => Ok(Fetched::Failure {
                        href: href.to_string(),
                        failure,
                    }),
                    FailureMode::Reject => Err(HalError::Transport {
                        href: href.to_string(),
                        status: failure.status,
                    }),
                }
            }
        }
    }

    /// `fetch` with default options, with a forwarded failure turned into an error.
    pub async fn fetch_resource(&self) -> Result<Arc<Resource>, HalError> {
        self.fetch(FetchOptions::default()).await?.into_resource()
    }
}
