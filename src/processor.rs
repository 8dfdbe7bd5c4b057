//! # Processor
//!
//! The processor is the dependency-injection point of the navigator: it takes a
//! [`Transport`] and a [`ProcessorConfig`], owns exactly one [`ResourceCache`], and hands out
//! [`Link`]s and [`Resource`]s bound to that cache.
//!
//! Each processor is its own cache universe. Two processors never see each other's
//! resources, even when they browse the same API.
//!
//! ```rust
//! use std::sync::Arc;
//! use hal_navigator::{FailureMode, Processor, ProcessorConfig};
//! use hal_navigator::transport::mock::MockTransport;
//! use serde_json::json;
//!
//! let config = ProcessorConfig::default()
//!     .with_failure_mode(FailureMode::Reject)
//!     .with_protect(|value| value);
//! let hal = Processor::new(Arc::new(MockTransport::new()), config);
//!
//! let orders = hal
//!     .resource(json!({
//!         "_links": { "next": { "href": "/orders?page=2" } },
//!         "shippedToday": 20
//!     }))
//!     .unwrap();
//! assert_eq!(orders.link("next").unwrap().href(), "/orders?page=2");
//! ```

use std::sync::Arc;

use serde_json::Value;

use crate::cache::ResourceCache;
use crate::document::RawDocument;
use crate::error::HalError;
use crate::link::{Link, LinkSpec};
use crate::logging::{Logger, TracingLogger};
use crate::resource::Resource;
use crate::template::{Expander, Rfc6570};
use crate::transport::Transport;

/// Transformation applied to every value handed out by [`Resource::hal`] and
/// [`Resource::properties`].
pub type Protect = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// How transport failures surface from `fetch` / `follow*`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailureMode {
    /// The failure is returned as [`Fetched::Failure`](crate::Fetched::Failure) inside `Ok`.
    /// Callers must inspect the value to tell success from failure.
    #[default]
    Forward,
    /// The failure becomes [`HalError::Transport`].
    Reject,
}

/// Processor configuration.
#[derive(Clone)]
pub struct ProcessorConfig {
    protect: Protect,
    logger: Arc<dyn Logger>,
    expander: Arc<dyn Expander>,
    failure_mode: FailureMode,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            protect: Arc::new(|value: Value| value),
            logger: Arc::new(TracingLogger),
            expander: Arc::new(Rfc6570),
            failure_mode: FailureMode::default(),
        }
    }
}

impl std::fmt::Debug for ProcessorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorConfig")
            .field("failure_mode", &self.failure_mode)
            .finish_non_exhaustive()
    }
}

impl ProcessorConfig {
    /// Sets the protection function (default: identity).
    pub fn with_protect(mut self, protect: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        self.protect = Arc::new(protect);
        self
    }

    /// Sets the sink for transport-failure warnings (default: [`TracingLogger`]).
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Sets the URI-Template implementation (default: [`Rfc6570`]).
    pub fn with_expander(mut self, expander: Arc<dyn Expander>) -> Self {
        self.expander = expander;
        self
    }

    pub fn with_failure_mode(mut self, failure_mode: FailureMode) -> Self {
        self.failure_mode = failure_mode;
        self
    }

    pub fn protect(&self) -> &Protect {
        &self.protect
    }

    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }

    pub fn expander(&self) -> &Arc<dyn Expander> {
        &self.expander
    }

    pub fn failure_mode(&self) -> FailureMode {
        self.failure_mode
    }
}

/// State shared by everything one processor creates.
pub(crate) struct Context {
    pub(crate) cache: ResourceCache,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) config: ProcessorConfig,
}

/// Factory for links and resources sharing one cache.
///
/// Cloning a processor shares its cache; create a new one for an isolated universe.
/// Resources and links only hold a weak reference back, so dropping the last processor
/// handle frees the cache.
#[derive(Clone)]
pub struct Processor {
    ctx: Arc<Context>,
}

impl Processor {
    pub fn new(transport: Arc<dyn Transport>, config: ProcessorConfig) -> Self {
        Self {
            ctx: Arc::new(Context {
                cache: ResourceCache::new(),
                transport,
                config,
            }),
        }
    }

    /// Creates a traversable link from a uri or a HAL link object.
    pub fn link(&self, spec: impl Into<LinkSpec>) -> Link {
        Link::new(spec, Arc::downgrade(&self.ctx), self.ctx.config.expander.clone())
    }

    /// Parses a HAL document. Embedded resources land in the cache immediately; the
    /// document itself does not.
    pub fn resource(&self, doc: RawDocument) -> Result<Arc<Resource>, HalError> {
        Resource::parse(doc, &self.ctx)
    }

    /// Href-keyed cache probe.
    pub fn cached(&self, href: &str) -> Option<Arc<Resource>> {
        self.ctx.cache.get(href)
    }

    /// Number of hrefs currently cached.
    pub fn cache_len(&self) -> usize {
        self.ctx.cache.len()
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.ctx.config
    }
}
