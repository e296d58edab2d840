//! Route registration and dispatch.
//!
//! # Responsibilities
//! - Serialise registrations and publish the updated registry
//! - Resolve requests and invoke the matched handler
//! - Route misses and handler failures to the configured fallbacks
//!
//! # Design Decisions
//! - Registry published through `ArcSwap`; `route()` never takes a lock
//! - Registration is clone-on-write: a failed `add` publishes nothing.
//!   Each `add` copies the whole registry, so registering N routes costs
//!   O(N²); registration is a startup-only activity
//! - Resolution completes before any handler runs, so the request context
//!   is consumed exactly once (including the trailing-slash retry)
//! - The trailing-slash retry runs on any miss, not only `NotFound`, since
//!   `/a/b/` splits like `/a/b` and can hit a parameter route registered
//!   for another method first
//! - Handler failures are values (`Result`), recovered only by the
//!   error handler

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;

use crate::config::RoutingConfig;
use crate::routing::error::RouteResult;
use crate::routing::handler::{BoxError, BoxedHandler, Handler};
use crate::routing::introspect::RouteTable;
use crate::routing::matcher::{Matcher, RouteOutcome, ScanMode};
use crate::routing::params::Params;
use crate::routing::registry::Registry;

/// Thread-safe request dispatcher.
///
/// `C` is the per-request context handed to handlers, `R` their response.
pub struct Dispatcher<C, R> {
    registry: ArcSwap<Registry<BoxedHandler<C, R>>>,
    write_lock: Mutex<()>,
    not_found: Option<BoxedHandler<C, R>>,
    method_not_allowed: Option<BoxedHandler<C, R>>,
    error_handler: Option<BoxedHandler<C, R>>,
    trim_trailing_slash: bool,
    scan: ScanMode,
}

impl<C: 'static, R: 'static> Dispatcher<C, R> {
    /// Dispatcher with no fallback handlers and default routing options.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> DispatcherBuilder<C, R> {
        DispatcherBuilder::default()
    }

    /// Register a closure for `method` on `pattern`.
    ///
    /// Returns `self` so registrations can be chained with `?`.
    pub fn add<F>(&self, method: &str, pattern: &str, handler: F) -> RouteResult<&Self>
    where
        F: Fn(C, Params) -> Result<R, BoxError> + Send + Sync + 'static,
    {
        self.register(method, pattern, BoxedHandler::new(handler), "")
    }

    /// Like [`add`](Self::add), recording a documentation reference.
    pub fn add_with_ref<F>(
        &self,
        method: &str,
        pattern: &str,
        reference: &str,
        handler: F,
    ) -> RouteResult<&Self>
    where
        F: Fn(C, Params) -> Result<R, BoxError> + Send + Sync + 'static,
    {
        self.register(method, pattern, BoxedHandler::new(handler), reference)
    }

    /// Register any [`Handler`] implementation.
    pub fn add_handler<H: Handler<C, R>>(
        &self,
        method: &str,
        pattern: &str,
        handler: H,
        reference: &str,
    ) -> RouteResult<&Self> {
        self.register(method, pattern, BoxedHandler::new(handler), reference)
    }

    fn register(
        &self,
        method: &str,
        pattern: &str,
        handler: BoxedHandler<C, R>,
        reference: &str,
    ) -> RouteResult<&Self> {
        // The registry is only replaced after a successful registration,
        // so a poisoned lock guards no partial state.
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let current = self.registry.load_full();
        let mut next = (*current).clone();
        if let Err(err) = next.register(method, pattern, handler, reference) {
            tracing::debug!(method, pattern, error = %err, "Route registration rejected");
            return Err(err);
        }
        self.registry.store(Arc::new(next));
        Ok(self)
    }

    /// Resolve without invoking any handler.
    pub fn resolve(&self, method: &str, path: &str) -> RouteOutcome {
        let registry = self.registry.load();
        Matcher::new(&**registry, self.scan).resolve(method, path)
    }

    /// Resolve without invoking any handler, applying the trailing-slash
    /// retry when `trim` is set.
    pub fn resolve_with(&self, method: &str, path: &str, trim: bool) -> RouteOutcome {
        let registry = self.registry.load();
        resolve_trimmed(&Matcher::new(&**registry, self.scan), method, path, trim)
    }

    /// `(path_exists, method_allowed)` for a request.
    pub fn can_route(&self, method: &str, path: &str) -> (bool, bool) {
        self.resolve(method, path).capability()
    }

    /// Snapshot of the registered routes for documentation tooling.
    pub fn table(&self) -> RouteTable {
        RouteTable::from_registry(&**self.registry.load())
    }

    /// Number of distinct registered patterns.
    pub fn len(&self) -> usize {
        self.registry.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.load().is_empty()
    }

    pub fn trim_trailing_slash(&self) -> bool {
        self.trim_trailing_slash
    }

    pub fn scan_mode(&self) -> ScanMode {
        self.scan
    }
}

impl<C: Clone + 'static, R: 'static> Dispatcher<C, R> {
    /// Route a request using the configured trailing-slash default.
    ///
    /// `Ok(None)` means nothing matched and no fallback handler was set.
    pub fn route(&self, method: &str, path: &str, ctx: C) -> Result<Option<R>, BoxError> {
        self.route_with(method, path, ctx, self.trim_trailing_slash)
    }

    /// Route a request, retrying once without a trailing '/' when `trim`
    /// is set and the first attempt does not match.
    pub fn route_with(
        &self,
        method: &str,
        path: &str,
        ctx: C,
        trim: bool,
    ) -> Result<Option<R>, BoxError> {
        let (outcome, handler) = {
            let registry = self.registry.load();
            let matcher = Matcher::new(&**registry, self.scan);

            let outcome = resolve_trimmed(&matcher, method, path, trim);

            let handler = match &outcome {
                RouteOutcome::Matched { handler, .. } => registry.handler(*handler).cloned(),
                _ => None,
            };
            (outcome, handler)
        };

        match outcome {
            RouteOutcome::Matched { params, .. } => match handler {
                Some(handler) => self.invoke(&handler, ctx, params),
                None => Ok(None),
            },
            RouteOutcome::MethodNotAllowed => match &self.method_not_allowed {
                Some(handler) => self.invoke(handler, ctx, Params::new()),
                None => Ok(None),
            },
            RouteOutcome::NotFound => match &self.not_found {
                Some(handler) => self.invoke(handler, ctx, Params::new()),
                None => Ok(None),
            },
        }
    }

    fn invoke(
        &self,
        handler: &BoxedHandler<C, R>,
        ctx: C,
        params: Params,
    ) -> Result<Option<R>, BoxError> {
        let Some(error_handler) = &self.error_handler else {
            return handler.call(ctx, params).map(Some);
        };

        match handler.call(ctx.clone(), params) {
            Ok(response) => Ok(Some(response)),
            Err(err) => {
                tracing::warn!(error = %err, "Handler failed, invoking error handler");
                error_handler.call(ctx, Params::new()).map(Some)
            }
        }
    }
}

/// A retried match wins; otherwise the first outcome stands unless it was
/// `NotFound`.
fn resolve_trimmed<H>(
    matcher: &Matcher<'_, H>,
    method: &str,
    path: &str,
    trim: bool,
) -> RouteOutcome {
    let outcome = matcher.resolve(method, path);
    if !trim || outcome.is_matched() {
        return outcome;
    }
    let Some(trimmed) = path.strip_suffix('/').filter(|p| !p.is_empty()) else {
        return outcome;
    };

    tracing::trace!(method, path, "Retrying without trailing slash");
    let retried = matcher.resolve(method, trimmed);
    if retried.is_matched() || outcome == RouteOutcome::NotFound {
        retried
    } else {
        outcome
    }
}

impl<C: 'static, R: 'static> Default for Dispatcher<C, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: 'static, R: 'static> fmt::Debug for Dispatcher<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.len())
            .field("not_found", &self.not_found.is_some())
            .field("method_not_allowed", &self.method_not_allowed.is_some())
            .field("error_handler", &self.error_handler.is_some())
            .field("trim_trailing_slash", &self.trim_trailing_slash)
            .field("scan", &self.scan)
            .finish()
    }
}

/// Configures fallback handlers and routing options.
pub struct DispatcherBuilder<C, R> {
    not_found: Option<BoxedHandler<C, R>>,
    method_not_allowed: Option<BoxedHandler<C, R>>,
    error_handler: Option<BoxedHandler<C, R>>,
    trim_trailing_slash: bool,
    scan: ScanMode,
}

impl<C, R> Default for DispatcherBuilder<C, R> {
    fn default() -> Self {
        Self {
            not_found: None,
            method_not_allowed: None,
            error_handler: None,
            trim_trailing_slash: false,
            scan: ScanMode::default(),
        }
    }
}

impl<C: 'static, R: 'static> DispatcherBuilder<C, R> {
    /// Invoked when no pattern matches the request path.
    pub fn not_found<F>(mut self, handler: F) -> Self
    where
        F: Fn(C, Params) -> Result<R, BoxError> + Send + Sync + 'static,
    {
        self.not_found = Some(BoxedHandler::new(handler));
        self
    }

    /// Invoked when a pattern matches but not for the request method.
    pub fn method_not_allowed<F>(mut self, handler: F) -> Self
    where
        F: Fn(C, Params) -> Result<R, BoxError> + Send + Sync + 'static,
    {
        self.method_not_allowed = Some(BoxedHandler::new(handler));
        self
    }

    /// Invoked with an empty binding when a handler fails.
    pub fn error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(C, Params) -> Result<R, BoxError> + Send + Sync + 'static,
    {
        self.error_handler = Some(BoxedHandler::new(handler));
        self
    }

    pub fn trim_trailing_slash(mut self, trim: bool) -> Self {
        self.trim_trailing_slash = trim;
        self
    }

    pub fn scan_mode(mut self, scan: ScanMode) -> Self {
        self.scan = scan;
        self
    }

    /// Apply the `[routing]` section of a service config.
    pub fn with_config(self, config: &RoutingConfig) -> Self {
        self.trim_trailing_slash(config.trim_trailing_slash)
            .scan_mode(config.scan)
    }

    pub fn build(self) -> Dispatcher<C, R> {
        Dispatcher {
            registry: ArcSwap::from_pointee(Registry::new()),
            write_lock: Mutex::new(()),
            not_found: self.not_found,
            method_not_allowed: self.method_not_allowed,
            error_handler: self.error_handler,
            trim_trailing_slash: self.trim_trailing_slash,
            scan: self.scan,
        }
    }
}
