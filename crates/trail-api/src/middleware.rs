//! Identity-capturing middleware.
//!
//! For each non-exempt request this middleware:
//! 1. Reads the resolved user/session from the [`RequestIdentity`] request
//!    extension (inserted by the upstream auth layer), falling back to the
//!    session cookie for session-only identity
//! 2. Runs the rest of the request inside a task-local identity scope, so
//!    any record saved while handling the request is attributed to it
//! 3. Lets the scope end with the request future, so identity never leaks
//!    into other requests sharing the worker, including on error paths
//!
//! Exempt methods (read-only traffic by default) and the configuration kill
//! switch skip capture entirely; requests pass through unmodified.
//!
//! Built without the `task-scope` feature the middleware is still
//! constructible and passes every request through unmodified, with a
//! one-time warning.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
};
use trail_commons::{AuditConfig, SessionKey};
use trail_session::Identity;

use crate::request_identity::RequestIdentity;

/// Cookie consulted when no [`RequestIdentity`] extension is present.
pub const SESSION_COOKIE: &str = "session_key";

/// Identity-capturing middleware factory.
pub struct IdentityMiddleware {
    config: Arc<AuditConfig>,
}

impl IdentityMiddleware {
    /// Creates the middleware with the given audit configuration.
    pub fn new(config: AuditConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl Default for IdentityMiddleware {
    fn default() -> Self {
        Self::new(AuditConfig::default())
    }
}

impl<S, B> Transform<S, ServiceRequest> for IdentityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = IdentityMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IdentityMiddlewareService {
            service: Rc::new(service),
            config: self.config.clone(),
        }))
    }
}

/// Identity-capturing middleware service instance.
pub struct IdentityMiddlewareService<S> {
    service: Rc<S>,
    config: Arc<AuditConfig>,
}

impl<S, B> Service<ServiceRequest> for IdentityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        if self.config.disabled || self.config.is_exempt_method(req.method().as_str()) {
            return Box::pin(async move { service.call(req).await });
        }

        let identity = extract_identity(&req);
        log::debug!(
            "captured identity for {} {}: user={:?} session={:?}",
            req.method(),
            req.path(),
            identity.user,
            identity.session_key
        );

        #[cfg(feature = "task-scope")]
        {
            Box::pin(trail_session::CurrentIdentity::scope(identity, async move {
                service.call(req).await
            }))
        }

        #[cfg(not(feature = "task-scope"))]
        {
            let _ = identity;
            warn_task_scope_unavailable();
            Box::pin(async move { service.call(req).await })
        }
    }
}

/// Resolves the request's identity from extension or session cookie.
fn extract_identity(req: &ServiceRequest) -> Identity {
    if let Some(request_identity) = req.extensions().get::<RequestIdentity>() {
        return request_identity.clone().into();
    }

    match req.request().cookie(SESSION_COOKIE) {
        Some(cookie) => Identity::with_session(SessionKey::new(cookie.value())),
        None => Identity::anonymous(),
    }
}

#[cfg(not(feature = "task-scope"))]
fn warn_task_scope_unavailable() {
    use std::sync::Once;
    static WARNED: Once = Once::new();
    WARNED.call_once(|| {
        log::warn!(
            "trail-api built without the 'task-scope' feature; \
             requests pass through without identity capture"
        );
    });
}
