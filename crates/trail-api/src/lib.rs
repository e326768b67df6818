//! # trail-api
//!
//! actix-web integration: the middleware that captures the acting user and
//! session key for each request and scopes them for save-time hooks.
//!
//! ## Pipeline ordering
//!
//! [`IdentityMiddleware`] must run *after* the application's authentication
//! and session layers, since it reads what they resolved. In actix terms it is
//! registered *before* them on the `App`, since the last registered wrap is
//! the outermost:
//!
//! ```rust,ignore
//! App::new()
//!     .wrap(IdentityMiddleware::new(config))   // inner: sees RequestIdentity
//!     .wrap(MyAuthMiddleware)                  // outer: inserts RequestIdentity
//! ```

pub mod middleware;
pub mod request_identity;

pub use middleware::IdentityMiddleware;
pub use request_identity::RequestIdentity;
