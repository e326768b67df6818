//! # trail-session
//!
//! Request identity and the context-scoped store that carries it from the
//! request pipeline to save-time hooks.
//!
//! ## Scoping model
//!
//! Identity lives exactly as long as the scope that set it:
//!
//! - [`CurrentIdentity::enter`] returns a thread-scoped RAII guard for
//!   synchronous call paths (scripts, background jobs, `spawn_blocking`).
//! - [`CurrentIdentity::scope`] (feature `task-scope`) wraps a future in a
//!   task-local scope for async pipelines, where one thread interleaves many
//!   requests and a plain thread-local would leak identity between them.
//!
//! Cleanup is structural (guard drop or scope end), never a manual clear, so
//! identity cannot outlive its request even on panic or cancelled futures.

pub mod current;
pub mod identity;

pub use current::{CurrentIdentity, IdentityScope};
pub use identity::Identity;
