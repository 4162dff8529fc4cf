//! Shared domain primitives for the LMS backend.
//!
//! Holds the error taxonomy, common type aliases, and the role model used by
//! every other crate in the workspace.

pub mod error;
pub mod roles;
pub mod types;
