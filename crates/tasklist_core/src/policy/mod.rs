//! Pure projection and query-window policies.
//!
//! # Invariants
//! - Policies never fail and never touch storage.

pub mod filter;
pub mod window;
