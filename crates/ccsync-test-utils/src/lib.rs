//! Shared test utilities for the claude-code-sync workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`]: git repository fixtures (working copies and bare remotes)
//! - [`home`]: [`home::TestHome`], a temporary home directory laid out the
//!   way the sync tool expects

pub mod git;
pub mod home;
