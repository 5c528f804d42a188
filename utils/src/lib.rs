//! Shared infrastructure utilities for Moodping.
//!
//! This crate provides cross-cutting utilities that multiple Moodping crates need
//! but that don't belong in the domain-pure `moodping-types` crate:
//!
//! - **`atomic_write`**: Crash-safe file persistence (temp + rename)

pub mod atomic_write;

pub use atomic_write::{atomic_write, recover_bak_file};
