//! # Core Module
//!
//! Stateless building blocks shared by the engine and the workflows.
//!
//! - **Periodic Geometry** ([`geometry`]) - Box lengths, image folding and cylinder distances
//! - **Switching Kernel** ([`switching`]) - Linear weight ramp between a core and a cutoff radius
//! - **Centers of Mass** ([`com`]) - Mass-weighted centroids of index-selected atoms
//! - **Group Models** ([`models`]) - Named index groups and their validation
//! - **File I/O** ([`io`]) - Reading coordinate frames for offline replay

pub mod com;
pub mod geometry;
pub mod io;
pub mod models;
pub mod switching;
