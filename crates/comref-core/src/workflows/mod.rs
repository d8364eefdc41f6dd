//! # Workflows Module
//!
//! The entry points a molecular dynamics driver calls.
//!
//! [`reference::PullReference`] is built once from the configuration and the first
//! coordinate frame, then advanced once per simulation step. Each advance unwraps the
//! reference group, computes its center of mass, optionally smooths it, and in cylinder
//! mode rebuilds the per-pull-group local references.

pub mod reference;
