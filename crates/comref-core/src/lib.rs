//! # comref Core Library
//!
//! Center-of-mass reference points for pulling restraints in periodic molecular dynamics.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture so that the per-step hot path stays
//! small and every piece can be tested in isolation.
//!
//! - **[`core`]: The Foundation.** Stateless geometry on the periodic box, the switching
//!   kernel, mass-weighted centers, index groups and trajectory input.
//!
//! - **[`engine`]: The Logic Core.** The stateful machinery that persists between
//!   simulation steps: the PBC unwrap tracker, running-average history buffers and the
//!   cylindrical dynamic reference-group builder, together with configuration and errors.
//!
//! - **[`workflows`]: The Public API.** `PullReference` ties the engine together and runs
//!   the per-step control flow: unwrap, center, smooth, and (in cylinder mode) rebuild the
//!   local reference groups.

pub mod core;
pub mod engine;
pub mod workflows;
