//! # Engine Module
//!
//! The stateful half of the library: everything that must survive from one simulation
//! step to the next, plus the configuration that shapes it.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Reference groups, history depth and cylinder radii
//! - **Error Handling** ([`error`]) - Failures raised while setting up or advancing a step
//! - **PBC Unwrapping** ([`unwrap`]) - Continuous shadow coordinates of the reference group
//! - **Running Averages** ([`history`]) - Fixed-depth COM histories per tracked entity
//! - **Dynamic Groups** ([`dynamic`]) - Per-step cylindrical local reference groups
//!
//! All state is allocated when it is constructed and reused afterwards; nothing in the
//! per-step path allocates once the buffers have reached their working size.

pub mod config;
pub mod dynamic;
pub mod error;
pub mod history;
pub mod unwrap;
