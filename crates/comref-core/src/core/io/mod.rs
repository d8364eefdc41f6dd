//! Reading coordinate frames from disk.
//!
//! Topology and index files are the business of the calling program; this module only
//! covers the plain per-atom coordinate tables used to replay a trajectory offline.

pub mod frames;
