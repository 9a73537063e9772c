//! Unified hardware-inventory capture for a data-center cluster.
//!
//! Pulls partial, overlapping hardware descriptions from four independent
//! management subsystems (a cabinet/network description file, a node-BMC
//! credential file, the management-switch discovery service, and the
//! node-role service), reconciles them into one canonical inventory keyed
//! by hierarchical physical-location identifier ("xname"), and publishes
//! the merged inventory to the system-layout registry.
//!
//! The reconciliation core lives in [`xname`] (hierarchy derivation),
//! [`sources`] (one normalizer per subsystem) and [`merge`] (ordered
//! last-writer-wins fold). [`publish`] is the registry boundary.

pub mod error;
pub mod merge;
pub mod model;
pub mod publish;
pub mod sources;
pub mod xname;
