//! Outbound adapters implementing the domain's driven ports.

pub mod captioner;
pub mod identity;
pub mod persistence;
