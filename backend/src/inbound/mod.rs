//! Inbound adapters: callers of the domain's driving ports.

pub mod http;
