//! Integration suites against the in-memory host.

pub mod guards;
pub mod scenarios;
