//! Service tests for the remote store backends

pub mod fixtures;
