//! Transports over the settings registry

pub mod native;
pub mod rest;
