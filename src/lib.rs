// Main library entry point for actdiff.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;
