//! Core library for the `flowramp` CLI.
//!
//! This crate provides the building blocks used by the binary: the ordered
//! flow catalog, schedule validation, the HTTP clients for the traffic
//! generator and the provisioning API, the flow variation controller, the S3
//! flows manifest, and the metrics monitor. The primary user-facing interface
//! is the `flowramp` command-line application; library APIs may evolve as the
//! CLI grows.
pub mod args;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod manifest;
pub mod metrics;
pub mod provisioning;
pub mod schedule;
pub mod transmission;
