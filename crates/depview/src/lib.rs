//! Depview - explore object dependency graphs from the command line.
//!
//! This crate provides the `depview` CLI on top of the `depview-graph`
//! engine: configuration, snapshot loading, command dispatch and output
//! formatting.

#![forbid(unsafe_code)]

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
