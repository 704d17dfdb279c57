//! Thin runners for external reconnaissance binaries.
//!
//! Each run checks that the tool answers `-version`, executes it against a
//! single target with a timeout, and writes whatever usable output it produced
//! to `outputs/<timestamp>-<tool>.txt`.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
