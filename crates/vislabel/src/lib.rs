//! Command line tooling for visibility labels.
//!
//! This library powers the `vislabel` binary: it validates labels, prints
//! their parse trees, normalises them, quotes authorisation tokens and
//! evaluates labels against a set of authorisations.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
mod output;
