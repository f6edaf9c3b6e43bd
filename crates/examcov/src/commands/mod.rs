//! Command implementations for the examcov CLI.
//!
//! Each submodule implements one subcommand: an `Args` struct (clap derive)
//! and a `cmd_*` entry point that reads inputs, calls the core engine, and
//! prints text or JSON.

pub mod analyze;
pub mod attribute;
pub mod books;
pub mod info;
pub mod recommend;
