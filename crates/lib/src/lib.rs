//! portc-lib: native port compilation
//!
//! This crate builds C/C++ sources into shared drivers and executables that a
//! runtime loads or spawns:
//! - `env`: resolves compiler templates and flags from defaults, the process
//!   environment, and platform-filtered overrides
//! - `spec`: turns the project config into compile/link units
//! - `build`: recompiles stale objects and relinks stale targets
//! - `deps` and `stale`: the dependency-file reader and mtime oracle behind
//!   those decisions

pub mod build;
pub mod config;
pub mod deps;
pub mod env;
pub mod error;
pub mod placeholder;
pub mod platform;
pub mod shell;
pub mod spec;
pub mod stale;
pub mod vars;

#[cfg(test)]
mod util;
