//! # qbx - One-Shot Qt Build Orchestrator
//!
//! qbx builds a Qt/MinGW application in one shot: it generates required
//! meta-object glue code, compiles every translation unit in parallel, links
//! one executable and optionally packages it with its runtime dependencies
//! into a distributable zip archive.
//!
//! ## Quick Start
//!
//! ```bash
//! # Create a default qbx.toml
//! qbx init
//!
//! # Build, then build and package
//! qbx build
//! qbx build --pack
//! ```
//!
//! ## Module Organization
//!
//! - [`build`] - The build pipeline: code generation, concurrent
//!   compilation, linking
//! - [`config`] - Configuration parsing (`qbx.toml`)
//! - [`toolkit`] - Toolkit installation validation and tool resolution
//! - [`package`] - Deployment and archive packaging

/// Core build pipeline with parallel compilation.
pub mod build;

/// Configuration file parsing (`qbx.toml`).
pub mod config;

/// Build pipeline error taxonomy.
pub mod error;

/// Deployment and archive packaging.
pub mod package;

/// Toolkit validation and tool resolution.
pub mod toolkit;
