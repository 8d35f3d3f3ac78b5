//! # bindersift Core Library
//!
//! A library for reconciling heterogeneous structure-prediction output
//! batches into one consistent ranking signal: it discovers candidate
//! job directories, parses two predictor output dialects, resolves one
//! representative interface-confidence scalar per candidate, recovers
//! the designed sequences, and emits a deterministic ranked report.
//!
//! ## Architectural Philosophy
//!
//! The library keeps a strict three-layer architecture so each concern
//! stays testable in isolation.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`JobRecord`,
//!   `RankedEntry`, the dialect chain tables) and pure parsers for the
//!   artifact formats (summary JSON, launch documents, the compressed
//!   pairwise-error matrix, the external tool's score table).
//!
//! - **[`engine`]: The Logic Core.** The stateful pipeline pieces:
//!   directory discovery, the per-dialect schema adapters, the score
//!   resolver with its invocation cache, sequence recovery, and the
//!   progress/error plumbing.
//!
//! - **[`workflows`]: The Public API.** Complete procedures built on
//!   the engine: [`workflows::scan`] runs the parallel batch scan and
//!   [`workflows::rank`] turns the scanned records into the report.

pub mod core;
pub mod engine;
pub mod workflows;
