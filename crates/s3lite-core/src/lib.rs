//! Embedded S3-compatible object engine.
//!
//! This crate implements the storage core behind an S3-compatible store for
//! development, test, CI, and offline environments: the versioning state
//! machine, conditional-request evaluation, per-key write serialization,
//! delete markers, object-lock enforcement, and the listing algorithms.
//!
//! # Architecture
//!
//! ```text
//! Typed surface (s3lite-model inputs/outputs)
//!        |
//!        v
//!    Engine (bucket registry, object engine, lister, multipart)
//!        |
//!   KeyLocker (per-(bucket, key) write serialization)
//!        |
//!        v
//!     Store (typed records over the substrate)
//!        |
//!        v
//!   Substrate (point get, atomic write batches, prefix scans)
//! ```
//!
//! Reads go straight to the store; writes serialize through the key locker
//! and commit head + archive records in a single atomic batch.

pub mod config;
pub mod engine;
pub mod idgen;
pub mod locker;
pub mod presign;
pub mod store;

pub use config::EngineConfig;
pub use engine::Engine;
pub use store::substrate::{MemorySubstrate, Substrate, WriteBatch};
