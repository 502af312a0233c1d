//! Typed request/response surface for the s3lite object engine.
//!
//! This crate defines the data types exchanged with the engine: input and
//! output structs for every operation, shared value types (owners, versioning
//! status, retention, listing entries), the [`Operation`] envelope for
//! dispatch-style callers, and the [`StorageError`] type with stable S3 error
//! codes and HTTP status mapping.
//!
//! No I/O happens here; a transport façade (HTTP, CLI, test harness)
//! translates its own representation into these types and hands them to the
//! engine crate.

pub mod error;
pub mod input;
pub mod operations;
pub mod output;
pub mod request;
pub mod types;

pub use error::{StorageError, StorageResult};
pub use operations::{Operation, OperationKind};
pub use request::{Preconditions, StreamingBlob};
