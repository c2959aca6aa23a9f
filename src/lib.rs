//! # syncvec
//!
//! A thread-safe, growable vector of `i64` with index-based mutation,
//! functional traversal helpers and elementwise arithmetic between vectors.
//!
//! ## Overview
//!
//! - **Growth** - capacity starts at 10 (or whatever you pass) and is
//!   multiplied by the growth factor when it runs out, never below what the
//!   operation needs. Capacity never shrinks.
//! - **Locking** - one `RwLock` per vector. Mutators lock exclusively,
//!   readers share. Two-vector reads lock both sides in a fixed order.
//! - **Errors** - bad indices and length mismatches come back as
//!   [`VectorError`]; nothing panics on caller input.
//!
//! ```
//! use syncvec::Vector;
//!
//! let v = Vector::from_items(&[1, 2, 3]);
//! v.add(0, 10).unwrap();
//! assert_eq!(v.to_vec(), vec![10, 1, 2, 3]);
//!
//! let sums = v.accumulate(|a, b| a + b);
//! assert_eq!(sums.to_vec(), vec![10, 11, 13, 16]);
//! assert!(!Vector::new().all(|_| true));
//! ```
//!
//! ## Key Dependencies
//!
//! - `thiserror` - error enums
//! - `serde` / `toml` - snapshots and [`VectorConfig`] loading
//! - `tracing` - growth and lock-recovery events

pub mod config;
pub mod error;
pub mod snapshot;
pub mod vector;

pub use config::VectorConfig;
pub use error::{ConfigError, Result, SnapshotError, VectorError};
pub use snapshot::VectorSnapshot;
pub use vector::{Vector, DEFAULT_CAPACITY, DEFAULT_MULTIPLIER, MAX_CAPACITY};
