//! Configuration module for Loggen.
//!
//! This module contains the field pools consumed by the record generators and
//! the numeric range types they sample from.

pub mod pools;
pub mod range;

pub use pools::{DatabasePools, FieldPools, MicroservicePools, PoolsError, WebPools};
pub use range::{ByteSizePolicy, UniformRange};
