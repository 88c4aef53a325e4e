//! Test utilities for the Duckling decoders.
//!
//! This crate provides:
//! - [`MemoryChunk`], an in-memory chunk laid out exactly like the engine's
//!   vectors, with a heap of out-of-line string payloads
//! - [`ChunkBuilder`] and [`Literal`], to encode rows of values into such
//!   a chunk
//! - [`fixtures`], ready-made chunks covering the engine's test tables
//!
//! # Usage
//!
//! This crate is intended for use within the project's test suites.

pub mod builder;
pub mod fixtures;
pub mod memory_chunk;

pub use builder::{ChunkBuilder, Literal};
pub use memory_chunk::{MemoryChunk, VectorId};
