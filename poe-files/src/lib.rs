//! File reading and content digests.

pub mod hasher;

pub use hasher::{hash_bytes, hash_file, HashedFile};
