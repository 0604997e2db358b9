// SPDX-License-Identifier: Apache-2.0

//! An in-memory [`std::io::Read`] that hands out data in bounded chunks.
//!
//! [`crate::load`] accepts any reader; [`ChunkReader`] exists to exercise
//! the streaming path the way a socket or pipe would, one short read at a
//! time.
//!
//! ```rust
//! use picojson_codec::{load, ChunkReader, Value};
//!
//! // Simulate a transport that delivers 3 bytes per read
//! let reader = ChunkReader::new(br#"{"status": "ok"}"#, 3);
//! let value = load(reader).unwrap();
//! assert_eq!(value.get("status"), Some(&Value::from("ok")));
//! ```

use std::io::Read;

/// A reader over a byte slice that returns at most `chunk_size` bytes per `read`.
#[derive(Debug)]
pub struct ChunkReader<'a> {
    data: &'a [u8],
    pos: usize,
    chunk_size: usize,
    reads: usize,
}

impl<'a> ChunkReader<'a> {
    /// Each `read` returns at most `chunk_size` bytes (minimum 1).
    pub fn new(data: &'a [u8], chunk_size: usize) -> Self {
        Self {
            data,
            pos: 0,
            chunk_size: chunk_size.max(1),
            reads: 0,
        }
    }

    /// A reader limited only by the caller's buffer
    pub fn full_slice(data: &'a [u8]) -> Self {
        Self::new(data, usize::MAX)
    }

    /// Number of `read` calls that returned data
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Bytes not yet handed out
    pub fn remaining(&self) -> &'a [u8] {
        self.data.get(self.pos..).unwrap_or_default()
    }
}

impl Read for ChunkReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let remaining = self.remaining();
        let to_copy = remaining.len().min(buf.len()).min(self.chunk_size);
        if to_copy == 0 {
            return Ok(0);
        }
        buf[..to_copy].copy_from_slice(&remaining[..to_copy]);
        self.pos = self.pos.saturating_add(to_copy);
        self.reads += 1;
        Ok(to_copy)
    }
}
