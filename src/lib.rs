//! # GBA LZ77 Compression
//!
//! `gbalz77` is a safe, pure-Rust encoder for the LZ77 format understood by the
//! Game Boy Advance BIOS decompression calls (`SWI 0x11` for 8-bit writes and
//! `SWI 0x12` for 16-bit writes).
//!
//! A stream starts with the type byte `0x10` and the 24-bit little-endian
//! uncompressed size. It is followed by groups of one control byte and up to 8
//! tokens; each control bit (MSB first) marks a token as a literal byte (`0`) or
//! a 2-byte back-reference (`1`) copying 3 to 18 bytes from up to 4096 bytes back.
//!
//! ## Example
//!
//! ```rust
//! use gbalz77::{compress, DecoderTarget};
//!
//! let compressed = compress(b"abcXabcYabc", DecoderTarget::Bits8).expect("Compression failed");
//!
//! assert_eq!(
//!     compressed,
//!     [
//!         0x10, 0x0b, 0x00, 0x00, // header: size 11
//!         0x0a,                   // literals, then references at tokens 5 and 7
//!         b'a', b'b', b'c', b'X',
//!         0x00, 0x03,             // copy 3 bytes from 4 back
//!         b'Y',
//!         0x00, 0x07,             // copy 3 bytes from 8 back
//!     ]
//! );
//! ```

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod compress;
pub mod error;

pub use compress::{
    DecoderTarget, HEADER_LEN, MAGIC, MAX_INPUT_LEN, MAX_MATCH, MIN_MATCH, WINDOW_SIZE, compress,
    compress_into, compressed_len_bound,
};
pub use error::CompressionError;
