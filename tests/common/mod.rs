//! Reference GBA LZ77 decoder used to check the encoder's output.
//!
//! It mirrors the BIOS routines but is strict: anything a conforming encoder
//! must never emit is reported as an error instead of being tolerated.

#![allow(dead_code)]

use gbalz77::DecoderTarget;
use thiserror::Error;

type Result<T> = core::result::Result<T, DecodeError>;

/// Type byte of an LZ77 stream.
const MAGIC: u8 = 0x10;

/// Number of tokens in a single control-byte group.
const BLOCK_TOKENS: usize = 8;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Unexpected end of stream")]
    UnexpectedEof,

    #[error("Invalid magic byte {0:#04x}")]
    InvalidMagic(u8),

    #[error("Lookback distance {distance} invalid at output position {position}")]
    InvalidDistance { distance: usize, position: usize },

    #[error("Copy of {length} bytes overruns declared size")]
    LengthOverrun { length: usize },

    #[error("{0} trailing bytes after the last token")]
    TrailingData(usize),
}

/// One decoded token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Literal(u8),
    Reference { length: usize, distance: usize },
}

/// A fully decoded stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub declared_len: usize,
    pub data: Vec<u8>,
    pub tokens: Vec<Token>,
    /// Every control byte in stream order.
    pub controls: Vec<u8>,
}

/// Decodes a stream produced for `target`.
pub fn decode(input: &[u8], target: DecoderTarget) -> Result<Decoded> {
    if input.len() < 4 {
        return Err(DecodeError::UnexpectedEof);
    }
    if input[0] != MAGIC {
        return Err(DecodeError::InvalidMagic(input[0]));
    }

    let declared_len = u32::from_le_bytes([input[1], input[2], input[3], 0]) as usize;
    let mut decoded = Decoded {
        declared_len,
        data: Vec::with_capacity(declared_len),
        tokens: Vec::new(),
        controls: Vec::new(),
    };

    let mut in_idx = 4;
    while decoded.data.len() < declared_len {
        let control = *input.get(in_idx).ok_or(DecodeError::UnexpectedEof)?;
        in_idx += 1;
        decoded.controls.push(control);

        for i in (0..BLOCK_TOKENS).rev() {
            if decoded.data.len() >= declared_len {
                break;
            }

            if (control >> i) & 1 != 0 {
                if in_idx + 2 > input.len() {
                    return Err(DecodeError::UnexpectedEof);
                }
                let length = usize::from(input[in_idx] >> 4) + 3;
                let distance =
                    ((usize::from(input[in_idx] & 0x0F) << 8) | usize::from(input[in_idx + 1])) + 1;
                in_idx += 2;

                apply_match(&mut decoded.data, declared_len, length, distance, target)?;
                decoded.tokens.push(Token::Reference { length, distance });
            } else {
                let byte = *input.get(in_idx).ok_or(DecodeError::UnexpectedEof)?;
                in_idx += 1;
                decoded.data.push(byte);
                decoded.tokens.push(Token::Literal(byte));
            }
        }
    }

    if in_idx != input.len() {
        return Err(DecodeError::TrailingData(input.len() - in_idx));
    }

    Ok(decoded)
}

/// Applies a back-reference, copying byte by byte so overlapping runs expand.
fn apply_match(
    output: &mut Vec<u8>,
    declared_len: usize,
    length: usize,
    distance: usize,
    target: DecoderTarget,
) -> Result<()> {
    let position = output.len();
    if distance > position || distance - 1 < target.min_distance() {
        return Err(DecodeError::InvalidDistance { distance, position });
    }
    if position + length > declared_len {
        return Err(DecodeError::LengthOverrun { length });
    }

    let src_pos = position - distance;
    for k in 0..length {
        let val = output[src_pos + k];
        output.push(val);
    }

    Ok(())
}
