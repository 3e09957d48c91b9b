use alloc::vec::Vec;

use crate::error::CompressionError;

type Result<T> = core::result::Result<T, CompressionError>;

/// Type byte identifying LZ77 data to the BIOS decompression routines.
pub const MAGIC: u8 = 0x10;

/// Size of the container header: magic byte plus a 24-bit little-endian length.
pub const HEADER_LEN: usize = 4;

/// Largest input the 24-bit size field can describe.
pub const MAX_INPUT_LEN: usize = 0xFF_FFFF;

/// Minimum match length worth encoding as a back-reference.
pub const MIN_MATCH: usize = 3;

/// Longest copy a single reference can describe (4 bits + 3).
pub const MAX_MATCH: usize = 18;

/// Number of input bytes a reference can reach back into (12 bits + 1).
pub const WINDOW_SIZE: usize = 4096;

/// Tokens described by one control byte.
const BLOCK_TOKENS: usize = 8;

/// Selects which BIOS decompression routine the stream is produced for.
///
/// The GBA BIOS exposes two LZ77 decoders: `LZ77UnCompReadNormalWrite8bit`
/// (usually pointed at WRAM) and `LZ77UnCompReadNormalWrite16bit` (required for
/// VRAM). The 16-bit routine flushes output a halfword at a time, so a reference
/// to the byte immediately behind the cursor would read a byte it has not
/// written yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DecoderTarget {
    /// 8-bit writes. References may start one byte back.
    #[default]
    Bits8,
    /// 16-bit writes. References must start at least two bytes back.
    Bits16,
}

impl DecoderTarget {
    /// Number of bytes directly behind the cursor that may not be used as a copy source.
    #[must_use]
    pub const fn min_distance(self) -> usize {
        match self {
            Self::Bits8 => 0,
            Self::Bits16 => 1,
        }
    }
}

impl From<bool> for DecoderTarget {
    fn from(for_16_bit: bool) -> Self {
        if for_16_bit { Self::Bits16 } else { Self::Bits8 }
    }
}

/// Capacity reserved for the compressed form of `len` input bytes.
///
/// Literal-only data costs one control byte per 8 input bytes on top of the
/// header, so this is never exceeded.
#[must_use]
pub const fn compressed_len_bound(len: usize) -> usize {
    2 * len + HEADER_LEN + 1
}

/// A back-reference candidate: copy `length` bytes starting `distance` bytes back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Match {
    pub(crate) length: usize,
    pub(crate) distance: usize,
}

impl Match {
    /// Packs the reference into its 2-byte wire form.
    ///
    /// Byte 0 holds `length - 3` in the high nibble and bits 8..11 of
    /// `distance - 1` in the low nibble; byte 1 holds bits 0..7 of `distance - 1`.
    #[inline]
    const fn encode(self) -> [u8; 2] {
        let disp = self.distance - 1;
        let len = self.length - MIN_MATCH;
        [(((len << 4) & 0xF0) | ((disp >> 8) & 0x0F)) as u8, (disp & 0xFF) as u8]
    }
}

/// Writes tokens into the output, grouping them 8 to a control byte.
///
/// The control byte is tracked by its index in `output` and patched in place as
/// the tokens of its group are emitted, MSB first.
struct BlockWriter<'a> {
    output: &'a mut Vec<u8>,
    control: usize,
    pending: usize,
}

impl<'a> BlockWriter<'a> {
    const fn new(output: &'a mut Vec<u8>) -> Self {
        Self {
            output,
            control: 0,
            pending: 0,
        }
    }

    /// Emits a literal byte (control bit stays 0).
    fn push_literal(&mut self, byte: u8) {
        self.begin_token();
        self.output.push(byte);
    }

    /// Emits a back-reference and flags it in the current control byte.
    fn push_reference(&mut self, m: Match) {
        let bit = self.begin_token();
        self.output[self.control] |= 1 << bit;
        self.output.extend_from_slice(&m.encode());
    }

    /// Opens a new control byte if the previous group is full and returns the
    /// bit position belonging to the next token.
    fn begin_token(&mut self) -> usize {
        if self.pending == 0 {
            self.control = self.output.len();
            self.output.push(0);
        }
        let bit = BLOCK_TOKENS - 1 - self.pending;
        self.pending = (self.pending + 1) % BLOCK_TOKENS;
        bit
    }
}

/// Compresses `input` for the given decoder and returns the finished stream.
///
/// The returned vector holds exactly the bytes produced: the 4-byte header
/// followed by the control bytes and tokens.
///
/// # Errors
/// * [`CompressionError::OversizedInput`] if `input` is longer than [`MAX_INPUT_LEN`].
/// * [`CompressionError::AllocationFailure`] if the output buffer cannot be reserved.
pub fn compress(input: &[u8], target: DecoderTarget) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    compress_into(input, target, &mut output)?;
    output.shrink_to_fit();
    Ok(output)
}

/// Compresses `input` and appends the stream to `output`.
///
/// Both error conditions are detected before anything is written, so `output`
/// is untouched when an error is returned.
///
/// # Errors
/// * [`CompressionError::OversizedInput`] if `input` is longer than [`MAX_INPUT_LEN`].
/// * [`CompressionError::AllocationFailure`] if the output buffer cannot be reserved.
pub fn compress_into(input: &[u8], target: DecoderTarget, output: &mut Vec<u8>) -> Result<()> {
    if input.len() > MAX_INPUT_LEN {
        return Err(CompressionError::OversizedInput { len: input.len() });
    }

    let requested = compressed_len_bound(input.len());
    output
        .try_reserve(requested)
        .map_err(|_| CompressionError::AllocationFailure { requested })?;

    output.push(MAGIC);
    output.extend_from_slice(&(input.len() as u32).to_le_bytes()[..3]);

    let min_distance = target.min_distance();
    let mut writer = BlockWriter::new(output);
    let mut cursor = 0;

    while cursor < input.len() {
        let m = find_match(input, cursor, min_distance);

        if m.length >= MIN_MATCH {
            writer.push_reference(m);
            cursor += m.length;
        } else {
            writer.push_literal(input[cursor]);
            cursor += 1;
        }
    }

    Ok(())
}

/// Finds the longest run at `cursor` that also starts somewhere in the window.
///
/// Candidates are scanned from the oldest byte of the window toward the cursor
/// and only a strictly longer run replaces the best one, so ties resolve to the
/// largest distance. The source may run past the cursor (overlapping copies).
/// The result carries no length floor; callers discard anything below
/// [`MIN_MATCH`].
pub(crate) fn find_match(input: &[u8], cursor: usize, min_distance: usize) -> Match {
    let mut best = Match::default();

    let max_len = (input.len() - cursor).min(MAX_MATCH);
    if max_len == 0 {
        return best;
    }

    let window_start = cursor - cursor.min(WINDOW_SIZE);
    let window_end = cursor.saturating_sub(min_distance);
    let pending = &input[cursor..cursor + max_len];

    for candidate in window_start..window_end {
        // A longer run must agree at the current best length; reject early otherwise.
        if input[candidate + best.length] != pending[best.length] {
            continue;
        }

        let length = common_prefix_len(pending, &input[candidate..], max_len);
        if length > best.length {
            best = Match {
                length,
                distance: cursor - candidate,
            };
            if length == max_len {
                break;
            }
        }
    }

    best
}

/// Finds the length of the common prefix between two slices, up to `max`.
#[inline]
fn common_prefix_len(a: &[u8], b: &[u8], max: usize) -> usize {
    let limit = a.len().min(b.len()).min(max);
    let mut len = 0;
    while len < limit && a[len] == b[len] {
        len += 1;
    }
    len
}
