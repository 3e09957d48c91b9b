#![no_main]

use gbalz77::{DecoderTarget, compress, compressed_len_bound};
use libfuzzer_sys::fuzz_target;

#[path = "../../tests/common/mod.rs"]
mod common;

/// Verifies the lossless "Round-Trip" property for one decoder target.
///
/// # Invariant
/// `decode(compress(data)) == data`, and the stream stays within the reserved bound.
///
/// The reference decoder also rejects references that are too short, too long,
/// too far back, or too close for the target, so a pass here means every token
/// is legal for the BIOS routine the stream was produced for.
///
/// # Panics
/// This function panics if compression fails, if the stream exceeds the bound,
/// or if decoding does not bit-match the input. These panics signal a fuzzing failure.
fn verify_round_trip(data: &[u8], target: DecoderTarget) {
    let compressed = match compress(data, target) {
        Ok(compressed) => compressed,
        Err(e) => panic!("Compression failed!\nError: {e:?}\nInput len: {}", data.len()),
    };

    assert!(
        compressed.len() <= compressed_len_bound(data.len()),
        "Output of {} bytes exceeds bound for input len {}",
        compressed.len(),
        data.len()
    );

    match common::decode(&compressed, target) {
        Ok(decoded) => {
            if decoded.data != data {
                panic!(
                    "Round-trip mismatch!\nInput len: {}\nCompressed len: {}\nDecompressed len: {}",
                    data.len(),
                    compressed.len(),
                    decoded.data.len()
                );
            }
        }
        Err(e) => {
            panic!(
                "Round-trip failed! Reference decoder rejected the stream.\nError: {:?}\nInput len: {}",
                e,
                data.len()
            );
        }
    }
}

fuzz_target!(|data: &[u8]| {
    verify_round_trip(data, DecoderTarget::Bits8);
    verify_round_trip(data, DecoderTarget::Bits16);
});
