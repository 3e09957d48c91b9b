use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompressionError {
    #[error("data larger than 0xFFFFFF bytes cannot be LZ77 compressed (got {len} bytes)")]
    OversizedInput { len: usize },

    #[error("failed to allocate {requested} bytes for the output buffer")]
    AllocationFailure { requested: usize },
}
