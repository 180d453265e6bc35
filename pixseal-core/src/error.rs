use thiserror::Error;

#[derive(Error, Debug)]
pub enum PixsealError {
    #[error("image {width}x{height} is below the minimum signable size {min_width}x{min_height}")]
    ImageTooSmall {
        width: u32,
        height: u32,
        min_width: u32,
        min_height: u32,
    },

    #[error("pixel buffer is {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    BufferSizeMismatch {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
    },

    #[error("no signature region fits a {width}x{height} image")]
    NoRegionSigned { width: u32, height: u32 },

    #[error("timestamp {0} does not fit the 32-bit seconds field")]
    TimestampOutOfRange(i64),

    #[error("metadata serialization error: {0}")]
    MetadataSerialization(String),
}

pub type Result<T> = std::result::Result<T, PixsealError>;
