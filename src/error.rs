use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrypterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid master key length: {0} bytes. Must be exactly 64")]
    InvalidKeyLength(usize),

    #[error("Input truncated: {section} needs {needed} bytes but only {available} remain")]
    TruncatedInput {
        section: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("Declared {section} size {size} exceeds the {limit} byte cap (wrong key or corrupt file?)")]
    AllocationTooLarge {
        section: &'static str,
        size: u64,
        limit: u64,
    },

    #[error("Header declares {declared} bytes for {section} but {actual} bytes were supplied")]
    SizeMismatch {
        section: &'static str,
        declared: u64,
        actual: usize,
    },

    #[error("Header format mismatch: {0}")]
    FormatMismatch(String),

    #[error("Unsupported format: {0}. Must be 'old' or 'new'")]
    UnsupportedFormat(String),

    #[error("Serial data is {0} bytes, which is not a whole number of UTF-16 code units")]
    InvalidSerial(usize),
}

pub type Result<T> = std::result::Result<T, CrypterError>;
