use crate::error::{CrypterError, Result};

/// Master key length in bytes (16 little-endian u32 words)
pub const MASTER_KEY_LENGTH: usize = 64;

/// A 64-byte master key
///
/// Keys are pre-shared per game title. The key never changes during a
/// transform; the library borrows it and derives everything else per call.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct MasterKey([u8; MASTER_KEY_LENGTH]);

impl MasterKey {
    /// All-zero key. Degenerate but valid configuration.
    pub const ZERO: MasterKey = MasterKey([0u8; MASTER_KEY_LENGTH]);

    /// Key embedded in the original standalone crypter tool.
    /// Used by the CLI when no `--key` file is given.
    pub const DEFAULT: MasterKey = MasterKey([
        0x4D, 0x55, 0x94, 0x66, 0xD9, 0x62, 0x5C, 0xEC, //
        0xC1, 0x7C, 0x48, 0x36, 0x77, 0x31, 0x50, 0xE1, //
        0x87, 0x1C, 0xB5, 0x6B, 0x41, 0xD4, 0x92, 0x4F, //
        0x4A, 0x8C, 0x71, 0x27, 0x0A, 0x0D, 0x50, 0x63, //
        0x94, 0x2B, 0x58, 0x5E, 0x99, 0x0B, 0x8B, 0x97, //
        0x96, 0x66, 0xC0, 0x00, 0xB7, 0x1D, 0x72, 0x75, //
        0xD6, 0xE8, 0x5B, 0x0E, 0xAF, 0xF1, 0x72, 0xD1, //
        0xB1, 0xE3, 0x3C, 0x75, 0xDE, 0x9C, 0x13, 0x09, //
    ]);

    pub const fn new(bytes: [u8; MASTER_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Validate length and copy. Any length other than 64 is a caller error.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; MASTER_KEY_LENGTH] = bytes
            .try_into()
            .map_err(|_| CrypterError::InvalidKeyLength(bytes.len()))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; MASTER_KEY_LENGTH] {
        &self.0
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Keys are secrets; show only a fingerprint
        write!(f, "MasterKey({}..)", hex::encode(&self.0[..4]))
    }
}
