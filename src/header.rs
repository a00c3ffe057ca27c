use crate::error::{CrypterError, Result};

/// Metadata struct layout variant
///
/// Two fixed layouts exist across game versions; newer titles append a
/// 32-byte game version string. The variant is an explicit configuration
/// choice made by the caller (it also determines which master key
/// applies) and is never auto-detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderFormat {
    #[default]
    Old,
    New,
}

impl HeaderFormat {
    /// Serialized metadata size in bytes; also the tweak for its section key
    pub const fn header_size(self) -> usize {
        match self {
            HeaderFormat::Old => FileHeader::OLD_SIZE,
            HeaderFormat::New => FileHeader::NEW_SIZE,
        }
    }
}

impl std::str::FromStr for HeaderFormat {
    type Err = CrypterError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "old" => Ok(Self::Old),
            "new" => Ok(Self::New),
            _ => Err(CrypterError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for HeaderFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeaderFormat::Old => write!(f, "old"),
            HeaderFormat::New => write!(f, "new"),
        }
    }
}

/// Decrypted file header (metadata struct)
///
/// Single source of truth for all downstream section lengths. The
/// `mystery_data` and `hash` fields are opaque passthrough: nothing in
/// this crate generates or verifies them.
/// Layout (little-endian): `[mystery_data: 64][data_size: 4][logo_size: 4]
/// [desc_size: 4][serial_length: 4][hash: 64][file_type: 32]
/// [game_version: 32, new format only]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub mystery_data: [u8; 64],
    /// Byte count of the data section
    pub data_size: u32,
    /// Byte count of the logo section
    pub logo_size: u32,
    /// Byte count of the description section
    pub desc_size: u32,
    /// UTF-16 character count of the serial; byte length is twice this
    pub serial_length: u32,
    pub hash: [u8; 64],
    pub file_type: [u8; 32],
    /// Present only in the new format
    pub game_version: Option<[u8; 32]>,
}

impl Default for FileHeader {
    fn default() -> Self {
        Self {
            mystery_data: [0u8; 64],
            data_size: 0,
            logo_size: 0,
            desc_size: 0,
            serial_length: 0,
            hash: [0u8; 64],
            file_type: [0u8; 32],
            game_version: None,
        }
    }
}

impl FileHeader {
    pub const OLD_SIZE: usize = 176;
    pub const NEW_SIZE: usize = 208;

    /// Deserialize from decrypted bytes. Size fields come from decrypted,
    /// possibly wrong-key data; the codec bounds them before trusting them.
    pub fn from_bytes(data: &[u8], format: HeaderFormat) -> Result<Self> {
        let size = format.header_size();
        if data.len() < size {
            return Err(CrypterError::TruncatedInput {
                section: "file header",
                needed: size,
                available: data.len(),
            });
        }

        let mut mystery_data = [0u8; 64];
        mystery_data.copy_from_slice(&data[0..64]);
        let data_size = u32::from_le_bytes(data[64..68].try_into().unwrap());
        let logo_size = u32::from_le_bytes(data[68..72].try_into().unwrap());
        let desc_size = u32::from_le_bytes(data[72..76].try_into().unwrap());
        let serial_length = u32::from_le_bytes(data[76..80].try_into().unwrap());
        let mut hash = [0u8; 64];
        hash.copy_from_slice(&data[80..144]);
        let mut file_type = [0u8; 32];
        file_type.copy_from_slice(&data[144..176]);

        let game_version = match format {
            HeaderFormat::Old => None,
            HeaderFormat::New => {
                let mut v = [0u8; 32];
                v.copy_from_slice(&data[176..208]);
                Some(v)
            }
        };

        Ok(Self {
            mystery_data,
            data_size,
            logo_size,
            desc_size,
            serial_length,
            hash,
            file_type,
            game_version,
        })
    }

    /// Serialize for encryption. The game version field must be present
    /// exactly when the format expects it.
    pub fn to_bytes(&self, format: HeaderFormat) -> Result<Vec<u8>> {
        match (format, &self.game_version) {
            (HeaderFormat::Old, Some(_)) => {
                return Err(CrypterError::FormatMismatch(
                    "game version string set but format 'old' has no field for it".into(),
                ))
            }
            (HeaderFormat::New, None) => {
                return Err(CrypterError::FormatMismatch(
                    "format 'new' requires a game version string".into(),
                ))
            }
            _ => {}
        }

        let mut buf = Vec::with_capacity(format.header_size());
        buf.extend_from_slice(&self.mystery_data);
        buf.extend_from_slice(&self.data_size.to_le_bytes());
        buf.extend_from_slice(&self.logo_size.to_le_bytes());
        buf.extend_from_slice(&self.desc_size.to_le_bytes());
        buf.extend_from_slice(&self.serial_length.to_le_bytes());
        buf.extend_from_slice(&self.hash);
        buf.extend_from_slice(&self.file_type);
        if let Some(version) = &self.game_version {
            buf.extend_from_slice(version);
        }
        Ok(buf)
    }

    /// Serial section byte length (`serial_length` counts UTF-16 units)
    pub fn serial_bytes(&self) -> u64 {
        self.serial_length as u64 * 2
    }

    /// Total declared byte length of the four variable sections
    pub fn section_total(&self) -> u64 {
        self.desc_size as u64 + self.logo_size as u64 + self.data_size as u64 + self.serial_bytes()
    }

    /// File type string with trailing NULs stripped
    pub fn file_type_str(&self) -> String {
        trimmed_string(&self.file_type)
    }

    /// Game version string (new format), trailing NULs stripped
    pub fn game_version_str(&self) -> Option<String> {
        self.game_version.as_ref().map(|v| trimmed_string(v))
    }
}

fn trimmed_string(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}
