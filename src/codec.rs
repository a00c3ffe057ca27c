//! Container codec: fixed-order section layout over a bounds-checked cursor
//!
//! Layout: `[encryption header: 320][file header: 176/208][description]
//! [logo][data][serial]`, every region encrypted under its own derived
//! key except the 64-byte trailer of the encryption header.

use crate::crypto::{crypt, crypt_header, rolling_key, section_key, ENCRYPTION_HEADER_SIZE};
use crate::error::{CrypterError, Result};
use crate::header::{FileHeader, HeaderFormat};
use crate::key::{MasterKey, MASTER_KEY_LENGTH};

/// Upper bound on a single declared section size. Size fields come out
/// of decrypted data, so a wrong key turns them into unbounded garbage;
/// real saves are a few megabytes.
pub const MAX_SECTION_SIZE: u64 = 256 * 1024 * 1024;

/// Section key tweaks. The file header itself is tweaked with its own
/// serialized size (176 or 208), which keeps the two layout variants from
/// sharing a key.
const TWEAK_DESCRIPTION: u64 = 0;
const TWEAK_LOGO: u64 = 1;
const TWEAK_DATA: u64 = 2;
const TWEAK_SERIAL: u64 = 3;

/// A fully decoded save container
///
/// `encryption_header` is held in its decrypted form; apart from its
/// first 256 bytes being key material, its content is opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFile {
    pub format: HeaderFormat,
    pub encryption_header: [u8; ENCRYPTION_HEADER_SIZE],
    pub header: FileHeader,
    pub description: Vec<u8>,
    pub logo: Vec<u8>,
    pub data: Vec<u8>,
    pub serial: Vec<u8>,
}

impl SaveFile {
    /// Empty container for the given layout variant
    pub fn new(format: HeaderFormat) -> Self {
        let mut header = FileHeader::default();
        if format == HeaderFormat::New {
            header.game_version = Some([0u8; 32]);
        }
        Self {
            format,
            encryption_header: [0u8; ENCRYPTION_HEADER_SIZE],
            header,
            description: Vec::new(),
            logo: Vec::new(),
            data: Vec::new(),
            serial: Vec::new(),
        }
    }

    /// Rewrite the header size fields from the actual buffer lengths.
    /// The serial buffer must hold whole UTF-16 code units.
    pub fn refresh_sizes(&mut self) -> Result<()> {
        if self.serial.len() % 2 != 0 {
            return Err(CrypterError::InvalidSerial(self.serial.len()));
        }
        self.header.desc_size = self.description.len() as u32;
        self.header.logo_size = self.logo.len() as u32;
        self.header.data_size = self.data.len() as u32;
        self.header.serial_length = (self.serial.len() / 2) as u32;
        Ok(())
    }

    /// Serial decoded as UTF-16LE text
    pub fn serial_text(&self) -> String {
        let units: Vec<u16> = self
            .serial
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    }

    /// Total encoded byte length for the current size fields
    pub fn encoded_len(&self) -> u64 {
        ENCRYPTION_HEADER_SIZE as u64
            + self.format.header_size() as u64
            + self.header.section_total()
    }

    fn check_consistency(&self) -> Result<()> {
        let checks: [(&'static str, u64, usize); 4] = [
            ("description", self.header.desc_size as u64, self.description.len()),
            ("logo", self.header.logo_size as u64, self.logo.len()),
            ("data", self.header.data_size as u64, self.data.len()),
            ("serial", self.header.serial_bytes(), self.serial.len()),
        ];
        for (section, declared, actual) in checks {
            if declared != actual as u64 {
                return Err(CrypterError::SizeMismatch {
                    section,
                    declared,
                    actual,
                });
            }
        }
        Ok(())
    }
}

/// Linear read cursor; every section boundary is length-checked
struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, len: usize, section: &'static str) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(CrypterError::TruncatedInput {
                section,
                needed: len,
                available: self.remaining(),
            });
        }
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }
}

/// Decode a ciphertext container
///
/// The caller selects the layout variant and the matching master key.
/// Fails fast on short input, implausible decrypted size fields, or
/// declared sizes that overrun the buffer; never produces partial output.
pub fn decrypt(input: &[u8], key: &MasterKey, format: HeaderFormat) -> Result<SaveFile> {
    let mut cursor = Cursor::new(input);

    let header_region = cursor.take(ENCRYPTION_HEADER_SIZE, "encryption header")?;
    let header_cipher: &[u8; ENCRYPTION_HEADER_SIZE] = header_region.try_into().unwrap();
    let encryption_header = crypt_header(header_cipher, key);

    let rolling = rolling_key(&encryption_header);

    let meta_size = format.header_size();
    let mut meta_bytes = cursor.take(meta_size, "file header")?.to_vec();
    crypt(&section_key(&rolling, meta_size as u64), &mut meta_bytes);
    let header = FileHeader::from_bytes(&meta_bytes, format)?;

    // Bound every decrypted size field before allocating anything
    let declared: [(&'static str, u64); 4] = [
        ("description", header.desc_size as u64),
        ("logo", header.logo_size as u64),
        ("data", header.data_size as u64),
        ("serial", header.serial_bytes()),
    ];
    for (section, size) in declared {
        if size > MAX_SECTION_SIZE {
            return Err(CrypterError::AllocationTooLarge {
                section,
                size,
                limit: MAX_SECTION_SIZE,
            });
        }
    }
    if header.section_total() > cursor.remaining() as u64 {
        return Err(CrypterError::TruncatedInput {
            section: "sections",
            needed: header.section_total() as usize,
            available: cursor.remaining(),
        });
    }

    let description = read_section(&mut cursor, &rolling, TWEAK_DESCRIPTION, header.desc_size as usize, "description")?;
    let logo = read_section(&mut cursor, &rolling, TWEAK_LOGO, header.logo_size as usize, "logo")?;
    let data = read_section(&mut cursor, &rolling, TWEAK_DATA, header.data_size as usize, "data")?;
    let serial = read_section(&mut cursor, &rolling, TWEAK_SERIAL, header.serial_bytes() as usize, "serial")?;

    Ok(SaveFile {
        format,
        encryption_header,
        header,
        description,
        logo,
        data,
        serial,
    })
}

fn read_section(
    cursor: &mut Cursor<'_>,
    rolling: &[u8; MASTER_KEY_LENGTH],
    tweak: u64,
    len: usize,
    section: &'static str,
) -> Result<Vec<u8>> {
    let mut buf = cursor.take(len, section)?.to_vec();
    crypt(&section_key(rolling, tweak), &mut buf);
    Ok(buf)
}

/// Encode a container to ciphertext
///
/// Mirror of [`decrypt`]: the header transform is its own inverse, so the
/// same calls run in both directions. Size fields must already match the
/// supplied buffers (see [`SaveFile::refresh_sizes`]).
pub fn encrypt(save: &SaveFile, key: &MasterKey) -> Result<Vec<u8>> {
    save.check_consistency()?;

    let mut meta_bytes = save.header.to_bytes(save.format)?;
    let rolling = rolling_key(&save.encryption_header);
    crypt(&section_key(&rolling, meta_bytes.len() as u64), &mut meta_bytes);

    let mut output = Vec::with_capacity(save.encoded_len() as usize);
    output.extend_from_slice(&crypt_header(&save.encryption_header, key));
    output.extend_from_slice(&meta_bytes);

    for (tweak, plaintext) in [
        (TWEAK_DESCRIPTION, &save.description),
        (TWEAK_LOGO, &save.logo),
        (TWEAK_DATA, &save.data),
        (TWEAK_SERIAL, &save.serial),
    ] {
        let mut buf = plaintext.clone();
        crypt(&section_key(&rolling, tweak), &mut buf);
        output.extend_from_slice(&buf);
    }

    Ok(output)
}
