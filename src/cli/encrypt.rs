use crate::cli::decrypt::{
    DATA_FILE, DESCRIPTION_FILE, ENCRYPTION_HEADER_FILE, FILE_HEADER_FILE, LOGO_FILE, SERIAL_FILE,
};
use crate::codec::{encrypt, SaveFile};
use crate::crypto::ENCRYPTION_HEADER_SIZE;
use crate::error::{CrypterError, Result};
use crate::header::{FileHeader, HeaderFormat};
use crate::key::MasterKey;
use log::{info, warn};
use rand::RngCore;
use std::fs;
use std::path::Path;

/// Options for the encrypt command
#[derive(Debug, Clone)]
pub struct EncryptOptions {
    pub key: MasterKey,
    pub format: HeaderFormat,
}

/// Rebuild a ciphertext container from a directory of plaintext artifacts
///
/// Size fields in `header.dat` are refreshed from the actual artifact
/// lengths, so sections can be edited freely between decrypt and encrypt.
/// A missing `encryptHeader.dat` is replaced with fresh random key
/// material; any 320-byte value round-trips.
pub fn encrypt_from_dir(
    input_dir: &Path,
    output_path: &Path,
    options: &EncryptOptions,
) -> Result<u64> {
    let mut save = SaveFile::new(options.format);

    let header_bytes = fs::read(input_dir.join(FILE_HEADER_FILE))?;
    save.header = FileHeader::from_bytes(&header_bytes, options.format)?;

    let enc_header_path = input_dir.join(ENCRYPTION_HEADER_FILE);
    if enc_header_path.exists() {
        let bytes = fs::read(&enc_header_path)?;
        if bytes.len() != ENCRYPTION_HEADER_SIZE {
            return Err(CrypterError::FormatMismatch(format!(
                "{} is {} bytes, expected {}",
                ENCRYPTION_HEADER_FILE,
                bytes.len(),
                ENCRYPTION_HEADER_SIZE
            )));
        }
        save.encryption_header.copy_from_slice(&bytes);
    } else {
        warn!(
            "{} not found, generating a fresh random encryption header",
            ENCRYPTION_HEADER_FILE
        );
        rand::thread_rng().fill_bytes(&mut save.encryption_header);
    }

    save.description = fs::read(input_dir.join(DESCRIPTION_FILE))?;
    save.logo = fs::read(input_dir.join(LOGO_FILE))?;
    save.data = fs::read(input_dir.join(DATA_FILE))?;
    save.serial = fs::read(input_dir.join(SERIAL_FILE))?;
    save.refresh_sizes()?;

    let output = encrypt(&save, &options.key)?;
    fs::write(output_path, &output)?;
    info!(
        "Wrote {} ({} bytes)",
        output_path.display(),
        output.len()
    );

    Ok(output.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decrypt;
    use tempfile::tempdir;

    fn options() -> EncryptOptions {
        EncryptOptions {
            key: MasterKey::DEFAULT,
            format: HeaderFormat::Old,
        }
    }

    fn write_artifacts(dir: &Path, with_enc_header: bool) {
        let header = FileHeader::default();
        fs::write(
            dir.join(FILE_HEADER_FILE),
            header.to_bytes(HeaderFormat::Old).unwrap(),
        )
        .unwrap();
        if with_enc_header {
            fs::write(dir.join(ENCRYPTION_HEADER_FILE), [0x5Au8; 320]).unwrap();
        }
        fs::write(dir.join(DESCRIPTION_FILE), b"A short description").unwrap();
        fs::write(dir.join(LOGO_FILE), [0u8; 0]).unwrap();
        fs::write(dir.join(DATA_FILE), [1u8, 2, 3, 4, 5]).unwrap();
        fs::write(dir.join(SERIAL_FILE), [0x31u8, 0x00]).unwrap();
    }

    #[test]
    fn test_encrypt_refreshes_stale_size_fields() {
        let dir = tempdir().unwrap();
        write_artifacts(dir.path(), true);
        let output = dir.path().join("SAVE.bin");

        // header.dat declares zero sizes; the artifacts do not
        let written = encrypt_from_dir(dir.path(), &output, &options()).unwrap();
        assert_eq!(written, 320 + 176 + 19 + 5 + 2);

        let decoded = decrypt(
            &fs::read(&output).unwrap(),
            &MasterKey::DEFAULT,
            HeaderFormat::Old,
        )
        .unwrap();
        assert_eq!(decoded.description, b"A short description");
        assert_eq!(decoded.data, vec![1, 2, 3, 4, 5]);
        assert_eq!(decoded.header.serial_length, 1);
        assert_eq!(decoded.serial_text(), "1");
    }

    #[test]
    fn test_missing_encryption_header_generates_one() {
        let dir = tempdir().unwrap();
        write_artifacts(dir.path(), false);
        let output = dir.path().join("SAVE.bin");

        encrypt_from_dir(dir.path(), &output, &options()).unwrap();

        // Still decodable; the header content is arbitrary key material
        let decoded = decrypt(
            &fs::read(&output).unwrap(),
            &MasterKey::DEFAULT,
            HeaderFormat::Old,
        )
        .unwrap();
        assert_eq!(decoded.data, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_wrong_length_encryption_header_rejected() {
        let dir = tempdir().unwrap();
        write_artifacts(dir.path(), false);
        fs::write(dir.path().join(ENCRYPTION_HEADER_FILE), [0u8; 100]).unwrap();

        let result = encrypt_from_dir(dir.path(), &dir.path().join("SAVE.bin"), &options());
        assert!(matches!(result, Err(CrypterError::FormatMismatch(_))));
    }

    #[test]
    fn test_odd_serial_file_rejected() {
        let dir = tempdir().unwrap();
        write_artifacts(dir.path(), true);
        fs::write(dir.path().join(SERIAL_FILE), [0x31u8, 0x00, 0x32]).unwrap();

        let result = encrypt_from_dir(dir.path(), &dir.path().join("SAVE.bin"), &options());
        assert!(matches!(result, Err(CrypterError::InvalidSerial(3))));
    }
}
