use crate::codec::{decrypt, SaveFile};
use crate::error::Result;
use crate::header::HeaderFormat;
use crate::key::MasterKey;
use log::info;
use std::fs;
use std::path::Path;

/// Artifact names used by the original tools; kept verbatim so output
/// directories stay interchangeable with them
pub const ENCRYPTION_HEADER_FILE: &str = "encryptHeader.dat";
pub const FILE_HEADER_FILE: &str = "header.dat";
pub const DESCRIPTION_FILE: &str = "description.dat";
pub const LOGO_FILE: &str = "logo.png";
pub const DATA_FILE: &str = "data.dat";
pub const SERIAL_FILE: &str = "version.txt";

/// Options for the decrypt command
#[derive(Debug, Clone)]
pub struct DecryptOptions {
    pub key: MasterKey,
    pub format: HeaderFormat,
}

/// Decrypt a save container into a directory of plaintext artifacts
pub fn decrypt_to_dir(
    input_path: &Path,
    output_dir: &Path,
    options: &DecryptOptions,
) -> Result<SaveFile> {
    let input = fs::read(input_path)?;
    let save = decrypt(&input, &options.key, options.format)?;

    fs::create_dir_all(output_dir)?;

    let artifacts: [(&str, &[u8]); 5] = [
        (ENCRYPTION_HEADER_FILE, &save.encryption_header),
        (DESCRIPTION_FILE, &save.description),
        (LOGO_FILE, &save.logo),
        (DATA_FILE, &save.data),
        (SERIAL_FILE, &save.serial),
    ];
    for (name, bytes) in artifacts {
        fs::write(output_dir.join(name), bytes)?;
        info!("Wrote {} ({} bytes)", name, bytes.len());
    }
    let header_bytes = save.header.to_bytes(save.format)?;
    fs::write(output_dir.join(FILE_HEADER_FILE), &header_bytes)?;
    info!("Wrote {} ({} bytes)", FILE_HEADER_FILE, header_bytes.len());

    Ok(save)
}
