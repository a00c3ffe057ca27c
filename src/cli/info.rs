use crate::codec::decrypt;
use crate::error::Result;
use crate::header::HeaderFormat;
use crate::key::MasterKey;
use std::fs;
use std::path::Path;

/// Options for the info command
#[derive(Debug, Clone)]
pub struct InfoOptions {
    pub key: MasterKey,
    pub format: HeaderFormat,
}

/// Decrypt a container in memory and render its metadata
pub fn show_info(path: &Path, options: &InfoOptions) -> Result<String> {
    let input = fs::read(path)?;
    let save = decrypt(&input, &options.key, options.format)?;
    let header = &save.header;

    let mut output = String::new();

    output.push_str("PES Save Container\n");
    output.push_str("==================\n\n");

    output.push_str(&format!("File: {}\n", path.display()));
    output.push_str(&format!("Format: {}\n", save.format));
    output.push_str(&format!("File type: {}\n", header.file_type_str()));
    if let Some(version) = header.game_version_str() {
        output.push_str(&format!("Game version: {}\n", version));
    }
    output.push('\n');

    output.push_str("Sections:\n");
    output.push_str(&format!("  Description: {}\n", format_size(header.desc_size as u64)));
    output.push_str(&format!("  Logo: {}\n", format_size(header.logo_size as u64)));
    output.push_str(&format!("  Data: {}\n", format_size(header.data_size as u64)));
    output.push_str(&format!(
        "  Serial: {} characters ({})\n",
        header.serial_length,
        save.serial_text()
    ));
    output.push('\n');

    output.push_str(&format!("Hash (unverified): {}\n", hex::encode(header.hash)));

    Ok(output)
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
