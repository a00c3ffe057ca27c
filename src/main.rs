use clap::{Parser, Subcommand};
use env_logger::Env;
use pescrypter::cli::{
    decrypt_to_dir, encrypt_from_dir, show_info, DecryptOptions, EncryptOptions, InfoOptions,
};
use pescrypter::{HeaderFormat, MasterKey};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "pescrypter")]
#[command(version, about = "Encrypter/decrypter for PES save data containers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decrypt a save container into a directory of plaintext files
    #[command(alias = "d")]
    Decrypt {
        /// Encrypted save file
        input: PathBuf,

        /// Output directory (created if absent)
        output_dir: PathBuf,

        /// 64-byte master key file; defaults to the built-in key
        #[arg(long)]
        key: Option<PathBuf>,

        /// Metadata layout variant
        #[arg(long, default_value = "old", value_parser = parse_format)]
        format: HeaderFormat,
    },

    /// Encrypt a directory of plaintext files into a save container
    #[command(alias = "e")]
    Encrypt {
        /// Directory holding the plaintext artifacts
        input_dir: PathBuf,

        /// Output save file
        output: PathBuf,

        /// 64-byte master key file; defaults to the built-in key
        #[arg(long)]
        key: Option<PathBuf>,

        /// Metadata layout variant
        #[arg(long, default_value = "old", value_parser = parse_format)]
        format: HeaderFormat,
    },

    /// Show metadata of a save container
    #[command(alias = "i")]
    Info {
        /// Encrypted save file
        file: PathBuf,

        /// 64-byte master key file; defaults to the built-in key
        #[arg(long)]
        key: Option<PathBuf>,

        /// Metadata layout variant
        #[arg(long, default_value = "old", value_parser = parse_format)]
        format: HeaderFormat,
    },
}

fn parse_format(s: &str) -> Result<HeaderFormat, String> {
    s.parse().map_err(|e| format!("{}", e))
}

/// Read a master key file, or fall back to the key the original
/// standalone tool ships with
fn load_key(path: Option<&PathBuf>) -> pescrypter::Result<MasterKey> {
    match path {
        Some(path) => {
            let bytes = std::fs::read(path)?;
            MasterKey::from_slice(&bytes)
        }
        None => Ok(MasterKey::DEFAULT),
    }
}

fn main() -> ExitCode {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Decrypt {
            input,
            output_dir,
            key,
            format,
        } => load_key(key.as_ref()).and_then(|key| {
            let options = DecryptOptions { key, format };
            decrypt_to_dir(&input, &output_dir, &options).map(|save| {
                println!(
                    "Decrypted {} into {} ({} data bytes)",
                    input.display(),
                    output_dir.display(),
                    save.data.len()
                );
            })
        }),

        Commands::Encrypt {
            input_dir,
            output,
            key,
            format,
        } => load_key(key.as_ref()).and_then(|key| {
            let options = EncryptOptions { key, format };
            encrypt_from_dir(&input_dir, &output, &options).map(|size| {
                println!("Encrypted {} ({} bytes)", output.display(), size);
            })
        }),

        Commands::Info { file, key, format } => load_key(key.as_ref()).and_then(|key| {
            let options = InfoOptions { key, format };
            show_info(&file, &options).map(|info| {
                print!("{}", info);
            })
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
