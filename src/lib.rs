//! pescrypter - PES save data container encrypter/decrypter
//!
//! Reversibly transforms a save container between its ciphertext form and
//! a set of plaintext sections (description, logo, opaque data payload,
//! UTF-16 serial). Every region is encrypted with an MT19937-driven
//! keystream under keys derived from the file itself plus a pre-shared
//! 64-byte master key.
//!
//! ## Container layout
//!
//! ```text
//! [encryption header: 320] → [file header: 176/208] → [description] → [logo] → [data] → [serial]
//! ```
//!
//! The last 64 bytes of the encryption header are public: they seed the
//! header key and pass through unencrypted in both directions. The
//! decrypted encryption header is folded into a 64-byte rolling key, and
//! each section is encrypted under the rolling key XORed with a small
//! per-section tweak. Because everything bottoms out in XOR against a
//! plaintext-independent keystream, encryption and decryption are the
//! same operation.
//!
//! ## Example
//!
//! ```no_run
//! use pescrypter::{decrypt, encrypt, HeaderFormat, MasterKey};
//!
//! let input = std::fs::read("SAVE.bin").unwrap();
//! let mut save = decrypt(&input, &MasterKey::DEFAULT, HeaderFormat::Old).unwrap();
//!
//! save.data[0] ^= 1;
//! save.refresh_sizes().unwrap();
//! let output = encrypt(&save, &MasterKey::DEFAULT).unwrap();
//! std::fs::write("SAVE.bin", output).unwrap();
//! ```

pub mod cli;
pub mod codec;
pub mod crypto;
pub mod error;
pub mod header;
pub mod key;

pub use codec::{decrypt, encrypt, SaveFile, MAX_SECTION_SIZE};
pub use error::{CrypterError, Result};
pub use header::{FileHeader, HeaderFormat};
pub use key::{MasterKey, MASTER_KEY_LENGTH};
