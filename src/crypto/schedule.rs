//! Key schedule: header transform, rolling key, per-section tweaked keys
//!
//! Every key in the file is 64 bytes and every derivation is XOR-based,
//! so encryption and decryption are the same operation throughout.

use crate::crypto::stream;
use crate::key::{MasterKey, MASTER_KEY_LENGTH};

/// Size of the encryption header region at the start of every container
pub const ENCRYPTION_HEADER_SIZE: usize = 320;

/// Offset of the public trailer inside the encryption header.
/// The trailer doubles as the header key seed and is never encrypted.
pub const TRAILER_OFFSET: usize = 256;

/// Reverse the byte order within each of the eight u64 words of a key
fn shuffle_master_key(key: &MasterKey) -> [u8; MASTER_KEY_LENGTH] {
    let mut out = [0u8; MASTER_KEY_LENGTH];
    let bytes = key.as_bytes();
    for i in 0..8 {
        for j in 0..8 {
            out[i * 8 + j] = bytes[i * 8 + 7 - j];
        }
    }
    out
}

/// XOR `input` onto the 64-byte accumulator, wrapping every 64 bytes
fn fold_xor(acc: &mut [u8; MASTER_KEY_LENGTH], input: &[u8]) {
    for (k, &byte) in input.iter().enumerate() {
        acc[k & 63] ^= byte;
    }
}

/// Transform a 320-byte encryption header region under `key`.
///
/// The header key is the public trailer folded with the shuffled master
/// key; the keystream runs over all 320 bytes and the trailer is then
/// copied through verbatim. Self-inverse: the same call encrypts and
/// decrypts.
pub fn crypt_header(input: &[u8; ENCRYPTION_HEADER_SIZE], key: &MasterKey) -> [u8; ENCRYPTION_HEADER_SIZE] {
    let mut header_key = [0u8; MASTER_KEY_LENGTH];
    header_key.copy_from_slice(&input[TRAILER_OFFSET..]);
    fold_xor(&mut header_key, &shuffle_master_key(key));

    let mut output = *input;
    stream::crypt(&header_key, &mut output);
    output[TRAILER_OFFSET..].copy_from_slice(&input[TRAILER_OFFSET..]);
    output
}

/// Fold a decrypted encryption header into the 64-byte rolling key
pub fn rolling_key(header: &[u8; ENCRYPTION_HEADER_SIZE]) -> [u8; MASTER_KEY_LENGTH] {
    let mut key = [0u8; MASTER_KEY_LENGTH];
    key.copy_from_slice(&header[..MASTER_KEY_LENGTH]);
    fold_xor(&mut key, &header[MASTER_KEY_LENGTH..]);
    key
}

/// Derive a section key by XORing the tweak into each u64 word of the
/// rolling key
pub fn section_key(rolling: &[u8; MASTER_KEY_LENGTH], tweak: u64) -> [u8; MASTER_KEY_LENGTH] {
    let mut out = [0u8; MASTER_KEY_LENGTH];
    for (src, dst) in rolling.chunks_exact(8).zip(out.chunks_exact_mut(8)) {
        let word = u64::from_le_bytes(src.try_into().unwrap()) ^ tweak;
        dst.copy_from_slice(&word.to_le_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterned_header() -> [u8; ENCRYPTION_HEADER_SIZE] {
        let mut h = [0u8; ENCRYPTION_HEADER_SIZE];
        for (i, b) in h.iter_mut().enumerate() {
            *b = (i * 13 + 5) as u8;
        }
        h
    }

    #[test]
    fn test_shuffle_reverses_each_u64() {
        let key = MasterKey::new(std::array::from_fn(|i| i as u8));
        let shuffled = shuffle_master_key(&key);
        assert_eq!(&shuffled[..8], &[7, 6, 5, 4, 3, 2, 1, 0]);
        assert_eq!(&shuffled[56..], &[63, 62, 61, 60, 59, 58, 57, 56]);
    }

    #[test]
    fn test_fold_wraps_at_64_bytes() {
        let mut acc = [0u8; 64];
        let input: Vec<u8> = (0..128).map(|i| i as u8).collect();
        fold_xor(&mut acc, &input);
        // byte k accumulates input[k] ^ input[k + 64]
        for k in 0..64 {
            assert_eq!(acc[k], (k as u8) ^ (k as u8 + 64));
        }
    }

    #[test]
    fn test_header_transform_is_self_inverse() {
        let header = patterned_header();
        let once = crypt_header(&header, &MasterKey::DEFAULT);
        assert_ne!(&once[..TRAILER_OFFSET], &header[..TRAILER_OFFSET]);
        let twice = crypt_header(&once, &MasterKey::DEFAULT);
        assert_eq!(twice, header);
    }

    #[test]
    fn test_trailer_passes_through_unchanged() {
        let header = patterned_header();
        let encrypted = crypt_header(&header, &MasterKey::DEFAULT);
        assert_eq!(&encrypted[TRAILER_OFFSET..], &header[TRAILER_OFFSET..]);
    }

    #[test]
    fn test_header_transform_depends_on_master_key() {
        let header = patterned_header();
        let a = crypt_header(&header, &MasterKey::ZERO);
        let b = crypt_header(&header, &MasterKey::DEFAULT);
        assert_ne!(a, b);
    }

    #[test]
    fn test_section_key_zero_tweak_is_identity() {
        let rolling = rolling_key(&patterned_header());
        assert_eq!(section_key(&rolling, 0), rolling);
    }

    #[test]
    fn test_section_keys_differ_per_tweak() {
        let rolling = rolling_key(&patterned_header());
        let keys: Vec<_> = [0u64, 1, 2, 3, 176, 208]
            .iter()
            .map(|&t| section_key(&rolling, t))
            .collect();
        for i in 0..keys.len() {
            for j in i + 1..keys.len() {
                assert_ne!(keys[i], keys[j]);
            }
        }
    }

    #[test]
    fn test_rolling_key_uses_whole_header() {
        let base = patterned_header();
        let mut tweaked = base;
        tweaked[300] ^= 0xFF; // inside the trailer-derived material
        assert_ne!(rolling_key(&base), rolling_key(&tweaked));
    }
}
