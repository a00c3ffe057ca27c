//! Keystream cipher over MT19937 output
//!
//! The generator is reseeded from the 64-byte key on every call, then a
//! five-word sliding mix whitens its output before it is XORed onto the
//! buffer. XOR makes the whole operation an involution: applying it twice
//! with the same key restores the input.

use crate::crypto::mt19937::Mt19937;
use crate::key::MASTER_KEY_LENGTH;

/// Apply the keystream to `buf` in place.
///
/// `key` is reinterpreted as 16 little-endian u32 words. Works for any
/// buffer length; a trailing 1-3 bytes are treated as a zero-extended
/// word and only the valid bytes are written back.
pub fn crypt(key: &[u8; MASTER_KEY_LENGTH], buf: &mut [u8]) {
    let mut words = [0u32; 16];
    for (word, chunk) in words.iter_mut().zip(key.chunks_exact(4)) {
        *word = u32::from_le_bytes(chunk.try_into().unwrap());
    }

    let mut mt = Mt19937::from_key(&words);
    let mut c0 = mt.next_u32();
    let mut c1 = mt.next_u32();
    let mut c2 = mt.next_u32();
    let mut c3 = mt.next_u32();

    let mut chunks = buf.chunks_exact_mut(4);
    for chunk in &mut chunks {
        let c4 = mt.next_u32();
        let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        chunk.copy_from_slice(&(c4 ^ c3 ^ c2 ^ c1 ^ c0 ^ word).to_le_bytes());

        c0 = c1.rotate_right(15);
        c1 = c2.rotate_left(11);
        c2 = c3.rotate_left(7);
        c3 = c4.rotate_right(13);
    }

    let tail = chunks.into_remainder();
    if !tail.is_empty() {
        let mut rest = [0u8; 4];
        rest[..tail.len()].copy_from_slice(tail);
        let word = u32::from_le_bytes(rest) ^ mt.next_u32() ^ c3 ^ c2 ^ c1 ^ c0;
        tail.copy_from_slice(&word.to_le_bytes()[..tail.len()]);
    }
}
