//! MT19937 generator, bit-compatible with the reference `mt19937ar`
//! implementation. Section sizes in existing save files depend on exact
//! output, so this must match the published algorithm word for word.

const N: usize = 624;
const M: usize = 397;
const MATRIX_A: u32 = 0x9908_b0df;
const UPPER_MASK: u32 = 0x8000_0000;
const LOWER_MASK: u32 = 0x7fff_ffff;

pub struct Mt19937 {
    state: [u32; N],
    index: usize,
}

impl Mt19937 {
    /// Seed from a single u32 (reference `init_genrand`)
    pub fn new(seed: u32) -> Self {
        let mut mt = Self {
            state: [0u32; N],
            index: N,
        };
        mt.reseed(seed);
        mt
    }

    /// Seed from an array of u32 words (reference `init_by_array`)
    pub fn from_key(key: &[u32]) -> Self {
        let mut mt = Self::new(19650218);
        let mut i = 1usize;
        let mut j = 0usize;

        for _ in 0..N.max(key.len()) {
            mt.state[i] = (mt.state[i]
                ^ ((mt.state[i - 1] ^ (mt.state[i - 1] >> 30)).wrapping_mul(1664525)))
            .wrapping_add(key[j])
            .wrapping_add(j as u32);
            i += 1;
            j += 1;
            if i >= N {
                mt.state[0] = mt.state[N - 1];
                i = 1;
            }
            if j >= key.len() {
                j = 0;
            }
        }
        for _ in 0..N - 1 {
            mt.state[i] = (mt.state[i]
                ^ ((mt.state[i - 1] ^ (mt.state[i - 1] >> 30)).wrapping_mul(1566083941)))
            .wrapping_sub(i as u32);
            i += 1;
            if i >= N {
                mt.state[0] = mt.state[N - 1];
                i = 1;
            }
        }
        mt.state[0] = 0x8000_0000;
        mt
    }

    fn reseed(&mut self, seed: u32) {
        self.state[0] = seed;
        for i in 1..N {
            self.state[i] = 1812433253u32
                .wrapping_mul(self.state[i - 1] ^ (self.state[i - 1] >> 30))
                .wrapping_add(i as u32);
        }
        self.index = N;
    }

    /// Next 32-bit output (reference `genrand_int32`)
    pub fn next_u32(&mut self) -> u32 {
        if self.index >= N {
            self.generate_block();
        }

        let mut y = self.state[self.index];
        self.index += 1;

        // Tempering
        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5681;
        y ^= (y << 15) & 0xefc6_0000;
        y ^= y >> 18;
        y
    }

    fn generate_block(&mut self) {
        for kk in 0..N - M {
            let y = (self.state[kk] & UPPER_MASK) | (self.state[kk + 1] & LOWER_MASK);
            self.state[kk] = self.state[kk + M] ^ (y >> 1) ^ if y & 1 != 0 { MATRIX_A } else { 0 };
        }
        for kk in N - M..N - 1 {
            let y = (self.state[kk] & UPPER_MASK) | (self.state[kk + 1] & LOWER_MASK);
            self.state[kk] =
                self.state[kk + M - N] ^ (y >> 1) ^ if y & 1 != 0 { MATRIX_A } else { 0 };
        }
        let y = (self.state[N - 1] & UPPER_MASK) | (self.state[0] & LOWER_MASK);
        self.state[N - 1] = self.state[M - 1] ^ (y >> 1) ^ if y & 1 != 0 { MATRIX_A } else { 0 };

        self.index = 0;
    }
}
