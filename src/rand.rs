use std::num::Wrapping;

// Linear congruential generator parameters
const MUL: u64 = 6364136223846793005; // Knuth section 3.3.4 (p.108)
const INC: u64 = 1442695040888963407;

/// A source of uniform random draws for the painters and the settings randomizer.
///
/// Both ends of an integer range are inclusive. Callers keep `lo <= hi`.
pub trait RandomSource {
    /// Picks an integer uniformly distributed in `lo..=hi`.
    fn integer(&mut self, lo: i32, hi: i32) -> i32;

    /// Picks `true` or `false` with equal probability.
    fn boolean(&mut self) -> bool;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn integer(&mut self, lo: i32, hi: i32) -> i32 {
        (**self).integer(lo, hi)
    }

    fn boolean(&mut self) -> bool {
        (**self).boolean()
    }
}

/// Seeded PCG generator. The same seed always yields the same texture.
#[derive(Clone, PartialEq)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn from_seed(seed: &[u8]) -> Rng {
        // The two halves of the state are hashed separately and read little-endian, so a seed
        // produces the same stream on every platform.
        let lower = murmur2(seed, 1690382925).swap_bytes();
        let upper = murmur2(seed, 72970470).swap_bytes();
        let state = u64::from(lower) | (u64::from(upper) << 32);
        Rng { state }
    }

    /// Picks a random value uniformly distributed between `0.0` (inclusive) and `1.0` (exclusive).
    pub fn rnd(&mut self) -> f64 {
        let old_state = self.state;
        self.state = old_state.wrapping_mul(MUL).wrapping_add(INC);
        // PCG-XSH-RR output function over the old state, with the top two bits of the xorshift
        // operand masked off.
        let xorshifted = ((((old_state >> 18) & !(3 << 30)) ^ old_state) >> 27) as u32;
        let fac = xorshifted.rotate_right((old_state >> 59) as u32);
        2.0f64.powi(-32) * f64::from(fac)
    }
}

impl RandomSource for Rng {
    /// ```rust
    /// use texgen::rand::{RandomSource, Rng};
    /// let mut rng = Rng::from_seed(b"");
    /// assert_eq!(rng.integer(0, 9), 8);
    /// assert_eq!(rng.integer(7, 7), 7);
    /// ```
    fn integer(&mut self, lo: i32, hi: i32) -> i32 {
        let span = f64::from(hi) - f64::from(lo) + 1.0;
        (self.rnd() * span).floor() as i32 + lo
    }

    fn boolean(&mut self) -> bool {
        self.rnd() < 0.5
    }
}

/// Test double that answers every integer range with one of its ends and replays a fixed coin
/// sequence.
#[cfg(test)]
pub(crate) struct Extremes {
    pub high: bool,
    pub coins: std::collections::VecDeque<bool>,
    pub draws: usize,
}

#[cfg(test)]
impl Extremes {
    pub fn low() -> Self {
        Extremes {
            high: false,
            coins: Default::default(),
            draws: 0,
        }
    }

    pub fn high() -> Self {
        Extremes {
            high: true,
            ..Extremes::low()
        }
    }

    pub fn with_coins(mut self, coins: &[bool]) -> Self {
        self.coins = coins.iter().copied().collect();
        self
    }
}

#[cfg(test)]
impl RandomSource for Extremes {
    fn integer(&mut self, lo: i32, hi: i32) -> i32 {
        self.draws += 1;
        if self.high {
            hi
        } else {
            lo
        }
    }

    fn boolean(&mut self) -> bool {
        self.coins.pop_front().expect("ran out of coins")
    }
}


fn murmur2(bytes: &[u8], seed: u32) -> u32 {
    const K: usize = 16;
    const MASK: Wrapping<u32> = Wrapping(0xffff);
    const MASK_BYTE: Wrapping<u32> = Wrapping(0xff);
    const M: Wrapping<u32> = Wrapping(0x5bd1e995);

    let mut l: usize = bytes.len();
    let mut h = Wrapping(seed ^ (l as u32));
    let mut i = 0;

    let byte32 = |i: usize| Wrapping(u32::from(bytes[i]));

    while l >= 4 {
        let mut k = (byte32(i) & MASK_BYTE)
            | ((byte32(i + 1) & MASK_BYTE) << 8)
            | ((byte32(i + 2) & MASK_BYTE) << 16)
            | ((byte32(i + 3) & MASK_BYTE) << 24);
        i += 4;
        k = (k & MASK) * M + ((((k >> K) * M) & MASK) << K);
        k ^= k >> 24;
        k = (k & MASK) * M + ((((k >> K) * M) & MASK) << K);
        h = ((h & MASK) * M + ((((h >> K) * M) & MASK) << K)) ^ k;
        l -= 4;
    }
    if l >= 3 {
        h ^= (byte32(i + 2) & MASK_BYTE) << K;
    }
    if l >= 2 {
        h ^= (byte32(i + 1) & MASK_BYTE) << 8;
    }
    if l >= 1 {
        h ^= byte32(i) & MASK_BYTE;
        h = (h & MASK) * M + ((((h >> K) * M) & MASK) << K);
    }

    h ^= h >> 13;
    h = (h & MASK) * M + ((((h >> K) * M) & MASK) << K);
    h ^= h >> 15;

    h.0
}
