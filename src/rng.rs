/// Source of uniform randomness for adversary decisions. The engine is
/// generic over it so callers can replace the seeded generator with a
/// scripted sequence.
pub trait RandomSource {
    /// Uniform sample in `[0, 1)`.
    fn next_f32(&mut self) -> f32;

    fn chance(&mut self, probability: f32) -> bool {
        self.next_f32() < probability
    }

    fn pick_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        (self.next_f32() * len as f32).floor().min((len - 1) as f32) as usize
    }
}

#[derive(Clone, Debug)]
pub struct Rng {
    seed: u32,
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }
}

impl RandomSource for Rng {
    fn next_f32(&mut self) -> f32 {
        self.seed = self.seed.wrapping_add(0x6d2b79f5);
        let mut t = self.seed;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        let out = t ^ (t >> 14);
        (out >> 8) as f32 / 16_777_216.0
    }
}
