//! rand の StdRng を使う RandomSource 実装
//!
//! `--seed` を指定すると選択列が再現できる。

use crate::ports::outbound::RandomSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

pub struct StdRandom {
    rng: Mutex<StdRng>,
}

impl StdRandom {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl RandomSource for StdRandom {
    fn pick(&self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(0..len),
            Err(_) => 0,
        }
    }
}
