//! Deterministic layout values for decorative particles.
//!
//! Everything here is a pure function of a seed and an index, so the first
//! paint and every later repaint agree on where each particle sits.

const MULBERRY_INCREMENT: u32 = 0x6D2B_79F5;
const U32_RANGE: f64 = 4_294_967_296.0;

const VALUES_PER_POINT: u32 = 3;
const VALUES_PER_DRIFT: u32 = 4;
const VALUES_PER_BODY: u32 = 5;

const DRIFT_STREAM_SALT: u32 = 0x9E37_79B9;
const BODY_STREAM_SALT: u32 = 0x85EB_CA6B;

/// Sequential mulberry32 generator. `state` after `k` draws is
/// `seed + k * increment`, which is what makes [`value_at`] possible.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_add(MULBERRY_INCREMENT);
        mix(self.state)
    }
}

fn mix(state: u32) -> f64 {
    let mut r = (state ^ (state >> 15)).wrapping_mul(1 | state);
    r ^= r.wrapping_add((r ^ (r >> 7)).wrapping_mul(61 | r));
    f64::from(r ^ (r >> 14)) / U32_RANGE
}

/// The `k`-th value drawn from a generator seeded with `seed`.
pub fn value_at(seed: u32, k: u32) -> f64 {
    mix(seed.wrapping_add(MULBERRY_INCREMENT.wrapping_mul(k.wrapping_add(1))))
}

fn range_at(seed: u32, k: u32, min: f64, max: f64) -> f64 {
    min + value_at(seed, k) * (max - min)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleSeedPoint {
    pub top: f64,
    pub left: f64,
    pub size: f64,
}

impl ParticleSeedPoint {
    pub fn at(seed: u32, index: usize) -> Self {
        let base = (index as u32).wrapping_mul(VALUES_PER_POINT);
        Self {
            top: value_at(seed, base) * 100.0,
            left: value_at(seed, base.wrapping_add(1)) * 100.0,
            size: value_at(seed, base.wrapping_add(2)) * 3.0 + 1.0,
        }
    }

    pub fn style(&self) -> String {
        format!(
            "top: {}%; left: {}%; width: {}px; height: {}px;",
            self.top, self.left, self.size, self.size
        )
    }
}

pub fn seed_points(seed: u32, count: usize) -> Vec<ParticleSeedPoint> {
    let mut rng = SeededRng::new(seed);
    (0..count)
        .map(|_| ParticleSeedPoint {
            top: rng.next_f64() * 100.0,
            left: rng.next_f64() * 100.0,
            size: rng.next_f64() * 3.0 + 1.0,
        })
        .collect()
}

/// Per-particle drift parameters for the idle pool.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DriftJitter {
    pub dx: f64,
    pub dy: f64,
    pub duration: f64,
    pub delay: f64,
}

impl DriftJitter {
    pub fn at(seed: u32, index: usize) -> Self {
        let stream = seed ^ DRIFT_STREAM_SALT;
        let base = (index as u32).wrapping_mul(VALUES_PER_DRIFT);
        Self {
            dx: range_at(stream, base, -20.0, 20.0),
            dy: range_at(stream, base.wrapping_add(1), -15.0, 15.0),
            duration: range_at(stream, base.wrapping_add(2), 3.0, 6.0),
            delay: range_at(stream, base.wrapping_add(3), 0.0, 1.0),
        }
    }
}

/// Initial state of one physics body, as fractions of the canvas and px/frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodySeed {
    pub x_fraction: f64,
    pub y_fraction: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
}

impl BodySeed {
    pub fn at(seed: u32, index: usize) -> Self {
        let stream = seed ^ BODY_STREAM_SALT;
        let base = (index as u32).wrapping_mul(VALUES_PER_BODY);
        Self {
            x_fraction: value_at(stream, base),
            y_fraction: value_at(stream, base.wrapping_add(1)),
            vx: (value_at(stream, base.wrapping_add(2)) - 0.5) * 0.6,
            vy: (value_at(stream, base.wrapping_add(3)) - 0.5) * 0.6,
            radius: value_at(stream, base.wrapping_add(4)) * 1.8 + 0.5,
        }
    }
}
