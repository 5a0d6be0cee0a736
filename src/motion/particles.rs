use super::seed::BodySeed;

/// Velocities are expressed per 60 Hz frame.
pub const REFERENCE_FRAME_MS: f64 = 1_000.0 / 60.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleBody {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
}

impl ParticleBody {
    pub fn step(&mut self, frames: f64, width: f64, height: f64) {
        self.x += self.vx * frames;
        self.y += self.vy * frames;
        (self.x, self.vx) = reflect(self.x, self.vx, width);
        (self.y, self.vy) = reflect(self.y, self.vy, height);
    }
}

/// Mirrors a position that left `[0, limit]` back inside and points the
/// velocity away from the wall it crossed.
fn reflect(position: f64, velocity: f64, limit: f64) -> (f64, f64) {
    if limit <= 0.0 {
        return (0.0, velocity);
    }
    if position > limit {
        ((2.0 * limit - position).clamp(0.0, limit), -velocity.abs())
    } else if position < 0.0 {
        ((-position).clamp(0.0, limit), velocity.abs())
    } else {
        (position, velocity)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasSize {
    pub css_width: f64,
    pub css_height: f64,
    pub pixel_ratio: f64,
}

impl CanvasSize {
    pub fn new(css_width: f64, css_height: f64, device_pixel_ratio: f64, max_pixel_ratio: f64) -> Self {
        let ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        Self {
            css_width: css_width.max(0.0),
            css_height: css_height.max(0.0),
            pixel_ratio: ratio.min(max_pixel_ratio),
        }
    }

    pub fn pixel_width(&self) -> u32 {
        (self.css_width * self.pixel_ratio).floor() as u32
    }

    pub fn pixel_height(&self) -> u32 {
        (self.css_height * self.pixel_ratio).floor() as u32
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParticleField {
    bodies: Vec<ParticleBody>,
    width: f64,
    height: f64,
}

impl ParticleField {
    pub fn seeded(seed: u32, count: usize, width: f64, height: f64) -> Self {
        let bodies = (0..count)
            .map(|index| {
                let body = BodySeed::at(seed, index);
                ParticleBody {
                    x: body.x_fraction * width,
                    y: body.y_fraction * height,
                    vx: body.vx,
                    vy: body.vy,
                    radius: body.radius,
                }
            })
            .collect();

        Self { bodies, width, height }
    }

    pub fn from_bodies(bodies: Vec<ParticleBody>, width: f64, height: f64) -> Self {
        Self { bodies, width, height }
    }

    pub fn bodies(&self) -> &[ParticleBody] {
        &self.bodies
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        for body in &mut self.bodies {
            body.x = body.x.clamp(0.0, self.width);
            body.y = body.y.clamp(0.0, self.height);
        }
    }

    pub fn step(&mut self, elapsed_ms: f64) {
        let frames = (elapsed_ms / REFERENCE_FRAME_MS).max(0.0);
        for body in &mut self.bodies {
            body.step(frames, self.width, self.height);
        }
    }
}
