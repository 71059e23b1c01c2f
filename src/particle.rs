use rand::Rng;
use crate::constants::*;

/// One decorative particle. Positions and timings are consumed by the stylesheet's
/// keyframes, so only the randomised parameters live here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub left_percent: f32,
    pub delay_secs: f32,
    pub duration_secs: f32,
}

impl Particle {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            left_percent: rng.random_range(PARTICLE_LEFT_RANGE),
            delay_secs: rng.random_range(PARTICLE_DELAY_RANGE),
            duration_secs: rng.random_range(PARTICLE_DURATION_RANGE),
        }
    }

    // Full-precision Display keeps the value inside its range once parsed back
    pub fn style(&self) -> String {
        format!(
            "left: {}%; animation-delay: {}s; animation-duration: {}s;",
            self.left_percent, self.delay_secs, self.duration_secs
        )
    }

    /// Parses a style produced by [`Particle::style`].
    pub fn from_style(style: &str) -> Option<Self> {
        let mut left_percent = None;
        let mut delay_secs = None;
        let mut duration_secs = None;

        for decl in style.split(';') {
            let Some((name, value)) = decl.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match name.trim() {
                "left" => left_percent = value.strip_suffix('%')?.parse().ok(),
                "animation-delay" => delay_secs = value.strip_suffix('s')?.parse().ok(),
                "animation-duration" => duration_secs = value.strip_suffix('s')?.parse().ok(),
                _ => {}
            }
        }

        Some(Self {
            left_percent: left_percent?,
            delay_secs: delay_secs?,
            duration_secs: duration_secs?,
        })
    }
}

pub fn spawn_batch<R: Rng>(rng: &mut R) -> Vec<Particle> {
    (0..PARTICLE_COUNT).map(|_| Particle::random(rng)).collect()
}
