/* This file is part of the ytconv project
*
*  Copyright (C) 2025 mini_bomba
*  
*  This program is free software: you can redistribute it and/or modify
*  it under the terms of the GNU Affero General Public License as published by
*  the Free Software Foundation, either version 3 of the License, or
*  (at your option) any later version.
*
*  This program is distributed in the hope that it will be useful,
*  but WITHOUT ANY WARRANTY; without even the implied warranty of
*  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
*  GNU Affero General Public License for more details.
*
*  You should have received a copy of the GNU Affero General Public License
*  along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use std::time::Duration;

pub const CONFETTI_COLORS: [&str; 7] = ["#f94144", "#f3722c", "#f8961e", "#f9c74f", "#90be6d", "#43aa8b", "#577590"];

#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiParticle {
    /// Horizontal start position, in `vw`
    pub left: f64,
    /// Duration of the fall animation, in seconds
    pub fall_duration: f64,
    pub color: &'static str,
}

impl ConfettiParticle {
    pub fn style(&self) -> String {
        format!("left: {:.2}vw; animation-duration: {:.2}s; background-color: {};", self.left, self.fall_duration, self.color)
    }
}

/// A batch of particles that share a lifetime
#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiBurst {
    pub particles: Vec<ConfettiParticle>,
    /// How long the particles stay in the DOM
    pub lifetime: Duration,
}

impl ConfettiBurst {
    /// `random` must yield values in `[0, 1)`, like `Math.random()`
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn generate(count: usize, lifetime: Duration, mut random: impl FnMut() -> f64) -> Self {
        let particles = (0..count)
            .map(|_| {
                let left = random() * 100.;
                let fall_duration = random() * 3. + 2.;
                let color_idx = ((random() * CONFETTI_COLORS.len() as f64) as usize).min(CONFETTI_COLORS.len() - 1);
                ConfettiParticle { left, fall_duration, color: CONFETTI_COLORS[color_idx] }
            })
            .collect();
        Self { particles, lifetime }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_requested_amount_within_bounds() {
        let mut seed = 0.0_f64;
        let burst = ConfettiBurst::generate(100, Duration::from_secs(5), || {
            seed = (seed + 0.37) % 1.;
            seed
        });
        assert_eq!(burst.particles.len(), 100);
        assert_eq!(burst.lifetime, Duration::from_secs(5));
        for particle in &burst.particles {
            assert!((0. ..100.).contains(&particle.left));
            assert!((2. ..5.).contains(&particle.fall_duration));
            assert!(CONFETTI_COLORS.contains(&particle.color));
        }
    }

    #[test]
    fn out_of_range_randomness_still_picks_a_color() {
        let burst = ConfettiBurst::generate(3, Duration::from_secs(1), || 1.);
        assert!(burst.particles.iter().all(|p| p.color == CONFETTI_COLORS[6]));
    }

    #[test]
    fn style_string() {
        let particle = ConfettiParticle { left: 12.5, fall_duration: 3.25, color: "#f94144" };
        assert_eq!(particle.style(), "left: 12.50vw; animation-duration: 3.25s; background-color: #f94144;");
    }
}
