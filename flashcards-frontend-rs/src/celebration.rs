//! Confetti patterns. Each pattern describes the bursts fired on every animation frame while the
//! celebration runs; `browser::confetti` hands them to canvas-confetti.

use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConfettiPattern {
    /// Two cannons, one on each side of the screen
    SchoolPride,
    Fireworks,
    Spray,
}

impl ConfettiPattern {
    pub const ALL: [ConfettiPattern; 3] = [
        ConfettiPattern::SchoolPride,
        ConfettiPattern::Fireworks,
        ConfettiPattern::Spray,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// The bursts for one animation frame.
    pub fn frame<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<ConfettiBurst> {
        match self {
            ConfettiPattern::SchoolPride => {
                let colors = ["#bb0000", "#ffffff"];
                vec![
                    ConfettiBurst::new(2, 60.0, 55.0, Origin { x: 0.0, y: None }, &colors),
                    ConfettiBurst::new(2, 120.0, 55.0, Origin { x: 1.0, y: None }, &colors),
                ]
            }
            ConfettiPattern::Fireworks => {
                let origin = Origin {
                    x: rng.r#gen::<f64>(),
                    y: Some(rng.r#gen::<f64>() - 0.2),
                };
                vec![ConfettiBurst::new(
                    20,
                    90.0,
                    360.0,
                    origin,
                    &["#ff0000", "#00ff00", "#0000ff"],
                )]
            }
            ConfettiPattern::Spray => vec![ConfettiBurst::new(
                10,
                45.0,
                120.0,
                Origin { x: 0.5, y: Some(0.6) },
                &["#ffff00", "#00ffff", "#ff00ff"],
            )],
        }
    }
}

/// Options for a single `confetti()` call
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfettiBurst {
    pub particle_count: u32,
    pub angle: f64,
    pub spread: f64,
    pub origin: Origin,
    pub colors: Vec<String>,
}

impl ConfettiBurst {
    fn new(particle_count: u32, angle: f64, spread: f64, origin: Origin, colors: &[&str]) -> Self {
        Self {
            particle_count,
            angle,
            spread,
            origin,
            colors: colors.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Where the burst starts, as fractions of the viewport. canvas-confetti picks its own `y` when absent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    pub x: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}
