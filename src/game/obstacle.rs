// Obstacle descriptors and the spawner that produces them.
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use super::{PIPE_GAP, PIPE_WIDTH};

/// Top gap heights are drawn uniformly from this half-open range.
pub const TOP_HEIGHT_RANGE: std::ops::Range<f64> = 70.0..250.0;
/// Per-tick drift magnitude range for heart obstacles.
pub const DRIFT_RANGE: std::ops::Range<f64> = 0.4..2.1;
/// Neither barrier of a drifting obstacle is pushed below this height.
pub const DRIFT_MIN_HEIGHT: f64 = 70.0;

/// Visual shape of an obstacle. Collision ignores it entirely.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ObstacleShape {
    /// Also selected by the "square" tag.
    #[default]
    Rectangle,
    Circle,
    /// Hearts also drift: their gap slides up and down while they scroll.
    Heart,
    /// Unrecognised tag: collides like any other obstacle but draws nothing.
    Unknown,
}

impl ObstacleShape {
    /// Resolve a settings tag. Never fails; unknown tags map to `Unknown`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "rect" | "rectangle" | "square" => ObstacleShape::Rectangle,
            "circle" => ObstacleShape::Circle,
            "heart" => ObstacleShape::Heart,
            _ => ObstacleShape::Unknown,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            ObstacleShape::Rectangle => "rect",
            ObstacleShape::Circle => "circle",
            ObstacleShape::Heart => "heart",
            ObstacleShape::Unknown => "unknown",
        }
    }
}

impl From<String> for ObstacleShape {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<ObstacleShape> for String {
    fn from(shape: ObstacleShape) -> Self {
        shape.tag().to_string()
    }
}

/// Oscillation parameters carried only by heart obstacles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Drift {
    pub amount: f64,
    /// +1 moves the gap down (top grows), -1 moves it up.
    pub direction: f64,
}

/// A paired top/bottom barrier scrolling right to left.
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub x: f64,
    pub width: f64,
    pub top: f64,
    pub bottom: f64,
    pub passed: bool,
    pub shape: ObstacleShape,
    pub drift: Option<Drift>,
}

impl Obstacle {
    /// Build an obstacle at `x` whose bottom barrier fills whatever the
    /// top barrier and the fixed gap leave of `field_height`.
    pub fn new(x: f64, top: f64, field_height: f64, shape: ObstacleShape) -> Self {
        Self {
            x,
            width: PIPE_WIDTH,
            top,
            bottom: field_height - top - PIPE_GAP,
            passed: false,
            shape,
            drift: None,
        }
    }

    pub fn trailing_edge(&self) -> f64 {
        self.x + self.width
    }

    /// Fully past the left boundary.
    pub fn is_offscreen(&self) -> bool {
        self.trailing_edge() <= 0.0
    }

    /// Slide the gap by one drift step. The shrinking side stops exactly at
    /// `DRIFT_MIN_HEIGHT`; reaching it reverses the direction.
    pub(crate) fn apply_drift(&mut self) {
        let Some(drift) = self.drift.as_mut() else {
            return;
        };
        if drift.direction > 0.0 {
            let step = drift.amount.min((self.bottom - DRIFT_MIN_HEIGHT).max(0.0));
            self.top += step;
            self.bottom -= step;
            if self.bottom <= DRIFT_MIN_HEIGHT {
                drift.direction = -1.0;
            }
        } else {
            let step = drift.amount.min((self.top - DRIFT_MIN_HEIGHT).max(0.0));
            self.top -= step;
            self.bottom += step;
            if self.top <= DRIFT_MIN_HEIGHT {
                drift.direction = 1.0;
            }
        }
    }
}

/// Produces obstacles at the right edge with a random gap placement.
pub struct ObstacleGenerator {
    rng: SmallRng,
    shape: ObstacleShape,
}

impl ObstacleGenerator {
    pub fn new(rng: SmallRng) -> Self {
        Self {
            rng,
            shape: ObstacleShape::default(),
        }
    }

    pub fn from_entropy() -> Self {
        Self::new(SmallRng::from_entropy())
    }

    /// Shape stamped onto obstacles spawned from now on.
    pub fn set_shape(&mut self, shape: ObstacleShape) {
        self.shape = shape;
    }

    pub fn shape(&self) -> ObstacleShape {
        self.shape
    }

    pub fn spawn(&mut self, field_width: f64, field_height: f64) -> Obstacle {
        let top = self.rng.gen_range(TOP_HEIGHT_RANGE);
        let mut obstacle = Obstacle::new(field_width, top, field_height, self.shape);
        if self.shape == ObstacleShape::Heart {
            obstacle.drift = Some(Drift {
                amount: self.rng.gen_range(DRIFT_RANGE),
                direction: if self.rng.gen_bool(0.5) { -1.0 } else { 1.0 },
            });
        }
        log::debug!(
            "spawned {:?} obstacle top={:.1} bottom={:.1}",
            obstacle.shape,
            obstacle.top,
            obstacle.bottom
        );
        obstacle
    }
}
