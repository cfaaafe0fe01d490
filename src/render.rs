//! Render step: paints a `GameState` onto any [`Surface`].
//!
//! Rendering is a pure read of the game state. The browser canvas adapter
//! lives in `web`; tests use a recording surface.

use crate::game::GameState;
use crate::game::obstacle::{Obstacle, ObstacleShape};
use crate::settings::Settings;

pub const BIRD_COLOR: &str = "yellow";
pub const OBSTACLE_COLOR: &str = "green";

const CIRCLE_RADIUS: f64 = 35.0;
const CIRCLE_OFFSET: f64 = 20.0;
const HEART_SIZE: f64 = 40.0;
const HEART_TOP_OFFSET: f64 = 50.0;
const HEART_BOTTOM_OFFSET: f64 = 10.0;

/// One segment of a filled outline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathSegment {
    MoveTo(f64, f64),
    /// Cubic bezier: two control points then the end point.
    CubicTo(f64, f64, f64, f64, f64, f64),
}

/// Minimal 2D drawing surface the render step needs.
pub trait Surface {
    /// Wipe the whole surface and fill it with `color`.
    fn clear(&mut self, color: &str);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str);
    fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, color: &str);
    fn fill_path(&mut self, path: &[PathSegment], color: &str);
}

pub fn render<S: Surface + ?Sized>(surface: &mut S, state: &GameState, settings: &Settings) {
    surface.clear(&settings.background);

    let bird = state.bird();
    surface.fill_circle(bird.x, bird.y, bird.radius, BIRD_COLOR);

    for obstacle in state.obstacles() {
        draw_obstacle(surface, obstacle, state.height());
    }
}

fn draw_obstacle<S: Surface + ?Sized>(surface: &mut S, o: &Obstacle, field_height: f64) {
    let mid_x = o.x + o.width / 2.0;
    let bottom_edge = field_height - o.bottom;
    match o.shape {
        ObstacleShape::Rectangle => {
            surface.fill_rect(o.x, 0.0, o.width, o.top, OBSTACLE_COLOR);
            surface.fill_rect(o.x, bottom_edge, o.width, o.bottom, OBSTACLE_COLOR);
        }
        ObstacleShape::Circle => {
            surface.fill_circle(mid_x, o.top - CIRCLE_OFFSET, CIRCLE_RADIUS, OBSTACLE_COLOR);
            surface.fill_circle(mid_x, bottom_edge + CIRCLE_OFFSET, CIRCLE_RADIUS, OBSTACLE_COLOR);
        }
        ObstacleShape::Heart => {
            surface.fill_path(
                &heart_path(mid_x, o.top - HEART_TOP_OFFSET, HEART_SIZE),
                OBSTACLE_COLOR,
            );
            surface.fill_path(
                &heart_path(mid_x, bottom_edge - HEART_BOTTOM_OFFSET, HEART_SIZE),
                OBSTACLE_COLOR,
            );
        }
        ObstacleShape::Unknown => {}
    }
}

/// Heart outline hanging from the notch at (`x`, `y + size/4`), about
/// `1.3 * size` tall.
pub fn heart_path(x: f64, y: f64, size: f64) -> [PathSegment; 5] {
    let half = size / 2.0;
    let quarter = size / 4.0;
    [
        PathSegment::MoveTo(x, y + quarter),
        PathSegment::CubicTo(x, y, x - half, y, x - half, y + quarter),
        PathSegment::CubicTo(x - half, y + half, x, y + size, x, y + size * 1.3),
        PathSegment::CubicTo(x, y + size, x + half, y + half, x + half, y + quarter),
        PathSegment::CubicTo(x + half, y, x, y, x, y + quarter),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::obstacle::ObstacleGenerator;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[derive(Debug, PartialEq)]
    enum Op {
        Clear(String),
        Rect(f64, f64, f64, f64),
        Circle(f64, f64, f64),
        Path(usize),
    }

    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
    }

    impl Surface for Recorder {
        fn clear(&mut self, color: &str) {
            self.ops.push(Op::Clear(color.to_string()));
        }
        fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, _color: &str) {
            self.ops.push(Op::Rect(x, y, w, h));
        }
        fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, _color: &str) {
            self.ops.push(Op::Circle(cx, cy, r));
        }
        fn fill_path(&mut self, path: &[PathSegment], _color: &str) {
            self.ops.push(Op::Path(path.len()));
        }
    }

    fn state_with(shape: ObstacleShape) -> GameState {
        let mut s = GameState::new(ObstacleGenerator::new(SmallRng::seed_from_u64(1)));
        s.push_obstacle(Obstacle::new(200.0, 100.0, 480.0, shape));
        s
    }

    fn draw(shape: ObstacleShape) -> Vec<Op> {
        let mut r = Recorder::default();
        let settings = Settings {
            background: "#123456".into(),
            ..Settings::default()
        };
        render(&mut r, &state_with(shape), &settings);
        r.ops
    }

    #[test]
    fn background_then_bird_first() {
        let ops = draw(ObstacleShape::Rectangle);
        assert_eq!(ops[0], Op::Clear("#123456".into()));
        assert_eq!(ops[1], Op::Circle(80.0, 220.0, 20.0));
    }

    #[test]
    fn rectangle_pair_spans_top_and_bottom() {
        let ops = draw(ObstacleShape::Rectangle);
        assert_eq!(
            &ops[2..],
            &[Op::Rect(200.0, 0.0, 50.0, 100.0), Op::Rect(200.0, 280.0, 50.0, 200.0)]
        );
    }

    #[test]
    fn circle_caps_sit_on_gap_edges() {
        let ops = draw(ObstacleShape::Circle);
        assert_eq!(
            &ops[2..],
            &[Op::Circle(225.0, 80.0, 35.0), Op::Circle(225.0, 300.0, 35.0)]
        );
    }

    #[test]
    fn hearts_are_curved_paths() {
        let ops = draw(ObstacleShape::Heart);
        assert_eq!(&ops[2..], &[Op::Path(5), Op::Path(5)]);
    }

    #[test]
    fn unknown_shape_draws_nothing() {
        let ops = draw(ObstacleShape::Unknown);
        assert_eq!(ops.len(), 2);
    }

    #[test]
    fn heart_path_closes_on_its_start() {
        let path = heart_path(100.0, 50.0, 40.0);
        assert_eq!(path[0], PathSegment::MoveTo(100.0, 60.0));
        match path[4] {
            PathSegment::CubicTo(_, _, _, _, ex, ey) => assert_eq!((ex, ey), (100.0, 60.0)),
            other => panic!("unexpected {other:?}"),
        }
        match path[2] {
            PathSegment::CubicTo(_, _, _, _, ex, ey) => assert_eq!((ex, ey), (100.0, 102.0)),
            other => panic!("unexpected {other:?}"),
        }
    }
}
