// Shape-agnostic hit testing between the bird's circle and an obstacle's gap.
use super::Bird;
use super::obstacle::Obstacle;

/// Horizontal overlap of the bird's bounding box with the obstacle span.
pub fn overlaps_span(bird: &Bird, obstacle: &Obstacle) -> bool {
    bird.x + bird.radius > obstacle.x && bird.x - bird.radius < obstacle.x + obstacle.width
}

/// True when the bird touches either barrier. Always evaluated against the
/// rectangular gap, whatever shape the obstacle is drawn with.
pub fn hits(bird: &Bird, obstacle: &Obstacle, field_height: f64) -> bool {
    if !overlaps_span(bird, obstacle) {
        return false;
    }
    let hit_top = bird.y - bird.radius < obstacle.top;
    let hit_bottom = bird.y + bird.radius > field_height - obstacle.bottom;
    hit_top || hit_bottom
}

/// Vertical bounds check for the bird alone.
pub fn out_of_bounds(bird: &Bird, field_height: f64) -> bool {
    bird.y - bird.radius < 0.0 || bird.y + bird.radius > field_height
}
