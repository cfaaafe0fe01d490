// Integration tests (native) for the `flappy-points` crate.
// These exercise the public game API on the host; nothing here needs a browser.

use flappy_points::celebration::Celebration;
use flappy_points::game::{BIRD_START_Y, FIELD_HEIGHT, PIPE_GAP, SPAWN_INTERVAL_TICKS};
use flappy_points::input::{self, InputOutcome};
use flappy_points::{GameEvent, GameState, Obstacle, ObstacleGenerator, ObstacleShape};
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn seeded_game(seed: u64) -> GameState {
    GameState::new(ObstacleGenerator::new(SmallRng::seed_from_u64(seed)))
}

// An obstacle that has barely not yet reached the bird and leaves the whole
// field open, so passing it scores without a collision.
fn free_point() -> Obstacle {
    let mut o = Obstacle::new(31.0, 0.0, FIELD_HEIGHT, ObstacleShape::Rectangle);
    o.bottom = 0.0;
    o
}

// Runs a round to completion, jumping whenever the bird sinks below its start
// height. Returns every event emitted.
fn play_round(state: &mut GameState, max_ticks: usize) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..max_ticks {
        if state.is_game_over() {
            break;
        }
        if state.bird().velocity > 0.0 && state.bird().y > BIRD_START_Y {
            input::activate(state);
        }
        events.extend(state.tick());
    }
    events
}

#[test]
fn restart_resets_round_but_keeps_high_score() {
    let mut s = seeded_game(5);
    s.push_obstacle(free_point());
    s.tick();
    assert_eq!((s.score(), s.high_score()), (1, 1));

    s.restart();
    assert_eq!(s.score(), 0);
    assert_eq!(s.high_score(), 1);
    assert!(!s.is_game_over());
    assert!(s.obstacles().is_empty());
    assert_eq!(s.bird().y, BIRD_START_Y);
}

#[test]
fn spawned_obstacles_keep_fixed_gap() {
    let mut s = seeded_game(99);
    s.set_obstacle_shape(ObstacleShape::Circle);
    let _ = play_round(&mut s, SPAWN_INTERVAL_TICKS as usize + 1);
    let o = s.obstacles().first().expect("one obstacle spawned");
    assert!((70.0..250.0).contains(&o.top));
    // nothing drifts, so the spawn-time sum still holds
    assert!((o.top + o.bottom + PIPE_GAP - FIELD_HEIGHT).abs() < 1e-9);
}

#[test]
fn score_counts_each_obstacle_once_and_high_score_never_drops() {
    let mut s = seeded_game(1);
    let mut celebrations = 0;
    let mut previous_high = 0;
    for round in 1..=3u32 {
        for _ in 0..round {
            s.push_obstacle(free_point());
            for e in s.tick() {
                if let GameEvent::NewHighScore(_) = e {
                    celebrations += 1;
                }
            }
        }
        assert_eq!(s.score(), round);
        assert!(s.high_score() >= s.score());
        assert!(s.high_score() >= previous_high);
        previous_high = s.high_score();

        // crash and restart through the input handler
        while !s.is_game_over() {
            s.tick();
        }
        assert_eq!(input::activate(&mut s), InputOutcome::Restarted);
        assert_eq!(s.score(), 0);
        assert_eq!(s.high_score(), round);
        assert!(s.obstacles().is_empty());
    }
    // round 1: 1 new high; round 2: scores 1 (tie) then 2 (new); round 3: 3 is new
    assert_eq!(celebrations, 3);
}

#[test]
fn long_round_keeps_invariants() {
    let mut s = seeded_game(2024);
    s.set_obstacle_shape(ObstacleShape::Heart);
    let mut last_score = 0;
    for _ in 0..5000 {
        if s.is_game_over() {
            break;
        }
        if s.bird().velocity > 0.0 && s.bird().y > BIRD_START_Y {
            s.jump();
        }
        s.tick();
        assert!(s.score() >= last_score);
        assert!(s.high_score() >= s.score());
        last_score = s.score();
        if !s.is_game_over() {
            let b = s.bird();
            assert!(b.y - b.radius >= 0.0 && b.y + b.radius <= FIELD_HEIGHT);
        }
        for o in s.obstacles() {
            assert!(o.x + o.width > 0.0);
            assert!(o.top >= 60.0 && o.bottom >= 50.0);
        }
    }
}

#[test]
fn celebration_follows_new_high_scores_only() {
    let mut s = seeded_game(3);
    let mut c = Celebration::default();
    let mut rng = SmallRng::seed_from_u64(8);
    let mut now = 0.0;
    s.push_obstacle(free_point());
    for e in s.tick() {
        if let GameEvent::NewHighScore(_) = e {
            c.fire(now, 800.0, &mut rng);
        }
    }
    assert!(c.banner_visible());
    now += 5000.0;
    c.expire(now);
    assert!(!c.banner_visible());
    assert_eq!(c.pending(), 0);
}
