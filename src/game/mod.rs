//! Game state and the per-frame update step.
//!
//! `GameState` owns the bird, the obstacle stream, the score counters and the
//! terminal flag. Nothing in here touches the DOM: `tick` reports what
//! happened as a list of [`GameEvent`]s and the presentation layer reacts to
//! them (text sinks, overlays, celebration).

pub mod collision;
pub mod obstacle;

use obstacle::{Obstacle, ObstacleGenerator, ObstacleShape};

// --- Constants ----------------------------------------------------------------

pub const FIELD_WIDTH: f64 = 400.0;
pub const FIELD_HEIGHT: f64 = 480.0;

pub const BIRD_X: f64 = 80.0;
pub const BIRD_START_Y: f64 = 220.0;
pub const BIRD_RADIUS: f64 = 20.0;

pub const GRAVITY: f64 = 0.5; // per tick
pub const JUMP_IMPULSE: f64 = -8.0;

pub const PIPE_GAP: f64 = 180.0;
pub const PIPE_WIDTH: f64 = 50.0;
pub const PIPE_SPEED: f64 = 2.0; // per tick
/// A new obstacle spawns once the spawn timer exceeds this many ticks.
pub const SPAWN_INTERVAL_TICKS: u32 = 130;

// --- Bird ---------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bird {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub velocity: f64,
}

impl Default for Bird {
    fn default() -> Self {
        Self {
            x: BIRD_X,
            y: BIRD_START_Y,
            radius: BIRD_RADIUS,
            velocity: 0.0,
        }
    }
}

// --- Events -------------------------------------------------------------------

/// Observable outcomes of a single tick, in the order they happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// An obstacle was passed; carries the new score.
    Scored(u32),
    /// Score strictly exceeded the previous high score; carries the new high.
    NewHighScore(u32),
    /// Bird left the field or hit an obstacle.
    GameOver,
}

// --- State --------------------------------------------------------------------

/// The whole mutable game. One instance per page.
pub struct GameState {
    width: f64,
    height: f64,
    bird: Bird,
    obstacles: Vec<Obstacle>,
    generator: ObstacleGenerator,
    spawn_timer: u32,
    score: u32,
    high_score: u32,
    game_over: bool,
}

impl GameState {
    pub fn new(generator: ObstacleGenerator) -> Self {
        Self::with_field(FIELD_WIDTH, FIELD_HEIGHT, generator)
    }

    pub fn with_field(width: f64, height: f64, generator: ObstacleGenerator) -> Self {
        Self {
            width,
            height,
            bird: Bird::default(),
            obstacles: Vec::new(),
            generator,
            spawn_timer: 0,
            score: 0,
            high_score: 0,
            game_over: false,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }
    pub fn height(&self) -> f64 {
        self.height
    }
    pub fn bird(&self) -> &Bird {
        &self.bird
    }
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }
    pub fn score(&self) -> u32 {
        self.score
    }
    pub fn high_score(&self) -> u32 {
        self.high_score
    }
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }
    pub fn spawn_timer(&self) -> u32 {
        self.spawn_timer
    }

    /// Shape used for obstacles spawned after this call. Existing obstacles
    /// keep theirs.
    pub fn set_obstacle_shape(&mut self, shape: ObstacleShape) {
        self.generator.set_shape(shape);
    }

    pub fn obstacle_shape(&self) -> ObstacleShape {
        self.generator.shape()
    }

    /// Append a hand-built obstacle, bypassing the generator's gap rule.
    /// Scenario setup for tests only.
    #[doc(hidden)]
    pub fn push_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    pub fn jump(&mut self) {
        if self.game_over {
            return;
        }
        self.bird.velocity = JUMP_IMPULSE;
    }

    /// Start a fresh round. The high score survives.
    pub fn restart(&mut self) {
        self.score = 0;
        self.bird = Bird::default();
        self.obstacles.clear();
        self.spawn_timer = 0;
        self.game_over = false;
        log::debug!("round restarted (high score {})", self.high_score);
    }

    /// Advance one frame. A no-op once the game is over.
    pub fn tick(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.game_over {
            return events;
        }

        self.bird.velocity += GRAVITY;
        self.bird.y += self.bird.velocity;
        if collision::out_of_bounds(&self.bird, self.height) {
            self.enter_game_over(&mut events);
            return events;
        }

        self.spawn_timer += 1;
        if self.spawn_timer > SPAWN_INTERVAL_TICKS {
            let obstacle = self.generator.spawn(self.width, self.height);
            self.obstacles.push(obstacle);
            self.spawn_timer = 0;
        }

        let mut hit = false;
        for obstacle in &mut self.obstacles {
            obstacle.x -= PIPE_SPEED;
            obstacle.apply_drift();

            if !obstacle.passed && obstacle.trailing_edge() < self.bird.x {
                obstacle.passed = true;
                self.score += 1;
                events.push(GameEvent::Scored(self.score));
                if self.score > self.high_score {
                    self.high_score = self.score;
                    log::info!("new high score: {}", self.high_score);
                    events.push(GameEvent::NewHighScore(self.high_score));
                }
            }

            hit |= collision::hits(&self.bird, obstacle, self.height);
        }
        if hit {
            self.enter_game_over(&mut events);
        }

        self.obstacles.retain(|o| !o.is_offscreen());
        events
    }

    fn enter_game_over(&mut self, events: &mut Vec<GameEvent>) {
        self.game_over = true;
        log::info!("game over with score {}", self.score);
        events.push(GameEvent::GameOver);
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(ObstacleGenerator::from_entropy())
    }
}
