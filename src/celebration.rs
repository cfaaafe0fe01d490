//! Cosmetic high-score celebration: banner, confetti burst and a floating
//! heart. This module only decides *what* appears and *when it expires*; the
//! `web` adapter turns particles into DOM nodes and removes them when their
//! expiry comes due. Nothing here reads or writes `GameState`.

use rand::Rng;

pub const BANNER_MS: f64 = 1800.0;
pub const CONFETTI_COUNT: usize = 25;
pub const CONFETTI_LIFETIME_MS: f64 = 1200.0;
pub const MARKER_LIFETIME_MS: f64 = 2500.0;
pub const CONFETTI_COLORS: [&str; 5] = ["red", "blue", "yellow", "green", "purple"];

const CONFETTI_Y: f64 = 80.0;
const MARKER_Y: f64 = 120.0;
/// Confetti fans out horizontally by up to this many pixels either way.
const CONFETTI_SPREAD: f64 = 120.0;

// --- Timer queue --------------------------------------------------------------

/// Fire-and-forget delayed tasks, drained once per frame. Entries are never
/// cancelled.
pub struct TimerQueue<T> {
    entries: Vec<(f64, T)>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T> TimerQueue<T> {
    pub fn schedule(&mut self, due_ms: f64, task: T) {
        self.entries.push((due_ms, task));
    }

    /// Remove and return every task due at or before `now_ms`, earliest first.
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<T> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].0 <= now_ms {
                due.push(self.entries.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.0.total_cmp(&b.0));
        due.into_iter().map(|(_, t)| t).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// --- Particles ----------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParticleKind {
    Confetti { color: &'static str, spread: f64 },
    Heart,
}

/// A short-lived cosmetic element in page coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub id: u32,
    pub kind: ParticleKind,
    pub x: f64,
    pub y: f64,
    pub lifetime_ms: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expiry {
    HideBanner,
    Remove(u32),
}

// --- Celebration --------------------------------------------------------------

#[derive(Default)]
pub struct Celebration {
    queue: TimerQueue<Expiry>,
    banner_until: f64,
    banner_visible: bool,
    next_id: u32,
}

impl Celebration {
    /// Show the banner and emit a fresh burst centred on `viewport_width`.
    /// Every returned particle already has its removal scheduled.
    pub fn fire<R: Rng + ?Sized>(
        &mut self,
        now_ms: f64,
        viewport_width: f64,
        rng: &mut R,
    ) -> Vec<Particle> {
        self.banner_visible = true;
        self.banner_until = now_ms + BANNER_MS;
        self.queue.schedule(self.banner_until, Expiry::HideBanner);

        let cx = viewport_width / 2.0;
        let mut burst = Vec::with_capacity(CONFETTI_COUNT + 1);
        for _ in 0..CONFETTI_COUNT {
            let color = CONFETTI_COLORS[rng.gen_range(0..CONFETTI_COLORS.len())];
            let spread = rng.gen_range(-CONFETTI_SPREAD..=CONFETTI_SPREAD);
            burst.push(self.particle(
                ParticleKind::Confetti { color, spread },
                cx,
                CONFETTI_Y,
                CONFETTI_LIFETIME_MS,
                now_ms,
            ));
        }
        burst.push(self.particle(ParticleKind::Heart, cx, MARKER_Y, MARKER_LIFETIME_MS, now_ms));
        burst
    }

    fn particle(&mut self, kind: ParticleKind, x: f64, y: f64, lifetime_ms: f64, now_ms: f64) -> Particle {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.queue.schedule(now_ms + lifetime_ms, Expiry::Remove(id));
        Particle { id, kind, x, y, lifetime_ms }
    }

    /// Expiries that came due. A banner hide only takes effect once the most
    /// recent trigger's full duration has elapsed.
    pub fn expire(&mut self, now_ms: f64) -> Vec<Expiry> {
        let due = self.queue.drain_due(now_ms);
        if due.contains(&Expiry::HideBanner) && now_ms >= self.banner_until {
            self.banner_visible = false;
        }
        due
    }

    /// Hide the banner right away (round restart). Pending expiries still fire.
    pub fn dismiss_banner(&mut self) {
        self.banner_visible = false;
    }

    pub fn banner_visible(&self) -> bool {
        self.banner_visible
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}
