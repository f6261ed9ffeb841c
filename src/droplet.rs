// Copyright (c) 2026 rezky_nightky

use std::collections::VecDeque;

use rand::Rng;

use crate::cell::{Cell, Glyph, Intensity, Tier};
use crate::charset::Charset;
use crate::frame::Frame;
use crate::runtime::Direction;

pub const SPEED_MIN: f32 = 0.5;
pub const SPEED_MAX: f32 = 1.0;

/// Absolute cap on trail length.
pub const MAX_TRAIL: usize = 15;

/// Head used by droplets that do not start near the top.
pub const OFFSCREEN_HEAD: f32 = -20.0;

const TOP_JITTER: u16 = 10;
const EXIT_JITTER: u16 = 20;

const TOP_REGION: f32 = 0.2;
const TOP_RESET_CHANCE: f32 = 0.005;
const GAP_CHANCE: f32 = 0.3;
const FLICKER_CHANCE: f32 = 0.1;
const SHRINK_CHANCE: f32 = 0.1;

const FADE_HOLD: f32 = 0.3;
const BOUNDARY_FADE_CELLS: f32 = 3.0;

/// `min(0.4 * extent, 15)`, rounded down to whole cells.
pub fn max_trail_len(fall_extent: u16) -> usize {
    ((fall_extent as f32 * 0.4).min(MAX_TRAIL as f32)).floor() as usize
}

/// Per-tick parameters shared by every droplet.
#[derive(Clone, Copy, Debug)]
pub struct StepCtx {
    pub fall_extent: u16,
    pub charset: Charset,
    pub density: f32,
    pub max_trail: usize,
}

impl StepCtx {
    pub fn new(fall_extent: u16, charset: Charset, density: f32) -> Self {
        Self {
            fall_extent,
            charset,
            density,
            max_trail: max_trail_len(fall_extent),
        }
    }
}

/// What a single step did to a droplet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    Fell,
    ResetTop,
    Exited,
}

/// One falling streak. `trail[0]` is the glyph at the head, older glyphs follow.
#[derive(Clone, Debug)]
pub struct Droplet {
    pub lane: u16,
    pub head: f32,
    pub trail: VecDeque<Glyph>,
    pub speed: f32,
}

fn jitter<R: Rng + ?Sized>(rng: &mut R, max: u16) -> f32 {
    -(rng.random_range(1..=max) as f32)
}

fn draw_speed<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random_range(SPEED_MIN..=SPEED_MAX)
}

impl Droplet {
    /// A fresh droplet above the visible area of `lane`.
    pub fn new<R: Rng + ?Sized>(lane: u16, start_near_top: bool, rng: &mut R) -> Self {
        let head = if start_near_top {
            jitter(rng, TOP_JITTER)
        } else {
            OFFSCREEN_HEAD
        };
        Self {
            lane,
            head,
            trail: VecDeque::with_capacity(MAX_TRAIL + 1),
            speed: draw_speed(rng),
        }
    }

    /// Reinitialises the slot in place with a new head and speed.
    fn respawn<R: Rng + ?Sized>(&mut self, head: f32, rng: &mut R) {
        self.head = head;
        self.trail.clear();
        self.speed = draw_speed(rng);
    }

    pub fn advance<R: Rng + ?Sized>(&mut self, ctx: &StepCtx, rng: &mut R) -> Advance {
        let glyph = ctx.charset.generate(rng);
        let new_head = self.head + self.speed;
        let extent = ctx.fall_extent as f32;

        if new_head < extent * TOP_REGION
            && rng.random::<f32>() < TOP_RESET_CHANCE * (1.0 - ctx.density)
        {
            let head = jitter(rng, TOP_JITTER);
            self.respawn(head, rng);
            return Advance::ResetTop;
        }

        if new_head >= extent {
            let head = jitter(rng, EXIT_JITTER);
            self.respawn(head, rng);
            return Advance::Exited;
        }

        if ctx.charset.dense_trail() {
            self.trail.push_front(glyph);
        } else {
            let first = if rng.random::<f32>() < GAP_CHANCE {
                Glyph::Blank
            } else {
                glyph
            };
            self.trail.push_front(first);
            for g in self.trail.iter_mut() {
                if !g.is_blank() && rng.random::<f32>() < FLICKER_CHANCE {
                    *g = Glyph::Blank;
                }
            }
        }

        self.trail.truncate(ctx.max_trail);
        if rng.random::<f32>() < SHRINK_CHANCE * (1.0 - ctx.density) {
            self.trail.pop_back();
        }
        collapse_blanks(&mut self.trail);

        self.head = new_head;
        Advance::Fell
    }

    /// Rasterises the droplet into `frame`. Later writes win.
    pub fn draw(&self, direction: Direction, frame: &mut Frame) {
        let mut glyphs = self.trail.iter().copied();
        let Some(head_glyph) = glyphs.next() else {
            return;
        };

        let extent = direction.fall_extent(frame.width, frame.height) as f32;
        let near_boundary = self.head >= extent - 1.0;
        let lane = self.lane as i32;
        let base = self.head.floor() as i32;

        if !near_boundary {
            let (x, y) = direction.to_screen(lane, base);
            frame.set(x, y, Cell::new(head_glyph, Tier::Head, Intensity::Full));
        }

        let trail_len = self.trail.len() - 1;
        let fade_start = (trail_len as f32 * FADE_HOLD).floor() as usize;
        let fade_len = (trail_len - fade_start) as f32;

        for (i, glyph) in glyphs.enumerate() {
            let (x, y) = direction.to_screen(lane, base - i as i32 - 1);
            if !frame.contains(x, y) {
                continue;
            }

            let mut level = if i < fade_start {
                1.0
            } else {
                (1.0 - (i - fade_start) as f32 / fade_len).max(0.0)
            };
            if near_boundary {
                level *= (1.0 - i as f32 / BOUNDARY_FADE_CELLS).max(0.0);
            }
            if level <= 0.0 {
                continue;
            }

            let tier = if near_boundary && i == 0 {
                Tier::Medium
            } else {
                Tier::from_level(level)
            };
            frame.set(x, y, Cell::new(glyph, tier, Intensity::from_level(level)));
        }
    }
}

/// Drops a leading blank and squeezes runs of blanks down to one.
fn collapse_blanks(trail: &mut VecDeque<Glyph>) {
    let mut prev_blank = true;
    trail.retain(|g| {
        let blank = g.is_blank();
        let keep = !blank || !prev_blank;
        prev_blank = blank;
        keep
    });
}
