// Copyright (c) 2026 rezky_nightky

use log::{debug, info, trace};
use rand::{
    distr::{Distribution, Uniform},
    rngs::StdRng,
    Rng,
};

use crate::charset::Charset;
use crate::droplet::{Advance, Droplet, StepCtx};
use crate::frame::Frame;
use crate::runtime::Direction;

/// Droplets further than this outside the fall axis are dropped for good.
pub const EVICT_SLACK: f32 = 50.0;

const SPAWN_CHANCE: f32 = 0.02;
const STAGGER: f32 = 0.3;

/// What one [`Cloud::rain`] tick did to the population.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RainStats {
    pub spawned: usize,
    pub fell: usize,
    pub reset_top: usize,
    pub exited: usize,
    pub evicted: usize,
}

/// Every live droplet plus the settings that drive them.
pub struct Cloud {
    pub cols: u16,
    pub rows: u16,
    pub direction: Direction,
    pub charset: Charset,
    pub density: f32,

    droplets: Vec<Droplet>,
    rng: StdRng,
    rand_lane: Option<Uniform<u16>>,
}

impl Cloud {
    pub fn new(direction: Direction, charset: Charset, density: f32, rng: StdRng) -> Self {
        Self {
            cols: 0,
            rows: 0,
            direction,
            charset,
            density: density.clamp(0.0, 1.0),
            droplets: Vec::new(),
            rng,
            rand_lane: None,
        }
    }

    pub fn droplets(&self) -> &[Droplet] {
        &self.droplets
    }

    pub fn lanes(&self) -> u16 {
        self.direction.lanes(self.cols, self.rows)
    }

    pub fn fall_extent(&self) -> u16 {
        self.direction.fall_extent(self.cols, self.rows)
    }

    /// Most droplets kept alive at once: `(rows + cols) * density`.
    pub fn capacity(&self) -> usize {
        ((self.rows as f32 + self.cols as f32) * self.density).floor() as usize
    }

    /// Discards every droplet and repopulates for a `cols` x `rows` screen.
    pub fn reset(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;

        let lanes = self.lanes();
        let stagger = (self.fall_extent() as f32 * STAGGER).floor();

        self.droplets.clear();
        self.droplets
            .reserve(self.capacity().max(lanes as usize * 2));

        for lane in 0..lanes {
            let per_lane = (self.rng.random::<f32>() * 2.0 * self.density).floor() as usize + 1;
            for j in 0..per_lane {
                let mut d = Droplet::new(lane, true, &mut self.rng);
                d.head -= j as f32 * stagger;
                self.droplets.push(d);
            }
        }

        self.rand_lane = Uniform::new(0, lanes).ok();

        info!(
            "rain reset: {}x{} {} lanes={} droplets={}",
            cols,
            rows,
            self.direction,
            lanes,
            self.droplets.len()
        );
    }

    /// Switches the fall axis; a change repopulates the screen.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.direction == direction {
            return false;
        }
        debug!("direction {} -> {}", self.direction, direction);
        self.direction = direction;
        self.reset(self.cols, self.rows);
        true
    }

    pub fn set_charset(&mut self, charset: Charset) {
        if self.charset != charset {
            debug!("charset {} -> {}", self.charset, charset);
            self.charset = charset;
        }
    }

    /// One simulation tick: maybe spawn, advance everything, evict.
    pub fn rain(&mut self) -> RainStats {
        let mut stats = RainStats {
            spawned: self.spawn_droplet() as usize,
            ..RainStats::default()
        };

        let ctx = StepCtx::new(self.fall_extent(), self.charset, self.density);
        for d in self.droplets.iter_mut() {
            match d.advance(&ctx, &mut self.rng) {
                Advance::Fell => stats.fell += 1,
                Advance::ResetTop => stats.reset_top += 1,
                Advance::Exited => stats.exited += 1,
            }
        }

        stats.evicted = self.evict();
        if stats.spawned + stats.reset_top + stats.exited + stats.evicted > 0 {
            trace!(
                "rain: spawned={} reset_top={} exited={} evicted={}",
                stats.spawned,
                stats.reset_top,
                stats.exited,
                stats.evicted
            );
        }
        stats
    }

    fn spawn_droplet(&mut self) -> bool {
        if self.rng.random::<f32>() >= SPAWN_CHANCE * self.density {
            return false;
        }
        let Some(dist) = self.rand_lane.as_ref() else {
            return false;
        };
        let lane = dist.sample(&mut self.rng);
        self.droplets.push(Droplet::new(lane, true, &mut self.rng));
        true
    }

    /// Drops far-away droplets, then trims to capacity. Returns how many went.
    fn evict(&mut self) -> usize {
        let before = self.droplets.len();
        let extent = self.fall_extent() as f32;
        self.droplets
            .retain(|d| d.head > -EVICT_SLACK && d.head < extent + EVICT_SLACK);

        let cap = self.capacity();
        if self.droplets.len() > cap {
            // Stable, so equal heads keep population order.
            self.droplets.sort_by(|a, b| b.head.total_cmp(&a.head));
            self.droplets.truncate(cap);
        }

        before - self.droplets.len()
    }

    /// Rebuilds `frame` from the current droplets, in population order.
    pub fn draw(&self, frame: &mut Frame) {
        frame.clear();
        for d in &self.droplets {
            d.draw(self.direction, frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::cell::Glyph;

    fn make_cloud(density: f32, seed: u64) -> Cloud {
        let mut cloud = Cloud::new(
            Direction::Vertical,
            Charset::Binary,
            density,
            StdRng::seed_from_u64(seed),
        );
        cloud.reset(80, 24);
        cloud
    }

    #[test]
    fn reset_covers_every_lane_with_one_to_three_droplets() {
        let cloud = make_cloud(1.0, 11);
        let mut per_lane = vec![0usize; 80];
        for d in cloud.droplets() {
            per_lane[d.lane as usize] += 1;
            assert!(d.head < 0.0);
        }
        assert!(per_lane.iter().all(|&n| (1..=3).contains(&n)));
    }

    #[test]
    fn extra_droplets_in_a_lane_are_staggered() {
        let cloud = make_cloud(1.0, 12);
        let stagger = (24.0f32 * 0.3).floor();
        for w in cloud.droplets().windows(2) {
            if w[0].lane == w[1].lane {
                assert!(w[1].head <= -1.0 - stagger);
            }
        }
    }

    #[test]
    fn higher_density_starts_with_more_droplets() {
        let sparse = make_cloud(0.3, 99);
        let dense = make_cloud(1.0, 99);
        assert_eq!(sparse.droplets().len(), 80);
        assert!(dense.droplets().len() > sparse.droplets().len());
    }

    #[test]
    fn horizontal_uses_rows_as_lanes() {
        let mut cloud = make_cloud(1.0, 13);
        assert!(cloud.set_direction(Direction::Horizontal));
        assert!(cloud.droplets().iter().all(|d| d.lane < 24));
        assert!(!cloud.set_direction(Direction::Horizontal));
    }

    #[test]
    fn rain_respects_capacity() {
        let mut cloud = make_cloud(1.0, 14);
        for _ in 0..300 {
            cloud.rain();
            assert!(cloud.droplets().len() <= cloud.capacity());
        }
    }

    #[test]
    fn rain_spawns_into_an_empty_population() {
        let mut cloud = make_cloud(1.0, 20);
        cloud.droplets.clear();
        let mut spawned = 0;
        for _ in 0..2000 {
            let before = cloud.droplets().len();
            let stats = cloud.rain();
            assert_eq!(cloud.droplets().len(), before + stats.spawned - stats.evicted);
            spawned += stats.spawned;
            if cloud.droplets().len() >= 3 {
                break;
            }
        }
        assert!(spawned >= 3);
        assert!(cloud.droplets().len() >= 3);
        assert!(cloud.droplets().iter().all(|d| d.lane < 80));
    }

    #[test]
    fn zero_density_never_spawns() {
        let mut cloud = make_cloud(0.0, 21);
        cloud.droplets.clear();
        for _ in 0..500 {
            assert_eq!(cloud.rain().spawned, 0);
        }
        assert!(cloud.droplets().is_empty());
    }

    #[test]
    fn rain_tallies_every_advanced_droplet() {
        let mut cloud = make_cloud(1.0, 22);
        let (mut exited, mut reset_top) = (0, 0);
        for _ in 0..200 {
            let before = cloud.droplets().len();
            let stats = cloud.rain();
            assert_eq!(stats.fell + stats.reset_top + stats.exited, before + stats.spawned);
            exited += stats.exited;
            reset_top += stats.reset_top;
        }
        assert!(exited > 0);
        assert_eq!(reset_top, 0);
    }

    #[test]
    fn far_away_droplets_are_evicted() {
        let mut cloud = make_cloud(1.0, 15);
        cloud.droplets.clear();
        let mut rng = StdRng::seed_from_u64(0);
        let mut lost = Droplet::new(3, true, &mut rng);
        lost.head = -80.0;
        let kept = Droplet::new(4, true, &mut rng);
        cloud.droplets.push(lost);
        cloud.droplets.push(kept);
        assert_eq!(cloud.evict(), 1);
        assert_eq!(cloud.droplets().len(), 1);
        assert_eq!(cloud.droplets()[0].lane, 4);
    }

    #[test]
    fn over_capacity_keeps_droplets_closest_to_view() {
        let mut cloud = Cloud::new(
            Direction::Vertical,
            Charset::Ascii,
            0.1,
            StdRng::seed_from_u64(16),
        );
        cloud.reset(10, 10);
        assert_eq!(cloud.capacity(), 2);
        cloud.droplets.clear();
        let mut rng = StdRng::seed_from_u64(0);
        for (lane, head) in [(0u16, -30.0f32), (1, 4.0), (2, -2.0), (3, -9.0)] {
            let mut d = Droplet::new(lane, true, &mut rng);
            d.head = head;
            cloud.droplets.push(d);
        }
        assert_eq!(cloud.evict(), 2);
        let lanes: Vec<u16> = cloud.droplets().iter().map(|d| d.lane).collect();
        assert_eq!(lanes, vec![1, 2]);
    }

    #[test]
    fn draw_is_idempotent() {
        let mut cloud = make_cloud(1.0, 17);
        for _ in 0..40 {
            cloud.rain();
        }
        let mut a = Frame::new(80, 24);
        let mut b = Frame::new(80, 24);
        cloud.draw(&mut a);
        cloud.draw(&mut b);
        cloud.draw(&mut b);
        assert_eq!(a, b);
        assert!(a.visible().count() > 0);
    }

    #[test]
    fn binary_rain_only_draws_binary_digits() {
        let mut cloud = make_cloud(1.0, 18);
        let mut frame = Frame::new(80, 24);
        for _ in 0..60 {
            cloud.rain();
            cloud.draw(&mut frame);
            for (_, _, cell) in frame.visible() {
                assert!(matches!(cell.glyph, Glyph::Char('0') | Glyph::Char('1')));
            }
        }
    }

    #[test]
    fn empty_screen_is_harmless() {
        let mut cloud = make_cloud(1.0, 19);
        cloud.reset(0, 0);
        assert!(cloud.droplets().is_empty());
        let mut frame = Frame::new(0, 0);
        for _ in 0..10 {
            cloud.rain();
            cloud.draw(&mut frame);
        }
        assert!(cloud.droplets().is_empty());
    }
}
