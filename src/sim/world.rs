//! World state and core simulation types
//!
//! A `World` is a value: cloning it deep-copies every player while the
//! platforms and their quadtree index stay shared, since they never change
//! after construction.

use std::sync::Arc;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::{Circle, Rect};
use super::quadtree::QuadTree;
use crate::consts::*;

/// A single discrete intent the search can commit to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Left,
    Right,
    Jump,
    Harden,
}

/// Movement intent flags. Not exclusive: left and right together cancel out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub harden: bool,
}

impl Movement {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn set(&mut self, mv: Move) {
        match mv {
            Move::Left => self.left = true,
            Move::Right => self.right = true,
            Move::Jump => self.jump = true,
            Move::Harden => self.harden = true,
        }
    }

    /// Replace the intent with exactly one move (or none)
    pub fn commit(&mut self, mv: Option<Move>) {
        self.clear();
        if let Some(mv) = mv {
            self.set(mv);
        }
    }
}

/// A circular combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Color tag (0xRRGGBB)
    pub color: u32,
    pub pos: Vec2,
    /// Must be positive (unchecked)
    pub radius: f32,
    /// Must be positive (unchecked)
    pub mass: f32,
    pub vel: Vec2,
    pub movement: Movement,
    /// Granted by a topside contact on the previous tick
    pub can_jump: bool,
    /// Touched another player during the last tick
    pub has_collided: bool,
    pub is_dead: bool,
}

impl Player {
    pub fn new(color: u32, mass: f32, radius: f32, pos: Vec2) -> Self {
        Self {
            color,
            pos,
            radius,
            mass,
            vel: Vec2::ZERO,
            movement: Movement::default(),
            can_jump: false,
            has_collided: false,
            is_dead: false,
        }
    }

    #[inline]
    pub fn circle(&self) -> Circle {
        Circle::new(self.pos, self.radius)
    }

    /// Bounding box for broad-phase queries
    pub fn align(&self) -> Rect {
        self.circle().align()
    }

    /// Distance from the arena center
    #[inline]
    pub fn distance_from_origin(&self) -> f32 {
        self.pos.length()
    }
}

/// A static platform, stored by its center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Color tag (0xRRGGBB)
    pub color: u32,
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Platform {
    pub fn new(color: u32, width: f32, height: f32, center: Vec2) -> Self {
        Self {
            color,
            center,
            width,
            height,
        }
    }

    /// Top-left anchored copy for AABB math
    pub fn align(&self) -> Rect {
        Rect::new(
            self.center.x - self.width / 2.0,
            self.center.y - self.height / 2.0,
            self.width,
            self.height,
        )
    }
}

/// Complete simulation state for one episode
#[derive(Debug, Clone, Serialize)]
pub struct World {
    pub platforms: Arc<[Platform]>,
    pub players: Vec<Player>,
    pub game_over: bool,
    /// Broad-phase index over `platforms`, ids are platform indices
    #[serde(skip)]
    pub(super) index: Arc<QuadTree>,
}

impl World {
    pub fn new(platforms: Vec<Platform>, players: Vec<Player>) -> Self {
        let index = Arc::new(build_index(&platforms));
        Self {
            platforms: platforms.into(),
            players,
            game_over: false,
            index,
        }
    }

    /// The classic duel: one wide floor, two players facing each other
    pub fn classic() -> Self {
        Self::new(vec![floor()], spawn_players())
    }

    /// The classic floor plus `ledges` floating platforms placed from `seed`.
    /// At most `MAX_LEDGES` are placed.
    pub fn scattered(seed: u64, ledges: usize) -> Self {
        if ledges > MAX_LEDGES {
            log::warn!("Capping {} requested ledges to {}", ledges, MAX_LEDGES);
        }
        let ledges = ledges.min(MAX_LEDGES);
        let mut rng = Pcg32::seed_from_u64(seed);
        let players = spawn_players();
        let mut platforms = vec![floor()];

        let blocked: Vec<Rect> = players.iter().map(|p| p.align().expand(PLAYER_RADIUS)).collect();
        let wanted = ledges.saturating_add(1);
        let max_attempts = ledges.saturating_mul(LEDGE_ATTEMPTS);
        let mut attempts = 0;
        while platforms.len() < wanted && attempts < max_attempts {
            attempts += 1;
            let width = rng.random_range(150.0..400.0);
            let height = rng.random_range(30.0..60.0);
            let center = Vec2::new(rng.random_range(-750.0..750.0), rng.random_range(-700.0..-200.0));
            let candidate = Platform::new(GREEN, width, height, center);
            let rect = candidate.align();

            let clear = platforms.iter().all(|p| !p.align().expand(20.0).overlaps(&rect))
                && blocked.iter().all(|b| !b.overlaps(&rect))
                && center.length() + width / 2.0 < 950.0;
            if clear {
                platforms.push(candidate);
            }
        }

        if platforms.len() < wanted {
            log::warn!(
                "Placed {} of {} ledges for seed {}",
                platforms.len() - 1,
                ledges,
                seed
            );
        }
        log::debug!("Scattered layout: seed={}, platforms={}", seed, platforms.len());
        Self::new(platforms, players)
    }

    pub fn index(&self) -> &QuadTree {
        &self.index
    }

    /// Swap the platform geometry and rebuild the index from scratch
    pub fn set_platforms(&mut self, platforms: Vec<Platform>) {
        self.index = Arc::new(build_index(&platforms));
        self.platforms = platforms.into();
    }

    /// Ids of platforms whose index leaves overlap `area`
    pub fn platforms_near(&self, area: &Rect) -> Vec<usize> {
        self.index.query(area)
    }

    /// Index of the first player other than `id`
    pub fn other_player(&self, id: usize) -> Option<usize> {
        (0..self.players.len()).find(|&i| i != id)
    }
}

fn floor() -> Platform {
    Platform::new(GREEN, FLOOR_WIDTH, FLOOR_HEIGHT, Vec2::ZERO)
}

fn spawn_players() -> Vec<Player> {
    vec![
        Player::new(
            BLUE,
            PLAYER_MASS,
            PLAYER_RADIUS,
            Vec2::new(-PLAYERS_X_DISTANCE, PLAYER_Y_OFFSET),
        ),
        Player::new(
            RED,
            PLAYER_MASS,
            PLAYER_RADIUS,
            Vec2::new(PLAYERS_X_DISTANCE, PLAYER_Y_OFFSET),
        ),
    ]
}

fn build_index(platforms: &[Platform]) -> QuadTree {
    let Some(bounds) = platforms
        .iter()
        .map(Platform::align)
        .reduce(|a, b| a.union(&b))
    else {
        return QuadTree::new(0.0, 0.0, 0.0, 0.0, INDEX_MAX_HOLD);
    };

    let root = bounds.expand(INDEX_MARGIN);
    let mut tree = QuadTree::new(root.pos.x, root.pos.y, root.width, root.height, INDEX_MAX_HOLD);
    for (id, platform) in platforms.iter().enumerate() {
        let rect = platform.align();
        tree.create(id, rect.pos.x, rect.pos.y, rect.width, rect.height);
    }
    log::debug!(
        "Built platform index: {} boxes, {} nodes",
        tree.len(),
        tree.splits().len()
    );
    tree
}
