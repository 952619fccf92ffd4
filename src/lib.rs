//! Bumper Duel - a two-player circle arena brawler
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, world, quadtree, collisions, physics)
//! - `ai`: Controllers that write movement intents (minimax search, chase)
//! - `arena`: Headless match runner (frame loop, episodes, scoreboard)
//! - `settings`: World constants and match configuration

pub mod ai;
pub mod arena;
pub mod settings;
pub mod sim;

pub use arena::{Arena, EpisodeOutcome, Pilot, Scoreboard};
pub use settings::{MatchSettings, SearchSettings, SettingsError, WorldSettings};

/// Game configuration constants
pub mod consts {
    /// Classic duel layout
    pub const PLAYER_RADIUS: f32 = 50.0;
    pub const PLAYER_MASS: f32 = 20.0;
    /// Horizontal spawn offset of each player from the origin
    pub const PLAYERS_X_DISTANCE: f32 = 200.0;
    pub const PLAYER_Y_OFFSET: f32 = -250.0;
    pub const FLOOR_WIDTH: f32 = 2000.0;
    pub const FLOOR_HEIGHT: f32 = 200.0;

    /// Platforms are near-inelastic
    pub const PLATFORM_RESTITUTION: f32 = 0.01;
    pub const PLATFORM_FRICTION: f32 = 0.01;

    /// Leaf capacity of a fresh quadtree
    pub const DEFAULT_MAX_HOLD: usize = 9;
    /// Leaf capacity used for the world's platform index
    pub const INDEX_MAX_HOLD: usize = 2;
    /// Padding around the platform union when sizing the index root
    pub const INDEX_MARGIN: f32 = 500.0;

    /// Minimax defaults
    pub const TICKS_PER_NODE: u32 = 25;
    pub const DIST_WEIGHT: f32 = 0.005;
    pub const DIST_EXPONENT: f32 = 1.1;
    /// Evaluations are clamped to +-EVAL_LIMIT for display
    pub const EVAL_LIMIT: f32 = 10.0;
    /// Eval bar smoothing per frame
    pub const EVAL_SMOOTHING: f32 = 0.1;

    /// Extra gap at which the chase controller braces for impact
    pub const CHASE_HARDEN_GAP: f32 = 5.0;

    /// Most floating ledges a scattered arena may ask for
    pub const MAX_LEDGES: usize = 64;
    /// Placement tries per requested ledge
    pub const LEDGE_ATTEMPTS: usize = 50;

    /// Color tags (0xRRGGBB)
    pub const BLUE: u32 = 0x0000ff;
    pub const RED: u32 = 0xff0000;
    pub const GREEN: u32 = 0x008000;
}

/// Linear interpolation from `a` to `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}
