//! World constants and match configuration
//!
//! Loaded from a JSON file by the native binary. Every struct is
//! `#[serde(default)]`, so a settings file only needs the fields it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Immutable simulation constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// Downward force applied every tick
    pub gravity: f32,
    /// How bouncy hardened player collisions are
    pub bounce_factor: f32,
    /// Fraction of the player-player impulse actually transferred
    pub friction_factor: f32,
    /// Horizontal force from a left/right intent
    pub player_acceleration: f32,
    /// Upward force from a grounded jump
    pub player_jump_force: f32,
    /// Distance from the origin past which a player is out
    pub out_of_bound_radius: f32,
    /// Restitution multiplier while hardened
    pub hard_hit_power: f32,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            gravity: 3.0,
            bounce_factor: 2.0,
            friction_factor: 0.2,
            player_acceleration: 2.0,
            player_jump_force: 150.0,
            out_of_bound_radius: 1000.0,
            hard_hit_power: 2.0,
        }
    }
}

impl WorldSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        let fields = [
            ("gravity", self.gravity),
            ("bounce_factor", self.bounce_factor),
            ("friction_factor", self.friction_factor),
            ("player_acceleration", self.player_acceleration),
            ("player_jump_force", self.player_jump_force),
            ("out_of_bound_radius", self.out_of_bound_radius),
            ("hard_hit_power", self.hard_hit_power),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(SettingsError::Invalid {
                    field,
                    reason: "must be finite",
                });
            }
        }
        if self.out_of_bound_radius <= 0.0 {
            return Err(SettingsError::Invalid {
                field: "out_of_bound_radius",
                reason: "must be positive",
            });
        }
        Ok(())
    }
}

/// Minimax search tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Physics ticks simulated per tree node
    pub ticks_per_node: u32,
    /// Weight of the distance-to-center potential field
    pub dist_weight: f32,
    /// Exponent applied to distances before weighting
    pub dist_exponent: f32,
    /// Cut a node's lookahead short on the tick contact state flips
    pub truncate_on_contact: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            ticks_per_node: TICKS_PER_NODE,
            dist_weight: DIST_WEIGHT,
            dist_exponent: DIST_EXPONENT,
            truncate_on_contact: false,
        }
    }
}

/// Which platforms the arena is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ArenaLayout {
    /// One wide floor under both players
    #[default]
    Classic,
    /// The classic floor plus seeded floating ledges
    Scattered { seed: u64, ledges: usize },
}

/// Controller assigned to a player seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PilotKind {
    /// Keeps whatever intent the player already has
    Idle,
    Chase,
    Minimax { depth: u32 },
}

/// Everything needed to run a headless match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSettings {
    pub world: WorldSettings,
    pub search: SearchSettings,
    pub layout: ArenaLayout,
    /// One pilot per player, by player index
    pub pilots: Vec<PilotKind>,
    /// Frames to run before stopping
    pub frames: u64,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            world: WorldSettings::default(),
            search: SearchSettings::default(),
            layout: ArenaLayout::Classic,
            pilots: vec![PilotKind::Chase, PilotKind::Minimax { depth: 7 }],
            frames: 3600,
        }
    }
}

impl MatchSettings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.world.validate()?;
        if self.search.ticks_per_node == 0 {
            return Err(SettingsError::Invalid {
                field: "search.ticks_per_node",
                reason: "must be at least 1",
            });
        }
        if !self.search.dist_weight.is_finite() || !self.search.dist_exponent.is_finite() {
            return Err(SettingsError::Invalid {
                field: "search",
                reason: "weights must be finite",
            });
        }
        if self.pilots.len() > 2 {
            return Err(SettingsError::Invalid {
                field: "pilots",
                reason: "at most one pilot per player",
            });
        }
        if let ArenaLayout::Scattered { ledges, .. } = self.layout {
            if ledges > MAX_LEDGES {
                return Err(SettingsError::Invalid {
                    field: "layout.ledges",
                    reason: "at most 64 ledges",
                });
            }
        }
        Ok(())
    }
}
