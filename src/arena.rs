//! Headless match runner
//!
//! One frame: every pilot writes its player's intent, the real world
//! advances exactly one tick, and a finished episode is scored and
//! restarted from the spawn layout.

use serde::{Deserialize, Serialize};

use crate::ai::{ChaseAI, MinimaxAI};
use crate::consts::EVAL_SMOOTHING;
use crate::lerp;
use crate::settings::{ArenaLayout, MatchSettings, PilotKind};
use crate::sim::{PhysicsEngine, World};

/// Controller bound to one player seat
#[derive(Debug, Clone)]
pub enum Pilot {
    /// Leaves the intent to external input
    Idle,
    Chase(ChaseAI),
    Minimax { ai: MinimaxAI, depth: u32 },
}

impl Pilot {
    pub fn new(kind: PilotKind, seat: usize, settings: &MatchSettings, world: &World) -> Self {
        let pilot = match kind {
            PilotKind::Idle => Some(Pilot::Idle),
            PilotKind::Chase => ChaseAI::new(seat, &world.players).map(Pilot::Chase),
            PilotKind::Minimax { depth } => {
                MinimaxAI::new(settings.world, settings.search, seat, &world.players)
                    .map(|ai| Pilot::Minimax { ai, depth })
            }
        };
        pilot.unwrap_or_else(|| {
            log::warn!("No opponent for {:?} in seat {}, leaving it idle", kind, seat);
            Pilot::Idle
        })
    }

    /// Write this pilot's intent. Returns the search evaluation, if any.
    pub fn drive(&mut self, world: &mut World) -> Option<f32> {
        match self {
            Pilot::Idle => None,
            Pilot::Chase(ai) => {
                ai.iteration(world);
                None
            }
            Pilot::Minimax { ai, depth } => Some(ai.iteration(world, *depth)),
        }
    }
}

/// How an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeOutcome {
    /// 1-based episode number
    pub episode: u64,
    /// Frames the episode lasted
    pub frames: u64,
    /// The sole surviving player, if exactly one survived
    pub winner: Option<usize>,
}

/// Win tally across episodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub episodes: u64,
    /// Wins by player index
    pub wins: Vec<u64>,
    pub draws: u64,
}

impl Scoreboard {
    pub fn new(players: usize) -> Self {
        Self {
            episodes: 0,
            wins: vec![0; players],
            draws: 0,
        }
    }

    pub fn record(&mut self, outcome: &EpisodeOutcome) {
        self.episodes += 1;
        match outcome.winner {
            Some(winner) => {
                if winner >= self.wins.len() {
                    self.wins.resize(winner + 1, 0);
                }
                self.wins[winner] += 1;
            }
            None => self.draws += 1,
        }
    }

    /// Player with strictly the most wins
    pub fn leader(&self) -> Option<usize> {
        let best = *self.wins.iter().max()?;
        let mut leaders = self.wins.iter().enumerate().filter(|(_, w)| **w == best);
        match (leaders.next(), leaders.next()) {
            (Some((i, _)), None) if best > 0 => Some(i),
            _ => None,
        }
    }
}

pub struct Arena {
    engine: PhysicsEngine,
    spawn: World,
    world: World,
    pilots: Vec<Pilot>,
    eval_bar: f32,
    frame: u64,
    episode_start: u64,
    scoreboard: Scoreboard,
}

impl Arena {
    pub fn new(settings: &MatchSettings) -> Self {
        let spawn = match settings.layout {
            ArenaLayout::Classic => World::classic(),
            ArenaLayout::Scattered { seed, ledges } => World::scattered(seed, ledges),
        };
        let pilots = settings
            .pilots
            .iter()
            .enumerate()
            .map(|(seat, kind)| Pilot::new(*kind, seat, settings, &spawn))
            .collect();
        let scoreboard = Scoreboard::new(spawn.players.len());

        log::info!(
            "Arena ready: {} platforms, {} players, pilots {:?}",
            spawn.platforms.len(),
            spawn.players.len(),
            settings.pilots
        );

        Self {
            engine: PhysicsEngine::new(settings.world),
            world: spawn.clone(),
            spawn,
            pilots,
            eval_bar: 0.0,
            frame: 0,
            episode_start: 0,
            scoreboard,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct access for external input writing movement flags
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Smoothed search evaluation in [-10, 10] (e.g. for a win-chance bar)
    pub fn eval_bar(&self) -> f32 {
        self.eval_bar
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// Run one frame. Returns the outcome if an episode ended on it.
    pub fn step(&mut self) -> Option<EpisodeOutcome> {
        for pilot in &mut self.pilots {
            if let Some(eval) = pilot.drive(&mut self.world) {
                self.eval_bar = lerp(self.eval_bar, eval, EVAL_SMOOTHING);
            }
        }

        self.world = self.engine.perform_iterations(&self.world, 1, false);
        self.frame += 1;

        if !self.world.game_over {
            return None;
        }

        let mut alive = self
            .world
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_dead)
            .map(|(i, _)| i);
        let winner = match (alive.next(), alive.next()) {
            (Some(i), None) => Some(i),
            _ => None,
        };
        let outcome = EpisodeOutcome {
            episode: self.scoreboard.episodes + 1,
            frames: self.frame - self.episode_start,
            winner,
        };
        self.scoreboard.record(&outcome);

        match winner {
            Some(i) => log::info!(
                "Episode {} won by player {} after {} frames",
                outcome.episode,
                i,
                outcome.frames
            ),
            None => log::info!("Episode {} drawn after {} frames", outcome.episode, outcome.frames),
        }

        self.restart();
        Some(outcome)
    }

    /// Run `frames` frames and return the tally
    pub fn run(&mut self, frames: u64) -> &Scoreboard {
        for _ in 0..frames {
            self.step();
        }
        &self.scoreboard
    }

    /// Put every player back at the spawn layout
    pub fn restart(&mut self) {
        self.world = self.spawn.clone();
        self.episode_start = self.frame;
    }
}
