//! Depth-limited minimax with alpha-beta pruning
//!
//! Each tree node clones the world, commits one discrete move for the side
//! to play and forward-simulates a fixed number of physics ticks. Leaves are
//! scored by a potential field pulling the controlled player toward the
//! arena center and pushing the opponent away from it.

use crate::consts::EVAL_LIMIT;
use crate::settings::{SearchSettings, WorldSettings};
use crate::sim::{Move, PhysicsEngine, Player, World};

/// Backed-up value of a subtree and the move that produced it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOutcome {
    pub eval: f32,
    /// `None` at leaves, or when no move beat the sentinel value
    pub best: Option<Move>,
}

#[derive(Debug, Clone)]
pub struct MinimaxAI {
    id: usize,
    opponent: usize,
    engine: PhysicsEngine,
    search: SearchSettings,
    node_count: u64,
}

impl MinimaxAI {
    /// Controller for player `id`, playing against the first other player.
    /// Returns `None` when there is nobody to play against.
    pub fn new(
        settings: WorldSettings,
        search: SearchSettings,
        id: usize,
        players: &[Player],
    ) -> Option<Self> {
        let opponent = (0..players.len()).find(|&i| i != id)?;
        Some(Self {
            id,
            opponent,
            engine: PhysicsEngine::new(settings),
            search,
            node_count: 0,
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn opponent(&self) -> usize {
        self.opponent
    }

    /// Nodes visited by the last `iteration`
    pub fn node_count(&self) -> u64 {
        self.node_count
    }

    /// Score `world` from the controlled player's point of view
    pub fn static_eval(&self, world: &World) -> f32 {
        let player = &world.players[self.id];
        let opp = &world.players[self.opponent];
        let radius = self.engine.settings().out_of_bound_radius;

        if player.is_dead || player.distance_from_origin() > radius {
            return f32::NEG_INFINITY;
        }
        if opp.is_dead || opp.distance_from_origin() > radius {
            return f32::INFINITY;
        }

        let field = |p: &Player| p.distance_from_origin().powf(self.search.dist_exponent).max(1.0);
        self.search.dist_weight * (field(opp) - field(player))
    }

    /// Candidate moves for `who`, ordered to maximize cutoffs: toward the
    /// other player, then jump/harden (jump first if they are above), then away.
    pub fn moves(&self, world: &World, who: usize) -> Vec<Move> {
        let target = if who == self.id { self.opponent } else { self.id };
        let mover = &world.players[who];
        let target = &world.players[target];

        let (toward, away) = if target.pos.x < mover.pos.x {
            (Move::Left, Move::Right)
        } else {
            (Move::Right, Move::Left)
        };
        let middle = if target.pos.y < mover.pos.y {
            [Move::Jump, Move::Harden]
        } else {
            [Move::Harden, Move::Jump]
        };

        let mut moves = Vec::with_capacity(4);
        moves.push(toward);
        moves.extend(
            middle
                .into_iter()
                .filter(|&mv| mv != Move::Jump || mover.can_jump),
        );
        moves.push(away);
        moves
    }

    /// Clone `world`, commit `mv` for `who` and simulate one node's worth of ticks
    pub fn child(&self, world: &World, who: usize, mv: Move) -> World {
        let mut next = world.clone();
        next.players[who].movement.commit(Some(mv));
        self.engine.perform_iterations(
            &next,
            self.search.ticks_per_node,
            self.search.truncate_on_contact,
        )
    }

    pub fn minimax(
        &mut self,
        world: &World,
        depth: u32,
        mut alpha: f32,
        mut beta: f32,
        maximizing: bool,
    ) -> SearchOutcome {
        self.node_count += 1;

        if depth == 0 || world.game_over {
            return SearchOutcome {
                eval: self.static_eval(world),
                best: None,
            };
        }

        let who = if maximizing { self.id } else { self.opponent };
        let mut best = None;
        let mut value = if maximizing {
            f32::NEG_INFINITY
        } else {
            f32::INFINITY
        };

        for mv in self.moves(world, who) {
            let child = self.child(world, who, mv);
            let eval = self.minimax(&child, depth - 1, alpha, beta, !maximizing).eval;

            if maximizing {
                if eval > value {
                    value = eval;
                    best = Some(mv);
                }
                alpha = alpha.max(eval);
            } else {
                if eval < value {
                    value = eval;
                    best = Some(mv);
                }
                beta = beta.min(eval);
            }

            if beta <= alpha {
                break;
            }
        }

        SearchOutcome { eval: value, best }
    }

    /// Search `depth` plies ahead and commit the chosen move to the real
    /// player's intent. Returns the evaluation clamped to +-10.
    pub fn iteration(&mut self, world: &mut World, depth: u32) -> f32 {
        let players = world.players.len();
        if self.id >= players || self.opponent >= players {
            log::warn!(
                "Minimax player {} has no opponent in a world of {} players",
                self.id,
                players
            );
            return 0.0;
        }

        self.node_count = 0;
        let outcome = self.minimax(world, depth, f32::NEG_INFINITY, f32::INFINITY, true);
        world.players[self.id].movement.commit(outcome.best);

        log::debug!(
            "Minimax player {}: depth={} nodes={} eval={} move={:?}",
            self.id,
            depth,
            self.node_count,
            outcome.eval,
            outcome.best
        );
        outcome.eval.clamp(-EVAL_LIMIT, EVAL_LIMIT)
    }
}
