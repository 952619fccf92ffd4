//! Reactive chase controller: run at the opponent, jump when they are
//! above, brace when contact is imminent.

use crate::consts::CHASE_HARDEN_GAP;
use crate::sim::{Player, World};

#[derive(Debug, Clone)]
pub struct ChaseAI {
    id: usize,
    target: usize,
}

impl ChaseAI {
    /// Chaser for player `id`. Returns `None` when there is nobody to chase.
    pub fn new(id: usize, players: &[Player]) -> Option<Self> {
        let target = (0..players.len()).find(|&i| i != id)?;
        Some(Self { id, target })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn iteration(&self, world: &mut World) {
        let Some(target) = world.players.get(self.target).cloned() else {
            return;
        };
        let Some(player) = world.players.get_mut(self.id) else {
            return;
        };

        let movement = &mut player.movement;
        movement.clear();
        if target.pos.x < player.pos.x {
            movement.left = true;
        } else {
            movement.right = true;
        }
        if target.pos.y < player.pos.y {
            movement.jump = true;
        }
        if target.pos.distance(player.pos) < target.radius + player.radius + CHASE_HARDEN_GAP {
            movement.harden = true;
        }
    }
}
