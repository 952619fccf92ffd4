//! Discrete-time physics
//!
//! Advances a `World` one tick at a time: gravity, player-player contacts,
//! intent forces, semi-implicit Euler integration, platform contacts and the
//! out-of-bounds check. No sub-stepping, no swept collision.

use glam::Vec2;

use super::collision::{
    circle_circle_collision, circle_circle_solve, rect_circle_collision, rect_circle_solve,
};
use super::world::{Player, World};
use crate::consts::{PLATFORM_FRICTION, PLATFORM_RESTITUTION};
use crate::settings::WorldSettings;

/// Stateless stepper bound to a set of world constants
#[derive(Debug, Clone, Copy)]
pub struct PhysicsEngine {
    settings: WorldSettings,
}

impl PhysicsEngine {
    pub fn new(settings: WorldSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    /// Advance `world` by one tick in place.
    ///
    /// Returns true if any player's contact state with the other players
    /// flipped during this tick.
    pub fn perform_iteration(&self, world: &mut World) -> bool {
        let s = &self.settings;
        let World {
            players,
            platforms,
            game_over,
            index,
        } = world;
        let mut flipped = false;

        for i in 0..players.len() {
            let mut force = Vec2::new(0.0, s.gravity);

            let mut touching = false;
            for j in 0..players.len() {
                if i == j {
                    continue;
                }
                let (player, other) = pair_mut(players, i, j);
                let contact = circle_circle_collision(player.circle(), other.circle());
                if contact.hit {
                    touching = true;
                    let restitution = if player.movement.harden {
                        s.bounce_factor * s.hard_hit_power
                    } else {
                        0.0
                    };
                    circle_circle_solve(player, other, &contact, restitution, s.friction_factor);
                    player.can_jump |= contact.topside;
                }
            }

            let player = &mut players[i];
            flipped |= player.has_collided != touching;
            player.has_collided = touching;

            if !player.movement.harden {
                if player.movement.left {
                    force.x -= s.player_acceleration;
                }
                if player.movement.right {
                    force.x += s.player_acceleration;
                }
                if player.can_jump && player.movement.jump {
                    force.y -= s.player_jump_force;
                }
            }
            player.can_jump = false;

            // a = f / m; v += a; p += v
            player.vel += force / player.mass;
            player.pos += player.vel;

            // Broad phase through the index, narrow phase per candidate
            for id in index.query(&player.align()) {
                let contact = rect_circle_collision(&platforms[id], player.circle());
                if contact.hit {
                    rect_circle_solve(player, &contact, PLATFORM_RESTITUTION, PLATFORM_FRICTION);
                    player.can_jump |= contact.topside;
                }
            }

            if player.distance_from_origin() > s.out_of_bound_radius {
                log::trace!("Player {} out of bounds at {:?}", i, player.pos);
                *game_over = true;
                player.is_dead = true;
                break;
            }
        }
        flipped
    }

    /// Clone `world` and advance the copy by up to `ticks` ticks.
    ///
    /// Stops early once the game is over. With `truncate_on_contact` it also
    /// stops right after the first tick whose contact state flipped, so the
    /// returned world is the post-impact state.
    pub fn perform_iterations(&self, world: &World, ticks: u32, truncate_on_contact: bool) -> World {
        let mut output = world.clone();
        for _ in 0..ticks {
            let flipped = self.perform_iteration(&mut output);
            if output.game_over || (truncate_on_contact && flipped) {
                break;
            }
        }
        output
    }
}

/// Two distinct mutable players
fn pair_mut(players: &mut [Player], i: usize, j: usize) -> (&mut Player, &mut Player) {
    debug_assert!(i != j);
    if i < j {
        let (head, tail) = players.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = players.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::world::Platform;

    fn engine() -> PhysicsEngine {
        PhysicsEngine::new(WorldSettings::default())
    }

    fn grounded_solo() -> World {
        // Resting exactly on the classic floor's top edge (y = -100)
        let player = Player::new(BLUE, PLAYER_MASS, PLAYER_RADIUS, Vec2::new(-200.0, -150.0));
        World::new(
            vec![Platform::new(GREEN, FLOOR_WIDTH, FLOOR_HEIGHT, Vec2::ZERO)],
            vec![player],
        )
    }

    #[test]
    fn test_first_tick_is_gravity_only() {
        let mut world = World::classic();
        let flipped = engine().perform_iteration(&mut world);

        let expected = WorldSettings::default().gravity / PLAYER_MASS;
        assert!(!flipped);
        for player in &world.players {
            assert!((player.vel.y - expected).abs() < 1e-6);
            assert_eq!(player.vel.x, 0.0);
            assert!(!player.has_collided);
            assert!(!player.can_jump, "still above the platform");
        }
        assert!(!world.game_over);
    }

    #[test]
    fn test_jump_requires_prior_ground_contact() {
        let mut world = World::classic();
        world.players[0].movement.jump = true;
        engine().perform_iteration(&mut world);

        let expected = WorldSettings::default().gravity / PLAYER_MASS;
        assert!((world.players[0].vel.y - expected).abs() < 1e-6);
    }

    #[test]
    fn test_grounded_player_can_jump_next_tick() {
        let engine = engine();
        let mut world = grounded_solo();

        engine.perform_iteration(&mut world);
        assert!(world.players[0].can_jump);
        assert!((world.players[0].pos.y - (-150.0)).abs() < 1e-3);

        world.players[0].movement.jump = true;
        engine.perform_iteration(&mut world);
        assert!(world.players[0].vel.y < -5.0);
        assert!(!world.players[0].can_jump, "airborne players lose jump eligibility");
    }

    #[test]
    fn test_left_and_right_cancel() {
        let engine = engine();
        let mut world = World::classic();
        world.players[0].movement.left = true;
        world.players[0].movement.right = true;
        world.players[1].movement.left = true;
        engine.perform_iteration(&mut world);

        let accel = WorldSettings::default().player_acceleration / PLAYER_MASS;
        assert_eq!(world.players[0].vel.x, 0.0);
        assert!((world.players[1].vel.x + accel).abs() < 1e-6);
    }

    #[test]
    fn test_harden_suppresses_movement() {
        let engine = engine();
        let mut world = grounded_solo();
        engine.perform_iteration(&mut world);
        assert!(world.players[0].can_jump);

        world.players[0].movement = crate::sim::Movement {
            left: true,
            jump: true,
            harden: true,
            ..Default::default()
        };
        engine.perform_iteration(&mut world);
        assert!(world.players[0].vel.x.abs() < 1e-6);
        assert!(world.players[0].vel.y > -1.0);
    }

    #[test]
    fn test_out_of_bounds_ends_game_after_one_tick() {
        let mut world = World::classic();
        world.players[0].pos = Vec2::new(1100.0, 0.0);
        engine().perform_iteration(&mut world);

        assert!(world.game_over);
        assert!(world.players[0].is_dead);
        assert!(!world.players[1].is_dead);
        // Processing stopped before the second player moved
        assert_eq!(world.players[1].vel, Vec2::ZERO);
    }

    #[test]
    fn test_iterations_stop_at_game_over() {
        let mut world = World::classic();
        world.players[1].pos = Vec2::new(0.0, 990.0);
        world.players[1].vel = Vec2::new(0.0, 30.0);
        let out = engine().perform_iterations(&world, 100, false);

        assert!(out.game_over);
        assert!(out.players[1].is_dead);
        assert!(out.players[1].pos.length() < 1100.0);
        // Source world untouched
        assert!(!world.game_over);
    }

    #[test]
    fn test_iterations_are_deterministic() {
        let engine = engine();
        let mut world = World::scattered(3, 6);
        world.players[0].movement.right = true;
        world.players[1].movement.left = true;
        world.players[1].movement.harden = true;

        let a = engine.perform_iterations(&world, 240, false);
        let b = engine.perform_iterations(&world, 240, false);
        assert_eq!(a.players, b.players);
        assert_eq!(a.game_over, b.game_over);
        for (pa, pb) in a.players.iter().zip(&b.players) {
            assert_eq!(pa.pos.x.to_bits(), pb.pos.x.to_bits());
            assert_eq!(pa.vel.y.to_bits(), pb.vel.y.to_bits());
        }
    }

    #[test]
    fn test_players_push_each_other_apart() {
        let mut world = World::new(
            vec![],
            vec![
                Player::new(BLUE, PLAYER_MASS, PLAYER_RADIUS, Vec2::new(-40.0, 0.0)),
                Player::new(RED, PLAYER_MASS, PLAYER_RADIUS, Vec2::new(40.0, 0.0)),
            ],
        );
        let flipped = engine().perform_iteration(&mut world);

        assert!(flipped);
        assert!(world.players[0].has_collided);
        assert!(world.players[0].pos.distance(world.players[1].pos) >= 100.0 - 1e-3);
    }

    #[test]
    fn test_contact_truncates_lookahead() {
        let engine = engine();
        let mut a = Player::new(BLUE, PLAYER_MASS, PLAYER_RADIUS, Vec2::new(-150.0, 0.0));
        let mut b = Player::new(RED, PLAYER_MASS, PLAYER_RADIUS, Vec2::new(150.0, 0.0));
        a.vel = Vec2::new(10.0, 0.0);
        b.vel = Vec2::new(-10.0, 0.0);
        let world = World::new(vec![], vec![a, b]);

        let truncated = engine.perform_iterations(&world, 50, true);
        let full = engine.perform_iterations(&world, 50, false);

        assert!(truncated.players.iter().any(|p| p.has_collided));
        assert!(truncated.players[0].pos.y < full.players[0].pos.y);
        assert!(!truncated.game_over && !full.game_over);
    }

    #[test]
    fn test_lands_on_indexed_ledge() {
        let engine = engine();
        let player = Player::new(BLUE, PLAYER_MASS, PLAYER_RADIUS, Vec2::new(0.0, -70.0));
        let world = World::new(
            vec![
                Platform::new(GREEN, 100.0, 20.0, Vec2::new(-600.0, 0.0)),
                Platform::new(GREEN, 100.0, 20.0, Vec2::new(600.0, 0.0)),
                Platform::new(GREEN, 200.0, 20.0, Vec2::ZERO),
            ],
            vec![player],
        );
        assert!(world.index().splits().len() > 1);

        let out = engine.perform_iterations(&world, 60, false);
        assert!((out.players[0].pos.y + 60.0).abs() < 0.5);
        assert!(out.players[0].can_jump);
    }
}
