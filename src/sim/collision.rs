//! Collision detection and response for circles and platforms
//!
//! Detection fills a `CollisionResponse`; solving applies positional
//! correction along the contact normal plus a velocity impulse.

use glam::Vec2;

use super::geometry::Circle;
use super::world::{Platform, Player};

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResponse {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point (if hit)
    pub point: Vec2,
    /// Separation vector along the contact normal
    pub delta: Vec2,
    /// Center-to-center (circles) or center-to-edge (platforms) distance.
    /// Negative when a circle's center is inside a platform.
    pub distance: f32,
    /// Contact with the top edge of a platform
    pub topside: bool,
}

impl CollisionResponse {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            delta: Vec2::ZERO,
            distance: 0.0,
            topside: false,
        }
    }
}

/// Fallback normal for coincident centers
const FALLBACK_NORMAL: Vec2 = Vec2::X;

/// Check collision between a circle and a platform
pub fn rect_circle_collision(platform: &Platform, circle: Circle) -> CollisionResponse {
    let rect = platform.align();
    let closest = rect.clamp_point(circle.pos);
    let delta = circle.pos - closest;
    let distance_sq = delta.length_squared();

    if distance_sq > circle.radius * circle.radius {
        return CollisionResponse::miss();
    }

    if distance_sq > 0.0 {
        return CollisionResponse {
            hit: true,
            point: closest,
            delta,
            distance: distance_sq.sqrt(),
            topside: closest.y == rect.pos.y,
        };
    }

    // Center on or inside the rectangle: exit through the nearest edge
    let exits = [
        (circle.pos.y - rect.pos.y, Vec2::NEG_Y),
        (rect.bottom() - circle.pos.y, Vec2::Y),
        (circle.pos.x - rect.pos.x, Vec2::NEG_X),
        (rect.right() - circle.pos.x, Vec2::X),
    ];
    let (depth, normal) = exits
        .into_iter()
        .fold(exits[0], |best, exit| if exit.0 < best.0 { exit } else { best });

    CollisionResponse {
        hit: true,
        point: circle.pos + normal * depth,
        delta: normal,
        distance: -depth,
        topside: normal == Vec2::NEG_Y,
    }
}

/// Push a circle out of a platform and bounce its velocity
pub fn rect_circle_solve(
    player: &mut Player,
    collision: &CollisionResponse,
    restitution: f32,
    friction: f32,
) {
    let overlap = player.radius - collision.distance;
    let normal = collision.delta.normalize_or(Vec2::NEG_Y);

    player.pos += normal * overlap;

    let impulse = (1.0 + restitution) * player.vel.dot(normal) * normal;
    player.vel -= impulse;

    let friction = friction * (player.vel - impulse);
    player.vel -= friction;
}

/// Check collision between two circles
pub fn circle_circle_collision(a: Circle, b: Circle) -> CollisionResponse {
    let delta = b.pos - a.pos;
    let distance_sq = delta.length_squared();
    let radius_sum = a.radius + b.radius;

    if distance_sq > radius_sum * radius_sum {
        return CollisionResponse::miss();
    }

    let distance = distance_sq.sqrt();
    let point = if distance > 0.0 {
        let ratio = (distance + a.radius - b.radius) / (2.0 * distance);
        a.pos + delta * ratio
    } else {
        a.pos
    };

    CollisionResponse {
        hit: true,
        point,
        delta,
        distance,
        topside: false,
    }
}

/// Separate two overlapping circles and exchange momentum along the normal
pub fn circle_circle_solve(
    a: &mut Player,
    b: &mut Player,
    collision: &CollisionResponse,
    restitution: f32,
    friction: f32,
) {
    let overlap = a.radius + b.radius - collision.distance;
    let normal = collision.delta.normalize_or(FALLBACK_NORMAL);
    let correction = normal * overlap * 0.5;

    a.pos -= correction;
    b.pos += correction;

    let relative = b.vel - a.vel;
    let impulse = normal * (1.0 + restitution) * relative.dot(normal);

    a.vel += impulse * friction;
    b.vel -= impulse * friction;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use proptest::prelude::*;

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(BLUE, PLAYER_MASS, PLAYER_RADIUS, Vec2::new(x, y))
    }

    fn floor() -> Platform {
        Platform::new(GREEN, 2000.0, 200.0, Vec2::ZERO)
    }

    #[test]
    fn test_circle_circle_miss_and_hit() {
        let a = Circle::new(Vec2::new(-200.0, 0.0), 50.0);
        let b = Circle::new(Vec2::new(200.0, 0.0), 50.0);
        assert!(!circle_circle_collision(a, b).hit);

        let b = Circle::new(Vec2::new(-120.0, 0.0), 50.0);
        let contact = circle_circle_collision(a, b);
        assert!(contact.hit);
        assert_eq!(contact.distance, 80.0);
        assert!((contact.point.x - (-160.0)).abs() < 1e-4);
        assert!(!contact.topside);
    }

    #[test]
    fn test_circle_circle_solve_separates() {
        let mut a = player_at(0.0, 0.0);
        let mut b = player_at(60.0, 0.0);
        let contact = circle_circle_collision(a.circle(), b.circle());
        circle_circle_solve(&mut a, &mut b, &contact, 0.0, 0.2);

        assert!((a.pos.distance(b.pos) - 100.0).abs() < 1e-3);
        assert_eq!(a.pos, Vec2::new(-20.0, 0.0));
        assert_eq!(b.pos, Vec2::new(80.0, 0.0));
    }

    #[test]
    fn test_circle_circle_coincident_centers() {
        let mut a = player_at(10.0, 10.0);
        let mut b = player_at(10.0, 10.0);
        let contact = circle_circle_collision(a.circle(), b.circle());
        assert!(contact.hit);
        assert_eq!(contact.distance, 0.0);

        circle_circle_solve(&mut a, &mut b, &contact, 0.0, 0.2);
        assert!(a.pos.is_finite() && b.pos.is_finite());
        assert!((a.pos.distance(b.pos) - 100.0).abs() < 1e-3);
        assert!(b.pos.x > a.pos.x);
    }

    #[test]
    fn test_circle_circle_impulse_transfers_velocity() {
        let mut a = player_at(0.0, 0.0);
        let mut b = player_at(90.0, 0.0);
        a.vel = Vec2::new(10.0, 0.0);
        let contact = circle_circle_collision(a.circle(), b.circle());
        circle_circle_solve(&mut a, &mut b, &contact, 0.0, 0.5);

        // relative.dot(n) = -10, impulse = -10 along +x, scaled by 0.5
        assert!((a.vel.x - 5.0).abs() < 1e-4);
        assert!((b.vel.x - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_rect_circle_topside_contact() {
        // Floor top edge is at y = -100
        let player = player_at(0.0, -140.0);
        let contact = rect_circle_collision(&floor(), player.circle());
        assert!(contact.hit);
        assert!(contact.topside);
        assert_eq!(contact.point, Vec2::new(0.0, -100.0));
        assert_eq!(contact.distance, 40.0);

        let above = player_at(0.0, -151.0);
        assert!(!rect_circle_collision(&floor(), above.circle()).hit);
    }

    #[test]
    fn test_rect_circle_side_contact_not_topside() {
        let player = player_at(1030.0, 0.0);
        let contact = rect_circle_collision(&floor(), player.circle());
        assert!(contact.hit);
        assert!(!contact.topside);
        assert_eq!(contact.delta, Vec2::new(30.0, 0.0));
    }

    #[test]
    fn test_rect_circle_solve_lands_on_top() {
        let mut player = player_at(0.0, -140.0);
        player.vel = Vec2::new(0.0, 10.0);
        let contact = rect_circle_collision(&floor(), player.circle());
        rect_circle_solve(&mut player, &contact, PLATFORM_RESTITUTION, PLATFORM_FRICTION);

        assert!((player.pos.y - (-150.0)).abs() < 1e-4);
        assert!(player.vel.y.abs() < 0.01, "landing is near-inelastic");
    }

    #[test]
    fn test_rect_circle_center_inside_exits_nearest_edge() {
        let mut player = player_at(0.0, -90.0);
        let contact = rect_circle_collision(&floor(), player.circle());
        assert!(contact.hit);
        assert!(contact.topside);
        assert_eq!(contact.delta, Vec2::NEG_Y);
        assert_eq!(contact.distance, -10.0);
        assert_eq!(contact.point, Vec2::new(0.0, -100.0));

        rect_circle_solve(&mut player, &contact, PLATFORM_RESTITUTION, PLATFORM_FRICTION);
        assert!((player.pos.y - (-150.0)).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_circle_solve_leaves_no_penetration(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            dx in -99.0f32..99.0, dy in -99.0f32..99.0,
            ra in 10.0f32..60.0, rb in 10.0f32..60.0,
            restitution in 0.0f32..4.0,
        ) {
            let mut a = Player::new(BLUE, 20.0, ra, Vec2::new(ax, ay));
            let mut b = Player::new(RED, 20.0, rb, Vec2::new(ax + dx, ay + dy));
            let contact = circle_circle_collision(a.circle(), b.circle());
            prop_assume!(contact.hit);

            circle_circle_solve(&mut a, &mut b, &contact, restitution, 0.2);
            let gap = a.pos.distance(b.pos) - (ra + rb);
            prop_assert!(gap > -1e-2, "still overlapping by {}", -gap);
            prop_assert!(gap < 1e-2, "pushed too far apart by {}", gap);
        }
    }
}
