//! Collision response
//!
//! Walls force the offending velocity component to point back into the
//! arena. Body pairs exchange momentum along the line of centers using the
//! 1-D elastic collision law; the tangential component passes through.

use glam::Vec2;

use super::body::Body;
use super::contact::{Wall, WallEdges};
use crate::cartesian_to_polar;

/// Force velocity components outward from every penetrated wall
///
/// Sign forcing is idempotent, so repeated contact ticks never flip the
/// body back into the wall.
pub fn reflect_off_walls(mut vel: Vec2, edges: WallEdges) -> Vec2 {
    for wall in edges.iter() {
        match wall {
            Wall::Left => vel.x = vel.x.abs(),
            Wall::Right => vel.x = -vel.x.abs(),
            Wall::Top => vel.y = vel.y.abs(),
            Wall::Bottom => vel.y = -vel.y.abs(),
        }
    }
    vel
}

/// 1-D elastic collision: final velocities of two masses along one axis
#[inline]
pub fn elastic_1d(v1: f32, m1: f32, v2: f32, m2: f32) -> (f32, f32) {
    let total = m1 + m2;
    let v1f = v1 * (m1 - m2) / total + 2.0 * m2 * v2 / total;
    let v2f = 2.0 * m1 * v1 / total + v2 * (m2 - m1) / total;
    (v1f, v2f)
}

/// Post-collision velocities for two disks
///
/// Velocities are rotated into the frame of the line of centers (angle phi,
/// body 1 toward body 2). The parallel components go through `elastic_1d`,
/// the perpendicular ones are kept, and both are rotated back.
pub fn elastic_velocities(a: &Body, b: &Body) -> (Vec2, Vec2) {
    let (_, phi) = cartesian_to_polar(b.pos - a.pos);
    let to_line = Vec2::from_angle(-phi);
    let from_line = Vec2::from_angle(phi);

    // x = parallel (e1), y = perpendicular (e2)
    let va = to_line.rotate(a.vel);
    let vb = to_line.rotate(b.vel);

    let (va_par, vb_par) = elastic_1d(va.x, a.mass(), vb.x, b.mass());

    (
        from_line.rotate(Vec2::new(va_par, va.y)),
        from_line.rotate(Vec2::new(vb_par, vb.y)),
    )
}

/// Apply the elastic impulse to a pair of bodies
pub fn resolve_pair(a: &mut Body, b: &mut Body) {
    let (va, vb) = elastic_velocities(a, b);
    a.set_velocity(va);
    b.set_velocity(vb);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn moving(id: u32, pos: Vec2, radius: f32, vel: Vec2) -> Body {
        let mut body = Body::new(id, pos, radius).unwrap();
        body.set_velocity(vel);
        body
    }

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_left_wall_forces_positive_vx() {
        let edges: WallEdges = [Wall::Left].into_iter().collect();
        assert_eq!(reflect_off_walls(Vec2::new(-2.0, 1.0), edges), Vec2::new(2.0, 1.0));
        // Already moving away: unchanged
        assert_eq!(reflect_off_walls(Vec2::new(2.0, 1.0), edges), Vec2::new(2.0, 1.0));
    }

    #[test]
    fn test_right_and_bottom_force_negative() {
        let edges: WallEdges = [Wall::Right, Wall::Bottom].into_iter().collect();
        assert_eq!(reflect_off_walls(Vec2::new(3.0, 4.0), edges), Vec2::new(-3.0, -4.0));
    }

    #[test]
    fn test_corner_flips_both_axes() {
        let edges: WallEdges = [Wall::Left, Wall::Top].into_iter().collect();
        assert_eq!(reflect_off_walls(Vec2::new(-1.5, -0.5), edges), Vec2::new(1.5, 0.5));
    }

    #[test]
    fn test_wall_reflection_is_idempotent() {
        let edges: WallEdges = [Wall::Top].into_iter().collect();
        let once = reflect_off_walls(Vec2::new(0.3, -7.0), edges);
        assert_eq!(reflect_off_walls(once, edges), once);
    }

    #[test]
    fn test_elastic_1d_equal_masses_swap() {
        let (v1, v2) = elastic_1d(5.0, 100.0, -5.0, 100.0);
        assert!((v1 + 5.0).abs() < 1e-6);
        assert!((v2 - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_elastic_1d_unequal_masses() {
        // Light body at rest, struck by one three times heavier
        let (v1, v2) = elastic_1d(0.0, 1.0, 1.0, 3.0);
        assert!((v1 - 1.5).abs() < 1e-6, "{v1}");
        assert!((v2 - 0.5).abs() < 1e-6, "{v2}");
        assert!((v1 * 1.0 + v2 * 3.0 - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_elastic_1d_heavy_target_bounces_light_body() {
        let (v1, v2) = elastic_1d(4.0, 1.0, 0.0, 1.0e6);
        assert!(v1 < -3.99);
        assert!(v2 > 0.0 && v2 < 1e-4);
    }

    #[test]
    fn test_head_on_equal_masses() {
        let a = moving(0, Vec2::new(40.0, 50.0), 10.0, Vec2::new(5.0, 0.0));
        let b = moving(1, Vec2::new(58.0, 50.0), 10.0, Vec2::new(-5.0, 0.0));
        let (va, vb) = elastic_velocities(&a, &b);
        assert!(approx(va, Vec2::new(-5.0, 0.0)), "{va:?}");
        assert!(approx(vb, Vec2::new(5.0, 0.0)), "{vb:?}");
    }

    #[test]
    fn test_glancing_blow_keeps_tangential_component() {
        // Line of centers is vertical; horizontal motion is tangential
        let a = moving(0, Vec2::new(100.0, 100.0), 10.0, Vec2::new(3.0, 2.0));
        let b = moving(1, Vec2::new(100.0, 118.0), 10.0, Vec2::ZERO);
        let (va, vb) = elastic_velocities(&a, &b);
        assert!(approx(va, Vec2::new(3.0, 0.0)), "{va:?}");
        assert!(approx(vb, Vec2::new(0.0, 2.0)), "{vb:?}");
    }

    #[test]
    fn test_bodies_at_rest_stay_at_rest() {
        let mut a = moving(0, Vec2::new(100.0, 100.0), 10.0, Vec2::ZERO);
        let mut b = moving(1, Vec2::new(110.0, 100.0), 10.0, Vec2::ZERO);
        resolve_pair(&mut a, &mut b);
        assert_eq!(a.vel, Vec2::ZERO);
        assert_eq!(b.vel, Vec2::ZERO);
    }

    fn pair_strategy() -> impl Strategy<Value = (Body, Body)> {
        (
            (1.0f32..50.0, 1.0f32..50.0),
            (-100.0f32..100.0, -100.0f32..100.0),
            (-100.0f32..100.0, -100.0f32..100.0),
            (0.0f32..std::f32::consts::TAU, 1.0f32..100.0),
        )
            .prop_map(|((ra, rb), (vax, vay), (vbx, vby), (angle, dist))| {
                let pa = Vec2::new(500.0, 500.0);
                let pb = pa + Vec2::from_angle(angle) * dist;
                (
                    moving(0, pa, ra, Vec2::new(vax, vay)),
                    moving(1, pb, rb, Vec2::new(vbx, vby)),
                )
            })
    }

    proptest! {
        #[test]
        fn prop_momentum_is_conserved((a, b) in pair_strategy()) {
            let before = a.momentum() + b.momentum();
            let (va, vb) = elastic_velocities(&a, &b);
            let after = va * a.mass() + vb * b.mass();
            let scale = (a.mass() + b.mass()) * 200.0;
            prop_assert!((before - after).length() <= scale * 1e-5,
                "before {:?} after {:?}", before, after);
        }

        #[test]
        fn prop_energy_is_conserved((a, b) in pair_strategy()) {
            let before = a.mass() * a.vel.length_squared() + b.mass() * b.vel.length_squared();
            let (va, vb) = elastic_velocities(&a, &b);
            let after = a.mass() * va.length_squared() + b.mass() * vb.length_squared();
            let scale = (a.mass() + b.mass()) * 20000.0;
            prop_assert!((before - after).abs() <= scale * 1e-5,
                "before {} after {}", before, after);
        }

        #[test]
        fn prop_wall_reflection_points_inward(vx in -50.0f32..50.0, vy in -50.0f32..50.0, bits in 1u8..16) {
            let edges: WallEdges = Wall::ALL
                .into_iter()
                .enumerate()
                .filter(|(i, _)| bits & (1 << i) != 0)
                .map(|(_, w)| w)
                .collect();
            let v = reflect_off_walls(Vec2::new(vx, vy), edges);
            // Far edges are applied last when a body spans the whole arena
            if edges.contains(Wall::Right) { prop_assert!(v.x <= 0.0); }
            else if edges.contains(Wall::Left) { prop_assert!(v.x >= 0.0); }
            if edges.contains(Wall::Bottom) { prop_assert!(v.y <= 0.0); }
            else if edges.contains(Wall::Top) { prop_assert!(v.y >= 0.0); }
            prop_assert!((v.length() - Vec2::new(vx, vy).length()).abs() < 1e-4);
        }
    }
}
