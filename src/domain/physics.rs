/// Rectangle physics: overlap tests, gravity integration and platform
/// collision resolution.
///
/// ## Resolution model
///
/// Not a swept solver. After an entity has moved for the tick, every
/// platform it overlaps is classified independently, in list order:
///   1. falling and its top above the platform top → land on top
///   2. rising and its top below the platform top  → bump underneath
///   3. otherwise pushed out sideways by horizontal velocity
///
/// Later platforms may override corrections made by earlier ones in the
/// same tick, and fast movement can tunnel. Enemies only get rule 1.

use crate::domain::entity::{Body, Platform};

/// Axis-aligned rectangle in logical pixels (top-left origin, y grows down).
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict overlap: rectangles that only share an edge do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Constant downward acceleration, applied every tick (even in the air).
#[inline]
pub fn apply_gravity(body: &mut Body, gravity: f32) {
    body.vy += gravity;
}

#[inline]
pub fn integrate(body: &mut Body) {
    body.x += body.vx;
    body.y += body.vy;
}

/// Full resolution (player): landing, head bump, and side push.
pub fn resolve_platforms(body: &mut Body, platforms: &[Platform]) {
    body.on_ground = false;

    for platform in platforms {
        let p = &platform.rect;
        if !body.rect().overlaps(p) {
            continue;
        }

        if body.vy > 0.0 && body.y < p.y {
            body.y = p.y - body.h;
            body.vy = 0.0;
            body.on_ground = true;
        } else if body.vy < 0.0 && body.y > p.y {
            body.y = p.bottom();
            body.vy = 0.0;
        } else if body.vx > 0.0 {
            body.x = p.x - body.w;
        } else if body.vx < 0.0 {
            body.x = p.right();
        }
    }
}

/// Ground-only resolution (enemies): side and underside contacts pass through.
pub fn resolve_ground(body: &mut Body, platforms: &[Platform]) {
    body.on_ground = false;

    for platform in platforms {
        let p = &platform.rect;
        if body.rect().overlaps(p) && body.vy > 0.0 && body.y < p.y {
            body.y = p.y - body.h;
            body.vy = 0.0;
            body.on_ground = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::material::Material;
    use proptest::prelude::*;

    fn plat(x: f32, y: f32, w: f32, h: f32) -> Platform {
        Platform { rect: Rect::new(x, y, w, h), material: Material::Stone }
    }

    fn body(x: f32, y: f32, vx: f32, vy: f32) -> Body {
        Body { x, y, vx, vy, w: 32.0, h: 32.0, on_ground: false }
    }

    // ── Rect ──

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 10.0, 10.0, 10.0)));
        assert!(a.overlaps(&Rect::new(9.5, 9.5, 10.0, 10.0)));
    }

    #[test]
    fn center_of_rect() {
        assert_eq!(Rect::new(520.0, 480.0, 20.0, 20.0).center(), (530.0, 490.0));
    }

    // ── Full resolution ──

    #[test]
    fn lands_on_top() {
        let platforms = [plat(0.0, 680.0, 200.0, 40.0)];
        let mut b = body(50.0, 660.0, 0.0, 12.0);
        resolve_platforms(&mut b, &platforms);
        assert_eq!(b.y, 648.0);
        assert_eq!(b.vy, 0.0);
        assert!(b.on_ground);
    }

    #[test]
    fn head_bump_from_below() {
        let platforms = [plat(300.0, 600.0, 150.0, 20.0)];
        let mut b = body(320.0, 610.0, 0.0, -10.0);
        resolve_platforms(&mut b, &platforms);
        assert_eq!(b.y, 620.0);
        assert_eq!(b.vy, 0.0);
        assert!(!b.on_ground);
    }

    #[test]
    fn side_push_moving_right() {
        let platforms = [plat(300.0, 600.0, 150.0, 20.0)];
        // Top exactly level with platform top: neither landing nor bump applies
        let mut b = body(280.0, 600.0, 5.0, 0.0);
        resolve_platforms(&mut b, &platforms);
        assert_eq!(b.x, 268.0);
    }

    #[test]
    fn side_push_moving_left() {
        let platforms = [plat(300.0, 600.0, 150.0, 20.0)];
        let mut b = body(440.0, 600.0, -5.0, 0.0);
        resolve_platforms(&mut b, &platforms);
        assert_eq!(b.x, 450.0);
    }

    #[test]
    fn no_contact_clears_ground_flag() {
        let platforms = [plat(0.0, 680.0, 200.0, 40.0)];
        let mut b = body(500.0, 100.0, 0.0, 0.8);
        b.on_ground = true;
        resolve_platforms(&mut b, &platforms);
        assert!(!b.on_ground);
        assert_eq!((b.x, b.y), (500.0, 100.0));
    }

    #[test]
    fn each_overlap_resolved_in_list_order() {
        // Landing on the floor zeroes vy, so the wall is then treated as a side hit.
        let platforms = [plat(0.0, 500.0, 100.0, 20.0), plat(40.0, 480.0, 20.0, 100.0)];
        let mut b = body(10.0, 470.0, 5.0, 8.0);
        resolve_platforms(&mut b, &platforms);
        assert_eq!(b.y, 468.0);
        assert_eq!(b.x, 8.0);
        assert!(b.on_ground);
    }

    #[test]
    fn wall_first_then_floor_skips_side_push() {
        // Same two platforms in the other order: the wall sees vy > 0 and
        // snaps the body onto the wall top instead.
        let platforms = [plat(40.0, 480.0, 20.0, 100.0), plat(0.0, 500.0, 100.0, 20.0)];
        let mut b = body(10.0, 470.0, 5.0, 8.0);
        resolve_platforms(&mut b, &platforms);
        assert_eq!(b.y, 448.0);
        assert_eq!(b.x, 10.0);
        assert!(b.on_ground);
    }

    // ── Ground-only resolution ──

    #[test]
    fn enemy_passes_through_platform_side() {
        let platforms = [plat(300.0, 600.0, 150.0, 20.0)];
        let mut e = Body { x: 290.0, y: 600.0, vx: 1.0, vy: 0.0, w: 24.0, h: 24.0, on_ground: false };
        resolve_ground(&mut e, &platforms);
        assert_eq!(e.x, 290.0);
        assert!(!e.on_ground);
    }

    #[test]
    fn enemy_ground_snap() {
        let platforms = [plat(300.0, 600.0, 150.0, 20.0)];
        let mut e = Body { x: 350.0, y: 580.0, vx: -1.0, vy: 0.8, w: 24.0, h: 24.0, on_ground: false };
        resolve_ground(&mut e, &platforms);
        assert_eq!(e.y, 576.0);
        assert_eq!(e.vy, 0.0);
        assert!(e.on_ground);
    }

    proptest! {
        #[test]
        fn landing_from_above_always_grounds(
            vx in -20.0f32..20.0,
            vy in 0.1f32..30.0,
            dx in -31.0f32..199.0,
            sink in 0.1f32..31.9,
        ) {
            let platforms = [plat(0.0, 400.0, 200.0, 40.0)];
            // Bottom edge sunk into the platform, top still above it.
            let mut b = body(dx, 400.0 - 32.0 + sink, vx, vy);
            resolve_platforms(&mut b, &platforms);
            prop_assert!(b.on_ground);
            prop_assert_eq!(b.vy, 0.0);
            prop_assert_eq!(b.y, 368.0);
        }
    }
}
