use crate::map::Map;
use crate::player::{normalize_angle, Pose};
use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI};

/// A sweep is skipped when the ray runs this close to parallel with its grid
/// lines (|sin| for rows, |cos| for columns). Below this the tangent is not
/// usable and the ray cannot cross the lines within any sane world size.
pub const PARALLEL_EPSILON: f32 = 1e-6;

/// How far past a grid line an up/left probe samples, in world units. Capped
/// at half a tile so small tiles never skip a cell.
pub const PROBE_NUDGE: f32 = 1.;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Vertical {
    Up,
    Down,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Horizontal {
    Left,
    Right,
}

/// Which way a ray heads on each axis, in screen orientation (y grows down).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Quadrant {
    pub vertical: Vertical,
    pub horizontal: Horizontal,
}

impl Quadrant {
    /// `angle` must already be normalized.
    pub fn of(angle: f32) -> Self {
        let vertical = if angle > 0. && angle < PI {
            Vertical::Down
        } else {
            Vertical::Up
        };
        let horizontal = if angle < FRAC_PI_2 || angle > 3. * FRAC_PI_2 {
            Horizontal::Right
        } else {
            Horizontal::Left
        };

        Self {
            vertical,
            horizontal,
        }
    }

    /// Sign of travel along x and y.
    pub fn signs(self) -> Vec2 {
        match (self.horizontal, self.vertical) {
            (Horizontal::Left, Vertical::Up) => Vec2::new(-1., -1.),
            (Horizontal::Right, Vertical::Up) => Vec2::new(1., -1.),
            (Horizontal::Left, Vertical::Down) => Vec2::new(-1., 1.),
            (Horizontal::Right, Vertical::Down) => Vec2::new(1., 1.),
        }
    }

    /// Offset applied to a probe so it samples the cell beyond the grid line
    /// rather than the line itself.
    fn nudge(self, axis: Axis, tile: f32) -> Vec2 {
        let nudge = PROBE_NUDGE.min(tile / 2.);
        match (axis, self.vertical, self.horizontal) {
            (Axis::Horizontal, Vertical::Up, _) => Vec2::new(0., -nudge),
            (Axis::Vertical, _, Horizontal::Left) => Vec2::new(-nudge, 0.),
            _ => Vec2::ZERO,
        }
    }
}

/// Which family of grid lines the winning hit was found on.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Axis {
    /// a row boundary (y = k * tile)
    Horizontal,
    /// a column boundary (x = k * tile)
    Vertical,
}

/// The face of the wall tile that was struck.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cardinal {
    North,
    East,
    South,
    West,
}

impl Cardinal {
    fn struck(axis: Axis, quadrant: Quadrant) -> Self {
        match (axis, quadrant.vertical, quadrant.horizontal) {
            (Axis::Horizontal, Vertical::Down, _) => Cardinal::North,
            (Axis::Horizontal, Vertical::Up, _) => Cardinal::South,
            (Axis::Vertical, _, Horizontal::Left) => Cardinal::East,
            (Axis::Vertical, _, Horizontal::Right) => Cardinal::West,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct RayHit {
    /// normalized ray angle
    pub angle: f32,
    /// world-space crossing point, on the grid line
    pub point: Vec2,
    /// euclidean distance from the viewer to `point`
    pub distance: f32,
    pub axis: Axis,
    pub face: Cardinal,
    /// position of the hit along the struck face, in `[0, tile]`
    pub tile_offset: f32,
}

impl RayHit {
    pub fn was_hit_vertical(&self) -> bool {
        self.axis == Axis::Vertical
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
struct Crossing {
    point: Vec2,
    distance: f32,
    axis: Axis,
}

/// Casts rays through a [`Map`]. Holds nothing but the borrow, so build one
/// per frame or keep it alongside the map.
#[derive(Clone, Copy)]
pub struct RayCaster<'a> {
    map: &'a Map,
}

impl<'a> RayCaster<'a> {
    pub fn new(map: &'a Map) -> Self {
        Self { map }
    }

    /// Find the nearest wall crossing along `angle` from the viewer.
    pub fn cast(&self, pose: &Pose, angle: f32) -> RayHit {
        let angle = normalize_angle(angle);
        let quadrant = Quadrant::of(angle);
        let origin = pose.pos;

        let horizontal = self.sweep_rows(origin, angle, quadrant);
        let vertical = self.sweep_columns(origin, angle, quadrant);
        let nearest = nearest(origin, horizontal, vertical);
        debug_assert!(
            nearest.is_some(),
            "ray at {angle} from {origin} left the world without hitting a wall"
        );

        let crossing = nearest.unwrap_or_else(|| {
            let reach = Vec2::new(self.map.world_width(), self.map.world_height()).length();
            log::warn!("ray at {angle} from {origin} hit nothing, reporting {reach}");
            Crossing {
                point: origin + Vec2::from_angle(angle) * reach,
                distance: reach,
                axis: Axis::Horizontal,
            }
        });

        let face = Cardinal::struck(crossing.axis, quadrant);
        let tile = self.map.tile_size();
        let Vec2 { x, y } = crossing.point;
        RayHit {
            angle,
            point: crossing.point,
            distance: crossing.distance,
            axis: crossing.axis,
            face,
            tile_offset: match face {
                Cardinal::North => tile - x.rem_euclid(tile),
                Cardinal::East => tile - y.rem_euclid(tile),
                Cardinal::South => x.rem_euclid(tile),
                Cardinal::West => y.rem_euclid(tile),
            },
        }
    }

    /// Cast `columns` rays spread evenly over `[facing - fov/2, facing + fov/2)`,
    /// leftmost screen column first.
    pub fn columns(
        self,
        pose: &'a Pose,
        field_of_view: f32,
        columns: usize,
    ) -> impl Iterator<Item = RayHit> + 'a {
        let delta = field_of_view / columns as f32;
        let start = pose.angle - field_of_view / 2.;
        (0..columns).map(move |column| self.cast(pose, start + column as f32 * delta))
    }

    /// Walk the row boundaries the ray crosses.
    fn sweep_rows(&self, origin: Vec2, angle: f32, quadrant: Quadrant) -> Option<Vec2> {
        if angle.sin().abs() < PARALLEL_EPSILON {
            return None;
        }

        let tile = self.map.tile_size();
        let signs = quadrant.signs();
        let tan = angle.tan();

        let mut row_y = (origin.y / tile).floor() * tile;
        if quadrant.vertical == Vertical::Down {
            row_y += tile;
        }
        let first = Vec2::new(origin.x + (row_y - origin.y) / tan, row_y);
        let step = Vec2::new((tile / tan).abs() * signs.x, tile * signs.y);

        self.march(first, step, quadrant.nudge(Axis::Horizontal, tile))
    }

    /// Walk the column boundaries the ray crosses.
    fn sweep_columns(&self, origin: Vec2, angle: f32, quadrant: Quadrant) -> Option<Vec2> {
        if angle.cos().abs() < PARALLEL_EPSILON {
            return None;
        }

        let tile = self.map.tile_size();
        let signs = quadrant.signs();
        let tan = angle.tan();

        let mut col_x = (origin.x / tile).floor() * tile;
        if quadrant.horizontal == Horizontal::Right {
            col_x += tile;
        }
        let first = Vec2::new(col_x, origin.y + (col_x - origin.x) * tan);
        let step = Vec2::new(tile * signs.x, (tile * tan).abs() * signs.y);

        self.march(first, step, quadrant.nudge(Axis::Vertical, tile))
    }

    /// Step from grid line to grid line until a probe lands in a wall or the
    /// ray leaves the world rectangle.
    fn march(&self, first: Vec2, step: Vec2, nudge: Vec2) -> Option<Vec2> {
        debug_assert!(
            first.is_finite() && step.is_finite(),
            "non-finite sweep: first {first}, step {step}"
        );

        let mut at = first;
        while self.map.contains(at.x, at.y) {
            let probe = at + nudge;
            if !self.map.is_walkable(probe.x, probe.y) {
                return Some(at);
            }
            at += step;
        }

        None
    }
}

/// Pick the closer of the two sweep results. The vertical crossing has to be
/// strictly closer to win.
fn nearest(origin: Vec2, horizontal: Option<Vec2>, vertical: Option<Vec2>) -> Option<Crossing> {
    let crossing = |point: Vec2, axis| Crossing {
        point,
        distance: origin.distance(point),
        axis,
    };
    let horizontal = horizontal.map(|point| crossing(point, Axis::Horizontal));
    let vertical = vertical.map(|point| crossing(point, Axis::Vertical));

    match (horizontal, vertical) {
        (Some(h), Some(v)) => Some(if v.distance < h.distance { v } else { h }),
        (Some(hit), None) | (None, Some(hit)) => Some(hit),
        (None, None) => None,
    }
}
