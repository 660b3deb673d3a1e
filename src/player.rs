use crate::input::Intent;
use crate::map::Map;
use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, TAU};

/// Wrap an angle into `[0, 2π)`.
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs
    if wrapped >= TAU {
        0.
    } else {
        wrapped
    }
}

/// Where the viewer stands and which way it faces.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Pose {
    pub pos: Vec2,
    /// radians, always in `[0, 2π)`
    pub angle: f32,
}

impl Pose {
    pub fn new(pos: Vec2, angle: f32) -> Self {
        Self {
            pos,
            angle: normalize_angle(angle),
        }
    }

    pub fn facing(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Player {
    pub pose: Pose,
    pub move_speed: f32,
    pub rotation_speed: f32,
}

impl Player {
    /// Spawn on the map's `*` cell, or in the middle of the world, facing down.
    pub fn spawn(map: &Map) -> Self {
        let pos = map
            .spawn()
            .unwrap_or_else(|| Vec2::new(map.world_width(), map.world_height()) / 2.);
        log::info!("spawning player at ({}, {})", pos.x, pos.y);

        Self {
            pose: Pose::new(pos, FRAC_PI_2),
            move_speed: map.config.move_speed,
            rotation_speed: map.config.rotation_speed,
        }
    }

    /// Advance one frame. The turn always applies; the walk is dropped if the
    /// destination point is not walkable.
    ///
    /// Only the destination is sampled, so a large `move_speed` can cut
    /// through the corner where two walls meet diagonally.
    pub fn update(&mut self, map: &Map, intent: Intent) {
        self.pose.angle =
            normalize_angle(self.pose.angle + intent.turn.sign() * self.rotation_speed);

        let step = self.pose.facing() * intent.walk.sign() * self.move_speed;
        if step == Vec2::ZERO {
            return;
        }

        let next = self.pose.pos + step;
        if map.is_walkable(next.x, next.y) {
            self.pose.pos = next;
        }
    }
}
