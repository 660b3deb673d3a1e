use crate::input::Controls;
use crate::map::Map;
use crate::player::Player;
use crate::ray::{RayCaster, RayHit};

/// Per-frame state: the level, the viewer and the slices cast this frame.
pub struct Game {
    pub map: Map,
    pub player: Player,
    pub controls: Controls,
    slices: Vec<RayHit>,
}

impl Game {
    pub fn new(map: Map) -> Self {
        let player = Player::spawn(&map);
        let slices = Vec::with_capacity(map.config.column_count);

        let mut game = Self {
            map,
            player,
            controls: Controls::default(),
            slices,
        };
        game.cast_rays();
        game
    }

    /// Apply this frame's intent, then recast every column.
    pub fn update(&mut self) {
        self.player.update(&self.map, self.controls.intent());
        self.cast_rays();
    }

    /// Hits for this frame, one per screen column, left to right.
    pub fn slices(&self) -> &[RayHit] {
        &self.slices
    }

    fn cast_rays(&mut self) {
        self.slices.clear();
        self.slices.extend(RayCaster::new(&self.map).columns(
            &self.player.pose,
            self.map.config.field_of_view,
            self.map.config.column_count,
        ));
    }
}
