use crate::map::MapError;
use std::f32::consts::PI;

pub const TILE_SIZE: f32 = 32.;
pub const FOV_DEGREES: f32 = 60.;
pub const COLUMNS: usize = 480;
pub const MOVE_SPEED: f32 = 2.;
pub const TURN_DEGREES: f32 = 2.;

/// Tunables shared by the map, the viewer and the caster.
///
/// Grid dimensions are not part of this, they come from the map itself.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Config {
    /// side length of one tile in world units
    pub tile_size: f32,
    /// total angular width of the view in radians
    pub field_of_view: f32,
    /// number of rays cast per frame, one per screen column
    pub column_count: usize,
    /// world units walked per frame
    pub move_speed: f32,
    /// radians turned per frame
    pub rotation_speed: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            field_of_view: FOV_DEGREES.to_radians(),
            column_count: COLUMNS,
            move_speed: MOVE_SPEED,
            rotation_speed: TURN_DEGREES.to_radians(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), MapError> {
        let invalid = |reason: &str| -> Result<(), MapError> {
            Err(MapError::InvalidConfig(reason.to_owned()))
        };

        if !(self.tile_size.is_finite() && self.tile_size > 0.) {
            return invalid("tile size must be positive");
        }
        if !(self.field_of_view > 0. && self.field_of_view < PI) {
            return invalid("field of view must lie between 0 and 180 degrees");
        }
        if self.column_count == 0 {
            return invalid("column count must be at least 1");
        }
        if !(self.move_speed.is_finite() && self.move_speed > 0.) {
            return invalid("move speed must be positive");
        }
        if !(self.rotation_speed.is_finite() && self.rotation_speed > 0.) {
            return invalid("rotation speed must be positive");
        }

        Ok(())
    }

    /// Apply one `!!!!META` directive, e.g. `view,fov=60,columns=320`.
    pub(crate) fn apply_directive(
        &mut self,
        directive: &str,
        params: &[(&str, &str)],
    ) -> Result<(), MapError> {
        log::debug!("config directive {directive} {params:?}");
        if !matches!(directive, "view" | "tile" | "player") {
            return Err(MapError::UnknownDirective(directive.to_owned()));
        }

        for &(key, value) in params {
            match (directive, key) {
                ("view", "fov") => self.field_of_view = parse_value(key, value)?.to_radians(),
                ("view", "columns") => {
                    self.column_count = value.parse().map_err(|_| MapError::BadValue {
                        key: key.to_owned(),
                        value: value.to_owned(),
                    })?
                }
                ("tile", "size") => self.tile_size = parse_value(key, value)?,
                ("player", "speed") => self.move_speed = parse_value(key, value)?,
                ("player", "turn") => self.rotation_speed = parse_value(key, value)?.to_radians(),
                (_, other) => {
                    return Err(MapError::UnknownKey {
                        directive: directive.to_owned(),
                        key: other.to_owned(),
                    })
                }
            }
        }

        Ok(())
    }
}

fn parse_value(key: &str, value: &str) -> Result<f32, MapError> {
    value
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| MapError::BadValue {
            key: key.to_owned(),
            value: value.to_owned(),
        })
}
