use glam::Vec2;
use raygrid::{Action, Game, Intent, Map, Motion, Player, Pose, RayCaster, Tile};
use std::f32::consts::{FRAC_PI_2, PI, TAU};

fn room() -> Map {
    Map::from_rows(&[
        &[1, 1, 1, 1, 1],
        &[1, 0, 0, 0, 1],
        &[1, 0, 0, 0, 1],
        &[1, 0, 0, 0, 1],
        &[1, 1, 1, 1, 1],
    ])
    .unwrap()
}

#[test]
fn room_centre_facing_east() {
    let map = room();
    let tile = map.tile_size();
    let pose = Pose::new(Vec2::new(2.5 * tile, 2.5 * tile), 0.);

    let hit = RayCaster::new(&map).cast(&pose, pose.angle);

    let inner_width = 3. * tile;
    assert!(hit.was_hit_vertical());
    assert!((hit.point.x - 4. * tile).abs() < 1e-3);
    assert!((hit.point.y - pose.pos.y).abs() < 1e-3);
    assert!((hit.distance - inner_width / 2.).abs() < 1e-3);
}

#[test]
fn every_angle_terminates_on_demo_map() {
    let map = Map::demo();
    let caster = RayCaster::new(&map);

    let mut positions = vec![];
    for ((col, row), tile) in map.iter() {
        if tile == Tile::Empty {
            let origin = map.cell_origin(col, row);
            positions.push(origin + Vec2::splat(map.tile_size() / 2.));
            positions.push(origin + Vec2::new(1., 31.));
        }
    }

    for pos in positions {
        let pose = Pose::new(pos, 0.);
        for i in 0..720 {
            let angle = i as f32 * TAU / 720.;
            let hit = caster.cast(&pose, angle);
            assert!(
                hit.distance.is_finite() && hit.distance >= 0.,
                "{pos} at {angle}: {hit:?}"
            );
            assert!(map.contains(hit.point.x, hit.point.y), "{pos} at {angle}: {hit:?}");
            assert!((0. ..TAU).contains(&hit.angle));
        }
    }
}

#[test]
fn exact_cardinals_do_not_blow_up() {
    let map = Map::demo();
    let caster = RayCaster::new(&map);
    let pose = Pose::new(Vec2::new(240., 176.), 0.);

    for angle in [0., FRAC_PI_2, PI, 3. * FRAC_PI_2, TAU, -FRAC_PI_2] {
        let hit = caster.cast(&pose, angle);
        assert!(hit.distance.is_finite(), "{angle}: {hit:?}");
        assert!(hit.point.is_finite(), "{angle}: {hit:?}");
    }
}

#[test]
fn blocked_walk_still_turns() {
    let map = room();
    let start = Vec2::new(80., 40.);
    let mut player = Player {
        pose: Pose::new(start, 3. * FRAC_PI_2),
        move_speed: 10.,
        rotation_speed: 0.05,
    };

    // 8 units below the north wall, a 10 unit step lands inside it
    player.update(
        &map,
        Intent {
            turn: Motion::Positive,
            walk: Motion::Positive,
        },
    );

    assert_eq!(player.pose.pos, start);
    assert!((player.pose.angle - (3. * FRAC_PI_2 + 0.05)).abs() < 1e-5);
}

#[test]
fn walking_into_a_wall_never_enters_it() {
    let mut game = Game::new(Map::demo());
    game.controls.press(Action::WalkForward);

    for _ in 0..500 {
        game.update();
        let pos = game.player.pose.pos;
        assert!(game.map.is_walkable(pos.x, pos.y), "walked into {pos}");
    }
    // heading straight down from the spawn, stopped short of the bottom wall
    assert!(game.player.pose.pos.y < 10. * game.map.tile_size());
}

#[test]
fn loads_default_map_file() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/map/default.grid");
    let map = Map::load(path).unwrap();

    assert_eq!((map.width, map.height), (15, 11));
    assert!(map.is_sealed());
    assert_eq!(map.spawn(), Some(Vec2::new(240., 176.)));
    assert_eq!(map.config.column_count, 480);

    let demo = Map::demo();
    assert!(map.iter().zip(demo.iter()).all(|(a, b)| a == b));

    let game = Game::new(map);
    assert_eq!(game.slices().len(), 480);
}

#[test]
fn missing_map_file_is_an_error() {
    assert!(Map::load("does/not/exist.grid").is_err());
}
