use anyhow::Context;
use raygrid::{Action, Game, Map};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use std::path::PathBuf;
use std::time::{Duration, Instant};

mod render;

// helper trait to convert strings into std::error types
trait StringToAnyhow<T> {
    fn ah(self) -> anyhow::Result<T>;
}

impl<T> StringToAnyhow<T> for Result<T, String> {
    fn ah(self) -> anyhow::Result<T> {
        self.map_err(|err| anyhow::anyhow!("{err}"))
    }
}

const DEFAULT_MAP: &str = "map/default.grid";

// height of screen, the width is one pixel per cast column
const HEIGHT: u32 = 352;

const TARGET_FPS: u64 = 60;

fn action(key: Keycode) -> Option<Action> {
    match key {
        Keycode::Left | Keycode::A => Some(Action::TurnLeft),
        Keycode::Right | Keycode::D => Some(Action::TurnRight),
        Keycode::Up | Keycode::W => Some(Action::WalkForward),
        Keycode::Down | Keycode::S => Some(Action::WalkBackward),
        _ => None,
    }
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_custom_env("RAYGRID_LOG");

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| DEFAULT_MAP.into());
    let map = Map::load(&path).with_context(|| format!("loading {}", path.display()))?;
    let width = u32::try_from(map.config.column_count).context("too many columns")?;

    // sdl boilerplate
    log::info!("initializing sdl2");
    let sdl_ctx = sdl2::init().ah()?;
    log::info!("initializing video");
    let video = sdl_ctx.video().ah()?;

    log::info!("initializing window");
    let mut window = video
        .window("raygrid", width, HEIGHT)
        .position_centered()
        .build()?;
    window.set_resizable(false);
    log::info!("creating canvas");
    let mut canvas = window.into_canvas().build()?;
    log::info!("pumping events");
    let mut events = sdl_ctx.event_pump().ah()?;

    log::info!("initializing game state");
    let mut game = Game::new(map);
    let mut minimap = false;

    let delta = Duration::from_millis(1_000 / TARGET_FPS);

    'main_loop: loop {
        let prev = Instant::now();

        for ev in events.poll_iter() {
            match ev {
                Event::Quit { .. } => break 'main_loop,
                Event::KeyDown {
                    keycode: Some(k),
                    repeat: false,
                    ..
                } => match k {
                    Keycode::Escape => break 'main_loop,
                    Keycode::M => minimap = !minimap,
                    k => {
                        if let Some(action) = action(k) {
                            game.controls.press(action);
                        }
                    }
                },
                Event::KeyUp {
                    keycode: Some(k), ..
                } => {
                    if let Some(action) = action(k) {
                        game.controls.release(action);
                    }
                }
                _ => {}
            }
        }

        game.update();

        if let Err(err) = render::frame(&mut canvas, &game, HEIGHT, minimap) {
            log::error!("error while drawing frame: {err}");
            return Err(err);
        }
        canvas.present();

        let diff = prev.elapsed();
        if diff < delta {
            std::thread::sleep(delta - diff);
        }
    }

    Ok(())
}
