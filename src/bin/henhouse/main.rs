mod loader;
mod renderer;

use std::{path::Path, sync::mpsc::TryRecvError, time::Instant};

use henhouse::{
    config::Config,
    engine::{CameraCommand, CameraMotion, Control, Engine},
    game::SceneFlags,
    util::BoxedError,
};
use log::LevelFilter;
use sdl2::{
    event::{Event, WindowEvent},
    keyboard::Keycode,
};

use renderer::WgpuRasterizer;

const CONFIG_PATH: &str = "henhouse.cfg";

/// Degrees the global rotation changes per key press.
const GLOBAL_ANGLE_STEP: f32 = 5.0;

fn camera_motion(keycode: Keycode) -> Option<CameraMotion> {
    Some(match keycode {
        Keycode::W => CameraMotion::MoveForward,
        Keycode::S => CameraMotion::MoveBackwards,
        Keycode::A => CameraMotion::MoveLeft,
        Keycode::D => CameraMotion::MoveRight,
        Keycode::Q => CameraMotion::PanLeft,
        Keycode::E => CameraMotion::PanRight,
        Keycode::Z => CameraMotion::GoUp,
        Keycode::X => CameraMotion::GoDown,
        Keycode::C => CameraMotion::PanUp,
        Keycode::V => CameraMotion::PanDown,
        _ => return None,
    })
}

/// Toggles and sliders from the keyboard.
fn control(keycode: Keycode, engine: &Engine) -> Option<Control> {
    let scene = engine.scene();
    let toggled = |flag| !scene.flags.contains(flag);
    Some(match keycode {
        Keycode::Space => Control::Animate(toggled(SceneFlags::ANIMATE)),
        Keycode::N => Control::NormalDebug(toggled(SceneFlags::NORMAL_DEBUG)),
        Keycode::L => Control::Light(toggled(SceneFlags::LIGHT)),
        Keycode::K => Control::Spotlight(toggled(SceneFlags::SPOTLIGHT)),
        Keycode::Left => Control::GlobalAngle(scene.animation.global_angle - GLOBAL_ANGLE_STEP),
        Keycode::Right => Control::GlobalAngle(scene.animation.global_angle + GLOBAL_ANGLE_STEP),
        Keycode::Up => Control::Fov((scene.camera.fov() - 5.0).max(10.0)),
        Keycode::Down => Control::Fov((scene.camera.fov() + 5.0).min(120.0)),
        _ => return None,
    })
}

fn main() -> Result<(), BoxedError> {
    env_logger::builder()
        .filter_level(LevelFilter::Error)
        .filter_module("henhouse", LevelFilter::Debug)
        .init();

    let config = if Path::new(CONFIG_PATH).exists() {
        Config::load(CONFIG_PATH)?
    } else {
        Config::default()
    };

    let sdl = sdl2::init()?;
    let sdl_video = sdl.video()?;
    let mut window = sdl_video
        .window("henhouse", config.width, config.height)
        .resizable()
        .build()?;
    let mut event_pump = sdl.event_pump()?;

    let mut engine = Engine::new(config);
    let mut rasterizer = WgpuRasterizer::new(&window, engine.meshes())?;
    let mut images = Some(loader::spawn(engine.config().texture_dir.clone())?);

    let start = Instant::now();
    'running: loop {
        while let Some(event) = event_pump.poll_event() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                Event::Window {
                    win_event: WindowEvent::Resized(w, h),
                    ..
                } => {
                    let size = (w.max(1) as u32, h.max(1) as u32);
                    rasterizer.resize(size);
                    engine.apply(Control::Resize(size.0, size.1));
                }
                Event::KeyDown {
                    keycode: Some(keycode),
                    ..
                } => {
                    if let Some(motion) = camera_motion(keycode) {
                        engine.command(CameraCommand::step(motion));
                    } else if let Some(control) = control(keycode, &engine) {
                        engine.apply(control);
                    }
                }
                Event::MouseMotion {
                    mousestate,
                    xrel,
                    yrel,
                    ..
                } if mousestate.left() => engine.drag(xrel as f32, yrel as f32),
                _ => {}
            }
        }

        let mut loaded = false;
        if let Some(receiver) = &images {
            loop {
                match receiver.try_recv() {
                    Ok(image) => {
                        if let Err(err) = engine.bind_texture(image.slot, image.bitmap) {
                            log::error!("{}", err);
                        }
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        loaded = true;
                        break;
                    }
                }
            }
        }
        if loaded {
            images = None;
        }

        engine.tick(start.elapsed());
        let stats = engine.render(&mut rasterizer)?;
        window.set_title(&format!("henhouse{}", stats))?;
    }

    Ok(())
}
