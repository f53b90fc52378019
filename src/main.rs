use std::env;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use glam::Vec3;
use log::{info, warn};
use pollster::block_on;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::window::{Window, WindowId};

use tumble::app::{self, Inspector, KeyAction, PointerDrag, PointerState};
use tumble::sim::COIN_HEIGHT;
use tumble::{
    Chime, Coin, Direction, FrameEvents, OrbitCamera, Renderer, SceneSnapshot, SimParams,
    Simulation,
};

const WINDOW_TITLE: &str = "Tumble";

/// Frame interval used when stepping without a window.
const HEADLESS_DT: f32 = 1.0 / 60.0;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = CliOptions::parse()?;
    let seed = options.seed.unwrap_or_else(rand::random);

    let mut sim = Simulation::new(SimParams::default(), seed);
    if !options.coins.is_empty() {
        sim.coins = placed_coins(&options.coins);
    }

    println!("Scattered {} coins (seed {seed})", sim.coins.len());
    for coin in &sim.coins {
        println!(
            " - coin {} at ({:.2}, {:.2})",
            coin.id,
            coin.position.x,
            coin.position.z
        );
    }

    let chime =
        Chime::new(options.dev_asset().as_deref()).context("failed to load the pickup chime")?;

    if let Some(moves) = options.simulate.clone() {
        return run_scripted(sim, chime, &moves, options.frames);
    }
    if options.headless {
        return run_scripted(sim, chime, &[], options.frames);
    }

    let fallback_sim = sim.clone();
    match run_windowed(sim, chime) {
        Ok(()) => Ok(()),
        Err(err) => {
            if err.downcast_ref::<WindowInitError>().is_some() {
                eprintln!(
                    "{err}. Falling back to --headless mode (set DISPLAY or install X11 libs to enable rendering)."
                );
                let chime = Chime::new(options.dev_asset().as_deref())
                    .context("failed to load the pickup chime")?;
                run_scripted(fallback_sim, chime, &[], options.frames)
            } else {
                Err(err)
            }
        }
    }
}

fn run_scripted(
    mut sim: Simulation,
    mut chime: Chime,
    moves: &[Direction],
    frames: u32,
) -> Result<()> {
    let mut accepted = 0;
    for (index, &direction) in moves.iter().enumerate() {
        if sim.try_roll(direction) {
            accepted += 1;
        } else {
            println!(
                "move {} ({}) rejected at the boundary",
                index + 1,
                direction.name()
            );
        }
        let events = sim.settle(HEADLESS_DT);
        play_pickups(&mut chime, &events);
    }

    // Idle frames let coins that spawned against the cube get collected.
    for _ in 0..frames {
        let events = sim.step(HEADLESS_DT);
        play_pickups(&mut chime, &events);
    }

    app::print_final_state(&sim, accepted, chime.generation());
    Ok(())
}

fn run_windowed(sim: Simulation, chime: Chime) -> Result<()> {
    let event_loop =
        EventLoop::new().map_err(|err| WindowInitError::from_error("event loop", err))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut state = AppState::new(sim, chime);
    event_loop.run_app(&mut state).context("event loop failed")?;

    if let Some(err) = state.last_error.take() {
        return Err(err);
    }

    app::print_final_state(&state.sim, state.moves_accepted, state.chime.generation());
    Ok(())
}

fn play_pickups(chime: &mut Chime, events: &FrameEvents) {
    for id in &events.picked {
        info!("picked up coin {id}");
        chime.trigger();
    }
}

fn placed_coins(coords: &[(f32, f32)]) -> Vec<Coin> {
    coords
        .iter()
        .enumerate()
        .map(|(id, &(x, z))| Coin {
            id: id as u32,
            position: Vec3::new(x, COIN_HEIGHT, z),
            spin: 0.0,
        })
        .collect()
}

struct AppState {
    sim: Simulation,
    chime: Chime,
    renderer: Option<Renderer>,
    camera: Option<OrbitCamera>,
    pointer: PointerState,
    inspector: Inspector,
    modifiers: ModifiersState,
    last_frame: Instant,
    moves_accepted: u32,
    last_error: Option<anyhow::Error>,
}

impl AppState {
    fn new(sim: Simulation, chime: Chime) -> Self {
        Self {
            sim,
            chime,
            renderer: None,
            camera: None,
            pointer: PointerState::default(),
            inspector: Inspector::default(),
            modifiers: ModifiersState::empty(),
            last_frame: Instant::now(),
            moves_accepted: 0,
            last_error: None,
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(1280.0, 720.0));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .map_err(|err| WindowInitError::from_error("window", err))?,
        );
        let size = window.inner_size();
        let renderer = block_on(Renderer::new(Arc::clone(&window)))?;
        self.camera = Some(OrbitCamera::new(size.width, size.height));
        self.renderer = Some(renderer);
        self.last_frame = Instant::now();
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match app::classify_key(code, self.modifiers) {
            Some(KeyAction::ToggleInspector) => {
                let enabled = self.inspector.toggle();
                info!("inspector {}", if enabled { "on" } else { "off" });
                if !enabled {
                    if let Some(renderer) = self.renderer.as_ref() {
                        renderer.window().set_title(WINDOW_TITLE);
                    }
                }
            }
            Some(KeyAction::Move(direction)) => {
                if self.sim.try_roll(direction) {
                    self.moves_accepted += 1;
                }
            }
            None => {}
        }
    }

    fn redraw(&mut self) -> Result<()> {
        let now = Instant::now();
        // Long stalls (window drags, suspends) step at most a tenth of a second.
        let delta = (now - self.last_frame).as_secs_f32().min(0.1);
        self.last_frame = now;

        let events = self.sim.step(delta);
        play_pickups(&mut self.chime, &events);

        let Some(camera) = self.camera.as_mut() else {
            return Ok(());
        };
        camera.update(delta);

        if let Some(line) = self.inspector.tick(delta, &self.sim, camera) {
            info!("{line}");
            if let Some(renderer) = self.renderer.as_ref() {
                let title = format!("{WINDOW_TITLE} | {line}");
                renderer.window().set_title(&title);
            }
        }

        let snapshot = SceneSnapshot::build(&self.sim);
        let camera_params = app::camera_params(camera);
        let light = app::scene_light();

        let Some(renderer) = self.renderer.as_mut() else {
            return Ok(());
        };
        renderer.update_globals(&camera_params, &light);
        match renderer.render(&snapshot) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = renderer.window().inner_size();
                renderer.resize(size);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(anyhow!("GPU is out of memory"));
            }
            Err(err) => {
                warn!("surface error: {err}; retrying next frame");
            }
        }
        Ok(())
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }
        if let Err(err) = self.init_window(event_loop) {
            self.last_error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        match self.renderer.as_ref() {
            Some(renderer) if renderer.window_id() == window_id => {}
            _ => return,
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size);
                }
                if let Some(camera) = self.camera.as_mut() {
                    camera.set_aspect(size.width, size.height);
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => self.handle_key(code),
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = state == ElementState::Pressed;
                self.pointer.set_button(button, pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let drag = self.pointer.moved(position.x, position.y);
                if let Some(camera) = self.camera.as_mut() {
                    match drag {
                        Some(PointerDrag::Rotate(delta)) => camera.rotate(delta.x, delta.y),
                        Some(PointerDrag::Pan(delta)) => camera.pan(delta.x, delta.y),
                        None => {}
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32 / 50.0,
                };
                if let Some(camera) = self.camera.as_mut() {
                    camera.zoom(steps);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw() {
                    self.last_error = Some(err);
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(renderer) = self.renderer.as_ref() {
            renderer.window().request_redraw();
        }
    }
}

#[derive(Debug)]
struct WindowInitError {
    message: String,
}

impl WindowInitError {
    fn from_error(stage: &str, err: impl fmt::Display) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {err}"),
        }
    }
}

impl fmt::Display for WindowInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for WindowInitError {}

struct CliOptions {
    simulate: Option<Vec<Direction>>,
    seed: Option<u64>,
    frames: u32,
    coins: Vec<(f32, f32)>,
    dev: bool,
    headless: bool,
}

impl CliOptions {
    fn parse() -> Result<Self> {
        let mut simulate = None;
        let mut seed = None;
        let mut frames = 1;
        let mut coins = Vec::new();
        let mut dev = env::var("TUMBLE_ENV").is_ok_and(|value| value == "development");
        let mut headless = false;

        let mut args = env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--simulate" => {
                    let list = args
                        .next()
                        .ok_or_else(|| anyhow!("--simulate needs a comma separated move list"))?;
                    simulate = Some(parse_moves(&list)?);
                }
                "--seed" => {
                    let value = args.next().ok_or_else(|| anyhow!("--seed needs a number"))?;
                    seed = Some(
                        value
                            .parse()
                            .with_context(|| format!("invalid seed {value:?}"))?,
                    );
                }
                "--frames" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--frames needs a number"))?;
                    frames = value
                        .parse()
                        .with_context(|| format!("invalid frame count {value:?}"))?;
                }
                "--coin" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--coin needs X,Z coordinates"))?;
                    coins.push(parse_coin(&value)?);
                }
                "--dev" => dev = true,
                "--headless" => headless = true,
                other => {
                    return Err(anyhow!(
                        "Unknown argument: {other}. Usage: tumble [--simulate MOVES] [--seed N] [--frames N] [--coin X,Z] [--dev] [--headless]"
                    ));
                }
            }
        }
        Ok(Self {
            simulate,
            seed,
            frames,
            coins,
            dev,
            headless,
        })
    }

    fn dev_asset(&self) -> Option<PathBuf> {
        self.dev.then(|| PathBuf::from("assets/coin.wav"))
    }
}

fn parse_moves(list: &str) -> Result<Vec<Direction>> {
    list.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| Direction::from_name(token).ok_or_else(|| anyhow!("unknown move {token:?}")))
        .collect()
}

fn parse_coin(value: &str) -> Result<(f32, f32)> {
    let (x, z) = value
        .split_once(',')
        .ok_or_else(|| anyhow!("--coin expects X,Z, got {value:?}"))?;
    let (x, z) = (x.trim(), z.trim());
    let x = x.parse().with_context(|| format!("invalid coin x {x:?}"))?;
    let z = z.parse().with_context(|| format!("invalid coin z {z:?}"))?;
    Ok((x, z))
}
