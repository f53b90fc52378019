use glam::{Vec2, Vec3};

use winit::event::MouseButton;
use winit::keyboard::{KeyCode, ModifiersState};

use crate::camera::OrbitCamera;
use crate::direction::Direction;
use crate::render::{CameraParams, LightParams};
use crate::sim::Simulation;

/// What a pressed key asks the application to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Move(Direction),
    ToggleInspector,
}

/// Maps a pressed key to an action.
///
/// The inspector chord is claimed before movement so Ctrl+I never reaches
/// the cube. Arrows keep moving with other modifiers held.
pub fn classify_key(key: KeyCode, modifiers: ModifiersState) -> Option<KeyAction> {
    if modifiers.control_key() && key == KeyCode::KeyI {
        return Some(KeyAction::ToggleInspector);
    }
    let direction = match key {
        KeyCode::ArrowUp => Direction::North,
        KeyCode::ArrowDown => Direction::South,
        KeyCode::ArrowRight => Direction::East,
        KeyCode::ArrowLeft => Direction::West,
        _ => return None,
    };
    Some(KeyAction::Move(direction))
}

/// Periodic diagnostics readout, toggled at runtime with Ctrl+I.
#[derive(Debug, Default)]
pub struct Inspector {
    enabled: bool,
    elapsed: f32,
    frames: u32,
}

impl Inspector {
    /// Flips the inspector and returns the new state. Counters restart
    /// from zero on every flip.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.elapsed = 0.0;
        self.frames = 0;
        self.enabled
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Accumulates frame time and emits one readout line per second.
    pub fn tick(&mut self, delta: f32, sim: &Simulation, camera: &OrbitCamera) -> Option<String> {
        if !self.enabled {
            return None;
        }
        self.frames += 1;
        self.elapsed += delta;
        if self.elapsed < 1.0 {
            return None;
        }
        let fps = self.frames as f32 / self.elapsed;
        let pos = sim.cube.position;
        let line = format!(
            "{fps:.0} fps | cube ({:.2}, {:.2}, {:.2}) | {} coins left | camera {:.1}",
            pos.x,
            pos.y,
            pos.z,
            sim.coins.len(),
            camera.distance()
        );
        self.elapsed = 0.0;
        self.frames = 0;
        Some(line)
    }
}

/// A cursor movement attributed to whichever mouse button is held.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerDrag {
    Rotate(Vec2),
    Pan(Vec2),
}

/// Tracks mouse buttons and turns cursor motion into orbit gestures.
#[derive(Debug, Default)]
pub struct PointerState {
    rotating: bool,
    panning: bool,
    last: Option<Vec2>,
}

impl PointerState {
    pub fn set_button(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.rotating = pressed,
            MouseButton::Right => self.panning = pressed,
            _ => {}
        }
        if !self.rotating && !self.panning {
            self.last = None;
        }
    }

    /// Reports the drag since the previous cursor position, if a button
    /// is held. The first motion after a press only anchors the cursor.
    pub fn moved(&mut self, x: f64, y: f64) -> Option<PointerDrag> {
        if !self.rotating && !self.panning {
            return None;
        }
        let current = Vec2::new(x as f32, y as f32);
        let delta = match self.last {
            Some(last) => current - last,
            None => Vec2::ZERO,
        };
        self.last = Some(current);
        if delta == Vec2::ZERO {
            return None;
        }
        // Rotation wins when both buttons are down.
        if self.rotating {
            Some(PointerDrag::Rotate(delta))
        } else {
            Some(PointerDrag::Pan(delta))
        }
    }
}

pub fn camera_params(camera: &OrbitCamera) -> CameraParams {
    CameraParams {
        view_proj: camera.view_proj(),
        position: camera.position(),
    }
}

/// Fixed scene lighting: one warm-white sun high over the corner plus a
/// half-strength ambient fill.
pub fn scene_light() -> LightParams {
    LightParams {
        direction: Vec3::new(5.0, 10.0, 5.0),
        color: Vec3::ONE,
        intensity: 1.0,
        ambient: 0.5,
    }
}

pub fn print_final_state(sim: &Simulation, moves_accepted: u32, chimes: u64) {
    let pos = sim.cube.position;
    println!("Final state:");
    println!(" - cube pos=({:.2}, {:.2}, {:.2})", pos.x, pos.y, pos.z);
    println!(" - moves accepted: {moves_accepted}");
    println!(" - coins remaining: {}", sim.coins.len());
    println!(" - chimes played: {chimes}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimParams;

    #[test]
    fn arrows_map_to_compass_moves() {
        let none = ModifiersState::empty();
        assert_eq!(
            classify_key(KeyCode::ArrowUp, none),
            Some(KeyAction::Move(Direction::North))
        );
        assert_eq!(
            classify_key(KeyCode::ArrowDown, none),
            Some(KeyAction::Move(Direction::South))
        );
        assert_eq!(
            classify_key(KeyCode::ArrowRight, none),
            Some(KeyAction::Move(Direction::East))
        );
        assert_eq!(
            classify_key(KeyCode::ArrowLeft, none),
            Some(KeyAction::Move(Direction::West))
        );
        assert_eq!(classify_key(KeyCode::Space, none), None);
    }

    #[test]
    fn ctrl_i_toggles_the_inspector_instead_of_moving() {
        assert_eq!(
            classify_key(KeyCode::KeyI, ModifiersState::CONTROL),
            Some(KeyAction::ToggleInspector)
        );
        assert_eq!(classify_key(KeyCode::KeyI, ModifiersState::empty()), None);
        // Holding Ctrl does not swallow arrow moves.
        assert_eq!(
            classify_key(KeyCode::ArrowUp, ModifiersState::CONTROL),
            Some(KeyAction::Move(Direction::North))
        );
    }

    #[test]
    fn inspector_reports_once_per_second() {
        let sim = Simulation::new(SimParams::default(), 0);
        let camera = OrbitCamera::new(1280, 720);
        let mut inspector = Inspector::default();
        assert!(inspector.toggle());

        assert!(inspector.tick(0.4, &sim, &camera).is_none());
        assert!(inspector.tick(0.4, &sim, &camera).is_none());
        let line = inspector.tick(0.4, &sim, &camera);
        assert!(line.is_some());
        assert!(line.as_deref().is_some_and(|l| l.contains("coins left")));

        // The counters reset after a report.
        assert!(inspector.tick(0.4, &sim, &camera).is_none());
    }

    #[test]
    fn disabled_inspector_stays_silent() {
        let sim = Simulation::new(SimParams::default(), 0);
        let camera = OrbitCamera::new(1280, 720);
        let mut inspector = Inspector::default();
        assert!(inspector.tick(5.0, &sim, &camera).is_none());
    }

    #[test]
    fn drag_deltas_only_flow_while_a_button_is_held() {
        let mut pointer = PointerState::default();
        assert_eq!(pointer.moved(10.0, 10.0), None);

        pointer.set_button(MouseButton::Left, true);
        assert_eq!(pointer.moved(10.0, 10.0), None);
        assert_eq!(
            pointer.moved(14.0, 7.0),
            Some(PointerDrag::Rotate(Vec2::new(4.0, -3.0)))
        );

        pointer.set_button(MouseButton::Left, false);
        assert_eq!(pointer.moved(20.0, 20.0), None);
    }

    #[test]
    fn right_button_drags_pan_the_camera() {
        let mut pointer = PointerState::default();
        pointer.set_button(MouseButton::Right, true);
        pointer.moved(0.0, 0.0);
        assert_eq!(
            pointer.moved(-2.0, 5.0),
            Some(PointerDrag::Pan(Vec2::new(-2.0, 5.0)))
        );
    }
}
