use glam::{Mat4, Vec3};

const HOME_POSITION: Vec3 = Vec3::new(0.0, 8.0, 12.0);
const HOME_FOCUS: Vec3 = Vec3::new(0.0, 0.5, 0.0);

const MIN_DISTANCE: f32 = 5.0;
const MAX_DISTANCE: f32 = 15.0;
const MIN_PITCH: f32 = 0.05;
const MAX_PITCH: f32 = 1.55;

const FOV_Y_DEGREES: f32 = 60.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;

const ROTATE_SENSITIVITY: f32 = 0.005;
const PAN_SENSITIVITY: f32 = 0.0015;
const ZOOM_SCALE: f32 = 0.9;
const DAMPING: f32 = 8.0;

/// Orbit rig around a focus point.
///
/// Window agnostic: the host feeds pointer deltas and wheel steps, the
/// camera yields the view-projection matrix. Motion eases toward the
/// requested pose instead of jumping to it.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    focus: Vec3,
    yaw: f32,
    pitch: f32,
    distance: f32,
    target_yaw: f32,
    target_pitch: f32,
    target_distance: f32,
    aspect: f32,
}

impl OrbitCamera {
    /// Camera at the home position, looking slightly down at the cube.
    pub fn new(width: u32, height: u32) -> Self {
        let offset = HOME_POSITION - HOME_FOCUS;
        let distance = offset.length();
        let yaw = offset.x.atan2(offset.z);
        let pitch = (offset.y / distance).asin();
        Self {
            focus: HOME_FOCUS,
            yaw,
            pitch,
            distance,
            target_yaw: yaw,
            target_pitch: pitch,
            target_distance: distance,
            aspect: aspect_of(width, height),
        }
    }

    /// Recomputes the aspect ratio after a window resize.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = aspect_of(width, height);
    }

    /// Orbits by a pointer drag, in pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.target_yaw -= dx * ROTATE_SENSITIVITY;
        self.target_pitch =
            (self.target_pitch + dy * ROTATE_SENSITIVITY).clamp(MIN_PITCH, MAX_PITCH);
    }

    /// Shifts the focus point by a pointer drag, in pixels.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let scale = self.distance * PAN_SENSITIVITY;
        let right = Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin());
        self.focus += right * (-dx * scale) + Vec3::Y * (dy * scale);
    }

    /// Dollies in (positive steps) or out, clamped to the allowed range.
    pub fn zoom(&mut self, steps: f32) {
        self.target_distance =
            (self.target_distance * ZOOM_SCALE.powf(steps)).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Eases the pose toward its targets.
    pub fn update(&mut self, delta: f32) {
        let t = 1.0 - (-DAMPING * delta).exp();
        self.yaw += (self.target_yaw - self.yaw) * t;
        self.pitch += (self.target_pitch - self.pitch) * t;
        self.distance += (self.target_distance - self.distance) * t;
    }

    pub fn position(&self) -> Vec3 {
        let offset = Vec3::new(
            self.distance * self.pitch.cos() * self.yaw.sin(),
            self.distance * self.pitch.sin(),
            self.distance * self.pitch.cos() * self.yaw.cos(),
        );
        self.focus + offset
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Combined view-projection matrix for the current pose.
    pub fn view_proj(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.position(), self.focus, Vec3::Y);
        let proj = Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), self.aspect, NEAR, FAR);
        proj * view
    }
}

fn aspect_of(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> OrbitCamera {
        OrbitCamera::new(1280, 720)
    }

    #[test]
    fn starts_at_the_home_position() {
        let camera = camera();
        let position = camera.position();
        assert!((position - HOME_POSITION).length() < 1e-4);
    }

    #[test]
    fn zoom_clamps_at_both_ends() {
        let mut camera = camera();
        camera.zoom(500.0);
        camera.update(10.0);
        assert!((camera.distance() - MIN_DISTANCE).abs() < 1e-3);

        camera.zoom(-500.0);
        camera.update(10.0);
        assert!((camera.distance() - MAX_DISTANCE).abs() < 1e-3);
    }

    #[test]
    fn pitch_never_dips_below_the_floor_plane() {
        let mut camera = camera();
        camera.rotate(0.0, -1e6);
        camera.update(10.0);
        assert!(camera.position().y > camera.focus.y);
    }

    #[test]
    fn damping_approaches_the_target_without_overshoot() {
        let mut camera = camera();
        camera.zoom(500.0);
        let mut previous = camera.distance();
        for _ in 0..200 {
            camera.update(1.0 / 60.0);
            assert!(camera.distance() <= previous + 1e-6);
            previous = camera.distance();
        }
        assert!((camera.distance() - MIN_DISTANCE).abs() < 1e-2);
    }

    #[test]
    fn resize_updates_the_aspect_ratio() {
        let mut camera = camera();
        camera.set_aspect(200, 100);
        assert_eq!(camera.aspect(), 2.0);
        camera.set_aspect(100, 0);
        assert_eq!(camera.aspect(), 100.0);
    }

    #[test]
    fn panning_moves_the_focus_not_the_orbit() {
        let mut camera = camera();
        let distance_before = camera.distance();
        camera.pan(120.0, 0.0);
        camera.update(10.0);
        assert!(camera.focus.distance(HOME_FOCUS) > 0.0);
        assert!((camera.distance() - distance_before).abs() < 1e-5);
    }
}
