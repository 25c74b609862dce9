//! Free-fly camera controls.
//!
//! W/A/S/D move along the view plane, R/F move up and down, and holding the
//! right mouse button turns the view with the mouse.

use std::collections::HashSet;

use lumen_math::Camera;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

/// Keyboard and mouse state driving a `Camera`.
#[derive(Debug, Clone)]
pub struct FlyController {
    /// World units per second
    pub move_speed: f32,
    /// Radians per pixel of mouse travel
    pub look_sensitivity: f32,
    keys: HashSet<KeyCode>,
    looking: bool,
    last_cursor: Option<(f64, f64)>,
}

impl Default for FlyController {
    fn default() -> Self {
        Self::new(30.0, 0.003)
    }
}

impl FlyController {
    pub fn new(move_speed: f32, look_sensitivity: f32) -> Self {
        Self {
            move_speed,
            look_sensitivity,
            keys: HashSet::new(),
            looking: false,
            last_cursor: None,
        }
    }

    pub fn key(&mut self, code: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.keys.insert(code);
            }
            ElementState::Released => {
                self.keys.remove(&code);
            }
        }
    }

    pub fn mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Right {
            self.looking = state == ElementState::Pressed;
            if !self.looking {
                self.last_cursor = None;
            }
        }
    }

    /// Turn the camera while the right button is held. Returns true if it turned.
    pub fn cursor_moved(&mut self, camera: &mut Camera, position: (f64, f64)) -> bool {
        if !self.looking {
            return false;
        }
        let Some(last) = self.last_cursor.replace(position) else {
            return false;
        };

        let dx = (position.0 - last.0) as f32;
        let dy = (position.1 - last.1) as f32;
        if dx == 0.0 && dy == 0.0 {
            return false;
        }
        camera.rotate(-dx * self.look_sensitivity, -dy * self.look_sensitivity);
        true
    }

    /// Apply held movement keys for `delta_time` seconds. Returns true if
    /// the camera moved.
    pub fn update(&self, camera: &mut Camera, delta_time: f32) -> bool {
        let (right, up, forward) = self.axes();
        if (right, up, forward) == (0.0, 0.0, 0.0) {
            return false;
        }
        camera.translate_local(right, up, forward, self.move_speed * delta_time);
        true
    }

    fn axes(&self) -> (f32, f32, f32) {
        let axis = |pos: KeyCode, neg: KeyCode| {
            let mut v = 0.0;
            if self.keys.contains(&pos) {
                v += 1.0;
            }
            if self.keys.contains(&neg) {
                v -= 1.0;
            }
            v
        };
        (
            axis(KeyCode::KeyD, KeyCode::KeyA),
            axis(KeyCode::KeyR, KeyCode::KeyF),
            axis(KeyCode::KeyW, KeyCode::KeyS),
        )
    }
}
