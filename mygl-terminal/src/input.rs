/// Mouse and keyboard mapping onto the view state
use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};

use crate::config::ViewerConfig;
use crate::scene::ViewState;

/// What a drag currently does, picked by the button that started it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionMode {
    #[default]
    Idle,
    Rotate,
    Translate,
    Zoom,
}

/// Outcome of a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Quit,
}

/// Tracks the active drag between mouse events
#[derive(Debug, Default)]
pub struct InputState {
    motion: MotionMode,
    start: (u16, u16),
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn motion(&self) -> MotionMode {
        self.motion
    }

    /// Left drag rotates, middle drag pans, right drag zooms; the wheel zooms
    /// too. Deltas are measured in terminal cells.
    pub fn handle_mouse(&mut self, event: MouseEvent, view: &mut ViewState, config: &ViewerConfig) {
        match event.kind {
            MouseEventKind::Down(button) => {
                self.motion = match button {
                    MouseButton::Left => MotionMode::Rotate,
                    MouseButton::Middle => MotionMode::Translate,
                    MouseButton::Right => MotionMode::Zoom,
                };
                self.start = (event.column, event.row);
            }
            MouseEventKind::Up(_) => {
                self.motion = MotionMode::Idle;
            }
            MouseEventKind::Drag(_) => {
                let dx = f64::from(event.column) - f64::from(self.start.0);
                let dy = f64::from(event.row) - f64::from(self.start.1);
                match self.motion {
                    MotionMode::Idle => {}
                    MotionMode::Rotate => {
                        view.angle_y += dx * config.rotate_step;
                        view.angle_x += dy * config.rotate_step;
                    }
                    MotionMode::Translate => {
                        view.distance_x -= dx * config.pan_step;
                        view.distance_y -= dy * config.pan_step;
                    }
                    MotionMode::Zoom => {
                        view.distance_z -= dy * config.zoom_step;
                    }
                }
                self.start = (event.column, event.row);
            }
            MouseEventKind::ScrollUp => view.distance_z -= config.zoom_step,
            MouseEventKind::ScrollDown => view.distance_z += config.zoom_step,
            _ => {}
        }
    }
}

/// Arrow keys rotate one step, `+`/`-` zoom, `r` restores the default view.
pub fn handle_key(code: KeyCode, view: &mut ViewState, config: &ViewerConfig) -> KeyAction {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => return KeyAction::Quit,
        KeyCode::Up => view.angle_x -= config.rotate_step,
        KeyCode::Down => view.angle_x += config.rotate_step,
        KeyCode::Left => view.angle_y -= config.rotate_step,
        KeyCode::Right => view.angle_y += config.rotate_step,
        KeyCode::Char('+') | KeyCode::Char('=') => view.distance_z -= config.zoom_step,
        KeyCode::Char('-') => view.distance_z += config.zoom_step,
        KeyCode::Char('r') => {
            tracing::debug!("resetting view");
            view.reset();
        }
        _ => {}
    }
    KeyAction::Continue
}
