use std::io;

use crate::constants::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::types::Vector2D;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Idle,
    Pressed,
    Held,
    Released,
}

impl Edge {
    pub fn is_pressed(self) -> bool {
        self == Edge::Pressed
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct EdgeDetector {
    previous: bool,
}

impl EdgeDetector {
    pub fn update(&mut self, current: bool) -> Edge {
        let edge = match (self.previous, current) {
            (false, false) => Edge::Idle,
            (false, true) => Edge::Pressed,
            (true, true) => Edge::Held,
            (true, false) => Edge::Released,
        };
        self.previous = current;
        edge
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputState {
    pub aim: Vector2D,
    pub thrust: bool,
    pub shoot_button: bool,
    pub shoot_key: bool,
    pub pause: bool,
    pub high_scores: bool,
    pub restart: bool,
    pub quit: bool,
    /// New terminal size in cells, if it changed this frame.
    pub resized: Option<(u16, u16)>,
}

impl Default for InputState {
    fn default() -> Self {
        InputState {
            aim: Vector2D::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0),
            thrust: false,
            shoot_button: false,
            shoot_key: false,
            pause: false,
            high_scores: false,
            restart: false,
            quit: false,
            resized: None,
        }
    }
}

pub trait InputSource {
    fn poll(&mut self, frame: u64) -> io::Result<InputState>;
}
