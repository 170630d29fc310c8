use std::io::{self, Write};
use log::info;
use crossterm::{
    cursor::MoveTo,
    execute,
};

use crate::constants::{GAME_OVER_FRAMES, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::game::{Game, Mode};
use crate::types::Vector2D;

// --- ScreenBuffer for simulated rendering ---
pub struct ScreenBuffer {
    pub buffer: Vec<Vec<char>>,
    pub width: u16,
    pub height: u16,
    pub cursor_x: u16,
    pub cursor_y: u16,
}

impl ScreenBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        ScreenBuffer {
            buffer: vec![vec![' '; width as usize]; height as usize],
            width,
            height,
            cursor_x: 0,
            cursor_y: 0,
        }
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    pub fn write_str(&mut self, s: &str) {
        for c in s.chars() {
            if self.cursor_y < self.height && self.cursor_x < self.width {
                self.buffer[self.cursor_y as usize][self.cursor_x as usize] = c;
            }
            self.cursor_x = self.cursor_x.saturating_add(1);
        }
    }

    pub fn row(&self, y: u16) -> String {
        self.buffer[y as usize].iter().collect()
    }

    pub fn print_to_log(&self) {
        info!("--- Screen Buffer ---");
        for y in 0..self.height {
            info!("{}", self.row(y));
        }
        info!("---------------------");
    }
}

// --- OutputTarget enum to handle stdout or ScreenBuffer ---
pub enum OutputTarget {
    Stdout(io::Stdout),
    ScreenBuffer(ScreenBuffer),
}

impl OutputTarget {
    pub fn execute_move_to(&mut self, command: MoveTo) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => execute!(s, command),
            OutputTarget::ScreenBuffer(sb) => {
                sb.move_to(command.0, command.1);
                Ok(())
            },
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputTarget::Stdout(s) => s.write(buf),
            OutputTarget::ScreenBuffer(sb) => {
                let s = String::from_utf8_lossy(buf);
                sb.write_str(&s);
                Ok(buf.len())
            },
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => s.flush(),
            OutputTarget::ScreenBuffer(_) => Ok(()),
        }
    }
}

// --- Drawing surface ---

pub trait Canvas {
    fn plot(&mut self, point: Vector2D, glyph: char);
    fn line(&mut self, from: Vector2D, to: Vector2D, glyph: char);
    fn text(&mut self, at: Vector2D, text: &str);
    fn text_centered(&mut self, y: f64, text: &str);

    fn dot(&mut self, point: Vector2D, glyph: char) {
        self.plot(point, glyph);
    }

    fn polygon(&mut self, points: &[Vector2D], glyph: char) {
        for (i, &from) in points.iter().enumerate() {
            let to = points[(i + 1) % points.len()];
            self.line(from, to, glyph);
        }
    }
}

// --- GameGrid for geometric rendering ---
pub struct GameGrid {
    pub grid: Vec<Vec<char>>,
    pub width: u16,
    pub height: u16,
}

impl GameGrid {
    pub fn new(width: u16, height: u16) -> Self {
        GameGrid {
            grid: vec![vec![' '; width as usize]; height as usize],
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        *self = GameGrid::new(width, height);
    }

    pub fn set_char(&mut self, x: i32, y: i32, c: char) {
        if x >= 0 && y >= 0 && (y as usize) < self.height as usize && (x as usize) < self.width as usize {
            self.grid[y as usize][x as usize] = c;
        }
    }

    pub fn clear(&mut self) {
        for row in &mut self.grid {
            row.fill(' ');
        }
    }

    fn to_cell(&self, point: Vector2D) -> (i32, i32) {
        (
            (point.x * self.width as f64 / SCREEN_WIDTH).floor() as i32,
            (point.y * self.height as f64 / SCREEN_HEIGHT).floor() as i32,
        )
    }

    pub fn render(&self, stdout: &mut OutputTarget) -> io::Result<()> {
        for y in 0..self.height {
            stdout.execute_move_to(MoveTo(0, y))?;
            write!(stdout, "{}", self.grid[y as usize].iter().collect::<String>())?;
        }
        Ok(())
    }
}

impl Canvas for GameGrid {
    fn plot(&mut self, point: Vector2D, glyph: char) {
        let (x, y) = self.to_cell(point);
        self.set_char(x, y, glyph);
    }

    // Bresenham in cell space; off-grid cells are clipped
    fn line(&mut self, from: Vector2D, to: Vector2D, glyph: char) {
        let (mut x0, mut y0) = self.to_cell(from);
        let (x1, y1) = self.to_cell(to);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let step_x = if x0 < x1 { 1 } else { -1 };
        let step_y = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.set_char(x0, y0, glyph);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let doubled = 2 * err;
            if doubled >= dy {
                err += dy;
                x0 += step_x;
            }
            if doubled <= dx {
                err += dx;
                y0 += step_y;
            }
        }
    }

    fn text(&mut self, at: Vector2D, text: &str) {
        let (x, y) = self.to_cell(at);
        for (i, c) in text.chars().enumerate() {
            self.set_char(x + i as i32, y, c);
        }
    }

    fn text_centered(&mut self, y: f64, text: &str) {
        let (_, row) = self.to_cell(Vector2D::new(0.0, y));
        let start = (self.width as i32 - text.chars().count() as i32) / 2;
        for (i, c) in text.chars().enumerate() {
            self.set_char(start + i as i32, row, c);
        }
    }
}

// --- Frame composition ---

const SHIP_GLYPH: char = '#';
const ASTEROID_GLYPH: char = 'o';
const BULLET_GLYPH: char = '*';
const DIM_GLYPH: char = '.';

const INSTRUCTIONS: [&str; 4] = [
    "Mouse: Point to Aim",
    "Left Click: Thrust | Right Click: Shoot",
    "ENTER: Pause | H: High Scores",
    "Move mouse to start",
];

pub fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Whole seconds left before the automatic restart, rounded up.
pub fn seconds_until_restart(timer: u32) -> u32 {
    GAME_OVER_FRAMES.saturating_sub(timer) / 60 + 1
}

fn draw_entities(game: &Game, canvas: &mut impl Canvas, dimmed: bool) {
    let glyph = |normal| if dimmed { DIM_GLYPH } else { normal };
    game.ship.draw(canvas, glyph(SHIP_GLYPH));
    for bullet in &game.bullets {
        bullet.draw(canvas, glyph(BULLET_GLYPH));
    }
    for asteroid in &game.asteroids {
        asteroid.draw(canvas, glyph(ASTEROID_GLYPH));
    }
}

fn draw_game_over(game: &Game, canvas: &mut impl Canvas, timer: u32) {
    let top = SCREEN_HEIGHT / 2.0 - 100.0;
    canvas.text_centered(top, "GAME OVER");
    canvas.text_centered(top + 80.0, &format!("Final Score: {}", game.score));
    if game.new_high_score() {
        canvas.text_centered(top + 120.0, "NEW HIGH SCORE!");
    }
    let restart_y = SCREEN_HEIGHT - 100.0;
    canvas.text_centered(restart_y, "Press R to restart or wait for auto-restart");
    canvas.text_centered(restart_y + 30.0, &format!("Auto-restart in: {}s", seconds_until_restart(timer)));
}

fn draw_hud(game: &Game, canvas: &mut impl Canvas) {
    canvas.text(Vector2D::new(10.0, 10.0), &format!("Score: {}", game.score));
    canvas.text(Vector2D::new(10.0, 50.0), &format!("Lives: {}", game.lives));
    let best = game.high_scores().best();
    if best > 0 {
        canvas.text(Vector2D::new(10.0, 90.0), &format!("High Score: {}", best));
    }
    if game.new_high_score() {
        canvas.text_centered(150.0, "NEW HIGH SCORE!");
    }
}

fn draw_high_score_table(game: &Game, canvas: &mut impl Canvas) {
    let title_y = 100.0;
    canvas.text_centered(title_y, "HIGH SCORES");
    for (i, &score) in game.high_scores().entries().iter().enumerate() {
        if score > 0 {
            let rank_y = title_y + 50.0 + i as f64 * 25.0;
            canvas.text_centered(rank_y, &format!("{:2}. {}", i + 1, group_thousands(score)));
        }
    }
    canvas.text_centered(title_y + 50.0 + 10.0 * 25.0 + 20.0, "Press H to close");
}

fn draw_pause(canvas: &mut impl Canvas) {
    let y = SCREEN_HEIGHT / 2.0;
    canvas.text_centered(y, "PAUSED");
    canvas.text_centered(y + 50.0, "Press ENTER to resume");
}

fn draw_instructions(canvas: &mut impl Canvas) {
    for (i, line) in INSTRUCTIONS.iter().enumerate() {
        canvas.text_centered(SCREEN_HEIGHT / 2.0 + i as f64 * 40.0, line);
    }
}

pub fn draw_frame(game: &Game, canvas: &mut impl Canvas) {
    let overlay = match game.mode() {
        Mode::GameOver { timer } => {
            draw_entities(game, canvas, true);
            draw_game_over(game, canvas, timer);
            return;
        }
        Mode::Playing(overlay) => overlay,
    };

    if !overlay.showing_high_scores {
        draw_entities(game, canvas, false);
    }
    draw_hud(game, canvas);

    if overlay.showing_high_scores {
        draw_high_score_table(game, canvas);
    } else if overlay.paused {
        draw_pause(canvas);
    } else if game.show_instructions() {
        draw_instructions(canvas);
    }
}
