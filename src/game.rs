use std::mem;

use log::info;
use rand::rngs::StdRng;

use crate::audio::AudioIntent;
use crate::collision::collides;
use crate::constants::*;
use crate::entities::{Asteroid, Bullet, Ship, ShipControls};
use crate::high_scores::HighScoreBoard;
use crate::input::{EdgeDetector, InputState};
use crate::spawn::{spawn_asteroids, wave_size};
use crate::types::Vector2D;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Overlay {
    pub paused: bool,
    pub showing_high_scores: bool,
}

impl Overlay {
    pub fn blocks_play(self) -> bool {
        self.paused || self.showing_high_scores
    }
}

/// Game over carries no overlay, so "paused while game over" cannot be represented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Playing(Overlay),
    GameOver { timer: u32 },
}

#[derive(Default)]
struct InputLatches {
    shoot_button: EdgeDetector,
    shoot_key: EdgeDetector,
    pause: EdgeDetector,
    high_scores: EdgeDetector,
    restart: EdgeDetector,
}

pub struct Game {
    pub ship: Ship,
    pub bullets: Vec<Bullet>,
    pub asteroids: Vec<Asteroid>,
    pub score: u32,
    pub lives: u32,
    mode: Mode,
    high_scores: HighScoreBoard,
    new_high_score: bool,
    show_instructions: bool,
    latches: InputLatches,
    rng: StdRng,
    audio: Vec<AudioIntent>,
}

impl Game {
    pub fn new(high_scores: HighScoreBoard, mut rng: StdRng) -> Self {
        let ship = Ship::centered();
        let asteroids = spawn_asteroids(INITIAL_ASTEROIDS, ship.position, &mut rng);
        Game {
            ship,
            bullets: Vec::new(),
            asteroids,
            score: 0,
            lives: STARTING_LIVES,
            mode: Mode::Playing(Overlay::default()),
            high_scores,
            new_high_score: false,
            show_instructions: true,
            latches: InputLatches::default(),
            rng,
            audio: Vec::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn high_scores(&self) -> &HighScoreBoard {
        &self.high_scores
    }

    pub fn new_high_score(&self) -> bool {
        self.new_high_score
    }

    pub fn show_instructions(&self) -> bool {
        self.show_instructions
    }

    pub fn step(&mut self, input: &InputState) -> Vec<AudioIntent> {
        self.handle_input(input);
        self.update(input);
        mem::take(&mut self.audio)
    }

    fn handle_input(&mut self, input: &InputState) {
        let latches = &mut self.latches;
        let shoot_button = latches.shoot_button.update(input.shoot_button);
        let shoot_key = latches.shoot_key.update(input.shoot_key);
        let pause = latches.pause.update(input.pause);
        let high_scores = latches.high_scores.update(input.high_scores);
        let restart = latches.restart.update(input.restart);

        if let Mode::GameOver { .. } = self.mode {
            if restart.is_pressed() {
                info!("Restart requested.");
                self.restart();
            }
            return;
        }
        let Mode::Playing(overlay) = &mut self.mode else {
            return;
        };

        if high_scores.is_pressed() {
            overlay.showing_high_scores = !overlay.showing_high_scores;
        }
        if pause.is_pressed() {
            overlay.paused = !overlay.paused;
            info!("{}", if overlay.paused { "Paused." } else { "Resumed." });
        }
        if overlay.blocks_play() {
            return;
        }

        let centre = Vector2D::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0);
        if input.aim != centre || input.thrust || input.shoot_button {
            self.show_instructions = false;
        }

        for edge in [shoot_button, shoot_key] {
            if edge.is_pressed() {
                self.shoot();
            }
        }
    }

    fn shoot(&mut self) {
        self.audio.push(AudioIntent::Shoot);
        self.bullets.push(Bullet::new(self.ship.position, self.ship.angle));
    }

    fn update(&mut self, input: &InputState) {
        match self.mode {
            Mode::GameOver { timer } => {
                let timer = timer + 1;
                self.mode = Mode::GameOver { timer };
                if timer >= GAME_OVER_FRAMES {
                    info!("Auto-restarting after game over.");
                    self.restart();
                }
            }
            Mode::Playing(overlay) if overlay.blocks_play() => {}
            Mode::Playing(_) => self.advance(input),
        }
    }

    fn advance(&mut self, input: &InputState) {
        let controls = ShipControls { aim: input.aim, thrust: input.thrust };
        if let Some(intent) = self.ship.update(&controls) {
            self.audio.push(intent);
        }
        self.bullets.retain_mut(|bullet| bullet.update());
        for asteroid in &mut self.asteroids {
            asteroid.update();
        }

        self.resolve_bullet_hits();
        self.resolve_ship_hits();

        if self.asteroids.is_empty() && matches!(self.mode, Mode::Playing(_)) {
            let count = wave_size(self.score);
            info!("Wave cleared, spawning {} asteroids.", count);
            self.asteroids = spawn_asteroids(count, self.ship.position, &mut self.rng);
        }
    }

    // Each bullet destroys at most one asteroid
    fn resolve_bullet_hits(&mut self) {
        let Game { bullets, asteroids, score, rng, .. } = self;
        bullets.retain(|bullet| {
            let Some(index) = asteroids.iter().position(|asteroid| collides(bullet, asteroid)) else {
                return true;
            };
            let asteroid = asteroids.remove(index);
            *score += asteroid.size.points();
            asteroids.extend(asteroid.split(&mut *rng));
            false
        });
    }

    fn resolve_ship_hits(&mut self) {
        if !self.asteroids.iter().any(|asteroid| collides(&self.ship, asteroid)) {
            return;
        }
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.trigger_game_over();
        } else {
            info!("Ship destroyed, {} lives left.", self.lives);
            self.ship.position = Vector2D::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0);
            self.ship.velocity = Vector2D::ZERO;
        }
    }

    fn trigger_game_over(&mut self) {
        info!("Game over with score {}.", self.score);
        if self.high_scores.insert(self.score) {
            info!("New high score: {}", self.score);
            self.new_high_score = true;
        }
        self.audio.push(AudioIntent::StopAll);
        self.audio.push(AudioIntent::MusicStart);
        self.mode = Mode::GameOver { timer: 0 };
    }

    fn restart(&mut self) {
        self.audio.push(AudioIntent::MusicStop);
        self.ship = Ship::centered();
        self.bullets.clear();
        self.asteroids = spawn_asteroids(INITIAL_ASTEROIDS, self.ship.position, &mut self.rng);
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.new_high_score = false;
        self.mode = Mode::Playing(Overlay::default());
    }

    #[cfg(test)]
    pub(crate) fn force_game_over(&mut self) {
        self.trigger_game_over();
    }
}
