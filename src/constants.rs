// --- Field ---
pub const SCREEN_WIDTH: f64 = 800.0;
pub const SCREEN_HEIGHT: f64 = 600.0;
pub const FPS: u64 = 60;

// --- Ship ---
pub const SHIP_RADIUS: f64 = 10.0;
pub const SHIP_THRUST_POWER: f64 = 0.3;
pub const SHIP_MAX_SPEED: f64 = 8.0;
pub const SHIP_FRICTION: f64 = 0.98;
pub const SHIP_ROTATION_STEP: f64 = 8.0; // Degrees per frame

// --- Bullets ---
pub const BULLET_SPEED: f64 = 10.0;
pub const BULLET_LIFETIME: u32 = 60; // Frames
pub const BULLET_RADIUS: f64 = 2.0;

// --- Asteroids ---
pub const ASTEROID_MIN_SPEED: f64 = 1.0;
pub const ASTEROID_MAX_SPEED: f64 = 3.0;
pub const ASTEROID_MAX_ROTATION_SPEED: f64 = 3.0; // Degrees per frame, either direction
pub const ASTEROID_VERTICES: usize = 8;
pub const ASTEROID_JITTER: f64 = 0.2; // +/- fraction of radius per vertex

// --- Spawning ---
pub const INITIAL_ASTEROIDS: usize = 5;
pub const MAX_WAVE_ASTEROIDS: usize = 10;
pub const WAVE_SCORE_STEP: u32 = 1000; // One extra asteroid per this many points
pub const SPAWN_SAFE_DISTANCE: f64 = 100.0;
pub const SPAWN_MAX_ATTEMPTS: u32 = 1000;

// --- Rules ---
pub const STARTING_LIVES: u32 = 3;
pub const GAME_OVER_FRAMES: u32 = 300; // 5 seconds at 60 FPS
pub const HIGH_SCORE_SLOTS: usize = 10;
