use crate::audio::AudioIntent;
use crate::collision::Collider;
use crate::constants::*;
use crate::rendering::Canvas;
use crate::types::Vector2D;
use rand::Rng;

// --- Ship ---

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShipControls {
    pub aim: Vector2D,
    pub thrust: bool,
}

pub struct Ship {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub angle: f64, // Degrees, 0 = east, 90 = south
    pub radius: f64,
    pub thrust_power: f64,
    pub max_speed: f64,
    pub friction: f64,
    thrusting: bool,
}

impl Ship {
    pub fn new(x: f64, y: f64) -> Self {
        Ship {
            position: Vector2D::new(x, y),
            velocity: Vector2D::ZERO,
            angle: 0.0,
            radius: SHIP_RADIUS,
            thrust_power: SHIP_THRUST_POWER,
            max_speed: SHIP_MAX_SPEED,
            friction: SHIP_FRICTION,
            thrusting: false,
        }
    }

    pub fn centered() -> Self {
        Ship::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0)
    }

    pub fn update(&mut self, controls: &ShipControls) -> Option<AudioIntent> {
        self.turn_towards(controls.aim);

        if controls.thrust {
            let thrust_vector = Vector2D::from_angle(self.angle).scale(self.thrust_power);
            self.velocity = self.velocity.add(thrust_vector);
        }
        let intent = match (controls.thrust, self.thrusting) {
            (true, false) => Some(AudioIntent::ThrustStart),
            (false, true) => Some(AudioIntent::ThrustStop),
            _ => None,
        };
        self.thrusting = controls.thrust;

        self.velocity = self.velocity.scale(self.friction);
        if self.velocity.length() > self.max_speed {
            self.velocity = self.velocity.normalize().scale(self.max_speed);
        }

        self.position = self.position.add(self.velocity).wrapped(SCREEN_WIDTH, SCREEN_HEIGHT);
        intent
    }

    /// Turns at most `SHIP_ROTATION_STEP` degrees, snapping once within one step.
    fn turn_towards(&mut self, aim: Vector2D) {
        let delta = aim.sub(self.position);
        let target = delta.y.atan2(delta.x).to_degrees();

        // Reduce into [-180, 180]; an exact half turn keeps its sign
        let mut diff = target - self.angle;
        while diff > 180.0 {
            diff -= 360.0;
        }
        while diff < -180.0 {
            diff += 360.0;
        }

        if diff.abs() > SHIP_ROTATION_STEP {
            self.angle += SHIP_ROTATION_STEP.copysign(diff);
        } else {
            self.angle = target;
        }
    }

    pub fn outline(&self) -> [Vector2D; 3] {
        let radians = self.angle.to_radians();
        let (sin_a, cos_a) = radians.sin_cos();
        let p = self.position;
        [
            Vector2D::new(p.x + cos_a * 15.0, p.y + sin_a * 15.0),
            Vector2D::new(p.x - cos_a * 10.0 - sin_a * 8.0, p.y - sin_a * 10.0 + cos_a * 8.0),
            Vector2D::new(p.x - cos_a * 10.0 + sin_a * 8.0, p.y - sin_a * 10.0 - cos_a * 8.0),
        ]
    }

    pub fn draw(&self, canvas: &mut impl Canvas, glyph: char) {
        canvas.polygon(&self.outline(), glyph);
    }
}

impl Collider for Ship {
    fn center(&self) -> Vector2D {
        self.position
    }

    fn radius(&self) -> f64 {
        self.radius
    }
}

// --- Asteroids ---

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsteroidSize {
    Large,
    Medium,
    Small,
}

impl AsteroidSize {
    pub fn tier(self) -> u32 {
        match self {
            AsteroidSize::Large => 3,
            AsteroidSize::Medium => 2,
            AsteroidSize::Small => 1,
        }
    }

    pub fn radius(self) -> f64 {
        self.tier() as f64 * 10.0
    }

    pub fn points(self) -> u32 {
        (4 - self.tier()) * 20
    }

    pub fn smaller(self) -> Option<AsteroidSize> {
        match self {
            AsteroidSize::Large => Some(AsteroidSize::Medium),
            AsteroidSize::Medium => Some(AsteroidSize::Small),
            AsteroidSize::Small => None,
        }
    }
}

pub struct Asteroid {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub size: AsteroidSize,
    pub rotation: f64,       // Degrees, unbounded
    pub rotation_speed: f64, // Degrees per frame
    shape: Vec<Vector2D>,    // Relative to the centre, never rotated in place
}

impl Asteroid {
    pub fn new(position: Vector2D, size: AsteroidSize, rng: &mut impl Rng) -> Self {
        let heading = rng.gen_range(0.0..360.0);
        let speed = rng.gen_range(ASTEROID_MIN_SPEED..ASTEROID_MAX_SPEED);
        let velocity = Vector2D::from_angle(heading).scale(speed);
        let rotation_speed = rng.gen_range(-ASTEROID_MAX_ROTATION_SPEED..ASTEROID_MAX_ROTATION_SPEED);

        let radius = size.radius();
        let shape = (0..ASTEROID_VERTICES)
            .map(|i| {
                let angle = 360.0 / ASTEROID_VERTICES as f64 * i as f64;
                let jitter = rng.gen_range(1.0 - ASTEROID_JITTER..1.0 + ASTEROID_JITTER);
                Vector2D::from_angle(angle).scale(radius * jitter)
            })
            .collect();

        Asteroid { position, velocity, size, rotation: 0.0, rotation_speed, shape }
    }

    pub fn shape(&self) -> &[Vector2D] {
        &self.shape
    }

    pub fn update(&mut self) {
        self.position = self.position.add(self.velocity).wrapped(SCREEN_WIDTH, SCREEN_HEIGHT);
        self.rotation += self.rotation_speed;
    }

    /// Two fresh rocks one tier down at this position, or none for the smallest tier.
    /// The caller removes `self`.
    pub fn split(&self, rng: &mut impl Rng) -> Vec<Asteroid> {
        match self.size.smaller() {
            Some(size) => (0..2).map(|_| Asteroid::new(self.position, size, rng)).collect(),
            None => Vec::new(),
        }
    }

    pub fn outline(&self) -> Vec<Vector2D> {
        let (sin_r, cos_r) = self.rotation.to_radians().sin_cos();
        self.shape()
            .iter()
            .map(|point| {
                Vector2D::new(
                    point.x * cos_r - point.y * sin_r + self.position.x,
                    point.x * sin_r + point.y * cos_r + self.position.y,
                )
            })
            .collect()
    }

    pub fn draw(&self, canvas: &mut impl Canvas, glyph: char) {
        canvas.polygon(&self.outline(), glyph);
    }
}

impl Collider for Asteroid {
    fn center(&self) -> Vector2D {
        self.position
    }

    fn radius(&self) -> f64 {
        self.size.radius()
    }
}

// --- Bullet struct ---
pub struct Bullet {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub lifetime: u32,
    pub radius: f64,
}

impl Bullet {
    pub fn new(position: Vector2D, angle: f64) -> Self {
        Bullet {
            position,
            velocity: Vector2D::from_angle(angle).scale(BULLET_SPEED),
            lifetime: BULLET_LIFETIME,
            radius: BULLET_RADIUS,
        }
    }

    pub fn update(&mut self) -> bool {
        self.position = self.position.add(self.velocity).wrapped(SCREEN_WIDTH, SCREEN_HEIGHT);
        self.lifetime = self.lifetime.saturating_sub(1);
        self.lifetime > 0
    }

    pub fn draw(&self, canvas: &mut impl Canvas, glyph: char) {
        canvas.dot(self.position, glyph);
    }
}

impl Collider for Bullet {
    fn center(&self) -> Vector2D {
        self.position
    }

    fn radius(&self) -> f64 {
        self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn in_field(p: Vector2D) -> bool {
        (0.0..SCREEN_WIDTH).contains(&p.x) && (0.0..SCREEN_HEIGHT).contains(&p.y)
    }

    fn idle_at(aim: Vector2D) -> ShipControls {
        ShipControls { aim, thrust: false }
    }

    #[test]
    fn ship_turns_at_most_one_step_per_frame() {
        let mut ship = Ship::centered();
        // Straight down from the ship: target heading 90 degrees.
        let aim = Vector2D::new(ship.position.x, ship.position.y + 100.0);
        ship.update(&idle_at(aim));
        assert_eq!(ship.angle, 8.0);
        ship.update(&idle_at(aim));
        assert_eq!(ship.angle, 16.0);
    }

    #[test]
    fn ship_snaps_when_within_one_step() {
        let mut ship = Ship::centered();
        ship.angle = 85.0;
        let aim = Vector2D::new(ship.position.x, ship.position.y + 100.0);
        ship.update(&idle_at(aim));
        assert!((ship.angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn ship_turns_the_short_way_round() {
        let mut ship = Ship::centered();
        ship.angle = 170.0;
        // Aim slightly above due west: target is about -170 degrees.
        let aim = ship.position.add(Vector2D::from_angle(-170.0).scale(100.0));
        ship.update(&idle_at(aim));
        assert!((ship.angle - 178.0).abs() < 1e-9);
    }

    #[test]
    fn half_turn_tie_turns_anticlockwise() {
        let mut ship = Ship::centered();
        ship.angle = 90.0;
        // Straight up: target is exactly -90, a difference of exactly -180.
        let aim = Vector2D::new(ship.position.x, ship.position.y - 100.0);
        ship.update(&idle_at(aim));
        assert_eq!(ship.angle, 82.0);
    }

    #[test]
    fn thrust_accelerates_along_heading_with_friction() {
        let mut ship = Ship::centered();
        let aim = Vector2D::new(SCREEN_WIDTH, ship.position.y);
        let intent = ship.update(&ShipControls { aim, thrust: true });
        assert_eq!(intent, Some(AudioIntent::ThrustStart));
        assert!((ship.velocity.x - 0.3 * 0.98).abs() < 1e-12);
        assert!(ship.velocity.y.abs() < 1e-12);
    }

    #[test]
    fn thrust_sound_toggles_only_on_change() {
        let mut ship = Ship::centered();
        let aim = Vector2D::new(SCREEN_WIDTH, ship.position.y);
        let on = ShipControls { aim, thrust: true };
        assert_eq!(ship.update(&on), Some(AudioIntent::ThrustStart));
        assert_eq!(ship.update(&on), None);
        assert_eq!(ship.update(&idle_at(aim)), Some(AudioIntent::ThrustStop));
        assert_eq!(ship.update(&idle_at(aim)), None);
    }

    #[test]
    fn ship_speed_is_capped() {
        let mut ship = Ship::centered();
        ship.velocity = Vector2D::new(30.0, 40.0);
        ship.update(&idle_at(ship.position.add(Vector2D::new(1.0, 0.0))));
        assert!((ship.velocity.length() - SHIP_MAX_SPEED).abs() < 1e-9);
    }

    #[test]
    fn ship_wraps_around_edges() {
        let mut ship = Ship::new(799.0, 1.0);
        ship.velocity = Vector2D::new(5.0, -5.0);
        ship.update(&idle_at(Vector2D::new(0.0, 0.0)));
        assert!(in_field(ship.position));
        assert!(ship.position.x < 10.0);
        assert!(ship.position.y > 590.0);
    }

    #[test]
    fn bullet_expires_after_lifetime() {
        let mut bullet = Bullet::new(Vector2D::new(400.0, 300.0), 0.0);
        let frames_alive = (0..100).take_while(|_| bullet.update()).count();
        assert_eq!(frames_alive as u32, BULLET_LIFETIME - 1);
        assert_eq!(bullet.lifetime, 0);
    }

    #[test]
    fn bullet_travels_at_fixed_speed_and_wraps() {
        let mut bullet = Bullet::new(Vector2D::new(795.0, 300.0), 0.0);
        assert!((bullet.velocity.length() - BULLET_SPEED).abs() < 1e-12);
        bullet.update();
        assert!((bullet.position.x - 5.0).abs() < 1e-9);
        assert!(in_field(bullet.position));
    }

    #[test]
    fn entities_stay_in_field_for_huge_velocities() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut asteroid = Asteroid::new(Vector2D::new(10.0, 10.0), AsteroidSize::Large, &mut rng);
        asteroid.velocity = Vector2D::new(-123_456.7, 98_765.4);
        let mut bullet = Bullet::new(Vector2D::new(0.0, 0.0), 0.0);
        bullet.velocity = Vector2D::new(1.0e7, -3.3e6);
        for _ in 0..5 {
            asteroid.update();
            bullet.update();
            assert!(in_field(asteroid.position));
            assert!(in_field(bullet.position));
        }
    }

    #[test]
    fn asteroid_has_jittered_octagon() {
        let mut rng = StdRng::seed_from_u64(11);
        let asteroid = Asteroid::new(Vector2D::new(100.0, 100.0), AsteroidSize::Medium, &mut rng);
        assert_eq!(asteroid.shape().len(), ASTEROID_VERTICES);
        for point in asteroid.shape() {
            let r = point.length();
            assert!((16.0..24.0).contains(&r), "vertex radius {r}");
        }
        let speed = asteroid.velocity.length();
        assert!((ASTEROID_MIN_SPEED..ASTEROID_MAX_SPEED).contains(&speed));
    }

    #[test]
    fn rotation_does_not_touch_stored_shape() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut asteroid = Asteroid::new(Vector2D::new(200.0, 200.0), AsteroidSize::Large, &mut rng);
        let original: Vec<Vector2D> = asteroid.shape().to_vec();
        asteroid.rotation_speed = 2.5;
        for _ in 0..10 {
            asteroid.update();
            let _ = asteroid.outline();
        }
        assert_eq!(asteroid.shape(), original.as_slice());
        assert!((asteroid.rotation - 25.0).abs() < 1e-9);
    }

    #[test]
    fn outline_rotates_and_translates() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut asteroid = Asteroid::new(Vector2D::new(50.0, 60.0), AsteroidSize::Small, &mut rng);
        asteroid.rotation = 90.0;
        let first = asteroid.shape()[0];
        let drawn = asteroid.outline()[0];
        assert!((drawn.x - (50.0 - first.y)).abs() < 1e-9);
        assert!((drawn.y - (60.0 + first.x)).abs() < 1e-9);
    }

    #[test]
    fn split_produces_two_smaller_rocks_at_parent_position() {
        let mut rng = StdRng::seed_from_u64(1);
        let large = Asteroid::new(Vector2D::new(300.0, 200.0), AsteroidSize::Large, &mut rng);
        let children = large.split(&mut rng);
        assert_eq!(children.len(), 2);
        for child in &children {
            assert_eq!(child.size, AsteroidSize::Medium);
            assert_eq!(child.position, large.position);
            assert_eq!(child.radius(), 20.0);
        }
        let grandchildren = children[0].split(&mut rng);
        assert!(grandchildren.iter().all(|a| a.size == AsteroidSize::Small));
        assert!(grandchildren[0].split(&mut rng).is_empty());
    }

    #[test]
    fn points_per_size() {
        assert_eq!(AsteroidSize::Large.points(), 20);
        assert_eq!(AsteroidSize::Medium.points(), 40);
        assert_eq!(AsteroidSize::Small.points(), 60);
    }
}
