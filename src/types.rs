#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub const ZERO: Vector2D = Vector2D { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Vector2D { x, y }
    }

    /// Unit vector pointing along `degrees`, measured clockwise from +x in screen space.
    pub fn from_angle(degrees: f64) -> Self {
        let radians = degrees.to_radians();
        Vector2D::new(radians.cos(), radians.sin())
    }

    pub fn scale(&self, scalar: f64) -> Self {
        Vector2D::new(self.x * scalar, self.y * scalar)
    }

    pub fn add(&self, other: Vector2D) -> Self {
        Vector2D::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub(&self, other: Vector2D) -> Self {
        Vector2D::new(self.x - other.x, self.y - other.y)
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// A zero-length vector normalizes to zero instead of NaN.
    pub fn normalize(&self) -> Self {
        let length = self.length();
        if length > 0.0 {
            Vector2D::new(self.x / length, self.y / length)
        } else {
            Vector2D::ZERO
        }
    }

    pub fn distance(&self, other: Vector2D) -> f64 {
        self.sub(other).length()
    }

    pub fn wrapped(&self, width: f64, height: f64) -> Self {
        Vector2D::new(wrap_coordinate(self.x, width), wrap_coordinate(self.y, height))
    }
}

pub fn wrap_coordinate(value: f64, max: f64) -> f64 {
    let wrapped = value.rem_euclid(max);
    // rem_euclid can round up to exactly `max` for tiny negative inputs
    if wrapped >= max { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_zero_vector_is_zero() {
        assert_eq!(Vector2D::ZERO.normalize(), Vector2D::ZERO);
    }

    #[test]
    fn normalize_produces_unit_length() {
        let v = Vector2D::new(3.0, 4.0).normalize();
        assert!((v.length() - 1.0).abs() < 1e-12);
        assert!((v.x - 0.6).abs() < 1e-12);
        assert!((v.y - 0.8).abs() < 1e-12);
    }

    #[test]
    fn add_and_scale() {
        let v = Vector2D::new(1.0, -2.0).add(Vector2D::new(0.5, 0.5)).scale(2.0);
        assert_eq!(v, Vector2D::new(3.0, -3.0));
    }

    #[test]
    fn wrap_handles_large_and_negative_values() {
        assert_eq!(wrap_coordinate(805.0, 800.0), 5.0);
        assert_eq!(wrap_coordinate(-5.0, 800.0), 795.0);
        assert_eq!(wrap_coordinate(800.0, 800.0), 0.0);
        let far = wrap_coordinate(-1.0e9 - 0.25, 600.0);
        assert!((0.0..600.0).contains(&far));
        let tiny = wrap_coordinate(-1.0e-20, 800.0);
        assert!((0.0..800.0).contains(&tiny));
    }
}
