use crate::types::Vector2D;

pub trait Collider {
    fn center(&self) -> Vector2D;
    fn radius(&self) -> f64;
}

/// Circle overlap. Touching circles (distance == sum of radii) do not collide.
pub fn collides(a: &impl Collider, b: &impl Collider) -> bool {
    a.center().distance(b.center()) < a.radius() + b.radius()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Circle(Vector2D, f64);

    impl Collider for Circle {
        fn center(&self) -> Vector2D {
            self.0
        }
        fn radius(&self) -> f64 {
            self.1
        }
    }

    #[test]
    fn concentric_circles_collide() {
        let ship = Circle(Vector2D::new(400.0, 300.0), 10.0);
        let rock = Circle(Vector2D::new(400.0, 300.0), 20.0);
        assert!(collides(&ship, &rock));
    }

    #[test]
    fn separated_circles_do_not_collide() {
        let ship = Circle(Vector2D::new(400.0, 300.0), 10.0);
        let rock = Circle(Vector2D::new(431.0, 300.0), 20.0);
        assert!(!collides(&ship, &rock));
    }

    #[test]
    fn tangent_circles_do_not_collide() {
        let a = Circle(Vector2D::new(0.0, 0.0), 10.0);
        let b = Circle(Vector2D::new(30.0, 0.0), 20.0);
        assert!(!collides(&a, &b));
        assert!(!collides(&b, &a));
    }

    #[test]
    fn collision_is_symmetric() {
        let a = Circle(Vector2D::new(10.0, 10.0), 2.0);
        let b = Circle(Vector2D::new(25.0, 15.0), 20.0);
        assert_eq!(collides(&a, &b), collides(&b, &a));
        assert!(collides(&a, &b));
    }
}
