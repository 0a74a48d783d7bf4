//! Example component definitions for the cadence engine.
//!
//! These demonstrate how to define components that satisfy the [`Component`]
//! trait: plain data records with a stable type name.

use cadence_store::Component;

/// A 2D position component.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    /// Horizontal world coordinate.
    pub x: f32,
    /// Vertical world coordinate.
    pub y: f32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Component for Position {
    fn type_name() -> &'static str {
        "Position"
    }
}

/// A 2D velocity component, in world units per tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    /// Horizontal speed.
    pub dx: f32,
    /// Vertical speed.
    pub dy: f32,
}

impl Velocity {
    /// Create a new velocity.
    #[must_use]
    pub fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }
}

impl Component for Velocity {
    fn type_name() -> &'static str {
        "Velocity"
    }
}

/// A health component with current and maximum hit points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    /// Current hit points.
    pub current: f32,
    /// Maximum hit points.
    pub max: f32,
}

impl Health {
    /// Create a new health component at full HP.
    #[must_use]
    pub fn full(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Returns `true` if the entity is alive (HP > 0).
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Apply damage, clamping to zero.
    pub fn damage(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }

    /// Heal, clamping to max.
    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount).min(self.max);
    }
}

impl Component for Health {
    fn type_name() -> &'static str {
        "Health"
    }
}

/// Remaining lifetime of a short-lived entity, in ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifetime {
    /// Ticks left before the entity should be cleaned up.
    pub remaining: u32,
}

impl Lifetime {
    /// Create a lifetime of `ticks` ticks.
    #[must_use]
    pub fn ticks(ticks: u32) -> Self {
        Self { remaining: ticks }
    }

    /// Returns `true` once the lifetime has run out.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.remaining == 0
    }
}

impl Component for Lifetime {
    fn type_name() -> &'static str {
        "Lifetime"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage_and_heal() {
        let mut h = Health::full(100.0);
        assert!(h.is_alive());
        h.damage(60.0);
        assert_eq!(h.current, 40.0);
        h.heal(30.0);
        assert_eq!(h.current, 70.0);
        h.damage(200.0);
        assert_eq!(h.current, 0.0);
        assert!(!h.is_alive());
    }

    #[test]
    fn test_lifetime_expiry() {
        let mut l = Lifetime::ticks(1);
        assert!(!l.expired());
        l.remaining -= 1;
        assert!(l.expired());
    }

    #[test]
    fn test_component_names_are_distinct() {
        use cadence_store::ComponentTypeId;
        let ids = [
            ComponentTypeId::of::<Position>(),
            ComponentTypeId::of::<Velocity>(),
            ComponentTypeId::of::<Health>(),
            ComponentTypeId::of::<Lifetime>(),
        ];
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
