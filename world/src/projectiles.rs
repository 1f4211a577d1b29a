//! Authoritative projectile state and identifier allocation.

use rune_strike_core::{ProjectileId, ProjectileSnapshot};

/// Distance travelled by a projectile during one reference frame.
pub(crate) const PROJECTILE_SPEED: f32 = 25.0;

/// Number of ticks a projectile remains visible after striking the enemy.
pub(crate) const HIT_LINGER_TICKS: u32 = 5;

/// Projectile in flight stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) position: f32,
    pub(crate) damage: u32,
    pub(crate) hit: bool,
    pub(crate) linger_ticks: u32,
}

impl Projectile {
    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            position: self.position,
            damage: self.damage,
            hit: self.hit,
        }
    }
}

/// Registry that stores projectiles and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct ProjectileRegistry {
    entries: Vec<Projectile>,
    next_projectile_id: ProjectileId,
}

impl ProjectileRegistry {
    /// Creates an empty projectile registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_projectile_id: ProjectileId::new(0),
        }
    }

    /// Launches a projectile from `position` and returns its identifier.
    pub(crate) fn launch(&mut self, position: f32, damage: u32) -> ProjectileId {
        let id = self.next_projectile_id;
        self.next_projectile_id = ProjectileId::new(id.get().wrapping_add(1));
        self.entries.push(Projectile {
            id,
            position,
            damage,
            hit: false,
            linger_ticks: 0,
        });
        id
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Projectile> {
        self.entries.iter_mut()
    }

    /// Drops projectiles whose linger window elapsed or that left the field unresolved.
    pub(crate) fn prune(&mut self, field_width: f32) {
        self.entries.retain(|projectile| {
            if projectile.hit {
                projectile.linger_ticks > 0
            } else {
                projectile.position < field_width
            }
        });
    }
}
