//! Generation-checked storage for hostile entities.

use std::time::Duration;

use horde_core::{EnemyId, EnemyKind, EnemyTemplate, Vec3};

/// Enemy stored inside the arena.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) kind: EnemyKind,
    pub(crate) position: Vec3,
    pub(crate) health: f32,
    pub(crate) max_health: f32,
    pub(crate) vitality: Vitality,
}

/// Whether an enemy is still fighting or waiting to be removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Vitality {
    Alive,
    Corpse { remaining: Duration },
}

impl Enemy {
    pub(crate) fn from_template(kind: EnemyKind, template: EnemyTemplate, position: Vec3) -> Self {
        let max_health = sanitize_health(template.max_health());
        Self {
            kind,
            position,
            health: max_health,
            max_health,
            vitality: Vitality::Alive,
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.vitality == Vitality::Alive
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    occupant: Option<Enemy>,
}

/// Dense slot storage with free-list reuse.
#[derive(Clone, Debug, Default)]
pub(crate) struct EnemyArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl EnemyArena {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, enemy: Enemy) -> EnemyId {
        if let Some(index) = self.free.pop() {
            if let Some(slot) = self.slots.get_mut(index as usize) {
                slot.occupant = Some(enemy);
                return EnemyId::new(index, slot.generation);
            }
        }

        let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Slot {
            generation: 0,
            occupant: Some(enemy),
        });
        EnemyId::new(index, 0)
    }

    pub(crate) fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.occupant.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.occupant.as_mut())
    }

    /// Removes the enemy and invalidates every outstanding handle to it.
    pub(crate) fn remove(&mut self, id: EnemyId) -> Option<Enemy> {
        let slot = self
            .slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())?;
        let enemy = slot.occupant.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index());
        Some(enemy)
    }

    /// Iterates over occupied slots in ascending index order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (EnemyId, &Enemy)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.occupant
                .as_ref()
                .map(|enemy| (EnemyId::new(index as u32, slot.generation), enemy))
        })
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (EnemyId, &mut Enemy)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.occupant
                .as_mut()
                .map(|enemy| (EnemyId::new(index as u32, generation), enemy))
        })
    }
}

fn sanitize_health(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        1.0
    }
}
