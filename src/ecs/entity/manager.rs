use super::id::EntityId;
use std::collections::BTreeSet;

/// Monotonic entity allocator.
///
/// Ids start at 1 and are never recycled; removal only drops the id from the
/// live set.
pub struct EntityManager {
    next: u32,
    alive: BTreeSet<EntityId>,
}

impl EntityManager {
    pub fn new() -> Self {
        Self {
            next: 1,
            alive: BTreeSet::new(),
        }
    }

    pub fn create(&mut self) -> EntityId {
        let id = EntityId::new(self.next);
        self.next = self.next.wrapping_add(1);
        self.alive.insert(id);
        id
    }

    pub fn remove(&mut self, id: EntityId) -> bool {
        self.alive.remove(&id)
    }

    #[inline]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.alive.contains(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.alive.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.alive.iter().copied()
    }
}

impl Default for EntityManager {
    fn default() -> Self {
        Self::new()
    }
}
