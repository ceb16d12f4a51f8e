use crate::entity::{Entity, Services};

/// Owns the entity collection and drives the per-frame passes: one update
/// pass and two render passes (3D in insertion order, 2D in z-index order).
///
/// Entities cannot be added or removed while a traversal is running; the
/// exclusive borrow on the scene makes that a compile error rather than a
/// runtime hazard.
pub struct Scene {
    entities: Vec<Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self { entities: Vec::new() }
    }

    /// Transfers ownership of the entity into the scene. `None` is a no-op.
    pub fn add_entity(&mut self, entity: impl Into<Option<Entity>>) {
        if let Some(entity) = entity.into() {
            self.entities.push(entity);
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Updates every entity in insertion order.
    pub fn update_all(&mut self, dt: f32, services: &mut Services<'_>) {
        for entity in &mut self.entities {
            entity.update_all(dt, services);
        }
    }

    /// 3D render pass in insertion order. Entities carrying a 2D transform
    /// belong to [`Scene::render_2d`] and are skipped here so nothing draws
    /// twice. Requires an open 3D drawing mode.
    pub fn render_all(&mut self, services: &mut Services<'_>) {
        for entity in &mut self.entities {
            if entity.transform2d.is_some() {
                continue;
            }
            entity.draw_all(services);
        }
    }

    /// 2D render pass: the subset of entities with a 2D transform, drawn in
    /// ascending z-index. The sort is stable, so equal z-indices keep their
    /// insertion order. Requires an open 2D drawing mode.
    pub fn render_2d(&mut self, services: &mut Services<'_>) {
        let mut order: Vec<usize> = (0..self.entities.len())
            .filter(|&i| self.entities[i].transform2d.is_some())
            .collect();
        order.sort_by_key(|&i| self.entities[i].transform2d.as_ref().map(|t| t.z_index).unwrap_or(0));
        for index in order {
            self.entities[index].draw_all(services);
        }
    }

    /// Debug-GUI pass: every unit's overlay hook, in insertion order.
    pub fn overlay(&mut self, gui: &egui::Context) {
        for entity in &mut self.entities {
            entity.overlay_all(gui);
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_entity_accepts_none_as_noop() {
        let mut scene = Scene::new();
        scene.add_entity(Entity::new());
        scene.add_entity(None);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn entities_keep_insertion_order() {
        let mut scene = Scene::new();
        let a = Entity::new();
        let b = Entity::new();
        let (id_a, id_b) = (a.id(), b.id());
        scene.add_entity(a);
        scene.add_entity(b);
        let ids: Vec<_> = scene.entities().iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec![id_a, id_b]);
    }
}
