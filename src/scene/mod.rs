//! Ownership helpers for scene entities and the GPU assets they hold.
//!
//! Shapes are immutable once built: a parameter change builds a fresh mesh and
//! swaps it into an [`AssetSlot`], which removes the previous asset in the same
//! step. Releasing a slot or an entity twice is a no-op.
use bevy::prelude::*;

/// Single-owner slot for an asset handle.
#[derive(Debug)]
pub struct AssetSlot<A: Asset> {
    handle: Option<Handle<A>>,
}

impl<A: Asset> AssetSlot<A> {
    pub fn new(handle: Handle<A>) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    pub fn handle(&self) -> Option<&Handle<A>> {
        self.handle.as_ref()
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_released(&self) -> bool {
        self.handle.is_none()
    }

    /// Stores `next` and removes the asset previously held. Returns a handle to `next`.
    pub fn replace(&mut self, next: Handle<A>, assets: &mut Assets<A>) -> Handle<A> {
        if let Some(previous) = self.handle.replace(next.clone()) {
            if previous.id() != next.id() {
                assets.remove(&previous);
            }
        }
        next
    }

    /// Removes the held asset. Returns `false` when the slot was already empty.
    pub fn release(&mut self, assets: &mut Assets<A>) -> bool {
        match self.handle.take() {
            Some(handle) => {
                assets.remove(&handle);
                true
            }
            None => false,
        }
    }
}

impl<A: Asset> Default for AssetSlot<A> {
    fn default() -> Self {
        Self { handle: None }
    }
}

/// Despawns `entity` (and its descendants) if it still exists.
pub fn despawn_if_present(commands: &mut Commands, entity: Entity) -> bool {
    match commands.get_entity(entity) {
        Ok(mut entity_commands) => {
            entity_commands.despawn();
            true
        }
        Err(_) => false,
    }
}

/// Takes the entity out of `slot` and despawns it. Later calls do nothing.
pub fn release_entity(commands: &mut Commands, slot: &mut Option<Entity>) -> bool {
    slot.take()
        .map(|entity| despawn_if_present(commands, entity))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Mesh>();
        app
    }

    #[test]
    fn replace_removes_previous_asset() {
        let mut app = mesh_app();
        let mut meshes = app.world_mut().resource_mut::<Assets<Mesh>>();

        let first = meshes.add(Mesh::from(Cuboid::default()));
        let mut slot = AssetSlot::new(first.clone());
        let second = meshes.add(Mesh::from(Sphere::default()));
        slot.replace(second.clone(), &mut meshes);

        assert!(meshes.get(&first).is_none());
        assert!(meshes.get(&second).is_some());
        assert_eq!(meshes.len(), 1);
    }

    #[test]
    fn release_is_idempotent() {
        let mut app = mesh_app();
        let mut meshes = app.world_mut().resource_mut::<Assets<Mesh>>();

        let handle = meshes.add(Mesh::from(Cuboid::default()));
        let mut slot = AssetSlot::new(handle);

        assert!(slot.release(&mut meshes));
        assert!(!slot.release(&mut meshes));
        assert!(slot.is_released());
        assert_eq!(meshes.len(), 0);
    }

    #[test]
    fn release_entity_despawns_once() {
        let mut app = mesh_app();
        let entity = app.world_mut().spawn_empty().id();

        app.add_systems(Update, move |mut commands: Commands| {
            let mut slot = Some(entity);
            assert!(release_entity(&mut commands, &mut slot));
            assert!(!release_entity(&mut commands, &mut slot));
        });
        app.update();

        assert!(app.world().get_entity(entity).is_err());
    }
}
