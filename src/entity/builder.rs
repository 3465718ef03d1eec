use core::mem;

use smallvec::SmallVec;

use crate::{component::ComponentSlot, Component, Entity, EntityId};

/// Assembles the components of an entity before it is created.
///
/// Unlike [`Entity::add_component`], setting a component type twice on the
/// builder replaces the previous value.
#[derive(Debug, Default)]
pub struct EntityBuilder {
    components: SmallVec<[ComponentSlot; 8]>,
}

impl EntityBuilder {
    /// Creates a new empty builder
    pub fn new() -> Self {
        Self {
            components: SmallVec::new(),
        }
    }

    /// Sets the component of the entity.
    pub fn set<T: Component>(&mut self, value: T) -> &mut Self {
        match self.get_mut::<T>() {
            Some(existing) => *existing = value,
            None => self.components.push(ComponentSlot::new(value)),
        }

        self
    }

    /// Sets a component with the default value of `T`
    pub fn set_default<T: Component + Default>(&mut self) -> &mut Self {
        self.set(T::default())
    }

    /// Return a mutable reference to the stored component.
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components
            .iter_mut()
            .find_map(ComponentSlot::get_mut::<T>)
    }

    /// Returns true if a component of type `T` has been set
    pub fn has<T: Component>(&self) -> bool {
        self.components.iter().any(ComponentSlot::is::<T>)
    }

    /// Creates the entity.
    ///
    /// Clears the builder and allows it to be used again.
    pub fn build(&mut self) -> Entity {
        Entity::from_slots(mem::take(&mut self.components))
    }

    /// Creates the entity and appends it to the live entity list.
    pub fn spawn(&mut self, entities: &mut Vec<Entity>) -> EntityId {
        let entity = self.build();
        let id = entity.id();
        entities.push(entity);
        id
    }
}

impl From<&mut EntityBuilder> for EntityBuilder {
    fn from(builder: &mut EntityBuilder) -> Self {
        mem::take(builder)
    }
}

impl From<&mut EntityBuilder> for Entity {
    fn from(builder: &mut EntityBuilder) -> Self {
        builder.build()
    }
}
