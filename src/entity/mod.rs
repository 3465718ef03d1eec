mod builder;

use core::fmt;
use core::num::NonZeroU64;
use core::sync::atomic::{AtomicU64, Ordering};

use itertools::Itertools;
use smallvec::SmallVec;

pub use builder::*;

use crate::{
    component::ComponentSlot, error::Result, Component, ComponentInfo, ComponentMut,
    ComponentRef, Error,
};

/// Identifies an entity.
///
/// Ids are handed out from a process wide counter when an [`Entity`] is
/// constructed and are never reused, which makes them safe to hold on to
/// across frames, for example when a targeting system remembers what it is
/// aiming at.
#[derive(PartialOrd, Clone, Copy, PartialEq, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct EntityId(NonZeroU64);

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

impl EntityId {
    /// Generate a new unique id
    pub(crate) fn acquire() -> Self {
        let index = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        Self(NonZeroU64::new(index).expect("Entity id space exhausted"))
    }

    /// Returns the raw bits of the id
    pub fn to_bits(&self) -> NonZeroU64 {
        self.0
    }

    /// Reconstructs an id from the raw bits.
    ///
    /// The returned id refers to the same entity as the one the bits were
    /// taken from, if any.
    pub fn from_bits(bits: NonZeroU64) -> Self {
        Self(bits)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntityId").field(&self.0.get()).finish()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.get())
    }
}

/// An identity and a bag of components.
///
/// Components are stored in attachment order. Lookups scan the list and
/// return the *first* component of the requested type, which makes the
/// earliest added component win if the same type is added more than once.
///
/// Components are interior mutable, which means a component can be mutated
/// through a shared reference to the entity using
/// [`get_component_mut`](Self::get_component_mut). The borrows are checked at
/// runtime, and borrowing a component mutably while it is already borrowed
/// panics.
pub struct Entity {
    id: EntityId,
    components: SmallVec<[ComponentSlot; 8]>,
}

impl Entity {
    /// Creates a new entity without any components
    pub fn new() -> Self {
        Self {
            id: EntityId::acquire(),
            components: SmallVec::new(),
        }
    }

    /// Construct a new entity using a builder
    pub fn builder() -> EntityBuilder {
        EntityBuilder::new()
    }

    pub(crate) fn from_slots(components: SmallVec<[ComponentSlot; 8]>) -> Self {
        Self {
            id: EntityId::acquire(),
            components,
        }
    }

    /// Returns the unique id of the entity
    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Returns true if a component of type `T` is attached
    pub fn has_component<T: Component>(&self) -> bool {
        self.components.iter().any(ComponentSlot::is::<T>)
    }

    /// Borrow the first attached component of type `T`.
    ///
    /// # Panics
    /// If the component is currently borrowed mutably
    pub fn get_component<T: Component>(&self) -> Option<ComponentRef<'_, T>> {
        self.cell::<T>().map(|cell| cell.borrow())
    }

    /// Mutably borrow the first attached component of type `T`.
    ///
    /// # Panics
    /// If the component is currently borrowed
    pub fn get_component_mut<T: Component>(&self) -> Option<ComponentMut<'_, T>> {
        self.cell::<T>().map(|cell| cell.borrow_mut())
    }

    /// Same as [`get_component`](Self::get_component) but treats a missing
    /// component as an error.
    pub fn component<T: Component>(&self) -> Result<ComponentRef<'_, T>> {
        self.get_component()
            .ok_or_else(|| Error::MissingComponent(self.id, ComponentInfo::of::<T>().name()))
    }

    /// Appends a component to the entity.
    ///
    /// Existing components of the same type are left untouched and continue
    /// to take precedence on lookup. Use
    /// [`replace_component`](Self::replace_component) to update a component
    /// by value.
    pub fn add_component<T: Component>(&mut self, component: T) -> &mut Self {
        self.components.push(ComponentSlot::new(component));
        self
    }

    /// Replaces the first component of type `T`, returning the old value.
    ///
    /// If no such component exists the component is appended.
    pub fn replace_component<T: Component>(&mut self, component: T) -> Option<T> {
        match self.components.iter_mut().find_map(ComponentSlot::get_mut::<T>) {
            Some(existing) => Some(core::mem::replace(existing, component)),
            None => {
                self.components.push(ComponentSlot::new(component));
                None
            }
        }
    }

    /// Removes the first component of type `T` and returns it
    pub fn remove_component<T: Component>(&mut self) -> Option<T> {
        let index = self.components.iter().position(ComponentSlot::is::<T>)?;
        self.components.remove(index).into_inner()
    }

    /// Returns the number of attached components, duplicates included
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Iterate the types of the attached components in attachment order
    pub fn component_infos(&self) -> impl Iterator<Item = ComponentInfo> + '_ {
        self.components.iter().map(ComponentSlot::info)
    }

    fn cell<T: Component>(&self) -> Option<&atomic_refcell::AtomicRefCell<T>> {
        self.components.iter().find_map(ComponentSlot::cell::<T>)
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field(
                "components",
                &format_args!("[{}]", self.component_infos().join(", ")),
            )
            .finish()
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.id)
    }
}
