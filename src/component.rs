use core::any::{Any, TypeId};
use core::fmt;

use atomic_refcell::{AtomicRef, AtomicRefCell, AtomicRefMut};

/// Marker for a type which can be attached to an [`Entity`](crate::Entity).
///
/// A component carries no behavior of its own; it is one slice of an entity's
/// state such as a position, a health pool or a team. Implement it directly or
/// through the [`component!`](crate::component) macro.
pub trait Component: Send + Sync + 'static {}

/// Shared borrow of a component attached to an entity
pub type ComponentRef<'a, T> = AtomicRef<'a, T>;
/// Exclusive borrow of a component attached to an entity
pub type ComponentMut<'a, T> = AtomicRefMut<'a, T>;

/// Type erased description of a component type.
///
/// Two infos are equal if and only if they describe the same concrete type.
#[derive(Clone, Copy)]
pub struct ComponentInfo {
    type_id: TypeId,
    type_name: &'static str,
    name: fn() -> String,
}

impl ComponentInfo {
    /// Returns the info of the component type `T`
    pub fn of<T: Component>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: core::any::type_name::<T>(),
            name: tynm::type_name::<T>,
        }
    }

    /// Returns the type id of the component
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the fully qualified type name
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns a short, human friendly name of the component type
    pub fn name(&self) -> String {
        (self.name)()
    }

    /// Returns true if this describes `T`
    #[inline]
    pub fn is<T: Component>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl PartialEq for ComponentInfo {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ComponentInfo {}

impl fmt::Debug for ComponentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ComponentInfo").field(&self.name()).finish()
    }
}

impl fmt::Display for ComponentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// A single type erased component value owned by an entity.
///
/// The value is stored behind an [`AtomicRefCell`] so that systems which only
/// hold a shared snapshot of the entities may still mutate the component in
/// place.
pub(crate) struct ComponentSlot {
    info: ComponentInfo,
    cell: Box<dyn Any + Send + Sync>,
}

impl ComponentSlot {
    pub(crate) fn new<T: Component>(value: T) -> Self {
        Self {
            info: ComponentInfo::of::<T>(),
            cell: Box::new(AtomicRefCell::new(value)),
        }
    }

    #[inline]
    pub(crate) fn info(&self) -> ComponentInfo {
        self.info
    }

    #[inline]
    pub(crate) fn is<T: Component>(&self) -> bool {
        self.info.is::<T>()
    }

    pub(crate) fn cell<T: Component>(&self) -> Option<&AtomicRefCell<T>> {
        if self.is::<T>() {
            self.cell.downcast_ref()
        } else {
            None
        }
    }

    pub(crate) fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.cell
            .downcast_mut::<AtomicRefCell<T>>()
            .map(AtomicRefCell::get_mut)
    }

    /// Moves the value out of the slot.
    ///
    /// Returns `None` if the slot does not hold a `T`
    pub(crate) fn into_inner<T: Component>(self) -> Option<T> {
        self.cell
            .downcast::<AtomicRefCell<T>>()
            .ok()
            .map(|cell| (*cell).into_inner())
    }
}

impl fmt::Debug for ComponentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.info, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Health(u32);
    struct Armor(u32);

    crate::component! { Health, Armor }

    #[test]
    fn component_infos() {
        assert_eq!(ComponentInfo::of::<Health>(), ComponentInfo::of::<Health>());
        assert_ne!(ComponentInfo::of::<Health>(), ComponentInfo::of::<Armor>());
        assert_eq!(ComponentInfo::of::<Health>().name(), "Health");
        assert!(ComponentInfo::of::<Armor>().type_name().ends_with("Armor"));
    }

    #[test]
    fn slot_downcast() {
        let mut slot = ComponentSlot::new(Health(5));
        assert!(slot.is::<Health>());
        assert!(slot.cell::<Armor>().is_none());

        slot.get_mut::<Health>().unwrap().0 += 1;
        assert_eq!(slot.cell::<Health>().unwrap().borrow().0, 6);

        assert_eq!(slot.into_inner::<Health>().map(|v| v.0), Some(6));
    }
}
