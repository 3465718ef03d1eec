use core::{fmt, marker::PhantomData};

use crate::{Component, ComponentMut, Entity};

use super::Fetch;

/// Fetch a component mutably.
///
/// ```rust
/// use bulwark::{component, Entity, EntityQuery, Mut};
///
/// struct Health(f32);
/// struct Poisoned;
///
/// component! { Health, Poisoned }
///
/// let mut entity = Entity::new();
/// entity.add_component(Health(10.0)).add_component(Poisoned);
/// let entities = vec![entity];
///
/// for item in EntityQuery::from(&entities)
///     .with_components::<(Mut<Health>, Poisoned)>()
///     .execute()?
/// {
///     let (mut health, _) = item.components;
///     health.0 -= 1.0;
/// }
///
/// assert_eq!(entities[0].get_component::<Health>().unwrap().0, 9.0);
/// # Ok::<_, bulwark::Error>(())
/// ```
pub struct Mut<T>(PhantomData<fn() -> T>);

impl<'a, T: Component> Fetch<'a> for Mut<T> {
    type Item = ComponentMut<'a, T>;

    const ARITY: usize = 1;

    #[inline]
    fn matches(entity: &Entity) -> bool {
        entity.has_component::<T>()
    }

    #[inline]
    fn fetch(entity: &'a Entity) -> Option<Self::Item> {
        entity.get_component_mut::<T>()
    }

    fn describe(f: &mut dyn fmt::Write) -> fmt::Result {
        write!(f, "Mut<{}>", tynm::type_name::<T>())
    }
}
