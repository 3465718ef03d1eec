use core::fmt;

use crate::Entity;

/// Per frame logic which reads and mutates the components of entities.
///
/// A system receives the full snapshot of live entities every time it runs.
/// It must not assume the slice is the authoritative store: entities may be
/// added or dropped between two calls, so anything remembered across frames
/// should be remembered by [`EntityId`](crate::EntityId) and looked up again.
///
/// Systems do not declare dependencies on each other. The order in which they
/// run is decided by whoever drives them, usually a
/// [`Schedule`](crate::Schedule).
///
/// Any `FnMut(&mut [Entity])` is a system.
pub trait EntitySystem {
    /// Run the system once over the current entities
    fn update(&mut self, entities: &mut [Entity]);

    /// Name of the system as shown in logs and spans
    fn name(&self) -> String
    where
        Self: Sized,
    {
        tynm::type_name::<Self>()
    }
}

impl<F> EntitySystem for F
where
    F: FnMut(&mut [Entity]),
{
    fn update(&mut self, entities: &mut [Entity]) {
        (self)(entities)
    }
}

/// A type erased system with a human friendly name
pub struct BoxedSystem {
    name: String,
    system: Box<dyn EntitySystem>,
}

impl BoxedSystem {
    /// Box a system, naming it after [`EntitySystem::name`].
    ///
    /// Boxing a system which is already boxed keeps its name.
    pub fn new<S: EntitySystem + 'static>(system: S) -> Self {
        Self::named(system.name(), system)
    }

    /// Box a system with an explicit name.
    ///
    /// Useful for closures, whose type names are not very descriptive.
    pub fn named<S: EntitySystem + 'static>(name: impl Into<String>, system: S) -> Self {
        Self {
            name: name.into(),
            system: Box::new(system),
        }
    }

    /// Returns the name of the system
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl EntitySystem for BoxedSystem {
    fn update(&mut self, entities: &mut [Entity]) {
        self.system.update(entities)
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

impl fmt::Debug for BoxedSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BoxedSystem").field(&self.name).finish()
    }
}
