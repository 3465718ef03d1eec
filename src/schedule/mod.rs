use crate::{
    system::{BoxedSystem, EntitySystem},
    Entity,
};

/// A collection of systems to run over the entities, in a fixed order.
///
/// This is the driving loop of a frame: each call to
/// [`execute`](Self::execute) runs every system exactly once, in the order
/// they were added. Events dispatched by a system are delivered before the
/// next system runs.
#[derive(Default, Debug)]
pub struct Schedule {
    systems: Vec<BoxedSystem>,
}

impl Schedule {
    /// Creates a new empty schedule
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new schedule builder
    pub fn builder() -> ScheduleBuilder {
        ScheduleBuilder::default()
    }

    /// Add a new system to the schedule, named after [`EntitySystem::name`].
    /// Respects order.
    pub fn with_system<S: EntitySystem + 'static>(&mut self, system: S) -> &mut Self {
        self.systems.push(BoxedSystem::new(system));
        self
    }

    /// Add a new named system to the schedule.
    pub fn with_named_system<S: EntitySystem + 'static>(
        &mut self,
        name: impl Into<String>,
        system: S,
    ) -> &mut Self {
        self.systems.push(BoxedSystem::named(name, system));
        self
    }

    /// Execute all systems in the schedule sequentially on the entities.
    pub fn execute(&mut self, entities: &mut [Entity]) {
        #[cfg(feature = "puffin")]
        puffin::profile_function!();

        let _span = tracing::debug_span!("schedule", systems = self.systems.len()).entered();

        for system in &mut self.systems {
            #[cfg(feature = "puffin")]
            puffin::profile_scope!("system", system.name());

            let _span = tracing::debug_span!("system", name = system.name()).entered();
            system.update(entities);
        }
    }

    /// Returns the names of the systems in execution order
    pub fn system_names(&self) -> impl Iterator<Item = &str> {
        self.systems.iter().map(BoxedSystem::name)
    }

    /// Returns the number of systems
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Returns true if the schedule has no systems
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

/// Builds a [`Schedule`]
#[derive(Default, Debug)]
pub struct ScheduleBuilder {
    systems: Vec<BoxedSystem>,
}

impl ScheduleBuilder {
    /// Add a new system to the schedule, named after [`EntitySystem::name`].
    pub fn with_system<S: EntitySystem + 'static>(&mut self, system: S) -> &mut Self {
        self.systems.push(BoxedSystem::new(system));
        self
    }

    /// Add a new named system to the schedule.
    pub fn with_named_system<S: EntitySystem + 'static>(
        &mut self,
        name: impl Into<String>,
        system: S,
    ) -> &mut Self {
        self.systems.push(BoxedSystem::named(name, system));
        self
    }

    /// Build the schedule, leaving the builder empty
    pub fn build(&mut self) -> Schedule {
        Schedule {
            systems: core::mem::take(&mut self.systems),
        }
    }
}
