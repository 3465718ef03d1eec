mod iter;

use alloc::rc::Rc;
use core::{fmt, marker::PhantomData};

pub use iter::*;

use crate::{error::Result, fetch::describe_fetch, Entity, EntityId, Error, Fetch};

/// A single match of a query: the entity and the requested components, in the
/// order they were requested.
pub struct QueryItem<'a, Q: Fetch<'a>> {
    /// The matched entity
    pub entity: &'a Entity,
    /// The borrowed components
    pub components: Q::Item,
}

impl<'a, Q> fmt::Debug for QueryItem<'a, Q>
where
    Q: Fetch<'a>,
    Q::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryItem")
            .field("entity", &self.entity.id())
            .field("components", &self.components)
            .finish()
    }
}

type Predicate<'a, Q> = Rc<dyn Fn(&QueryItem<'a, Q>) -> bool + 'a>;

/// A chainable query over a fixed snapshot of entities.
///
/// The query is built by requesting a tuple of component types with
/// [`with_components`](Self::with_components) and optionally refined with a
/// predicate using [`filter`](Self::filter). Every builder call returns a new
/// query and leaves the receiver untouched, so a partially built query can be
/// reused as the base of several others.
///
/// Results are produced lazily by one of the terminal operations, which scan
/// the whole snapshot every time. There is no indexing or caching between
/// calls.
///
/// ```rust
/// use bulwark::{component, Entity, EntityQuery};
///
/// struct Health { hp: u32, max: u32 }
/// #[derive(PartialEq)]
/// enum Team { Player, Enemy }
///
/// component! { Health, Team }
///
/// let entities = vec![
///     Entity::builder().set(Health { hp: 50, max: 100 }).set(Team::Enemy).build(),
///     Entity::builder().set(Health { hp: 100, max: 100 }).set(Team::Player).build(),
/// ];
///
/// let wounded = EntityQuery::from(&entities)
///     .with_components::<(Health, Team)>()
///     .filter(|item| item.components.0.hp < item.components.0.max)
///     .execute()?;
///
/// assert_eq!(wounded.len(), 1);
/// assert!(*wounded[0].components.1 == Team::Enemy);
/// # Ok::<_, bulwark::Error>(())
/// ```
pub struct EntityQuery<'a, Q: Fetch<'a> = ()> {
    entities: &'a [Entity],
    predicate: Option<Predicate<'a, Q>>,
    marker: PhantomData<fn() -> Q>,
}

impl<'a> EntityQuery<'a, ()> {
    /// Construct a new query over a snapshot of entities.
    ///
    /// Component types must be requested using
    /// [`with_components`](Self::with_components) before the query can be
    /// executed.
    #[allow(clippy::should_implement_trait)]
    pub fn from(entities: &'a [Entity]) -> Self {
        Self {
            entities,
            predicate: None,
            marker: PhantomData,
        }
    }
}

impl<'a, Q: Fetch<'a>> EntityQuery<'a, Q> {
    /// Returns a new query yielding the entities which have *all* component
    /// types of `R`.
    ///
    /// `R` is either a single component type or a tuple of them. Wrap a type
    /// in [`Mut`](crate::Mut) to borrow it mutably and in
    /// [`Opt`](crate::Opt) to not require it.
    ///
    /// Any predicate set on the receiver is not carried over, as it was
    /// written against a different set of components.
    pub fn with_components<R: Fetch<'a>>(&self) -> EntityQuery<'a, R> {
        EntityQuery {
            entities: self.entities,
            predicate: None,
            marker: PhantomData,
        }
    }

    /// Returns a new query which additionally requires `predicate` to hold
    /// for each match.
    ///
    /// **Note**: predicates do not compose. Calling `filter` on an already
    /// filtered query replaces the previous predicate, so only the last one
    /// applies.
    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&QueryItem<'a, Q>) -> bool + 'a,
    {
        Self {
            entities: self.entities,
            predicate: Some(Rc::new(predicate)),
            marker: PhantomData,
        }
    }

    /// Returns true if a predicate is set
    pub fn is_filtered(&self) -> bool {
        self.predicate.is_some()
    }

    /// Lazily iterate the matches in snapshot order.
    ///
    /// Fails if no component types have been requested.
    pub fn iter(&self) -> Result<QueryIter<'a, Q>> {
        self.validate()?;
        Ok(QueryIter::new(self.entities, self.predicate.clone()))
    }

    /// Returns every match in snapshot order
    pub fn execute(&self) -> Result<Vec<QueryItem<'a, Q>>> {
        Ok(self.iter()?.collect())
    }

    /// Returns the matching entities in snapshot order.
    ///
    /// Components are only borrowed if a predicate needs to inspect them.
    pub fn execute_entities(&self) -> Result<Vec<&'a Entity>> {
        self.validate()?;
        if self.predicate.is_none() {
            Ok(self.unfiltered().collect())
        } else {
            Ok(self.iter()?.map(|item| item.entity).collect())
        }
    }

    /// Returns the first match, if any
    pub fn execute_first(&self) -> Result<Option<QueryItem<'a, Q>>> {
        Ok(self.iter()?.next())
    }

    /// Returns the number of matches.
    ///
    /// Components are only borrowed if a predicate needs to inspect them.
    pub fn execute_count(&self) -> Result<usize> {
        self.validate()?;
        if self.predicate.is_none() {
            Ok(self.unfiltered().count())
        } else {
            Ok(self.iter()?.count())
        }
    }

    /// Execute the query for a single entity of the snapshot.
    ///
    /// Returns `None` if the entity is not part of the snapshot or does not
    /// match.
    pub fn get(&self, id: EntityId) -> Result<Option<QueryItem<'a, Q>>> {
        self.validate()?;
        let Some(index) = self.entities.iter().position(|v| v.id() == id) else {
            return Ok(None);
        };

        Ok(QueryIter::new(&self.entities[index..=index], self.predicate.clone()).next())
    }

    fn validate(&self) -> Result<()> {
        if Q::ARITY == 0 {
            return Err(Error::NoComponentTypes);
        }

        Ok(())
    }

    fn unfiltered(&self) -> impl Iterator<Item = &'a Entity> {
        self.entities.iter().filter(|entity| Q::matches(entity))
    }
}

impl<'a, Q: Fetch<'a>> Clone for EntityQuery<'a, Q> {
    fn clone(&self) -> Self {
        Self {
            entities: self.entities,
            predicate: self.predicate.clone(),
            marker: PhantomData,
        }
    }
}

impl<'a, Q: Fetch<'a>> fmt::Debug for EntityQuery<'a, Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityQuery")
            .field("entities", &self.entities.len())
            .field("components", &describe_fetch::<Q>())
            .field("filtered", &self.predicate.is_some())
            .finish()
    }
}
