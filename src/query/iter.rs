use core::{iter::FusedIterator, slice::Iter};

use crate::{Entity, Fetch};

use super::{Predicate, QueryItem};

/// Lazily yields the matches of an [`EntityQuery`](super::EntityQuery)
pub struct QueryIter<'a, Q: Fetch<'a>> {
    entities: Iter<'a, Entity>,
    predicate: Option<Predicate<'a, Q>>,
}

impl<'a, Q: Fetch<'a>> QueryIter<'a, Q> {
    pub(super) fn new(entities: &'a [Entity], predicate: Option<Predicate<'a, Q>>) -> Self {
        Self {
            entities: entities.iter(),
            predicate,
        }
    }
}

impl<'a, Q: Fetch<'a>> Iterator for QueryIter<'a, Q> {
    type Item = QueryItem<'a, Q>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entity = self.entities.next()?;
            if !Q::matches(entity) {
                continue;
            }

            let Some(components) = Q::fetch(entity) else {
                continue;
            };

            let item = QueryItem { entity, components };
            match &self.predicate {
                Some(predicate) if !predicate(&item) => continue,
                _ => return Some(item),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.entities.len()))
    }
}

impl<'a, Q: Fetch<'a>> FusedIterator for QueryIter<'a, Q> {}
