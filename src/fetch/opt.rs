use core::{fmt, marker::PhantomData};

use crate::Entity;

use super::Fetch;

/// Transform a fetch into an optional fetch.
///
/// Matches every entity and yields `None` in place of the inner item when the
/// entity lacks the inner components.
pub struct Opt<F>(PhantomData<fn() -> F>);

impl<'a, F: Fetch<'a>> Fetch<'a> for Opt<F> {
    type Item = Option<F::Item>;

    const ARITY: usize = 1;

    #[inline]
    fn matches(_: &Entity) -> bool {
        true
    }

    #[inline]
    fn fetch(entity: &'a Entity) -> Option<Self::Item> {
        if F::matches(entity) {
            Some(F::fetch(entity))
        } else {
            Some(None)
        }
    }

    fn describe(f: &mut dyn fmt::Write) -> fmt::Result {
        f.write_str("Opt<")?;
        F::describe(f)?;
        f.write_str(">")
    }
}
