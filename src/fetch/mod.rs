mod component_mut;
mod opt;

use core::fmt;

pub use component_mut::*;
pub use opt::*;

use crate::{Component, ComponentRef, Entity};

/// Describes a set of component types which can be fetched from an entity.
///
/// Implemented for every [`Component`], which fetches a shared borrow, for
/// [`Mut`] and [`Opt`], and for tuples of fetches. The item of a tuple mirrors
/// the order of the tuple exactly.
pub trait Fetch<'a> {
    /// The borrowed data produced for a matching entity
    type Item;

    /// The number of component types requested by the fetch.
    ///
    /// A fetch with zero requested types is the unconfigured state of a query.
    const ARITY: usize;

    /// Returns true if `entity` has everything required by the fetch
    fn matches(entity: &Entity) -> bool;

    /// Borrow the requested components from the entity.
    ///
    /// Returns `None` if the entity does not match.
    ///
    /// # Panics
    /// If a requested component is already borrowed in a conflicting way
    fn fetch(entity: &'a Entity) -> Option<Self::Item>;

    /// Human friendly description of the fetch
    fn describe(f: &mut dyn fmt::Write) -> fmt::Result;
}

impl<'a, T: Component> Fetch<'a> for T {
    type Item = ComponentRef<'a, T>;

    const ARITY: usize = 1;

    #[inline]
    fn matches(entity: &Entity) -> bool {
        entity.has_component::<T>()
    }

    #[inline]
    fn fetch(entity: &'a Entity) -> Option<Self::Item> {
        entity.get_component::<T>()
    }

    fn describe(f: &mut dyn fmt::Write) -> fmt::Result {
        f.write_str(&tynm::type_name::<T>())
    }
}

impl<'a> Fetch<'a> for () {
    type Item = ();

    const ARITY: usize = 0;

    fn matches(_: &Entity) -> bool {
        true
    }

    fn fetch(_: &'a Entity) -> Option<Self::Item> {
        Some(())
    }

    fn describe(f: &mut dyn fmt::Write) -> fmt::Result {
        f.write_str("()")
    }
}

// Implement for tuples
macro_rules! tuple_impl {
    ($($idx: tt => $ty: ident),*) => {
        impl<'a, $($ty, )*> Fetch<'a> for ($($ty,)*)
            where $($ty: Fetch<'a>,)*
        {
            type Item = ($(<$ty as Fetch<'a>>::Item,)*);

            const ARITY: usize = 0 $(+ <$ty as Fetch<'a>>::ARITY)*;

            #[inline]
            fn matches(entity: &Entity) -> bool {
                $(<$ty as Fetch<'a>>::matches(entity)) && *
            }

            #[inline]
            fn fetch(entity: &'a Entity) -> Option<Self::Item> {
                Some(($(
                    <$ty as Fetch<'a>>::fetch(entity)?,
                )*))
            }

            fn describe(f: &mut dyn fmt::Write) -> fmt::Result {
                f.write_str("(")?;
                $(
                    if $idx != 0 {
                        f.write_str(", ")?;
                    }
                    <$ty as Fetch<'a>>::describe(f)?;
                )*
                f.write_str(")")
            }
        }
    };
}

tuple_impl! { 0 => A }
tuple_impl! { 0 => A, 1 => B }
tuple_impl! { 0 => A, 1 => B, 2 => C }
tuple_impl! { 0 => A, 1 => B, 2 => C, 3 => D }
tuple_impl! { 0 => A, 1 => B, 2 => C, 3 => D, 4 => E }
tuple_impl! { 0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F }
tuple_impl! { 0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F, 6 => H }
tuple_impl! { 0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F, 6 => H, 7 => I }

/// Returns a description of the fetch `Q`, such as `(Health, Mut<Position>)`
pub fn describe_fetch<'a, Q: Fetch<'a>>() -> String {
    let mut s = String::new();
    // Writing to a string never fails
    let _ = Q::describe(&mut s);
    s
}
