//! A small entity component system with typed queries and a synchronous event
//! bus.
//!
//! An [`Entity`] is an identity and a bag of components. Components are plain
//! values of any type implementing the [`Component`] marker, and are looked up
//! by their concrete type.
//!
//! Systems implement [`EntitySystem`] and are run once per frame by a
//! [`Schedule`] in a fixed order. Inside a system, an [`EntityQuery`] finds the
//! entities which have a given set of components and hands them out as a
//! statically typed tuple.
//!
//! Systems do not call each other. They communicate by dispatching an
//! [`Event`] through an [`EventDispatcher`], which delivers it synchronously
//! to every registered [`EventListener`].
//!
//! # Features
//! - `flume`: implements [`EventListener`] for `flume::Sender<Event>`
//! - `serde`: (de)serialization of events and entity ids
//! - `puffin`: profiling scopes for schedules and dispatch

extern crate alloc;

#[macro_use]
mod macros;

mod component;
mod entity;
/// Error types
pub mod error;
pub mod events;
mod fetch;
mod query;
mod schedule;
mod system;

pub use component::*;
pub use entity::*;
pub use error::{Error, Result};
pub use events::{
    listener_fn, DispatchSummary, Event, EventArg, EventDispatcher, EventId, EventKind,
    EventListener, FnListener, ListenerHandle, ListenerMut, ListenerRef,
};
pub use fetch::*;
pub use query::*;
pub use schedule::*;
pub use system::*;
