use thiserror::Error;

use crate::{events::EventKind, EntityId};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("The query was executed before any component types were requested. Call `with_components` first.")]
    NoComponentTypes,
    #[error("The entity {0} does not have the component {1:?}.")]
    MissingComponent(EntityId, String),
    #[error("The event {0:?} has no argument named {1:?}.")]
    MissingArg(EventKind, String),
    #[error("The argument {name:?} of event {kind:?} is a {found}, expected a {expected}.")]
    ArgType {
        kind: EventKind,
        name: String,
        expected: &'static str,
        found: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
