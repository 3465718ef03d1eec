use core::fmt;

use glam::Vec3;

use crate::EntityId;

/// A single argument value carried by an [`Event`](super::Event).
///
/// The set of value kinds is closed. Anything richer has to be expressed
/// through these, for example by referring to an entity and letting the
/// listener look up its components.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventArg {
    /// A string
    Str(String),
    /// A number
    Number(f64),
    /// A boolean flag
    Bool(bool),
    /// A point or direction in world space
    Vec3(Vec3),
    /// A reference to an entity
    Entity(EntityId),
    /// A list of strings, such as the names of applied status effects
    StrList(Vec<String>),
}

impl EventArg {
    /// Returns the name of the value kind, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            EventArg::Str(_) => "string",
            EventArg::Number(_) => "number",
            EventArg::Bool(_) => "bool",
            EventArg::Vec3(_) => "vec3",
            EventArg::Entity(_) => "entity",
            EventArg::StrList(_) => "string list",
        }
    }

    /// Returns the string, if this is an [`EventArg::Str`]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            EventArg::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the number, if this is an [`EventArg::Number`]
    pub fn as_number(&self) -> Option<f64> {
        match *self {
            EventArg::Number(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the flag, if this is an [`EventArg::Bool`]
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            EventArg::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the vector, if this is an [`EventArg::Vec3`]
    pub fn as_vec3(&self) -> Option<Vec3> {
        match *self {
            EventArg::Vec3(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the entity id, if this is an [`EventArg::Entity`]
    pub fn as_entity(&self) -> Option<EntityId> {
        match *self {
            EventArg::Entity(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the strings, if this is an [`EventArg::StrList`]
    pub fn as_str_list(&self) -> Option<&[String]> {
        match self {
            EventArg::StrList(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for EventArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventArg::Str(v) => write!(f, "{v:?}"),
            EventArg::Number(v) => write!(f, "{v}"),
            EventArg::Bool(v) => write!(f, "{v}"),
            EventArg::Vec3(v) => write!(f, "{v}"),
            EventArg::Entity(v) => write!(f, "entity {v}"),
            EventArg::StrList(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<String> for EventArg {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for EventArg {
    fn from(v: &str) -> Self {
        Self::Str(v.into())
    }
}

impl From<f64> for EventArg {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<f32> for EventArg {
    fn from(v: f32) -> Self {
        Self::Number(v.into())
    }
}

impl From<i32> for EventArg {
    fn from(v: i32) -> Self {
        Self::Number(v.into())
    }
}

impl From<u32> for EventArg {
    fn from(v: u32) -> Self {
        Self::Number(v.into())
    }
}

impl From<bool> for EventArg {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Vec3> for EventArg {
    fn from(v: Vec3) -> Self {
        Self::Vec3(v)
    }
}

impl From<EntityId> for EventArg {
    fn from(v: EntityId) -> Self {
        Self::Entity(v)
    }
}

impl From<Vec<String>> for EventArg {
    fn from(v: Vec<String>) -> Self {
        Self::StrList(v)
    }
}

impl From<&[&str]> for EventArg {
    fn from(v: &[&str]) -> Self {
        Self::StrList(v.iter().map(|v| v.to_string()).collect())
    }
}
