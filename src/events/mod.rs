//! Synchronous communication between systems.
//!
//! Systems do not reference each other. Instead they describe what happened
//! as an [`Event`] and hand it to an [`EventDispatcher`], which immediately
//! delivers it to every registered [`EventListener`].
mod args;
mod dispatcher;

use alloc::collections::BTreeMap;
use core::fmt;
use core::num::NonZeroU64;
use core::sync::atomic::{AtomicU64, Ordering};

use glam::Vec3;

pub use args::*;
pub use dispatcher::*;

use crate::{error::Result, EntityId, Error};

/// The kind of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    /// An entity took damage
    DamageDealt,
    /// An entity's health reached zero
    EntityKilled,
    /// An entity was stunned
    StunApplied,
    /// A stun wore off
    StunExpired,
    /// An entity was pushed back
    KnockbackApplied,
    /// A status effect, such as a burn or a slow, was applied
    StatusEffectApplied,
    /// A status effect ran out
    StatusEffectExpired,
    /// A ranged attack launched a projectile
    ProjectileFired,
    /// A projectile reached its target
    ProjectileHit,
    /// An entity stepped on a tile
    TileActivated,
    /// A new wave of enemies started spawning
    WaveStarted,
    /// Every enemy of the wave was defeated
    WaveCleared,
    /// The player's core was damaged
    CoreDamaged,
    /// The player's core was destroyed
    CoreDestroyed,
    /// Currency was awarded to the player
    CurrencyEarned,
    /// An upgrade was bought in the shop
    UpgradePurchased,
}

/// Unique identifier of an event instance
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct EventId(NonZeroU64);

static NEXT_EVENT_ID: AtomicU64 = AtomicU64::new(1);

impl EventId {
    fn acquire() -> Self {
        let index = NEXT_EVENT_ID.fetch_add(1, Ordering::Relaxed);
        Self(NonZeroU64::new(index).expect("Event id space exhausted"))
    }
}

impl fmt::Debug for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EventId").field(&self.0.get()).finish()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0.get())
    }
}

/// Describes something which happened, such as an enemy dying.
///
/// An event is a kind, a bag of named arguments and a unique id. Events are
/// assembled with [`with_arg`](Self::with_arg) and treated as immutable once
/// dispatched.
///
/// ```rust
/// use bulwark::{Entity, Event, EventKind};
///
/// let enemy = Entity::new();
/// let event = Event::new(EventKind::DamageDealt)
///     .with_arg("target", enemy.id())
///     .with_arg("amount", 12.5)
///     .with_arg("critical", false);
///
/// assert_eq!(event.number("amount")?, 12.5);
/// assert_eq!(event.entity("target")?, enemy.id());
/// assert!(event.number("critical").is_err());
/// # Ok::<_, bulwark::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    id: EventId,
    kind: EventKind,
    args: BTreeMap<String, EventArg>,
}

impl Event {
    /// Creates a new event without arguments
    pub fn new(kind: EventKind) -> Self {
        Self {
            id: EventId::acquire(),
            kind,
            args: BTreeMap::new(),
        }
    }

    /// Creates a new event from a set of named arguments
    pub fn from_args<K, V>(kind: EventKind, args: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<EventArg>,
    {
        Self {
            id: EventId::acquire(),
            kind,
            args: args
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Sets an argument, replacing any previous value of the same name
    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<EventArg>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    /// Returns the unique id of this event
    pub fn id(&self) -> EventId {
        self.id
    }

    /// Returns the kind of the event
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Returns all arguments
    pub fn args(&self) -> &BTreeMap<String, EventArg> {
        &self.args
    }

    /// Returns the argument of the given name, if any
    pub fn arg(&self, name: &str) -> Option<&EventArg> {
        self.args.get(name)
    }

    /// Returns true if the argument is present
    pub fn has_arg(&self, name: &str) -> bool {
        self.args.contains_key(name)
    }

    /// Returns the string argument `name`.
    ///
    /// Fails with [`Error::MissingArg`] if there is no such argument, or
    /// [`Error::ArgType`] if it holds another type. The same applies to the
    /// other typed accessors.
    pub fn str(&self, name: &str) -> Result<&str> {
        self.typed(name, "string", EventArg::as_str)
    }

    /// Returns the number argument `name`
    pub fn number(&self, name: &str) -> Result<f64> {
        self.typed(name, "number", EventArg::as_number)
    }

    /// Returns the boolean argument `name`
    pub fn flag(&self, name: &str) -> Result<bool> {
        self.typed(name, "bool", EventArg::as_bool)
    }

    /// Returns the vector argument `name`
    pub fn vec3(&self, name: &str) -> Result<Vec3> {
        self.typed(name, "vec3", EventArg::as_vec3)
    }

    /// Returns the entity argument `name`
    pub fn entity(&self, name: &str) -> Result<EntityId> {
        self.typed(name, "entity", EventArg::as_entity)
    }

    /// Returns the string list argument `name`
    pub fn str_list(&self, name: &str) -> Result<&[String]> {
        self.typed(name, "string list", EventArg::as_str_list)
    }

    fn typed<'a, T>(
        &'a self,
        name: &str,
        expected: &'static str,
        f: impl FnOnce(&'a EventArg) -> Option<T>,
    ) -> Result<T> {
        let arg = self
            .arg(name)
            .ok_or_else(|| Error::MissingArg(self.kind, name.into()))?;

        f(arg).ok_or_else(|| Error::ArgType {
            kind: self.kind,
            name: name.into(),
            expected,
            found: arg.kind_name(),
        })
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{}", self.kind, self.id)?;
        let mut args = f.debug_map();
        for (name, value) in &self.args {
            args.entry(name, &format_args!("{value}"));
        }
        args.finish()
    }
}
