use alloc::{collections::VecDeque, sync::Arc};
use core::{
    any::Any,
    fmt,
    ops::{Deref, DerefMut},
    panic::AssertUnwindSafe,
};
use std::panic;

use atomic_refcell::{AtomicRef, AtomicRefCell, AtomicRefMut};
use indexmap::IndexMap;
use itertools::Itertools;
use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};
use smallvec::SmallVec;

use super::Event;
use crate::{Entity, EntitySystem};

/// Handles events delivered by an [`EventDispatcher`].
///
/// Returning an error, or panicking, does not affect the delivery of the
/// event to other listeners. The failure is logged by the dispatcher and
/// otherwise ignored.
pub trait EventListener: Send + Sync + 'static {
    /// Called once for every dispatched event
    fn on_event(&mut self, event: &Event) -> anyhow::Result<()>;
}

/// Listener backed by a closure, created with [`listener_fn`]
pub struct FnListener<F>(F);

/// Create a listener from a closure
pub fn listener_fn<F>(f: F) -> FnListener<F>
where
    F: FnMut(&Event) -> anyhow::Result<()> + Send + Sync + 'static,
{
    FnListener(f)
}

impl<F> EventListener for FnListener<F>
where
    F: FnMut(&Event) -> anyhow::Result<()> + Send + Sync + 'static,
{
    fn on_event(&mut self, event: &Event) -> anyhow::Result<()> {
        (self.0)(event)
    }
}

#[cfg(feature = "flume")]
impl EventListener for flume::Sender<Event> {
    fn on_event(&mut self, event: &Event) -> anyhow::Result<()> {
        self.send(event.clone())
            .map_err(|_| anyhow::anyhow!("The receiving end of the channel was dropped"))
    }
}

/// Shared ownership of a registered listener.
///
/// The listener's state can be inspected and mutated through
/// [`borrow`](Self::borrow) and [`borrow_mut`](Self::borrow_mut). Events
/// dispatched while the listener is borrowed are not lost: they are deferred
/// and delivered, in order, as soon as the borrow is released.
pub struct ListenerHandle<L> {
    cell: Arc<ListenerCell<L>>,
}

impl<L: EventListener> ListenerHandle<L> {
    /// Wraps a listener so it can be shared with a dispatcher
    pub fn new(listener: L) -> Self {
        Self {
            cell: Arc::new(ListenerCell {
                listener: AtomicRefCell::new(listener),
                pending: Mutex::new(VecDeque::new()),
            }),
        }
    }

    /// Borrow the listener.
    ///
    /// # Panics
    /// If the listener is currently borrowed mutably
    pub fn borrow(&self) -> ListenerRef<'_, L> {
        ListenerRef {
            guard: self.cell.listener.borrow(),
            _flush: Flush(&self.cell),
        }
    }

    /// Mutably borrow the listener.
    ///
    /// # Panics
    /// If the listener is currently borrowed
    pub fn borrow_mut(&self) -> ListenerMut<'_, L> {
        ListenerMut {
            guard: self.cell.listener.borrow_mut(),
            _flush: Flush(&self.cell),
        }
    }

    /// Returns the number of events waiting for the listener to be released
    pub fn pending(&self) -> usize {
        self.cell.pending.lock().len()
    }
}

impl<L> Clone for ListenerHandle<L> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<L> fmt::Debug for ListenerHandle<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("listener", &tynm::type_name::<L>())
            .field("pending", &self.cell.pending.lock().len())
            .finish()
    }
}

/// A listener which is also run as a system, such as a tracker updated both
/// from events and every frame.
///
/// Events the system dispatches to itself during its update are delivered
/// once the update returns.
impl<L: EventListener + EntitySystem> EntitySystem for ListenerHandle<L> {
    fn update(&mut self, entities: &mut [Entity]) {
        self.borrow_mut().update(entities)
    }

    fn name(&self) -> String {
        tynm::type_name::<L>()
    }
}

/// Shared borrow of a listener through its [`ListenerHandle`]
pub struct ListenerRef<'a, L: EventListener> {
    // Released before deferred events are flushed
    guard: AtomicRef<'a, L>,
    _flush: Flush<'a, L>,
}

impl<'a, L: EventListener> Deref for ListenerRef<'a, L> {
    type Target = L;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

/// Exclusive borrow of a listener through its [`ListenerHandle`]
pub struct ListenerMut<'a, L: EventListener> {
    guard: AtomicRefMut<'a, L>,
    _flush: Flush<'a, L>,
}

impl<'a, L: EventListener> Deref for ListenerMut<'a, L> {
    type Target = L;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl<'a, L: EventListener> DerefMut for ListenerMut<'a, L> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}

/// Delivers deferred events once the borrow guard next to it is dropped
struct Flush<'a, L: EventListener>(&'a ListenerCell<L>);

impl<'a, L: EventListener> Drop for Flush<'a, L> {
    fn drop(&mut self) {
        self.0.flush();
    }
}

struct ListenerCell<L> {
    listener: AtomicRefCell<L>,
    /// Events dispatched while the listener was borrowed
    pending: Mutex<VecDeque<Event>>,
}

impl<L: EventListener> ListenerCell<L> {
    fn flush(&self) {
        if self.pending.lock().is_empty() {
            return;
        }

        // Still borrowed elsewhere, the last guard to go flushes
        if let Ok(mut listener) = self.listener.try_borrow_mut() {
            self.drain(&mut listener);
        }
    }

    fn drain(&self, listener: &mut L) {
        loop {
            // The lock must not be held while the listener runs, as it may
            // dispatch events back to itself
            let next = self.pending.lock().pop_front();
            let Some(event) = next else {
                break;
            };

            if let Err(err) = handle(listener, &event) {
                tracing::error!(
                    listener = %tynm::type_name::<L>(),
                    event = %event.id(),
                    kind = ?event.kind(),
                    "Deferred delivery failed: {err:#}"
                );
            }
        }
    }
}

/// Runs the listener, turning a panic into an error
fn handle<L: EventListener>(listener: &mut L, event: &Event) -> anyhow::Result<()> {
    match panic::catch_unwind(AssertUnwindSafe(|| listener.on_event(event))) {
        Ok(result) => result,
        Err(payload) => Err(anyhow::anyhow!(
            "Listener panicked: {}",
            panic_message(&*payload)
        )),
    }
}

/// Type erased listener as stored in the registry
trait ErasedListener: Send + Sync {
    /// Returns `None` if the listener is borrowed and the event was deferred
    fn deliver(&self, event: &Event) -> Option<anyhow::Result<()>>;
}

impl<L: EventListener> ErasedListener for ListenerCell<L> {
    fn deliver(&self, event: &Event) -> Option<anyhow::Result<()>> {
        let Ok(mut listener) = self.listener.try_borrow_mut() else {
            self.pending.lock().push_back(event.clone());
            // The borrow may have been released in the meantime
            self.flush();
            return None;
        };

        // Earlier deferred events go first to preserve the order
        self.drain(&mut listener);
        let result = handle(&mut *listener, event);
        // Events the listener dispatched back to itself
        self.drain(&mut listener);

        Some(result)
    }
}

type SharedListener = Arc<dyn ErasedListener>;

/// Outcome of a single [`EventDispatcher::dispatch`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Number of listeners which handled the event successfully
    pub delivered: usize,
    /// Number of listeners which were borrowed, and will receive the event
    /// once released
    pub deferred: usize,
    /// Number of listeners which failed or panicked
    pub failed: usize,
}

static GLOBAL: Lazy<EventDispatcher> = Lazy::new(EventDispatcher::new);

/// Synchronously delivers events to a set of listeners, each registered under
/// a unique key.
///
/// Registering a listener under a key which is already taken replaces the
/// previous listener and moves the key to the back of the delivery order.
/// Listeners are otherwise delivered to in the order they were registered.
///
/// A process wide dispatcher is available through [`EventDispatcher::global`],
/// though passing a dispatcher explicitly to the systems which need it keeps
/// them testable in isolation.
///
/// Listeners may dispatch further events, and register or deregister
/// listeners, from within [`EventListener::on_event`]. Each dispatch delivers
/// to the listeners registered at the time it started.
pub struct EventDispatcher {
    listeners: RwLock<IndexMap<Arc<str>, SharedListener>>,
}

impl EventDispatcher {
    /// Creates a new dispatcher without any listeners
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(IndexMap::new()),
        }
    }

    /// Returns the process wide dispatcher, creating it on first access
    pub fn global() -> &'static EventDispatcher {
        &GLOBAL
    }

    /// Register a listener under `key`, replacing any listener already
    /// registered under the same key.
    ///
    /// Returns a handle to the listener, through which its state can be
    /// inspected after events have been delivered.
    pub fn register_listener<L: EventListener>(
        &self,
        key: impl Into<String>,
        listener: L,
    ) -> ListenerHandle<L> {
        let handle = ListenerHandle::new(listener);
        self.register_shared(key, handle.clone());
        handle
    }

    /// Register a listener which is already shared, replacing any listener
    /// already registered under the same key.
    pub fn register_shared<L: EventListener>(
        &self,
        key: impl Into<String>,
        handle: ListenerHandle<L>,
    ) {
        let key: Arc<str> = key.into().into();
        let mut listeners = self.listeners.write();

        if listeners.shift_remove(&key).is_some() {
            tracing::debug!(%key, listener = %tynm::type_name::<L>(), "Replacing listener");
        } else {
            tracing::debug!(%key, listener = %tynm::type_name::<L>(), "Registering listener");
        }

        listeners.insert(key, handle.cell);
    }

    /// Remove the listener registered under `key`.
    ///
    /// Returns false if there was no such listener.
    pub fn deregister_listener(&self, key: &str) -> bool {
        let removed = self.listeners.write().shift_remove(key).is_some();
        if removed {
            tracing::debug!(%key, "Deregistered listener");
        }

        removed
    }

    /// Returns true if a listener is registered under `key`
    pub fn contains_listener(&self, key: &str) -> bool {
        self.listeners.read().contains_key(key)
    }

    /// Returns the keys of all listeners in delivery order
    pub fn listener_keys(&self) -> Vec<String> {
        self.listeners.read().keys().map(|v| v.to_string()).collect()
    }

    /// Returns the number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    /// Returns true if no listeners are registered
    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    /// Deliver `event` to every registered listener, in registration order.
    ///
    /// Returns once every listener has handled the event. A listener which
    /// fails or panics is logged and skipped; the remaining listeners still
    /// receive the event.
    pub fn dispatch(&self, event: &Event) -> DispatchSummary {
        #[cfg(feature = "puffin")]
        puffin::profile_function!();

        // Release the registry before delivering, as listeners may register
        // or dispatch themselves
        let listeners: SmallVec<[(Arc<str>, SharedListener); 16]> = self
            .listeners
            .read()
            .iter()
            .map(|(key, listener)| (key.clone(), listener.clone()))
            .collect();

        tracing::trace!(
            event = %event.id(),
            kind = ?event.kind(),
            listeners = listeners.len(),
            "Dispatching event"
        );

        let mut summary = DispatchSummary::default();
        for (key, listener) in listeners {
            match listener.deliver(event) {
                Some(Ok(())) => summary.delivered += 1,
                Some(Err(err)) => {
                    summary.failed += 1;
                    tracing::error!(
                        listener = %key,
                        event = %event.id(),
                        kind = ?event.kind(),
                        "Listener failed: {err:#}"
                    );
                }
                None => {
                    summary.deferred += 1;
                    tracing::trace!(listener = %key, event = %event.id(), "Listener busy, deferring");
                }
            }
        }

        summary
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        *msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "Box<dyn Any>"
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field(
                "listeners",
                &format_args!("[{}]", self.listeners.read().keys().join(", ")),
            )
            .finish()
    }
}
