//! Typed observer registry for stroke lifecycle notifications.

/// A stroke lifecycle notification with surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PadEvent {
    /// A stroke is about to open. Cancelable: any subscriber returning
    /// `false` prevents it.
    StrokeBegin { x: f32, y: f32 },
    /// A sampling call finished; coordinates are the last committed point.
    StrokeUpdate { x: f32, y: f32 },
    /// A stroke closed at the given committed coordinates.
    StrokeEnd { x: f32, y: f32 },
}

impl PadEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            PadEvent::StrokeBegin { .. } => EventKind::StrokeBegin,
            PadEvent::StrokeUpdate { .. } => EventKind::StrokeUpdate,
            PadEvent::StrokeEnd { .. } => EventKind::StrokeEnd,
        }
    }
}

/// Discriminant used when subscribing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    StrokeBegin,
    StrokeUpdate,
    StrokeEnd,
}

/// Handle returned by `subscribe`, used to remove the listener again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionToken(u64);

type Handler = Box<dyn Fn(&PadEvent) -> bool + Send>;

struct Subscription {
    id: u64,
    kind: EventKind,
    handler: Handler,
}

/// Listener registry, decoupled from any host UI toolkit.
///
/// Dispatch is synchronous and runs handlers in subscription order.
#[derive(Default)]
pub struct EventHub {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one event kind.
    ///
    /// The handler's return value only matters for cancelable events:
    /// returning `false` vetoes a [`PadEvent::StrokeBegin`]; it is ignored
    /// for the informational kinds.
    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F) -> SubscriptionToken
    where
        F: Fn(&PadEvent) -> bool + Send + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            kind,
            handler: Box::new(handler),
        });
        SubscriptionToken(id)
    }

    /// Remove a previously registered handler.
    ///
    /// Returns `false` when the token is unknown (e.g. already removed).
    pub fn unsubscribe(&mut self, token: SubscriptionToken) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != token.0);
        self.subscriptions.len() != before
    }

    /// Dispatch to matching handlers.
    ///
    /// Returns `false` when any handler vetoed the event.
    pub fn dispatch(&self, event: &PadEvent) -> bool {
        let mut proceed = true;
        for subscription in self.subscriptions.iter().filter(|s| s.kind == event.kind()) {
            proceed &= (subscription.handler)(event);
        }
        proceed
    }
}
