//! Input events and the subscription bus
//!
//! The host pushes raw events into an `InputQueue` and publishes them on the
//! `EventBus` once per frame. Each subscriber owns a mailbox on the bus;
//! withdrawing a subscription drops its mailbox, so nothing queued for a
//! torn-down entity can ever be delivered.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Debug: force game over
    R,
    /// Any other key, by host key code
    Other(u32),
}

/// UI buttons wired by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonId {
    Play,
    Hardcore,
    Opp,
    Skin,
    Retry,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// A touch/click began at world coordinates (x, y)
    PointerDown { x: f32, y: f32 },
    KeyDown(Key),
    /// A UI button was clicked/tapped
    Button(ButtonId),
}

impl InputEvent {
    pub fn topic(&self) -> Topic {
        match self {
            InputEvent::PointerDown { .. } => Topic::Pointer,
            InputEvent::KeyDown(_) => Topic::Key,
            InputEvent::Button(_) => Topic::Button,
        }
    }
}

/// Event category a subscriber listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Pointer,
    Key,
    Button,
}

/// A queue of raw input events, filled by the host and drained each frame
#[derive(Debug, Default)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(16),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Take all pending events, leaving the queue empty
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Handle for one topic subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

struct Mailbox {
    topic: Topic,
    pending: Vec<InputEvent>,
}

/// Subscription registry with one mailbox per subscription
#[derive(Default)]
pub struct EventBus {
    next_id: u32,
    mailboxes: HashMap<SubscriptionId, Mailbox>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, topic: Topic) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.mailboxes.insert(
            id,
            Mailbox {
                topic,
                pending: Vec::new(),
            },
        );
        log::trace!("Subscribed {:?} to {:?}", id, topic);
        id
    }

    /// Withdraw a subscription, discarding anything still queued for it.
    /// Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.mailboxes.remove(&id).is_some()
    }

    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.mailboxes.contains_key(&id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.mailboxes.len()
    }

    /// Deliver an event to every mailbox listening on its topic.
    /// Returns how many subscribers received it.
    pub fn publish(&mut self, event: InputEvent) -> usize {
        let topic = event.topic();
        let mut delivered = 0;
        for mailbox in self.mailboxes.values_mut().filter(|m| m.topic == topic) {
            mailbox.pending.push(event);
            delivered += 1;
        }
        if delivered == 0 {
            log::trace!("Dropped {:?}: no subscribers", event);
        }
        delivered
    }

    /// Publish everything pending in a queue, in order
    pub fn publish_all(&mut self, queue: &mut InputQueue) {
        for event in queue.drain() {
            self.publish(event);
        }
    }

    /// Take the events queued for a subscription
    pub fn take(&mut self, id: SubscriptionId) -> Vec<InputEvent> {
        self.mailboxes
            .get_mut(&id)
            .map(|m| std::mem::take(&mut m.pending))
            .unwrap_or_default()
    }
}

/// A set of subscriptions held by one entity, withdrawn together
#[derive(Debug, Default)]
pub struct Subscriptions {
    ids: Vec<SubscriptionId>,
}

impl Subscriptions {
    pub fn subscribe(bus: &mut EventBus, topics: &[Topic]) -> Self {
        Self {
            ids: topics.iter().map(|t| bus.subscribe(*t)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Drain every mailbox in subscription order
    pub fn take_all(&self, bus: &mut EventBus) -> Vec<InputEvent> {
        self.ids.iter().flat_map(|id| bus.take(*id)).collect()
    }

    pub fn withdraw(self, bus: &mut EventBus) {
        for id in self.ids {
            bus.unsubscribe(id);
        }
    }
}
