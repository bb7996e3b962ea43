//! Broadcast channels for duel and rating events, one per topic.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::broadcast;

use super::types::{DuelEvent, RatingEvent};

/// Which stream an event travels on.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Session lifecycle, summons, clashes, teardown
    Duel,
    /// Registrations and Elo updates
    Rating,
}

/// Anything published on the bus. The variant decides the topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Duel(DuelEvent),
    Rating(RatingEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Duel(_) => Topic::Duel,
            Event::Rating(_) => Topic::Rating,
        }
    }
}

impl From<DuelEvent> for Event {
    fn from(event: DuelEvent) -> Self {
        Event::Duel(event)
    }
}

impl From<RatingEvent> for Event {
    fn from(event: RatingEvent) -> Self {
        Event::Rating(event)
    }
}

/// Fan-out of runtime events to observers.
///
/// Observers pick the topics they follow; a rating dashboard never sees clash
/// traffic. Clones publish into the same channels.
#[derive(Clone)]
pub struct EventBus {
    duel: broadcast::Sender<Event>,
    rating: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// `capacity` events are buffered per topic before slow observers lag.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            duel: broadcast::channel(capacity).0,
            rating: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Duel => &self.duel,
            Topic::Rating => &self.rating,
        }
    }

    /// Best-effort send; an event nobody listens for is simply dropped.
    pub fn publish(&self, event: impl Into<Event>) {
        let event = event.into();
        let topic = event.topic();

        if self.sender(topic).send(event).is_err() {
            tracing::trace!(?topic, "Event dropped, no observers");
        }
    }

    /// Receiver for events published from now on to `topic`.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// One receiver per requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
