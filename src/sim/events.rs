//! Game events
//!
//! Discrete notifications produced during a tick. The core never talks to
//! audio or rendering directly; those layers read these instead.

use serde::{Deserialize, Serialize};

use super::state::{GamePhase, Side};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A projectile was launched
    ShotFired { side: Side },
    /// A formation alien was destroyed
    AlienKilled {
        row: usize,
        column: usize,
        points: u32,
    },
    /// The mystery ship was destroyed
    BonusKilled { points: u32 },
    /// The player's ship was destroyed by alien fire
    ShipDestroyed { lives_left: u8 },
    /// The mystery ship started a traversal
    BonusEntered,
    /// Next note of the march loop
    MarchNote { index: u8 },
    /// Phase machine transition
    PhaseChanged { from: GamePhase, to: GamePhase },
}

/// Per-tick output buffer
#[derive(Debug, Default)]
pub struct EventSink {
    events: Vec<GameEvent>,
}

impl EventSink {
    pub fn push(&mut self, event: GameEvent) {
        log::trace!("event: {:?}", event);
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drain everything collected so far
    pub fn take(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_take_drains() {
        let mut sink = EventSink::default();
        sink.push(GameEvent::BonusEntered);
        sink.push(GameEvent::ShotFired { side: Side::Player });
        assert_eq!(sink.len(), 2);

        let events = sink.take();
        assert_eq!(events[0], GameEvent::BonusEntered);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_event_serializes_for_frontend() {
        let event = GameEvent::PhaseChanged {
            from: GamePhase::Playing,
            to: GamePhase::GameOver,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"PhaseChanged":{"from":"Playing","to":"GameOver"}}"#);
    }
}
