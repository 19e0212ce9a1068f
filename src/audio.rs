//! Sound cues for the frontend audio layer
//!
//! The core only reports what happened; this maps each event to the sample the
//! player should hear. Playback itself lives outside the crate.

use crate::sim::{GameEvent, Side};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player laser
    Shoot,
    /// Formation alien destroyed
    InvaderKilled,
    /// Mystery ship destroyed (also stops its traversal loop)
    MysteryKilled,
    /// Mystery ship starts crossing (fades out over its traversal)
    MysteryEntered,
    /// Player ship destroyed
    ShipExplosion,
    /// One of the four march notes
    March(u8),
}

impl SoundEffect {
    /// Cue for an event, if it has one. Alien shots and phase changes are silent.
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::ShotFired { side: Side::Player } => Some(Self::Shoot),
            GameEvent::ShotFired { side: Side::Alien } => None,
            GameEvent::AlienKilled { .. } => Some(Self::InvaderKilled),
            GameEvent::BonusKilled { .. } => Some(Self::MysteryKilled),
            GameEvent::BonusEntered => Some(Self::MysteryEntered),
            GameEvent::ShipDestroyed { .. } => Some(Self::ShipExplosion),
            GameEvent::MarchNote { index } => Some(Self::March(*index)),
            GameEvent::PhaseChanged { .. } => None,
        }
    }

    /// Sample file stem in the asset pack
    pub fn asset_name(&self) -> String {
        match self {
            Self::Shoot => "shoot".into(),
            Self::InvaderKilled => "invaderkilled".into(),
            Self::MysteryKilled => "mysterykilled".into(),
            Self::MysteryEntered => "mysteryentered".into(),
            Self::ShipExplosion => "shipexplosion".into(),
            Self::March(index) => index.to_string(),
        }
    }
}

/// All cues for one tick's events, in order
pub fn cues(events: &[GameEvent]) -> Vec<SoundEffect> {
    events.iter().filter_map(SoundEffect::for_event).collect()
}
