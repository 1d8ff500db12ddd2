//! Events published to the UI collaborator (alerts, ticker, effects)

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::photo::PhotoQuality;
use super::tile::TileKind;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndCause {
    /// Clock ran out or the final tornado's grace period elapsed
    Time,
    /// Player vehicle destroyed
    Crash,
}

impl EndCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndCause::Time => "time",
            EndCause::Crash => "crash",
        }
    }
}

/// Something the presentation layer may want to react to.
/// Drained by the caller once per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A tornado event is about to begin (1-based)
    TornadoWarning { event: u32 },
    TornadoSpawned { event: u32, pos: Vec2, ef: u8 },
    /// Whole EF rating changed
    StrengthChanged { from: u8, to: u8 },
    /// Tornado reached the edge of the map and is gone
    TornadoDissipated { event: u32 },
    TileDestroyed { tx: u32, ty: u32, was: TileKind },
    PhotoTaken { score: u32, quality: PhotoQuality },
    SessionEnded { cause: EndCause, score: u64 },
}
