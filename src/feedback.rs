//! Side-effect port injected by the caller
//!
//! The simulation never plays sounds or spawns particles itself. It hands
//! events and presentation cues to a `BoardPort`; audio, haptics and
//! rendering live on the other side.

use serde::{Deserialize, Serialize};

use crate::sim::BoardEvent;

/// Presentation cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    /// Accepted swap
    Swap,
    /// A clear step resolved
    Match { combo_index: u32 },
    /// Large clear or deep combo
    BigClear,
    /// Screen shake
    Shake,
    /// Row/column blast or area/line tap
    Bomb,
    /// Wildcard pairing or ultimate tap
    FeverStart,
    /// Two wildcards paired
    Win,
}

/// Receives everything the core emits
pub trait BoardPort {
    fn emit(&mut self, event: &BoardEvent);

    fn cue(&mut self, _cue: Cue) {}
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPort;

impl BoardPort for NullPort {
    fn emit(&mut self, _event: &BoardEvent) {}
}

/// Keeps every event and cue, in order
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub events: Vec<BoardEvent>,
    pub cues: Vec<Cue>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take everything recorded so far
    pub fn drain(&mut self) -> (Vec<BoardEvent>, Vec<Cue>) {
        (std::mem::take(&mut self.events), std::mem::take(&mut self.cues))
    }

    pub fn clears(&self) -> impl Iterator<Item = &BoardEvent> {
        self.events.iter().filter(|e| e.is_clear())
    }
}

impl BoardPort for Recorder {
    fn emit(&mut self, event: &BoardEvent) {
        self.events.push(event.clone());
    }

    fn cue(&mut self, cue: Cue) {
        self.cues.push(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{CascadeSummary, InvalidMove};

    #[test]
    fn test_recorder_keeps_order() {
        let mut rec = Recorder::new();
        rec.cue(Cue::Swap);
        rec.emit(&BoardEvent::InvalidMove {
            reason: InvalidMove::NotAdjacent,
        });
        rec.emit(&BoardEvent::CascadeFinished(CascadeSummary::default()));
        rec.cue(Cue::Win);

        let (events, cues) = rec.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(cues, vec![Cue::Swap, Cue::Win]);
        assert!(rec.events.is_empty());
    }

    #[test]
    fn test_null_port_accepts_everything() {
        let mut port = NullPort;
        port.cue(Cue::Shake);
        port.emit(&BoardEvent::CascadeFinished(CascadeSummary::default()));
    }
}
