//! Turn phases.

use serde::{Deserialize, Serialize};

/// One step of a turn. Phases cycle in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    Draw,
    Main,
    Combat,
    Damage,
    SecondMain,
    End,
}

impl Phase {
    /// All phases in turn order.
    pub const ORDER: [Phase; 6] = [
        Phase::Draw,
        Phase::Main,
        Phase::Combat,
        Phase::Damage,
        Phase::SecondMain,
        Phase::End,
    ];

    /// The phase that follows this one. `End` wraps to `Draw` of the next turn.
    #[must_use]
    pub const fn next(self) -> Phase {
        match self {
            Phase::Draw => Phase::Main,
            Phase::Main => Phase::Combat,
            Phase::Combat => Phase::Damage,
            Phase::Damage => Phase::SecondMain,
            Phase::SecondMain => Phase::End,
            Phase::End => Phase::Draw,
        }
    }

    /// Summons may only be cast in a main phase.
    #[must_use]
    pub const fn is_main(self) -> bool {
        matches!(self, Phase::Main | Phase::SecondMain)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Draw => "Draw",
            Phase::Main => "Main",
            Phase::Combat => "Combat",
            Phase::Damage => "Damage",
            Phase::SecondMain => "Second Main",
            Phase::End => "End",
        };
        f.write_str(name)
    }
}
