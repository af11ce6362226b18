use std::fmt;
use thiserror::Error;

/// Which side of the market an agent belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Proposer,
    Responder,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Proposer => Side::Responder,
            Side::Responder => Side::Proposer,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Proposer => f.write_str("proposer"),
            Side::Responder => f.write_str("responder"),
        }
    }
}

/// Errors raised when preference lists or matchings do not describe a
/// well-formed two-sided market
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedPreferenceError {
    #[error("{side} '{agent}' is listed by '{referenced_by}' but has no preference list")]
    UnknownAgent {
        side: Side,
        agent: String,
        referenced_by: String,
    },

    #[error("{side} '{agent}' does not rank '{partner}'")]
    Unranked {
        side: Side,
        agent: String,
        partner: String,
    },

    #[error("{side} '{agent}' is defined more than once")]
    DuplicateAgent { side: Side, agent: String },

    #[error("{side} '{agent}' lists '{partner}' more than once")]
    DuplicateEntry {
        side: Side,
        agent: String,
        partner: String,
    },

    #[error("responder '{responder}' is assigned to both '{first}' and '{second}'")]
    ResponderAssignedTwice {
        responder: String,
        first: String,
        second: String,
    },

    #[error("matching names unknown {side} '{agent}'")]
    UnknownMatchedAgent { side: Side, agent: String },
}
