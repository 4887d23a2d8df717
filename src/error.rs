use crate::grid;
use std::fmt::{Debug, Display, Formatter};
use std::{fmt, io, result};

/// Which end of a search a node was passed as
#[derive(Copy, Clone, Eq, PartialEq, Debug, Display)]
pub enum NodeRole {
    #[display(fmt = "start")]
    Start,
    #[display(fmt = "goal")]
    Goal,
}

#[derive(Debug, Display, Error)]
#[display(fmt = "{} node {} is not part of the graph", role, node)]
pub struct UnknownNode {
    pub role: NodeRole,
    pub node: String,
}

#[derive(Debug, Display, Error)]
#[display(fmt = "edge {} -> {} has invalid cost {}", from, to, cost)]
pub struct InvalidEdgeCost {
    pub from: String,
    pub to: String,
    pub cost: f64,
}

#[derive(Debug, Display, Error)]
#[display(fmt = "heuristic estimated {} for node {}", value, node)]
pub struct InvalidEstimate {
    pub node: String,
    pub value: f64,
}

#[derive(Debug, Display, Error)]
#[display(fmt = "pref `{}` has invalid value {}", field, value)]
pub struct InvalidPref {
    pub field: &'static str,
    pub value: String,
}

#[derive(Debug, Display, Error)]
#[display(
    fmt = "backlinks did not reach the start after {} steps ({} records)",
    steps,
    records
)]
pub struct BacklinkCycle {
    pub steps: usize,
    pub records: usize,
}

#[derive(Debug, Display)]
pub enum ErrorType {
    UnknownNode(UnknownNode),
    InvalidEdgeCost(InvalidEdgeCost),
    InvalidEstimate(InvalidEstimate),
    GridBuilderError(grid::BuilderError),
    PrefsError(serde_json::Error),
    InvalidPref(InvalidPref),
    IoError(io::Error),
    BacklinkCycle(BacklinkCycle),
    /// A search was stepped again after it returned an error
    #[display(fmt = "search stepped again after an error")]
    Poisoned,
}

/// The second member contains a trace in reverse order
#[must_use]
pub struct Error(ErrorType, Vec<String>);

impl From<UnknownNode> for Error {
    fn from(e: UnknownNode) -> Self {
        Self(ErrorType::UnknownNode(e), vec![])
    }
}

impl From<InvalidEdgeCost> for Error {
    fn from(e: InvalidEdgeCost) -> Self {
        Self(ErrorType::InvalidEdgeCost(e), vec![])
    }
}

impl From<InvalidEstimate> for Error {
    fn from(e: InvalidEstimate) -> Self {
        Self(ErrorType::InvalidEstimate(e), vec![])
    }
}

impl From<grid::BuilderError> for Error {
    fn from(e: grid::BuilderError) -> Self {
        Self(ErrorType::GridBuilderError(e), vec![])
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self(ErrorType::PrefsError(e), vec![])
    }
}

impl From<InvalidPref> for Error {
    fn from(e: InvalidPref) -> Self {
        Self(ErrorType::InvalidPref(e), vec![])
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self(ErrorType::IoError(e), vec![])
    }
}

impl From<BacklinkCycle> for Error {
    fn from(e: BacklinkCycle) -> Self {
        Self(ErrorType::BacklinkCycle(e), vec![])
    }
}

impl From<ErrorType> for Error {
    fn from(t: ErrorType) -> Self {
        Self(t, vec![])
    }
}

impl Error {
    pub fn with_trace_step<S: ToString>(mut self, s: S) -> Self {
        self.1.push(s.to_string());
        self
    }

    pub fn error_type(&self) -> &ErrorType {
        &self.0
    }

    /// The caller handed in something unusable (unknown nodes, negative
    /// costs, bad heuristic values, bad or out of range prefs)
    pub fn is_config_error(&self) -> bool {
        !self.is_internal()
    }

    /// The engine broke one of its own invariants
    pub fn is_internal(&self) -> bool {
        matches!(self.0, ErrorType::BacklinkCycle(_) | ErrorType::Poisoned)
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Error:\n{:?}\nTrace:", self.0)?;
        for t in (self.1).iter().rev() {
            writeln!(f, " in {}", t)?;
        }
        Ok(())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)?;
        for t in (self.1).iter().rev() {
            write!(f, "\n in {}", t)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

pub type Result<T = ()> = result::Result<T, Error>;

pub trait ErrorConversion {
    fn with_trace_step<S: ToString>(self, s: S) -> Self;
}

impl<T> ErrorConversion for Result<T> {
    fn with_trace_step<S: ToString>(self, s: S) -> Self {
        self.map_err(|e| e.with_trace_step(s.to_string()))
    }
}
