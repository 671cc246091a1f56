// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tailer lifecycle state machine
//!
//! ```text
//! Created --start--> Initializing --marker emitted--> Running --close--> Closed
//!    \________________________\_______________________________/--close--> Closed
//! ```
//!
//! Fetch-decode-dispatch cycles only happen in `Running`. There is no paused
//! state; a fatal error is an implicit close.

use std::fmt;
use thiserror::Error;

/// Lifecycle state of a tailer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TailerState {
    /// Constructed, not yet started
    Created,
    /// Emitting the initialization marker
    Initializing,
    /// Tailing the topic
    Running,
    /// Stopped; terminal
    Closed,
}

/// A lifecycle operation that is not valid in the current state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot {operation} a tailer in state {from}")]
pub struct StateError {
    pub from: TailerState,
    pub operation: &'static str,
}

impl TailerState {
    /// `Created -> Initializing`
    pub fn start(self) -> Result<TailerState, StateError> {
        match self {
            TailerState::Created => Ok(TailerState::Initializing),
            from => Err(StateError {
                from,
                operation: "start",
            }),
        }
    }

    /// `Initializing -> Running`
    pub fn marker_emitted(self) -> Result<TailerState, StateError> {
        match self {
            TailerState::Initializing => Ok(TailerState::Running),
            from => Err(StateError {
                from,
                operation: "run",
            }),
        }
    }

    /// Any state -> `Closed`
    pub fn close(self) -> TailerState {
        TailerState::Closed
    }

    pub fn is_running(self) -> bool {
        self == TailerState::Running
    }

    pub fn is_closed(self) -> bool {
        self == TailerState::Closed
    }
}

impl fmt::Display for TailerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TailerState::Created => "created",
            TailerState::Initializing => "initializing",
            TailerState::Running => "running",
            TailerState::Closed => "closed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
