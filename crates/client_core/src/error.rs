use std::time::Duration;

use shared::error::DecodeError;
use thiserror::Error;

use crate::store::LoadStatus;

/// Failure of a single league service call. The text may carry transport
/// detail and is meant for logs, not for the user.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("service returned status {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("invalid payload: {0}")]
    Invalid(#[from] DecodeError),
    #[error("no response within {0:?}")]
    Timeout(Duration),
    #[error("invalid service url '{0}'")]
    InvalidUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("league id must not be empty")]
    EmptyLeagueId,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrilldownError {
    #[error("no league is loaded")]
    NoActiveLeague,
    #[error("team '{0}' is not part of the loaded league")]
    UnknownTeam(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("load cycle was superseded by a newer load")]
    Stale,
    #[error("cannot {operation} while {status:?}")]
    InvalidTransition {
        operation: &'static str,
        status: LoadStatus,
    },
    #[error("odds committed before a snapshot in this load cycle")]
    MissingSnapshot,
    #[error("odds do not match league standings: {0}")]
    Integrity(String),
}
