use jumpin::error::UnoError;
use thiserror::Error;

use crate::table::{ConnectionId, MatchId};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum HostError {
    #[error("Match {0} is closed")]
    MatchClosed(MatchId),
    #[error("Unknown match {0}")]
    UnknownMatch(MatchId),
    #[error("Unknown connection {0}")]
    UnknownConnection(ConnectionId),
    #[error("Connection {0} is not allowed to restart the match")]
    NotPrivileged(ConnectionId),
    #[error(transparent)]
    Rejected(#[from] UnoError),
}
