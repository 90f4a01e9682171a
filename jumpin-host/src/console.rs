//! Line-delimited JSON over stdin/stdout. Each request line addresses one match; each event a
//! connection receives is written as its own line, tagged with the match and the recipient.

use color_eyre::eyre::Result;
use jumpin::{turn::Action, visibility::EventView};
use serde::{Deserialize, Serialize};
use tokio::{
    io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader},
    sync::mpsc,
};
use tracing::{debug, info, warn};

use crate::{
    directory::MatchDirectory,
    error::HostError,
    table::{ConnectionId, MatchId, Role},
};

#[derive(Debug, PartialEq, Eq, Deserialize)]
pub struct ConsoleRequest {
    #[serde(rename = "match")]
    pub match_id: MatchId,
    #[serde(flatten)]
    pub op: Op,
}

#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Op {
    Connect {
        #[serde(default)]
        role: Role,
    },
    Disconnect {
        connection: ConnectionId,
    },
    Act {
        connection: ConnectionId,
        action: Action,
    },
}

#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConsoleOutput {
    Connected {
        #[serde(rename = "match")]
        match_id: MatchId,
        connected: ConnectionId,
        role: Role,
    },
    Event {
        #[serde(rename = "match")]
        match_id: MatchId,
        to: ConnectionId,
        event: EventView,
    },
}

/// Serves requests from stdin until it closes, then lets every match wind down and flushes
/// the remaining output.
pub async fn run(directory: MatchDirectory) -> Result<()> {
    let (output, mut pending) = mpsc::unbounded_channel::<ConsoleOutput>();
    let writer = tokio::spawn(async move {
        let mut stdout = io::stdout();
        while let Some(line) = pending.recv().await {
            let mut json = serde_json::to_string(&line)?;
            json.push('\n');
            stdout.write_all(json.as_bytes()).await?;
            stdout.flush().await?;
        }
        Ok::<_, color_eyre::Report>(())
    });

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<ConsoleRequest>(&line) {
            Ok(request) => {
                let match_id = request.match_id.clone();
                match handle(&directory, request, &output).await {
                    Ok(()) => {}
                    Err(HostError::Rejected(error)) => {
                        debug!(%match_id, kind = %error.kind(), "Request rejected: {error}")
                    }
                    Err(error) => warn!(%match_id, "Request failed: {error}"),
                }
            }
            Err(error) => warn!("Ignoring malformed request: {error}"),
        }
    }

    info!("Input closed, shutting down");
    drop(directory);
    drop(output);
    writer.await??;
    Ok(())
}

async fn handle(
    directory: &MatchDirectory,
    request: ConsoleRequest,
    output: &mpsc::UnboundedSender<ConsoleOutput>,
) -> Result<(), HostError> {
    let match_id = request.match_id;
    match request.op {
        Op::Connect { role } => {
            let table = directory.open(&match_id).await;
            let (outbox, mut inbox) = mpsc::unbounded_channel();
            let connection = table.connect(role, outbox).await?;
            debug!(match_id = table.id(), connection, "Forwarding events as {role}");

            let _ = output.send(ConsoleOutput::Connected {
                match_id: match_id.clone(),
                connected: connection,
                role,
            });

            let output = output.clone();
            tokio::spawn(async move {
                while let Some(event) = inbox.recv().await {
                    let line = ConsoleOutput::Event {
                        match_id: match_id.clone(),
                        to: connection,
                        event,
                    };
                    if output.send(line).is_err() {
                        break;
                    }
                }
            });
        }
        Op::Disconnect { connection } => {
            let remaining = directory.get(&match_id).await?.disconnect(connection).await?;
            if remaining == 0 {
                directory.close(&match_id).await;
            }
        }
        Op::Act { connection, action } => {
            directory.get(&match_id).await?.act(connection, action).await?;
        }
    }

    Ok(())
}
