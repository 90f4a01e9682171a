//! One task per match. The task owns the `Uno` value outright, so commands from every
//! connection are applied one at a time in the order they arrive.

use std::collections::BTreeMap;

use jumpin::{
    config::RulesConfig,
    event::Outbound,
    turn::Action,
    uno::Uno,
    visibility::{deliver, EventView},
    PlayerId,
};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, info_span, Instrument};

use crate::error::HostError;

pub type MatchId = String;
pub type ConnectionId = PlayerId;
pub type Outbox = mpsc::UnboundedSender<EventView>;

const COMMAND_BUFFER: usize = 64;

#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    #[default]
    Player,
    /// Watches every hand hidden and may restart the match.
    Admin,
}

type Reply<T> = oneshot::Sender<Result<T, HostError>>;

enum Command {
    Connect {
        role: Role,
        outbox: Outbox,
        reply: Reply<ConnectionId>,
    },
    Disconnect {
        connection: ConnectionId,
        reply: Reply<usize>,
    },
    Act {
        connection: ConnectionId,
        action: Action,
        reply: Reply<()>,
    },
}

#[derive(Clone, Debug)]
pub struct MatchHandle {
    id: MatchId,
    commands: mpsc::Sender<Command>,
}

impl MatchHandle {
    /// Starts the task for a new, empty match. It runs until every handle is dropped.
    pub fn spawn(id: MatchId, rules: RulesConfig) -> Self {
        let (commands, receiver) = mpsc::channel(COMMAND_BUFFER);
        let table = Table::new(rules);
        tokio::spawn(
            table
                .run(receiver)
                .instrument(info_span!("match", id = %id)),
        );

        Self { id, commands }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn connect(&self, role: Role, outbox: Outbox) -> Result<ConnectionId, HostError> {
        self.request(|reply| Command::Connect {
            role,
            outbox,
            reply,
        })
        .await
    }

    /// Closes `connection` and returns how many connections the match still has.
    pub async fn disconnect(&self, connection: ConnectionId) -> Result<usize, HostError> {
        self.request(|reply| Command::Disconnect { connection, reply })
            .await
    }

    pub async fn act(&self, connection: ConnectionId, action: Action) -> Result<(), HostError> {
        self.request(|reply| Command::Act {
            connection,
            action,
            reply,
        })
        .await
    }

    async fn request<T>(&self, command: impl FnOnce(Reply<T>) -> Command) -> Result<T, HostError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| HostError::MatchClosed(self.id.clone()))?;
        response
            .await
            .map_err(|_| HostError::MatchClosed(self.id.clone()))?
    }
}

struct Connection {
    role: Role,
    outbox: Outbox,
}

struct Table {
    uno: Uno,
    connections: BTreeMap<ConnectionId, Connection>,
    next_connection: ConnectionId,
}

impl Table {
    fn new(rules: RulesConfig) -> Self {
        Self {
            uno: Uno::new(rules),
            connections: BTreeMap::new(),
            next_connection: 1,
        }
    }

    async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        info!("Match opened");
        while let Some(command) = commands.recv().await {
            match command {
                Command::Connect {
                    role,
                    outbox,
                    reply,
                } => {
                    let _ = reply.send(self.connect(role, outbox));
                }
                Command::Disconnect { connection, reply } => {
                    let _ = reply.send(self.disconnect(connection));
                }
                Command::Act {
                    connection,
                    action,
                    reply,
                } => {
                    let _ = reply.send(self.act(connection, action));
                }
            }
        }
        info!("Match closed");
    }

    fn connect(&mut self, role: Role, outbox: Outbox) -> Result<ConnectionId, HostError> {
        let connection = self.next_connection;
        self.next_connection += 1;
        self.connections
            .insert(connection, Connection { role, outbox });

        let events = match role {
            Role::Player => match self.uno.join(connection) {
                Ok(events) => events,
                Err(error) => {
                    self.connections.remove(&connection);
                    return Err(error.into());
                }
            },
            Role::Admin => self.uno.observe(connection),
        };

        info!("Connection {connection} opened as {role}");
        self.broadcast(&events);
        Ok(connection)
    }

    fn disconnect(&mut self, connection: ConnectionId) -> Result<usize, HostError> {
        let closed = self
            .connections
            .remove(&connection)
            .ok_or(HostError::UnknownConnection(connection))?;
        info!("Connection {connection} closed");

        if closed.role == Role::Player {
            let events = self.uno.leave(connection)?;
            self.broadcast(&events);
        }
        Ok(self.connections.len())
    }

    fn act(&mut self, connection: ConnectionId, action: Action) -> Result<(), HostError> {
        let role = self
            .connections
            .get(&connection)
            .ok_or(HostError::UnknownConnection(connection))?
            .role;
        if action == Action::Restart && role != Role::Admin {
            debug!("Connection {connection} tried to restart without privileges");
            return Err(HostError::NotPrivileged(connection));
        }

        let events = self.uno.apply(connection, action)?;
        self.broadcast(&events);
        Ok(())
    }

    /// Hands every connection its own projection of `events`. A connection whose outbox is
    /// gone just misses them; its disconnect is on the way.
    fn broadcast(&self, events: &[Outbound]) {
        let recipients = self.connections.keys().copied().collect::<Vec<_>>();
        for (recipient, view) in deliver(events, &recipients) {
            if let Some(connection) = self.connections.get(&recipient) {
                let _ = connection.outbox.send(view);
            }
        }
    }
}
