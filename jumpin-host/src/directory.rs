use std::collections::HashMap;

use jumpin::config::RulesConfig;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    error::HostError,
    table::{MatchHandle, MatchId},
};

/// Every open match by id. Matches share nothing but the rules they are created with.
pub struct MatchDirectory {
    rules: RulesConfig,
    matches: Mutex<HashMap<MatchId, MatchHandle>>,
}

impl MatchDirectory {
    pub fn new(rules: RulesConfig) -> Self {
        Self {
            rules,
            matches: Mutex::new(HashMap::new()),
        }
    }

    /// The match called `id`, opened on first use.
    pub async fn open(&self, id: &str) -> MatchHandle {
        let mut matches = self.matches.lock().await;
        matches
            .entry(id.to_string())
            .or_insert_with(|| MatchHandle::spawn(id.to_string(), self.rules.clone()))
            .clone()
    }

    pub async fn get(&self, id: &str) -> Result<MatchHandle, HostError> {
        let matches = self.matches.lock().await;
        matches
            .get(id)
            .cloned()
            .ok_or_else(|| HostError::UnknownMatch(id.to_string()))
    }

    /// Forgets the match called `id`; its task stops once the last handle to it is dropped.
    /// The next `open` starts a fresh match under the same id.
    pub async fn close(&self, id: &str) -> bool {
        let closed = self.matches.lock().await.remove(id).is_some();
        if closed {
            debug!(match_id = id, "Match removed from the directory");
        }
        closed
    }
}

#[cfg(test)]
mod tests {
    use jumpin::{turn::Action, visibility::EventView};
    use tokio::sync::mpsc;

    use super::*;
    use crate::table::Role;

    #[tokio::test]
    async fn open_reuses_the_running_match() {
        let directory = MatchDirectory::new(RulesConfig::deterministic(1));
        let first = directory.open("m1").await;
        let again = directory.open("m1").await;
        assert_eq!(first.id(), again.id());

        let (outbox, _inbox) = mpsc::unbounded_channel();
        let connection = first.connect(Role::Player, outbox).await.unwrap();
        let (outbox, mut inbox) = mpsc::unbounded_channel();
        again.connect(Role::Player, outbox).await.unwrap();

        let Ok(EventView::ClientList { clients }) = inbox.try_recv() else {
            panic!("expected a client list");
        };
        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0].id, connection);
    }

    #[tokio::test]
    async fn matches_are_independent() {
        let directory = MatchDirectory::new(RulesConfig::deterministic(1));
        let one = directory.open("one").await;
        let other = directory.open("other").await;

        for _ in 0..2 {
            let (outbox, _inbox) = mpsc::unbounded_channel();
            one.connect(Role::Player, outbox).await.unwrap();
        }
        let (outbox, _inbox) = mpsc::unbounded_channel();
        let lonely = other.connect(Role::Player, outbox).await.unwrap();
        let (outbox, _inbox) = mpsc::unbounded_channel();
        let admin = other.connect(Role::Admin, outbox).await.unwrap();

        assert_eq!(lonely, 1);
        assert!(other.act(admin, Action::Restart).await.is_err());
    }

    #[tokio::test]
    async fn closed_matches_are_forgotten() {
        let directory = MatchDirectory::new(RulesConfig::deterministic(1));
        let first = directory.open("m1").await;
        let (outbox, _inbox) = mpsc::unbounded_channel();
        first.connect(Role::Player, outbox).await.unwrap();

        assert!(directory.close("m1").await);
        assert!(!directory.close("m1").await);
        assert!(matches!(
            directory.get("m1").await,
            Err(HostError::UnknownMatch(id)) if id == "m1"
        ));

        let reopened = directory.open("m1").await;
        let (outbox, _inbox) = mpsc::unbounded_channel();
        assert_eq!(reopened.connect(Role::Player, outbox).await, Ok(1));
    }

    #[tokio::test]
    async fn get_does_not_open_matches() {
        let directory = MatchDirectory::new(RulesConfig::default());
        assert_eq!(
            directory.get("nowhere").await.map(|handle| handle.id().to_string()),
            Err(HostError::UnknownMatch("nowhere".to_string()))
        );
    }
}
