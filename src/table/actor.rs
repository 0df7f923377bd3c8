//! Task-per-table dispatch. The actor serializes every engine call (the
//! engine itself does no locking) and fans the returned events out to
//! per-player subscriptions with the hole-card privacy filter applied.

use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};

use super::config::TableConfig;
use super::messages::TableCommand;
use crate::game::{Action, Error, Event, PlayerId, ServerError, Table, TableId};

/// Cheap cloneable handle for sending commands to a table.
#[derive(Clone, Debug)]
pub struct TableHandle {
    sender: mpsc::Sender<TableCommand>,
    table_id: TableId,
}

impl TableHandle {
    #[must_use]
    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    /// Send a raw command to the table.
    pub async fn send(&self, command: TableCommand) -> Result<(), Error> {
        self.sender
            .send(command)
            .await
            .map_err(|_| Error::Server(ServerError::Unspecified))
    }

    pub async fn join(&self, id: PlayerId) -> Result<(), Error> {
        self.request(|response| TableCommand::Join { id, response })
            .await
    }

    pub async fn leave(&self, id: PlayerId) -> Result<(), Error> {
        self.request(|response| TableCommand::Leave { id, response })
            .await
    }

    pub async fn start_hand(&self) -> Result<(), Error> {
        self.request(|response| TableCommand::StartHand { response })
            .await
    }

    pub async fn act(&self, action: Action) -> Result<(), Error> {
        self.request(|response| TableCommand::Act { action, response })
            .await
    }

    /// Open an event feed for one player. The returned receiver sees every
    /// public event plus the player's own hole cards.
    pub async fn subscribe(&self, id: PlayerId, capacity: usize) -> Result<mpsc::Receiver<Event>, Error> {
        let (sender, receiver) = mpsc::channel(capacity);
        self.send(TableCommand::Subscribe { id, sender }).await?;
        Ok(receiver)
    }

    pub async fn close(&self) -> Result<(), Error> {
        self.send(TableCommand::Close).await
    }

    async fn request<F>(&self, command: F) -> Result<(), Error>
    where
        F: FnOnce(oneshot::Sender<Result<(), Error>>) -> TableCommand,
    {
        let (response, receiver) = oneshot::channel();
        self.send(command(response)).await?;
        receiver
            .await
            .map_err(|_| Error::Server(ServerError::Unspecified))?
    }
}

/// Owns one engine table and its subscriber roster.
pub struct TableActor {
    table: Table<StdRng>,
    config: TableConfig,
    inbox: mpsc::Receiver<TableCommand>,
    subscribers: HashMap<PlayerId, mpsc::Sender<Event>>,
}

impl TableActor {
    #[must_use]
    pub fn new(id: TableId, config: TableConfig) -> (Self, TableHandle) {
        let (sender, inbox) = mpsc::channel(config.inbox_capacity);
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let actor = Self {
            table: Table::new(id, rng),
            config,
            inbox,
            subscribers: HashMap::new(),
        };
        let handle = TableHandle {
            sender,
            table_id: id,
        };
        (actor, handle)
    }

    /// Drive the command loop until `Close` or every handle is dropped.
    pub async fn run(mut self) {
        info!("table {} '{}' starting", self.table.id(), self.config.name);
        while let Some(command) = self.inbox.recv().await {
            if !self.handle_command(command) {
                break;
            }
        }
        info!("table {} '{}' closed", self.table.id(), self.config.name);
    }

    /// Apply one command. Returns false when the actor should stop.
    fn handle_command(&mut self, command: TableCommand) -> bool {
        match command {
            TableCommand::Join { id, response } => {
                let result = if self.table.has_open_seat() {
                    match self.table.add_player(id) {
                        Ok(event) => {
                            self.broadcast(&[event]);
                            Ok(())
                        }
                        Err(err) => Err(Error::from(err)),
                    }
                } else {
                    Err(Error::Server(ServerError::AllTablesFull))
                };
                // Broadcast any auto-started hand before acking, so a
                // caller that got its ack has already been sent the events.
                self.maybe_start_hand();
                let _ = response.send(result);
            }
            TableCommand::Leave { id, response } => {
                let result = match self.table.remove_player(id) {
                    Ok(events) => {
                        self.broadcast(&events);
                        Ok(())
                    }
                    Err(err) => Err(Error::from(err)),
                };
                let _ = response.send(result);
            }
            TableCommand::StartHand { response } => {
                let result = match self.table.handle_new_hand() {
                    Ok(events) => {
                        self.broadcast(&events);
                        Ok(())
                    }
                    Err(err) => Err(Error::from(err)),
                };
                let _ = response.send(result);
            }
            TableCommand::Act { action, response } => {
                let result = match self.table.on_action(action) {
                    Ok(events) => {
                        self.broadcast(&events);
                        Ok(())
                    }
                    Err(err) => Err(Error::from(err)),
                };
                self.maybe_start_hand();
                let _ = response.send(result);
            }
            TableCommand::Subscribe { id, sender } => {
                self.subscribers.insert(id, sender);
            }
            TableCommand::Unsubscribe { id } => {
                self.subscribers.remove(&id);
            }
            TableCommand::Close => return false,
        }
        true
    }

    /// Auto-start the next hand once the table is able to.
    fn maybe_start_hand(&mut self) {
        if !self.config.auto_start || !self.table.can_start_hand() {
            return;
        }
        match self.table.handle_new_hand() {
            Ok(events) => self.broadcast(&events),
            // Racing departures can drop us below two players.
            Err(err) => info!("table {}: auto-start skipped: {err}", self.table.id()),
        }
    }

    /// Fan events out, applying the visibility filter per subscriber.
    /// Subscribers whose channel has closed are dropped; a full channel
    /// loses the event rather than stalling the table.
    fn broadcast(&mut self, events: &[Event]) {
        let mut gone: Vec<PlayerId> = Vec::new();
        for (&viewer, sender) in &self.subscribers {
            for event in events.iter().filter(|event| event.visible_to(viewer)) {
                match sender.try_send(event.clone()) {
                    Ok(()) => {}
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        warn!(
                            "table {}: subscriber {viewer} lagging, event dropped",
                            self.table.id()
                        );
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => {
                        gone.push(viewer);
                        break;
                    }
                }
            }
        }
        for viewer in gone {
            self.subscribers.remove(&viewer);
        }
    }
}
