use crate::room::{Room, RoomHandle};
use pokerd_core::{Chips, ID};
use pokerd_gameplay::Table;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_postgres::Client;

/// Settings a new table is created with, mirroring `POST /api/rooms`'s
/// request body.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct TableSettings {
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub min_buy_in: Chips,
    pub max_buy_in: Chips,
}

/// Process-wide mapping from room id to a running room's handle. Create and
/// delete are serialized under a single lock distinct from any individual
/// room's own queue, matching spec.md §4.5's registry contract. The map
/// itself is the only piece of cross-room shared mutable state in the
/// process — once a `RoomHandle` is handed out, everything else about that
/// room is owned by its own task.
pub struct Registry {
    rooms: RwLock<HashMap<ID<Table>, RoomHandle>>,
    db: Arc<Client>,
}

impl Registry {
    pub fn new(db: Arc<Client>) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            db,
        }
    }

    /// Creates a fresh table and spawns its room task, registering the
    /// handle before returning it.
    pub async fn create(&self, settings: TableSettings) -> RoomHandle {
        let table = Table::new(settings.small_blind, settings.big_blind, settings.min_buy_in, settings.max_buy_in);
        self.spawn(table).await
    }

    pub async fn get(&self, id: ID<Table>) -> Option<RoomHandle> {
        self.rooms.read().await.get(&id).cloned()
    }

    pub async fn room_ids(&self) -> Vec<ID<Table>> {
        self.rooms.read().await.keys().copied().collect()
    }

    pub async fn len(&self) -> usize {
        self.rooms.read().await.len()
    }

    async fn spawn(&self, table: Table) -> RoomHandle {
        let (room, handle, inbox) = Room::new(table, self.db.clone());
        self.rooms.write().await.insert(handle.id(), handle.clone());
        tokio::spawn(room.run(inbox));
        handle
    }

    /// Loads every snapshot updated within `freshness`, deserializes each
    /// into a live room with no connections attached (players must
    /// reconnect), and purges anything older. Run once at startup.
    pub async fn recover(&self, freshness: Duration) -> usize {
        if let Err(e) = pokerd_database::purge_idle(&self.db, freshness).await {
            log::error!("failed to purge stale room snapshots: {e}");
        }
        let ids = match pokerd_database::list_room_ids(&self.db).await {
            Ok(ids) => ids,
            Err(e) => {
                log::error!("failed to list persisted rooms: {e}");
                return 0;
            }
        };
        let mut recovered = 0;
        for room_id in ids {
            match pokerd_database::load_snapshot(&self.db, room_id).await {
                Ok(Some(state_json)) => match serde_json::from_value::<Table>(state_json) {
                    Ok(table) => {
                        self.spawn(table).await;
                        recovered += 1;
                    }
                    Err(e) => log::error!("failed to deserialize snapshot for room {room_id}: {e}"),
                },
                Ok(None) => {}
                Err(e) => log::error!("failed to load snapshot for room {room_id}: {e}"),
            }
        }
        log::info!("recovered {recovered} rooms from persisted snapshots");
        recovered
    }

    /// Runs forever, deleting persisted snapshots older than `idle_window`
    /// every `sweep_interval`. Does not touch in-memory room handles: a
    /// room still running in this process stays running and keeps
    /// re-persisting itself, so only rooms this process never recovered or
    /// has since dropped actually get purged.
    pub async fn run_idle_sweeper(self: Arc<Self>, idle_window: Duration, sweep_interval: Duration) {
        let mut tick = tokio::time::interval(sweep_interval);
        loop {
            tick.tick().await;
            match pokerd_database::purge_idle(&self.db, idle_window).await {
                Ok(count) if count > 0 => log::info!("idle sweeper purged {count} stale rooms"),
                Ok(_) => {}
                Err(e) => log::error!("idle sweeper failed: {e}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_settings_round_trip_through_json() {
        let settings = TableSettings {
            small_blind: 1,
            big_blind: 2,
            min_buy_in: 40,
            max_buy_in: 200,
        };
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: TableSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.big_blind, 2);
    }
}
