// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::path::PathBuf;

use crate::{Get, Insert, InsertSync, Remove};
use actix::{Actor, ActorContext, Addr, Handler};
use anyhow::{Context, Result};
use est_events::{BusError, EventBus, Subscribe, TrackerErrorType, TrackerEvent};
use sled::Db;
use tracing::{error, info};

/// Sled-backed KV store actor. Flushes storage and stops on `Shutdown`.
pub struct SledStore {
    db: Option<SledDb>,
    bus: Addr<EventBus<TrackerEvent>>,
}

impl Actor for SledStore {
    type Context = actix::Context<Self>;
}

impl SledStore {
    pub fn new(bus: &Addr<EventBus<TrackerEvent>>, path: &PathBuf) -> Result<Addr<Self>> {
        info!("Starting SledStore with {:?}", path);
        let db = SledDb::new(path)?;

        let store = Self {
            db: Some(db),
            bus: bus.clone(),
        }
        .start();

        bus.do_send(Subscribe::new("Shutdown", store.clone().into()));

        Ok(store)
    }
}

impl Handler<Insert> for SledStore {
    type Result = ();

    fn handle(&mut self, event: Insert, _: &mut Self::Context) -> Self::Result {
        if let Some(ref mut db) = &mut self.db {
            if let Err(err) = db.insert(event) {
                self.bus.err(TrackerErrorType::Data, err)
            }
        }
    }
}

impl Handler<InsertSync> for SledStore {
    type Result = Result<()>;

    fn handle(&mut self, event: InsertSync, _: &mut Self::Context) -> Self::Result {
        if let Some(ref mut db) = &mut self.db {
            db.insert(event.into())?
        }
        Ok(())
    }
}

impl Handler<Remove> for SledStore {
    type Result = ();

    fn handle(&mut self, event: Remove, _: &mut Self::Context) -> Self::Result {
        if let Some(ref mut db) = &mut self.db {
            if let Err(err) = db.remove(event) {
                self.bus.err(TrackerErrorType::Data, err)
            }
        }
    }
}

impl Handler<Get> for SledStore {
    type Result = Option<Vec<u8>>;

    fn handle(&mut self, event: Get, _: &mut Self::Context) -> Self::Result {
        if let Some(ref mut db) = &mut self.db {
            match db.get(event) {
                Ok(v) => v,
                Err(err) => {
                    self.bus.err(TrackerErrorType::Data, err);
                    None
                }
            }
        } else {
            error!("Attempt to get data from dropped db");
            None
        }
    }
}

impl Handler<TrackerEvent> for SledStore {
    type Result = ();
    fn handle(&mut self, msg: TrackerEvent, ctx: &mut Self::Context) -> Self::Result {
        if let TrackerEvent::Shutdown { .. } = msg {
            let _db = self.db.take(); // db will be dropped
            ctx.stop()
        }
    }
}

pub struct SledDb {
    db: Db,
}

impl SledDb {
    pub fn new(path: &PathBuf) -> Result<Self> {
        let db = sled::open(path).with_context(|| {
            format!(
                "Could not open database at path '{}'",
                path.to_string_lossy()
            )
        })?;
        Ok(Self { db })
    }

    pub fn insert(&mut self, msg: Insert) -> Result<()> {
        self.db
            .insert(msg.key(), msg.value().to_vec())
            .context("Could not insert data into db")?;

        Ok(())
    }

    pub fn remove(&mut self, msg: Remove) -> Result<()> {
        self.db
            .remove(msg.key())
            .context("Could not remove data from db")?;
        Ok(())
    }

    pub fn get(&mut self, event: Get) -> Result<Option<Vec<u8>>> {
        let key = event.key();
        let str_key = String::from_utf8_lossy(key).into_owned();
        let res = self
            .db
            .get(key)
            .context(format!("Failed to fetch {}", str_key))?;

        Ok(res.map(|v| v.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sled_db_roundtrip() -> Result<()> {
        use tempfile::tempdir;

        let temp_dir = tempdir().expect("Failed to create temporary directory");
        let db_path = temp_dir.path().join("test.db");

        let mut db = SledDb::new(&db_path)?;
        db.insert(Insert::new(b"key".to_vec(), b"value".to_vec()))?;
        assert_eq!(
            db.get(Get::new(b"key".to_vec()))?,
            Some(b"value".to_vec())
        );

        db.remove(Remove::new(b"key".to_vec()))?;
        assert_eq!(db.get(Get::new(b"key".to_vec()))?, None);

        Ok(())
    }

    #[actix::test]
    async fn test_shutdown_flushes_queued_writes() -> Result<()> {
        use est_events::Shutdown;
        use tempfile::tempdir;

        let temp_dir = tempdir().expect("Failed to create temporary directory");
        let db_path = temp_dir.path().join("test.db");

        let bus = EventBus::<TrackerEvent>::default().start();
        let store = SledStore::new(&bus, &db_path)?;

        // Checkpoints arrive as fire-and-forget inserts. Awaiting Shutdown
        // must put them on disk even though nothing awaited the insert.
        store.do_send(Insert::new(b"key".to_vec(), b"value".to_vec()));
        store.send(TrackerEvent::from(Shutdown)).await?;

        let mut reopened = SledDb::new(&db_path)?;
        assert_eq!(
            reopened.get(Get::new(b"key".to_vec()))?,
            Some(b"value".to_vec())
        );
        Ok(())
    }
}
