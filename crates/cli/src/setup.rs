// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::prelude::*;
use anyhow::Result;
use est_client::StudyClient;
use est_config::{AppConfig, FheBackend};
use est_data::{AutoPersist, DataStore, RepositoriesFactory, SledStore};
use est_events::{EventBus, TrackerEvent};
use est_fhe::{BfvCoprocessor, ChaCha20Rng, FheCoprocessor, MockCoprocessor};
use est_gateway::{
    DecryptionGateway, DecryptionGatewayParams, DecryptionOracle, DecryptionOracleParams,
};
use est_logger::SimpleLogger;
use est_tracker::{
    ScheduleState, StudySchedule, StudyScheduleParams, StudyTracker, StudyTrackerParams,
    SystemClock, TrackerRepositoryFactory, TrackerState,
};
use rand::SeedableRng;
use std::sync::{Arc, Mutex};

/// Everything a command needs: the wired actor system plus the client
/// adapter sitting in front of it. `store` takes the Shutdown event so
/// commands can wait for queued writes to reach disk before exiting.
pub struct App {
    pub bus: Addr<EventBus<TrackerEvent>>,
    pub tracker: Addr<StudyTracker>,
    pub schedule: Addr<StudySchedule>,
    pub gateway: Addr<DecryptionGateway>,
    pub client: StudyClient,
    pub store: Recipient<TrackerEvent>,
}

/// Boot the in-process tracker system from configuration. Counter state
/// persists in sled across runs; ciphertexts live inside the co-processor
/// for the lifetime of the process.
pub async fn execute(config: &AppConfig) -> Result<App> {
    let bus = EventBus::<TrackerEvent>::default().start();
    SimpleLogger::<TrackerEvent>::attach(config.name(), bus.clone());

    let coprocessor: Arc<dyn FheCoprocessor> = match config.backend() {
        FheBackend::Mock => Arc::new(MockCoprocessor::default()),
        FheBackend::Bfv => Arc::new(BfvCoprocessor::new(Arc::new(Mutex::new(
            ChaCha20Rng::from_entropy(),
        )))?),
    };

    let clock = Arc::new(SystemClock);
    let sled = SledStore::new(&bus, &config.db_file())?;
    let store: DataStore = (&sled).into();

    let tracker_state = store
        .repositories()
        .tracker()
        .load_or_default(TrackerState::default())
        .await?;
    let tracker = StudyTracker::new(StudyTrackerParams {
        bus: bus.clone(),
        coprocessor: coprocessor.clone(),
        clock: clock.clone(),
        contract: config.contract(),
        state: tracker_state,
    })
    .start();

    let schedule_state = store
        .repositories()
        .schedule()
        .load_or_default(ScheduleState::default())
        .await?;
    let schedule = StudySchedule::new(StudyScheduleParams {
        bus: bus.clone(),
        coprocessor: coprocessor.clone(),
        contract: config.contract(),
        state: schedule_state,
    })
    .start();

    let gateway = DecryptionGateway::attach(DecryptionGatewayParams {
        bus: bus.clone(),
        tracker: tracker.clone().recipient(),
        schedule: schedule.clone().recipient(),
    });

    DecryptionOracle::attach(DecryptionOracleParams {
        bus: bus.clone(),
        coprocessor: coprocessor.clone(),
    });

    let client = StudyClient::new(
        coprocessor,
        clock,
        config.contract(),
        config.auth_validity_secs(),
    );

    Ok(App {
        bus,
        tracker,
        schedule,
        gateway,
        client,
        store: sled.recipient(),
    })
}
