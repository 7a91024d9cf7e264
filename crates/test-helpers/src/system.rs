// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::SimClock;
use actix::prelude::*;
use alloy_primitives::Address;
use anyhow::Result;
use est_data::{AutoPersist, DataStore, InMemStore, RepositoriesFactory};
use est_events::{new_event_bus_with_history, EventBus, HistoryCollector, TrackerEvent};
use est_fhe::{FheCoprocessor, MockCoprocessor};
use est_gateway::{
    DecryptionGateway, DecryptionGatewayParams, DecryptionOracle, DecryptionOracleParams,
};
use est_tracker::{
    ScheduleState, StudySchedule, StudyScheduleParams, StudyTracker, StudyTrackerParams,
    TrackerRepositoryFactory, TrackerState, SECONDS_PER_DAY,
};
use std::sync::Arc;

/// A fully wired in-process tracker system over an in-memory store.
pub struct TrackerSystem {
    pub bus: Addr<EventBus<TrackerEvent>>,
    pub history: Addr<HistoryCollector<TrackerEvent>>,
    pub tracker: Addr<StudyTracker>,
    pub schedule: Addr<StudySchedule>,
    pub gateway: Addr<DecryptionGateway>,
    pub coprocessor: Arc<dyn FheCoprocessor>,
    pub clock: Arc<SimClock>,
    pub contract: Address,
    pub store: DataStore,
}

pub struct TrackerSystemBuilder {
    contract: Address,
    coprocessor: Option<Arc<dyn FheCoprocessor>>,
    start_secs: u64,
}

impl TrackerSystemBuilder {
    pub fn new() -> Self {
        Self {
            contract: Address::repeat_byte(0xc0),
            coprocessor: None,
            start_secs: 20_000 * SECONDS_PER_DAY,
        }
    }

    pub fn with_contract(mut self, contract: Address) -> Self {
        self.contract = contract;
        self
    }

    pub fn with_coprocessor(mut self, coprocessor: Arc<dyn FheCoprocessor>) -> Self {
        self.coprocessor = Some(coprocessor);
        self
    }

    pub fn with_start_secs(mut self, start_secs: u64) -> Self {
        self.start_secs = start_secs;
        self
    }

    pub async fn build(self) -> Result<TrackerSystem> {
        let (bus, history) = new_event_bus_with_history();
        let coprocessor = self
            .coprocessor
            .unwrap_or_else(|| Arc::new(MockCoprocessor::default()));
        let clock = Arc::new(SimClock::new(self.start_secs));
        let store: DataStore = (&InMemStore::new(true).start()).into();

        let tracker_state = store
            .repositories()
            .tracker()
            .load_or_default(TrackerState::default())
            .await?;
        let tracker = StudyTracker::new(StudyTrackerParams {
            bus: bus.clone(),
            coprocessor: coprocessor.clone(),
            clock: clock.clone(),
            contract: self.contract,
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
            contract: self.contract,
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

        Ok(TrackerSystem {
            bus,
            history,
            tracker,
            schedule,
            gateway,
            coprocessor,
            clock,
            contract: self.contract,
            store,
        })
    }
}

impl Default for TrackerSystemBuilder {
    fn default() -> Self {
        Self::new()
    }
}
