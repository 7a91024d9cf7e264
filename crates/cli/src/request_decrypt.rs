// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::setup::App;
use actix::prelude::*;
use alloy_primitives::Address;
use anyhow::{anyhow, bail, Result};
use est_events::{
    CorrelationId, CounterKind, HistoryCollector, Subscribe, TakeEvents, TrackerEvent,
};
use est_gateway::RequestDecrypt;

pub async fn execute(app: &App, user: Address, kind: CounterKind) -> Result<()> {
    // Subscribe before requesting so the outcome cannot slip past us. A
    // failed reveal surfaces as a TrackerError instead of a plaintext, so
    // both types are watched or the command would wait forever.
    let collector = HistoryCollector::<TrackerEvent>::new().start();
    for event_type in ["PlaintextAvailable", "TrackerError"] {
        app.bus
            .do_send(Subscribe::new(event_type, collector.clone().recipient()));
    }

    let request_id = CorrelationId::new();
    println!(
        "Requesting decryption of {} for {} (request {})",
        kind, user, request_id
    );

    app.gateway
        .send(RequestDecrypt {
            request_id,
            identity: user,
            kind,
        })
        .await??;

    let events = collector.send(TakeEvents::new(1)).await?;
    match events.into_iter().next() {
        Some(TrackerEvent::PlaintextAvailable { data, .. })
            if data.request_id == request_id =>
        {
            println!(
                "Oracle revealed {} for {}: {}",
                data.kind, data.identity, data.value
            );
            Ok(())
        }
        Some(TrackerEvent::TrackerError { data, .. }) => {
            bail!("Decryption failed: {}", data.message)
        }
        _ => Err(anyhow!("oracle answered a different request")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use est_client::StudyClient;
    use est_data::{DataStore, InMemStore, Persistable, Repository};
    use est_events::EventBus;
    use est_fhe::MockCoprocessor;
    use est_gateway::{
        DecryptionGateway, DecryptionGatewayParams, DecryptionOracle, DecryptionOracleParams,
    };
    use est_tracker::{
        RecordStudyTime, ScheduleState, StudySchedule, StudyScheduleParams, StudyTracker,
        StudyTrackerParams, SystemClock, TrackerState,
    };
    use std::sync::Arc;

    // Wire an app whose oracle never saw the recorded ciphertexts, which is
    // what a fresh process faces when counters were written by an earlier
    // run.
    fn app_with_cold_oracle() -> (App, Address) {
        let bus = EventBus::<TrackerEvent>::default().start();
        let coprocessor: Arc<MockCoprocessor> = Arc::new(MockCoprocessor::default());
        let clock = Arc::new(SystemClock);
        let contract = Address::repeat_byte(0xc0);
        let store: DataStore = (&InMemStore::new(false).start()).into();

        let tracker_repo: Repository<TrackerState> = Repository::new(store.scope("//tracker"));
        let tracker = StudyTracker::new(StudyTrackerParams {
            bus: bus.clone(),
            coprocessor: coprocessor.clone(),
            clock: clock.clone(),
            contract,
            state: Persistable::new(Some(TrackerState::default()), &tracker_repo),
        })
        .start();

        let schedule_repo: Repository<ScheduleState> = Repository::new(store.scope("//schedule"));
        let schedule = StudySchedule::new(StudyScheduleParams {
            bus: bus.clone(),
            coprocessor: coprocessor.clone(),
            contract,
            state: Persistable::new(Some(ScheduleState::default()), &schedule_repo),
        })
        .start();

        let gateway = DecryptionGateway::attach(DecryptionGatewayParams {
            bus: bus.clone(),
            tracker: tracker.clone().recipient(),
            schedule: schedule.clone().recipient(),
        });

        DecryptionOracle::attach(DecryptionOracleParams {
            bus: bus.clone(),
            coprocessor: Arc::new(MockCoprocessor::default()),
        });

        let client = StudyClient::new(coprocessor, clock, contract, 600);

        let app = App {
            store: bus.clone().recipient(),
            bus,
            tracker,
            schedule,
            gateway,
            client,
        };
        (app, Address::repeat_byte(0x01))
    }

    #[actix::test]
    async fn test_reveal_failure_reports_an_error_instead_of_waiting() -> Result<()> {
        let (app, user) = app_with_cold_oracle();

        let input = app.client.encrypt_u32(user, 30)?;
        app.tracker
            .send(RecordStudyTime {
                identity: user,
                input,
            })
            .await??;

        let result = execute(&app, user, CounterKind::Daily).await;
        assert!(result.is_err());
        Ok(())
    }
}
