// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy_primitives::Address;
use anyhow::{anyhow, Result};
use est_events::{CorrelationId, CounterKind, TakeEvents, TrackerErrorType, TrackerEvent};
use est_gateway::{GetPendingCount, RequestDecrypt};
use est_test_helpers::TrackerSystemBuilder;
use est_tracker::RecordStudyTime;

#[actix::test]
async fn test_round_trip_through_the_oracle() -> Result<()> {
    let system = TrackerSystemBuilder::new().build().await?;
    let user = Address::repeat_byte(0x01);

    let input = system.coprocessor.encrypt_u32(system.contract, user, 90)?;
    system
        .tracker
        .send(RecordStudyTime {
            identity: user,
            input,
        })
        .await??;

    let request_id = CorrelationId::new();
    system
        .gateway
        .send(RequestDecrypt {
            request_id,
            identity: user,
            kind: CounterKind::Total,
        })
        .await??;

    // StudyTimeRecorded, DecryptionRequested, DecryptionResolved,
    // PlaintextAvailable.
    let events = system.history.send(TakeEvents::new(4)).await?;
    let available = events
        .iter()
        .find_map(|evt| match evt {
            TrackerEvent::PlaintextAvailable { data, .. } => Some(data.clone()),
            _ => None,
        })
        .ok_or(anyhow!("expected a plaintext event"))?;

    assert_eq!(available.request_id, request_id);
    assert_eq!(available.identity, user);
    assert_eq!(available.kind, CounterKind::Total);
    assert_eq!(available.value, 90);
    assert_eq!(system.gateway.send(GetPendingCount).await?, 0);
    Ok(())
}

#[actix::test]
async fn test_no_data_refuses_before_the_oracle() -> Result<()> {
    let system = TrackerSystemBuilder::new().build().await?;
    let user = Address::repeat_byte(0x02);

    let result = system
        .gateway
        .send(RequestDecrypt {
            request_id: CorrelationId::new(),
            identity: user,
            kind: CounterKind::Daily,
        })
        .await?;
    assert!(result.is_err());

    let events = system.history.send(TakeEvents::new(1)).await?;
    assert!(events
        .iter()
        .any(|evt| matches!(evt, TrackerEvent::TrackerError { .. })));
    assert!(events
        .iter()
        .all(|evt| !matches!(evt, TrackerEvent::DecryptionRequested { .. })));
    Ok(())
}

#[actix::test]
async fn test_unknown_correlation_id_is_dropped() -> Result<()> {
    let system = TrackerSystemBuilder::new().build().await?;

    system
        .gateway
        .send(TrackerEvent::from(est_events::DecryptionResolved {
            request_id: CorrelationId::new(),
            value: 12345,
        }))
        .await?;

    assert_eq!(system.gateway.send(GetPendingCount).await?, 0);

    let events = system.history.send(TakeEvents::new(1)).await?;
    assert!(events.iter().any(|evt| matches!(
        evt,
        TrackerEvent::TrackerError { data, .. }
            if data.err_type == TrackerErrorType::UnknownRequestId
    )));
    assert!(events
        .iter()
        .all(|evt| !matches!(evt, TrackerEvent::PlaintextAvailable { .. })));
    Ok(())
}

#[actix::test]
async fn test_schedule_counters_are_reachable_through_the_gateway() -> Result<()> {
    let system = TrackerSystemBuilder::new().build().await?;
    let user = Address::repeat_byte(0x03);

    system
        .schedule
        .send(est_tracker::UpdateStudySchedule {
            identity: user,
            goal: system.coprocessor.encrypt_u32(system.contract, user, 5)?,
            completed: system.coprocessor.encrypt_u32(system.contract, user, 3)?,
            priority: system.coprocessor.encrypt_u32(system.contract, user, 2)?,
        })
        .await??;

    let request_id = CorrelationId::new();
    system
        .gateway
        .send(RequestDecrypt {
            request_id,
            identity: user,
            kind: CounterKind::TaskCount,
        })
        .await??;

    let events = system.history.send(TakeEvents::new(4)).await?;
    let available = events
        .iter()
        .find_map(|evt| match evt {
            TrackerEvent::PlaintextAvailable { data, .. } => Some(data.clone()),
            _ => None,
        })
        .ok_or(anyhow!("expected a plaintext event"))?;
    assert_eq!(available.kind, CounterKind::TaskCount);
    assert_eq!(available.value, 1);
    Ok(())
}
