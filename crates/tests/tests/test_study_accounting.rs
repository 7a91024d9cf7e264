// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy_primitives::Address;
use anyhow::Result;
use est_events::{TakeEvents, TrackerEvent};
use est_test_helpers::{create_random_identities, create_shared_rng_from_u64, TrackerSystemBuilder};
use est_tracker::{
    GetDailyStudyTime, GetLastStudyDate, GetTotalStudyTime, GetTrackerView, RecordStudyTime,
    SECONDS_PER_DAY,
};

async fn record(
    system: &est_test_helpers::TrackerSystem,
    user: Address,
    minutes: u32,
) -> Result<()> {
    let input = system
        .coprocessor
        .encrypt_u32(system.contract, user, minutes)?;
    system
        .tracker
        .send(RecordStudyTime {
            identity: user,
            input,
        })
        .await??;
    Ok(())
}

#[actix::test]
async fn test_same_day_deltas_accumulate() -> Result<()> {
    let system = TrackerSystemBuilder::new().build().await?;
    let user = Address::repeat_byte(0x01);

    record(&system, user, 30).await?;
    record(&system, user, 45).await?;

    let daily = system
        .tracker
        .send(GetDailyStudyTime { identity: user })
        .await?;
    let total = system
        .tracker
        .send(GetTotalStudyTime { identity: user })
        .await?;
    assert_eq!(system.coprocessor.reveal(&daily)?, 75);
    assert_eq!(system.coprocessor.reveal(&total)?, 75);
    Ok(())
}

#[actix::test]
async fn test_rollover_resets_daily_and_keeps_total() -> Result<()> {
    let system = TrackerSystemBuilder::new().build().await?;
    let user = Address::repeat_byte(0x02);

    record(&system, user, 30).await?;
    record(&system, user, 45).await?;

    system.clock.advance(SECONDS_PER_DAY);
    record(&system, user, 60).await?;

    let daily = system
        .tracker
        .send(GetDailyStudyTime { identity: user })
        .await?;
    let total = system
        .tracker
        .send(GetTotalStudyTime { identity: user })
        .await?;
    assert_eq!(system.coprocessor.reveal(&daily)?, 60);
    assert_eq!(system.coprocessor.reveal(&total)?, 135);

    let events = system.history.send(TakeEvents::new(3)).await?;
    let rollovers: Vec<bool> = events
        .iter()
        .filter_map(|evt| match evt {
            TrackerEvent::StudyTimeRecorded { data, .. } => Some(data.rolled_over),
            _ => None,
        })
        .collect();
    assert_eq!(rollovers, vec![false, false, true]);
    Ok(())
}

#[actix::test]
async fn test_last_study_date_follows_the_writes() -> Result<()> {
    let start = 20_000 * SECONDS_PER_DAY;
    let system = TrackerSystemBuilder::new()
        .with_start_secs(start)
        .build()
        .await?;
    let user = Address::repeat_byte(0x03);

    record(&system, user, 10).await?;
    assert_eq!(
        system
            .tracker
            .send(GetLastStudyDate { identity: user })
            .await?,
        20_000
    );

    system.clock.advance(2 * SECONDS_PER_DAY);
    record(&system, user, 10).await?;
    assert_eq!(
        system
            .tracker
            .send(GetLastStudyDate { identity: user })
            .await?,
        20_002
    );
    Ok(())
}

#[actix::test]
async fn test_identities_do_not_share_counters() -> Result<()> {
    let system = TrackerSystemBuilder::new().build().await?;
    let rng = create_shared_rng_from_u64(7);
    let users = create_random_identities(&rng, 3);

    for (idx, user) in users.iter().enumerate() {
        record(&system, *user, (idx as u32 + 1) * 10).await?;
    }

    for (idx, user) in users.iter().enumerate() {
        let total = system
            .tracker
            .send(GetTotalStudyTime { identity: *user })
            .await?;
        assert_eq!(
            system.coprocessor.reveal(&total)?,
            (idx as u64 + 1) * 10
        );
    }

    let stranger = Address::repeat_byte(0xff);
    let view = system
        .tracker
        .send(GetTrackerView { identity: stranger })
        .await?;
    assert!(!view.is_initialized);
    Ok(())
}
