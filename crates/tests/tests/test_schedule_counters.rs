// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy_primitives::Address;
use anyhow::Result;
use est_test_helpers::{TrackerSystem, TrackerSystemBuilder};
use est_tracker::{GetScheduleView, UpdateStudySchedule};

async fn submit(
    system: &TrackerSystem,
    user: Address,
    goal: u32,
    completed: u32,
    priority: u32,
) -> Result<()> {
    system
        .schedule
        .send(UpdateStudySchedule {
            identity: user,
            goal: system.coprocessor.encrypt_u32(system.contract, user, goal)?,
            completed: system
                .coprocessor
                .encrypt_u32(system.contract, user, completed)?,
            priority: system
                .coprocessor
                .encrypt_u32(system.contract, user, priority)?,
        })
        .await??;
    Ok(())
}

#[actix::test]
async fn test_entries_fold_and_task_count_steps_by_one() -> Result<()> {
    let system = TrackerSystemBuilder::new().build().await?;
    let user = Address::repeat_byte(0x01);

    submit(&system, user, 5, 3, 2).await?;
    submit(&system, user, 2, 1, 3).await?;

    let view = system
        .schedule
        .send(GetScheduleView { identity: user })
        .await?;
    assert_eq!(system.coprocessor.reveal(&view.goal_handle)?, 7);
    assert_eq!(system.coprocessor.reveal(&view.completed_handle)?, 4);
    assert_eq!(system.coprocessor.reveal(&view.priority_sum_handle)?, 5);
    assert_eq!(system.coprocessor.reveal(&view.task_count_handle)?, 2);

    // priority_sum / task_count is the arithmetic mean of the priorities,
    // rounded down.
    let mean = system.coprocessor.reveal(&view.priority_sum_handle)?
        / system.coprocessor.reveal(&view.task_count_handle)?;
    assert_eq!(mean, 2);
    Ok(())
}

#[actix::test]
async fn test_schedules_are_isolated_per_identity() -> Result<()> {
    let system = TrackerSystemBuilder::new().build().await?;
    let alice = Address::repeat_byte(0x0a);
    let bob = Address::repeat_byte(0x0b);

    submit(&system, alice, 9, 4, 1).await?;

    let view = system
        .schedule
        .send(GetScheduleView { identity: bob })
        .await?;
    assert!(!view.is_initialized);
    assert!(view.task_count_handle.is_uninitialized());
    Ok(())
}
