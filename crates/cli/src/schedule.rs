// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::setup::App;
use alloy_primitives::Address;
use anyhow::Result;
use est_tracker::UpdateStudySchedule;

pub async fn execute(
    app: &App,
    user: Address,
    goal: u32,
    completed: u32,
    priority: u32,
) -> Result<()> {
    app.schedule
        .send(UpdateStudySchedule {
            identity: user,
            goal: app.client.encrypt_u32(user, goal)?,
            completed: app.client.encrypt_u32(user, completed)?,
            priority: app.client.encrypt_u32(user, priority)?,
        })
        .await??;
    println!(
        "Recorded schedule entry for {} (goal {}, completed {}, priority {})",
        user, goal, completed, priority
    );
    Ok(())
}
