// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::setup::App;
use alloy_primitives::Address;
use anyhow::Result;
use est_client::LocalSigner;
use est_tracker::GetScheduleView;

pub async fn execute(app: &App, user: Address) -> Result<()> {
    let view = app.schedule.send(GetScheduleView { identity: user }).await?;
    let signer = LocalSigner::new(user);

    let goal = app.client.user_decrypt(&view.goal_handle, &signer)?;
    let completed = app.client.user_decrypt(&view.completed_handle, &signer)?;
    let priority_sum = app.client.user_decrypt(&view.priority_sum_handle, &signer)?;
    let task_count = app.client.user_decrypt(&view.task_count_handle, &signer)?;

    println!("Schedule summary for {}", user);
    println!("  tasks:          {}", task_count);
    println!("  goal total:     {}", goal);
    println!("  completed:      {}", completed);
    if goal > 0 {
        println!("  completion:     {}%", (completed * 100) / goal);
    } else {
        println!("  completion:     n/a");
    }
    if task_count > 0 {
        println!("  avg priority:   {}", priority_sum / task_count);
    } else {
        println!("  avg priority:   n/a");
    }
    Ok(())
}
