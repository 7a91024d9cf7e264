// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::setup::App;
use alloy_primitives::Address;
use anyhow::Result;
use est_tracker::{GetCurrentDate, GetTrackerView};

pub async fn execute(app: &App, user: Address) -> Result<()> {
    let today = app.tracker.send(GetCurrentDate).await?;
    let view = app.tracker.send(GetTrackerView { identity: user }).await?;

    println!("Tracker entry for {}", user);
    println!("  current date (day index): {}", today);
    if view.is_initialized {
        println!("  last study date:          {}", view.last_study_date);
    } else {
        println!("  last study date:          never");
    }
    println!("  daily handle:             {}", view.daily_handle);
    println!("  total handle:             {}", view.total_handle);
    Ok(())
}
