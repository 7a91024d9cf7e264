// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::setup::App;
use alloy_primitives::Address;
use anyhow::Result;
use est_tracker::RecordStudyTime;

pub async fn execute(app: &App, user: Address, minutes: u32) -> Result<()> {
    let input = app.client.encrypt_u32(user, minutes)?;
    app.tracker
        .send(RecordStudyTime {
            identity: user,
            input,
        })
        .await??;
    println!("Recorded {} encrypted minutes for {}", minutes, user);
    Ok(())
}
