// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::setup::App;
use alloy_primitives::Address;
use anyhow::Result;
use est_client::LocalSigner;
use est_events::CounterKind;
use est_tracker::{GetDailyStudyTime, GetTotalStudyTime};

pub async fn execute(app: &App, user: Address, kind: CounterKind) -> Result<()> {
    let handle = match kind {
        CounterKind::Daily => app.tracker.send(GetDailyStudyTime { identity: user }).await?,
        _ => app.tracker.send(GetTotalStudyTime { identity: user }).await?,
    };

    // An unwritten counter prints 0 without touching the oracle.
    let signer = LocalSigner::new(user);
    let value = app.client.user_decrypt(&handle, &signer)?;
    println!("{} study time for {}: {} minutes", kind, user, value);
    Ok(())
}
