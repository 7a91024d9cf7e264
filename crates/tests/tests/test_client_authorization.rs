// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy_primitives::Address;
use anyhow::Result;
use est_client::{AuthSigner, LocalSigner, StudyClient};
use est_fhe::{BfvCoprocessor, FheCoprocessor, MockCoprocessor};
use est_test_helpers::{create_shared_rng_from_u64, SimClock, TrackerSystemBuilder};
use est_tracker::{GetDailyStudyTime, RecordStudyTime};
use std::sync::Arc;

async fn round_trip_with(coprocessor: Arc<dyn FheCoprocessor>) -> Result<()> {
    let system = TrackerSystemBuilder::new()
        .with_coprocessor(coprocessor)
        .build()
        .await?;
    let signer = LocalSigner::new(Address::repeat_byte(0x01));
    let client = StudyClient::new(system.coprocessor.clone(), system.clock.clone(), system.contract, 600);

    let input = client.encrypt_u32(signer.address(), 42)?;
    system
        .tracker
        .send(RecordStudyTime {
            identity: signer.address(),
            input,
        })
        .await??;

    let daily = system
        .tracker
        .send(GetDailyStudyTime {
            identity: signer.address(),
        })
        .await?;
    assert_eq!(client.user_decrypt(&daily, &signer)?, 42);
    Ok(())
}

#[actix::test]
async fn test_round_trip_with_the_mock_backend() -> Result<()> {
    round_trip_with(Arc::new(MockCoprocessor::default())).await
}

#[actix::test]
async fn test_round_trip_with_the_bfv_backend() -> Result<()> {
    round_trip_with(Arc::new(BfvCoprocessor::new(create_shared_rng_from_u64(
        42,
    ))?))
    .await
}

#[actix::test]
async fn test_authorization_reuse_and_expiry_across_the_system() -> Result<()> {
    let system = TrackerSystemBuilder::new().build().await?;
    let clock: Arc<SimClock> = system.clock.clone();
    let signer = LocalSigner::new(Address::repeat_byte(0x02));
    let client = StudyClient::new(
        system.coprocessor.clone(),
        clock.clone(),
        system.contract,
        600,
    );

    let input = client.encrypt_u32(signer.address(), 5)?;
    system
        .tracker
        .send(RecordStudyTime {
            identity: signer.address(),
            input,
        })
        .await??;
    let daily = system
        .tracker
        .send(GetDailyStudyTime {
            identity: signer.address(),
        })
        .await?;

    client.user_decrypt(&daily, &signer)?;
    client.user_decrypt(&daily, &signer)?;
    assert_eq!(signer.sign_count(), 1);

    // Crossing the validity window prompts one fresh signature, not an
    // error.
    clock.advance(601);
    assert_eq!(client.user_decrypt(&daily, &signer)?, 5);
    assert_eq!(signer.sign_count(), 2);
    Ok(())
}
