// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::prelude::*;
use anyhow::anyhow;
use est_events::{
    BusError, DecryptionResolved, EventBus, Subscribe, TrackerErrorType, TrackerEvent,
};
use est_fhe::FheCoprocessor;
use std::sync::Arc;
use tracing::info;

pub struct DecryptionOracleParams {
    pub bus: Addr<EventBus<TrackerEvent>>,
    pub coprocessor: Arc<dyn FheCoprocessor>,
}

/// Stand-in for the decryption oracle service. Listens for decryption
/// requests, reveals the handle through the coprocessor and answers with a
/// correlated callback. Callbacks may arrive in any order.
pub struct DecryptionOracle {
    bus: Addr<EventBus<TrackerEvent>>,
    coprocessor: Arc<dyn FheCoprocessor>,
}

impl DecryptionOracle {
    pub fn new(params: DecryptionOracleParams) -> Self {
        Self {
            bus: params.bus,
            coprocessor: params.coprocessor,
        }
    }

    pub fn attach(params: DecryptionOracleParams) -> Addr<Self> {
        let bus = params.bus.clone();
        let addr = Self::new(params).start();
        bus.do_send(Subscribe::new(
            "DecryptionRequested",
            addr.clone().recipient(),
        ));
        addr
    }
}

impl Actor for DecryptionOracle {
    type Context = Context<Self>;
}

impl Handler<TrackerEvent> for DecryptionOracle {
    type Result = ();

    fn handle(&mut self, event: TrackerEvent, _: &mut Self::Context) -> Self::Result {
        let TrackerEvent::DecryptionRequested { data, .. } = event else {
            return;
        };

        match self.coprocessor.reveal(&data.handle) {
            Ok(value) => {
                info!(request_id = %data.request_id, "Decryption complete");
                self.bus.do_send(TrackerEvent::from(DecryptionResolved {
                    request_id: data.request_id,
                    value,
                }));
            }
            Err(err) => {
                self.bus.err(
                    TrackerErrorType::Decryption,
                    anyhow!("Failed to decrypt request {}: {err}", data.request_id),
                );
            }
        }
    }
}
