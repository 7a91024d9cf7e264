// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::prelude::*;
use anyhow::anyhow;
use est_events::{
    BusError, CorrelationId, CounterKind, DecryptionRequested, EventBus, Identity,
    PlaintextAvailable, Subscribe, TrackerErrorType, TrackerEvent,
};
use est_fhe::EncryptedHandle;
use est_tracker::GetCounterHandle;
use std::collections::HashMap;

/// Ask the oracle to reveal one of an identity's counters. Completion is
/// signalled by a later `PlaintextAvailable` event carrying the same
/// `request_id`; the returned future only covers request admission.
#[derive(Message, Clone, Debug)]
#[rtype(result = "anyhow::Result<()>")]
pub struct RequestDecrypt {
    pub request_id: CorrelationId,
    pub identity: Identity,
    pub kind: CounterKind,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "usize")]
pub struct GetPendingCount;

struct PendingDecryption {
    identity: Identity,
    kind: CounterKind,
}

pub struct DecryptionGatewayParams {
    pub bus: Addr<EventBus<TrackerEvent>>,
    pub tracker: Recipient<GetCounterHandle>,
    pub schedule: Recipient<GetCounterHandle>,
}

/// Correlates decryption requests with the oracle callbacks that answer
/// them. Requests for counters that were never written are refused here so
/// the oracle never sees an uninitialized handle.
pub struct DecryptionGateway {
    bus: Addr<EventBus<TrackerEvent>>,
    tracker: Recipient<GetCounterHandle>,
    schedule: Recipient<GetCounterHandle>,
    pending: HashMap<CorrelationId, PendingDecryption>,
}

impl DecryptionGateway {
    pub fn new(params: DecryptionGatewayParams) -> Self {
        Self {
            bus: params.bus,
            tracker: params.tracker,
            schedule: params.schedule,
            pending: HashMap::new(),
        }
    }

    pub fn attach(params: DecryptionGatewayParams) -> Addr<Self> {
        let bus = params.bus.clone();
        let addr = Self::new(params).start();
        bus.do_send(Subscribe::new(
            "DecryptionResolved",
            addr.clone().recipient(),
        ));
        addr
    }

    fn route(&self, kind: CounterKind) -> &Recipient<GetCounterHandle> {
        match kind {
            CounterKind::Daily | CounterKind::Total => &self.tracker,
            _ => &self.schedule,
        }
    }
}

impl Actor for DecryptionGateway {
    type Context = Context<Self>;
}

impl Handler<RequestDecrypt> for DecryptionGateway {
    type Result = ResponseActFuture<Self, anyhow::Result<()>>;

    fn handle(&mut self, msg: RequestDecrypt, _: &mut Self::Context) -> Self::Result {
        let source = self.route(msg.kind).clone();
        Box::pin(
            async move {
                let handle = source
                    .send(GetCounterHandle {
                        identity: msg.identity,
                        kind: msg.kind,
                    })
                    .await?;
                Ok((msg, handle))
            }
            .into_actor(self)
            .map(
                |res: anyhow::Result<(RequestDecrypt, EncryptedHandle)>, act, _| {
                    let (msg, handle) = res?;

                    if handle.is_uninitialized() {
                        act.bus.err(
                            TrackerErrorType::NoData,
                            anyhow!("No {} data recorded for {}", msg.kind, msg.identity),
                        );
                        return Err(anyhow!(
                            "no {} data recorded for {}",
                            msg.kind,
                            msg.identity
                        ));
                    }

                    act.pending.insert(
                        msg.request_id,
                        PendingDecryption {
                            identity: msg.identity,
                            kind: msg.kind,
                        },
                    );
                    act.bus.do_send(TrackerEvent::from(DecryptionRequested {
                        request_id: msg.request_id,
                        identity: msg.identity,
                        kind: msg.kind,
                        handle,
                    }));
                    Ok(())
                },
            ),
        )
    }
}

impl Handler<TrackerEvent> for DecryptionGateway {
    type Result = ();

    fn handle(&mut self, event: TrackerEvent, _: &mut Self::Context) -> Self::Result {
        let TrackerEvent::DecryptionResolved { data, .. } = event else {
            return;
        };

        // Stale or foreign callbacks never surface a plaintext; the error
        // event is the only trace they leave.
        let Some(pending) = self.pending.remove(&data.request_id) else {
            self.bus.err(
                TrackerErrorType::UnknownRequestId,
                anyhow!("Dropping callback for unknown request {}", data.request_id),
            );
            return;
        };

        self.bus.do_send(TrackerEvent::from(PlaintextAvailable {
            request_id: data.request_id,
            identity: pending.identity,
            kind: pending.kind,
            value: data.value,
        }));
    }
}

impl Handler<GetPendingCount> for DecryptionGateway {
    type Result = usize;

    fn handle(&mut self, _: GetPendingCount, _: &mut Self::Context) -> Self::Result {
        self.pending.len()
    }
}
