// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{day_index, Clock};
use actix::prelude::*;
use alloy_primitives::Address;
use anyhow::anyhow;
use est_data::Persistable;
use est_events::{
    BusError, CounterKind, EventBus, Identity, StudyTimeRecorded, TrackerErrorType, TrackerEvent,
};
use est_fhe::{EncryptedHandle, EncryptedInput, FheCoprocessor, HandleWidth};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Per-identity encrypted counters together with the UTC day index of the
/// last accepted write. `last_study_date` is meaningless until `daily` has
/// been written at least once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyRecord {
    pub daily: EncryptedHandle,
    pub total: EncryptedHandle,
    pub last_study_date: u64,
}

impl Default for StudyRecord {
    fn default() -> Self {
        Self {
            daily: EncryptedHandle::zero(HandleWidth::Uint32),
            total: EncryptedHandle::zero(HandleWidth::Uint32),
            last_study_date: 0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerState {
    pub records: BTreeMap<Identity, StudyRecord>,
}

/// Submit an encrypted study time delta for an identity. The delta is folded
/// into both the daily and the lifetime counter; the daily counter is reset
/// first when the write crosses a UTC day boundary.
#[derive(Message, Clone, Debug)]
#[rtype(result = "anyhow::Result<()>")]
pub struct RecordStudyTime {
    pub identity: Identity,
    pub input: EncryptedInput,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "EncryptedHandle")]
pub struct GetDailyStudyTime {
    pub identity: Identity,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "EncryptedHandle")]
pub struct GetTotalStudyTime {
    pub identity: Identity,
}

/// Current UTC day index as the tracker's clock sees it.
#[derive(Message, Clone, Debug)]
#[rtype(result = "u64")]
pub struct GetCurrentDate;

#[derive(Message, Clone, Debug)]
#[rtype(result = "u64")]
pub struct GetLastStudyDate {
    pub identity: Identity,
}

/// Kind-dispatched handle lookup used by the decryption gateway. Kinds the
/// receiving actor does not own answer with the all-zero handle.
#[derive(Message, Clone, Debug)]
#[rtype(result = "EncryptedHandle")]
pub struct GetCounterHandle {
    pub identity: Identity,
    pub kind: CounterKind,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "TrackerView")]
pub struct GetTrackerView {
    pub identity: Identity,
}

/// Everything publicly observable about one identity's tracker entry. Handles
/// are opaque; only the last write date and initialization flag are clear.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackerView {
    pub daily_handle: EncryptedHandle,
    pub total_handle: EncryptedHandle,
    pub last_study_date: u64,
    pub is_initialized: bool,
}

pub struct StudyTrackerParams {
    pub bus: Addr<EventBus<TrackerEvent>>,
    pub coprocessor: Arc<dyn FheCoprocessor>,
    pub clock: Arc<dyn Clock>,
    pub contract: Address,
    pub state: Persistable<TrackerState>,
}

/// Actor owning the per-identity daily and lifetime study counters. All
/// arithmetic happens on ciphertext handles; the actor never learns a value.
pub struct StudyTracker {
    bus: Addr<EventBus<TrackerEvent>>,
    coprocessor: Arc<dyn FheCoprocessor>,
    clock: Arc<dyn Clock>,
    contract: Address,
    state: Persistable<TrackerState>,
}

impl StudyTracker {
    pub fn new(params: StudyTrackerParams) -> Self {
        Self {
            bus: params.bus,
            coprocessor: params.coprocessor,
            clock: params.clock,
            contract: params.contract,
            state: params.state,
        }
    }

    fn record(&self, identity: &Identity) -> StudyRecord {
        self.state
            .get()
            .and_then(|state| state.records.get(identity).cloned())
            .unwrap_or_default()
    }
}

impl Actor for StudyTracker {
    type Context = Context<Self>;
}

impl Handler<RecordStudyTime> for StudyTracker {
    type Result = anyhow::Result<()>;

    fn handle(&mut self, msg: RecordStudyTime, _: &mut Self::Context) -> Self::Result {
        let RecordStudyTime { identity, input } = msg;

        let handle = match self.coprocessor.verify_input(self.contract, identity, &input) {
            Ok(handle) => handle,
            Err(err) => {
                self.bus.err(
                    TrackerErrorType::InvalidProof,
                    anyhow!("Rejected study time from {identity}: {err}"),
                );
                return Err(err.into());
            }
        };

        let today = day_index(self.clock.now_secs());
        let coprocessor = self.coprocessor.clone();
        let mut recorded: Option<StudyTimeRecorded> = None;

        self.state.try_mutate(|mut state| {
            let mut record = state.records.get(&identity).cloned().unwrap_or_default();

            // The first ever write is not a rollover even though the stored
            // date does not match today.
            let rolled_over = !record.daily.is_uninitialized() && record.last_study_date != today;
            if rolled_over {
                record.daily = EncryptedHandle::zero(HandleWidth::Uint32);
            }

            record.daily = coprocessor.add(&record.daily, &handle)?;
            record.total = coprocessor.add(&record.total, &handle)?;
            record.last_study_date = today;

            recorded = Some(StudyTimeRecorded {
                identity,
                day: today,
                daily: record.daily,
                total: record.total,
                rolled_over,
            });

            state.records.insert(identity, record);
            Ok(state)
        })?;

        if let Some(event) = recorded {
            info!(identity = %identity, day = today, "Study time recorded");
            self.bus.do_send(TrackerEvent::from(event));
        }

        Ok(())
    }
}

impl Handler<GetDailyStudyTime> for StudyTracker {
    type Result = MessageResult<GetDailyStudyTime>;

    fn handle(&mut self, msg: GetDailyStudyTime, _: &mut Self::Context) -> Self::Result {
        MessageResult(self.record(&msg.identity).daily)
    }
}

impl Handler<GetTotalStudyTime> for StudyTracker {
    type Result = MessageResult<GetTotalStudyTime>;

    fn handle(&mut self, msg: GetTotalStudyTime, _: &mut Self::Context) -> Self::Result {
        MessageResult(self.record(&msg.identity).total)
    }
}

impl Handler<GetCurrentDate> for StudyTracker {
    type Result = u64;

    fn handle(&mut self, _: GetCurrentDate, _: &mut Self::Context) -> Self::Result {
        day_index(self.clock.now_secs())
    }
}

impl Handler<GetLastStudyDate> for StudyTracker {
    type Result = u64;

    fn handle(&mut self, msg: GetLastStudyDate, _: &mut Self::Context) -> Self::Result {
        self.record(&msg.identity).last_study_date
    }
}

impl Handler<GetCounterHandle> for StudyTracker {
    type Result = MessageResult<GetCounterHandle>;

    fn handle(&mut self, msg: GetCounterHandle, _: &mut Self::Context) -> Self::Result {
        let record = self.record(&msg.identity);
        let handle = match msg.kind {
            CounterKind::Daily => record.daily,
            CounterKind::Total => record.total,
            _ => EncryptedHandle::zero(HandleWidth::Uint32),
        };
        MessageResult(handle)
    }
}

impl Handler<GetTrackerView> for StudyTracker {
    type Result = MessageResult<GetTrackerView>;

    fn handle(&mut self, msg: GetTrackerView, _: &mut Self::Context) -> Self::Result {
        let record = self.record(&msg.identity);
        MessageResult(TrackerView {
            daily_handle: record.daily,
            total_handle: record.total,
            last_study_date: record.last_study_date,
            is_initialized: !record.daily.is_uninitialized(),
        })
    }
}
