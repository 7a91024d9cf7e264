// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::tracker::GetCounterHandle;
use actix::prelude::*;
use alloy_primitives::Address;
use anyhow::anyhow;
use est_data::Persistable;
use est_events::{
    BusError, CounterKind, EventBus, Identity, ScheduleUpdated, TrackerErrorType, TrackerEvent,
};
use est_fhe::{EncryptedHandle, EncryptedInput, FheCoprocessor, HandleWidth};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Lifetime schedule aggregates for one identity. Entries are never listed or
/// deleted individually; each submission folds into these four counters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub goal_count: EncryptedHandle,
    pub completed_count: EncryptedHandle,
    pub priority_sum: EncryptedHandle,
    pub task_count: EncryptedHandle,
}

impl Default for ScheduleRecord {
    fn default() -> Self {
        Self {
            goal_count: EncryptedHandle::zero(HandleWidth::Uint32),
            completed_count: EncryptedHandle::zero(HandleWidth::Uint32),
            priority_sum: EncryptedHandle::zero(HandleWidth::Uint32),
            task_count: EncryptedHandle::zero(HandleWidth::Uint32),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleState {
    pub records: BTreeMap<Identity, ScheduleRecord>,
}

/// Submit one schedule entry. All three proofs are checked before any
/// counter is touched, so a single bad input rejects the whole entry.
#[derive(Message, Clone, Debug)]
#[rtype(result = "anyhow::Result<()>")]
pub struct UpdateStudySchedule {
    pub identity: Identity,
    pub goal: EncryptedInput,
    pub completed: EncryptedInput,
    pub priority: EncryptedInput,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "ScheduleView")]
pub struct GetScheduleView {
    pub identity: Identity,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleView {
    pub goal_handle: EncryptedHandle,
    pub completed_handle: EncryptedHandle,
    pub priority_sum_handle: EncryptedHandle,
    pub task_count_handle: EncryptedHandle,
    pub is_initialized: bool,
}

pub struct StudyScheduleParams {
    pub bus: Addr<EventBus<TrackerEvent>>,
    pub coprocessor: Arc<dyn FheCoprocessor>,
    pub contract: Address,
    pub state: Persistable<ScheduleState>,
}

/// Actor owning the per-identity schedule aggregates. Unlike the study
/// tracker there is no day accounting; every counter is lifetime-scoped.
pub struct StudySchedule {
    bus: Addr<EventBus<TrackerEvent>>,
    coprocessor: Arc<dyn FheCoprocessor>,
    contract: Address,
    state: Persistable<ScheduleState>,
}

impl StudySchedule {
    pub fn new(params: StudyScheduleParams) -> Self {
        Self {
            bus: params.bus,
            coprocessor: params.coprocessor,
            contract: params.contract,
            state: params.state,
        }
    }

    fn record(&self, identity: &Identity) -> ScheduleRecord {
        self.state
            .get()
            .and_then(|state| state.records.get(identity).cloned())
            .unwrap_or_default()
    }
}

impl Actor for StudySchedule {
    type Context = Context<Self>;
}

impl Handler<UpdateStudySchedule> for StudySchedule {
    type Result = anyhow::Result<()>;

    fn handle(&mut self, msg: UpdateStudySchedule, _: &mut Self::Context) -> Self::Result {
        let UpdateStudySchedule {
            identity,
            goal,
            completed,
            priority,
        } = msg;

        let mut handles = Vec::with_capacity(3);
        for input in [&goal, &completed, &priority] {
            match self.coprocessor.verify_input(self.contract, identity, input) {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    self.bus.err(
                        TrackerErrorType::InvalidProof,
                        anyhow!("Rejected schedule entry from {identity}: {err}"),
                    );
                    return Err(err.into());
                }
            }
        }

        let coprocessor = self.coprocessor.clone();
        let mut updated: Option<ScheduleUpdated> = None;

        self.state.try_mutate(|mut state| {
            let mut record = state.records.get(&identity).cloned().unwrap_or_default();

            record.goal_count = coprocessor.add(&record.goal_count, &handles[0])?;
            record.completed_count = coprocessor.add(&record.completed_count, &handles[1])?;
            record.priority_sum = coprocessor.add(&record.priority_sum, &handles[2])?;

            let one = coprocessor.trivial_encrypt(1, HandleWidth::Uint32)?;
            record.task_count = coprocessor.add(&record.task_count, &one)?;

            updated = Some(ScheduleUpdated {
                identity,
                goal_count: record.goal_count,
                completed_count: record.completed_count,
                priority_sum: record.priority_sum,
                task_count: record.task_count,
            });

            state.records.insert(identity, record);
            Ok(state)
        })?;

        if let Some(event) = updated {
            info!(identity = %identity, "Schedule updated");
            self.bus.do_send(TrackerEvent::from(event));
        }

        Ok(())
    }
}

impl Handler<GetCounterHandle> for StudySchedule {
    type Result = MessageResult<GetCounterHandle>;

    fn handle(&mut self, msg: GetCounterHandle, _: &mut Self::Context) -> Self::Result {
        let record = self.record(&msg.identity);
        let handle = match msg.kind {
            CounterKind::Goal => record.goal_count,
            CounterKind::Completed => record.completed_count,
            CounterKind::PrioritySum => record.priority_sum,
            CounterKind::TaskCount => record.task_count,
            _ => EncryptedHandle::zero(HandleWidth::Uint32),
        };
        MessageResult(handle)
    }
}

impl Handler<GetScheduleView> for StudySchedule {
    type Result = MessageResult<GetScheduleView>;

    fn handle(&mut self, msg: GetScheduleView, _: &mut Self::Context) -> Self::Result {
        let record = self.record(&msg.identity);
        MessageResult(ScheduleView {
            goal_handle: record.goal_count,
            completed_handle: record.completed_count,
            priority_sum_handle: record.priority_sum,
            task_count_handle: record.task_count,
            is_initialized: !record.task_count.is_uninitialized(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use est_data::{DataStore, InMemStore, Repository};
    use est_events::new_event_bus_with_history;
    use est_fhe::MockCoprocessor;

    fn setup() -> (Addr<StudySchedule>, Arc<MockCoprocessor>, Address) {
        let (bus, _) = new_event_bus_with_history();
        let coprocessor = Arc::new(MockCoprocessor::default());
        let contract = Address::repeat_byte(0xc0);
        let store: DataStore = (&InMemStore::new(false).start()).into();
        let repo: Repository<ScheduleState> = Repository::new(store.scope("//schedule"));
        let state = Persistable::new(Some(ScheduleState::default()), &repo);
        let schedule = StudySchedule::new(StudyScheduleParams {
            bus,
            coprocessor: coprocessor.clone(),
            contract,
            state,
        })
        .start();
        (schedule, coprocessor, contract)
    }

    fn entry(
        coprocessor: &MockCoprocessor,
        contract: Address,
        user: Address,
        goal: u32,
        completed: u32,
        priority: u32,
    ) -> Result<UpdateStudySchedule> {
        Ok(UpdateStudySchedule {
            identity: user,
            goal: coprocessor.encrypt_u32(contract, user, goal)?,
            completed: coprocessor.encrypt_u32(contract, user, completed)?,
            priority: coprocessor.encrypt_u32(contract, user, priority)?,
        })
    }

    #[actix::test]
    async fn test_entries_fold_into_lifetime_counters() -> Result<()> {
        let (schedule, coprocessor, contract) = setup();
        let user = Address::repeat_byte(0x01);

        schedule
            .send(entry(&coprocessor, contract, user, 5, 3, 2)?)
            .await??;
        schedule
            .send(entry(&coprocessor, contract, user, 2, 1, 3)?)
            .await??;

        let view = schedule.send(GetScheduleView { identity: user }).await?;
        assert_eq!(coprocessor.reveal(&view.goal_handle)?, 7);
        assert_eq!(coprocessor.reveal(&view.completed_handle)?, 4);
        assert_eq!(coprocessor.reveal(&view.priority_sum_handle)?, 5);
        assert_eq!(coprocessor.reveal(&view.task_count_handle)?, 2);
        assert!(view.is_initialized);
        Ok(())
    }

    #[actix::test]
    async fn test_one_bad_proof_rejects_the_whole_entry() -> Result<()> {
        let (schedule, coprocessor, contract) = setup();
        let user = Address::repeat_byte(0x02);
        let stranger = Address::repeat_byte(0x03);

        let msg = UpdateStudySchedule {
            identity: user,
            goal: coprocessor.encrypt_u32(contract, user, 5)?,
            completed: coprocessor.encrypt_u32(contract, stranger, 3)?,
            priority: coprocessor.encrypt_u32(contract, user, 2)?,
        };
        let result = schedule.send(msg).await?;
        assert!(result.is_err());

        let view = schedule.send(GetScheduleView { identity: user }).await?;
        assert!(!view.is_initialized);
        assert!(view.goal_handle.is_uninitialized());
        Ok(())
    }

    #[actix::test]
    async fn test_counter_handles_dispatch_by_kind() -> Result<()> {
        let (schedule, coprocessor, contract) = setup();
        let user = Address::repeat_byte(0x04);

        schedule
            .send(entry(&coprocessor, contract, user, 8, 6, 1)?)
            .await??;

        let goal = schedule
            .send(GetCounterHandle {
                identity: user,
                kind: CounterKind::Goal,
            })
            .await?;
        assert_eq!(coprocessor.reveal(&goal)?, 8);

        // Tracker-owned kinds answer with the zero handle here.
        let daily = schedule
            .send(GetCounterHandle {
                identity: user,
                kind: CounterKind::Daily,
            })
            .await?;
        assert!(daily.is_uninitialized());
        Ok(())
    }
}
