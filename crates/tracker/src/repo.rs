// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{ScheduleState, TrackerState};
use est_config::StoreKeys;
use est_data::{Repositories, Repository};

pub trait TrackerRepositoryFactory {
    fn tracker(&self) -> Repository<TrackerState>;
    fn schedule(&self) -> Repository<ScheduleState>;
}

impl TrackerRepositoryFactory for Repositories {
    fn tracker(&self) -> Repository<TrackerState> {
        Repository::new(self.store.scope(StoreKeys::tracker()))
    }

    fn schedule(&self) -> Repository<ScheduleState> {
        Repository::new(self.store.scope(StoreKeys::schedule()))
    }
}
