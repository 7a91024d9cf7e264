// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod decryption_requested;
mod decryption_resolved;
mod plaintext_available;
mod schedule_updated;
mod shutdown;
mod study_time_recorded;
mod tracker_error;

pub use decryption_requested::*;
pub use decryption_resolved::*;
pub use plaintext_available::*;
pub use schedule_updated::*;
pub use shutdown::*;
pub use study_time_recorded::*;
pub use tracker_error::*;

use crate::{ErrorEvent, Event, EventId, Identity};
use actix::Message;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{self},
    hash::Hash,
};

/// Macro to help define From traits for TrackerEvent
macro_rules! impl_from_event {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for TrackerEvent {
                fn from(data: $variant) -> Self {
                    TrackerEvent::$variant {
                        id: EventId::hash(data.clone()),
                        data,
                    }
                }
            }
        )*
    };
}

#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub enum TrackerEvent {
    StudyTimeRecorded {
        id: EventId,
        data: StudyTimeRecorded,
    },
    ScheduleUpdated {
        id: EventId,
        data: ScheduleUpdated,
    },
    DecryptionRequested {
        id: EventId,
        data: DecryptionRequested,
    },
    DecryptionResolved {
        id: EventId,
        data: DecryptionResolved,
    },
    PlaintextAvailable {
        id: EventId,
        data: PlaintextAvailable,
    },
    TrackerError {
        id: EventId,
        data: TrackerError,
    },
    Shutdown {
        id: EventId,
        data: Shutdown,
    },
}

impl TrackerEvent {
    pub fn get_id(&self) -> EventId {
        self.clone().into()
    }

    pub fn get_identity(&self) -> Option<Identity> {
        match self.clone() {
            TrackerEvent::StudyTimeRecorded { data, .. } => Some(data.identity),
            TrackerEvent::ScheduleUpdated { data, .. } => Some(data.identity),
            TrackerEvent::DecryptionRequested { data, .. } => Some(data.identity),
            TrackerEvent::PlaintextAvailable { data, .. } => Some(data.identity),
            _ => None,
        }
    }

    pub fn get_data(&self) -> String {
        match self.clone() {
            TrackerEvent::StudyTimeRecorded { data, .. } => format!("{}", data),
            TrackerEvent::ScheduleUpdated { data, .. } => format!("{}", data),
            TrackerEvent::DecryptionRequested { data, .. } => format!("{}", data),
            TrackerEvent::DecryptionResolved { data, .. } => format!("{}", data),
            TrackerEvent::PlaintextAvailable { data, .. } => format!("{}", data),
            TrackerEvent::TrackerError { data, .. } => format!("{:?}", data),
            TrackerEvent::Shutdown { data, .. } => format!("{:?}", data),
        }
    }
}

impl Event for TrackerEvent {
    type Id = EventId;

    fn event_type(&self) -> String {
        let s = format!("{:?}", self);
        extract_event_name(&s).to_string()
    }

    fn event_id(&self) -> Self::Id {
        self.get_id()
    }
}

impl ErrorEvent for TrackerEvent {
    type Error = TrackerError;
    type ErrorType = TrackerErrorType;

    fn as_error(&self) -> Option<&Self::Error> {
        match self {
            TrackerEvent::TrackerError { data, .. } => Some(data),
            _ => None,
        }
    }

    fn from_error(err_type: Self::ErrorType, error: anyhow::Error) -> Self {
        TrackerEvent::from(TrackerError::new(err_type, error.to_string().as_str()))
    }
}

impl From<TrackerEvent> for EventId {
    fn from(value: TrackerEvent) -> Self {
        match value {
            TrackerEvent::StudyTimeRecorded { id, .. } => id,
            TrackerEvent::ScheduleUpdated { id, .. } => id,
            TrackerEvent::DecryptionRequested { id, .. } => id,
            TrackerEvent::DecryptionResolved { id, .. } => id,
            TrackerEvent::PlaintextAvailable { id, .. } => id,
            TrackerEvent::TrackerError { id, .. } => id,
            TrackerEvent::Shutdown { id, .. } => id,
        }
    }
}

impl_from_event!(
    StudyTimeRecorded,
    ScheduleUpdated,
    DecryptionRequested,
    DecryptionResolved,
    PlaintextAvailable,
    TrackerError,
    Shutdown
);

impl fmt::Display for TrackerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format!("{}({})", self.event_type(), self.get_data()))
    }
}

fn extract_event_name(s: &str) -> &str {
    let bytes = s.as_bytes();
    for (i, &item) in bytes.iter().enumerate() {
        if item == b' ' || item == b'(' {
            return &s[..i];
        }
    }
    s
}
