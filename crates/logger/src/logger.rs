// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::{Actor, Addr, Context, Handler};
use est_events::{Event, EventBus, Subscribe, TrackerEvent};
use std::marker::PhantomData;
use tracing::{error, info};

pub trait EventLogging: Event {
    fn log(&self, logger_name: &str);
}

/// Bus subscriber that prints every event it sees.
pub struct SimpleLogger<E: EventLogging> {
    name: String,
    _p: PhantomData<E>,
}

impl<E: EventLogging> SimpleLogger<E> {
    pub fn attach(name: &str, bus: Addr<EventBus<E>>) -> Addr<Self> {
        let addr = Self {
            name: name.to_owned(),
            _p: PhantomData,
        }
        .start();
        bus.do_send(Subscribe::<E>::new(
            "*".to_string(),
            addr.clone().recipient(),
        ));
        info!(node=%name, "READY!");
        addr
    }
}

impl<E: EventLogging> Actor for SimpleLogger<E> {
    type Context = Context<Self>;
}

impl<E: EventLogging> Handler<E> for SimpleLogger<E> {
    type Result = ();

    fn handle(&mut self, msg: E, _: &mut Self::Context) -> Self::Result {
        msg.log(&self.name);
    }
}

impl EventLogging for TrackerEvent {
    fn log(&self, logger_name: &str) {
        match self {
            TrackerEvent::TrackerError { .. } => error!(event=%self, "ERROR!"),
            _ => match self.get_identity() {
                Some(identity) => {
                    info!(me=logger_name, evt=%self, identity=%identity, "Event Broadcasted")
                }
                None => info!(me=logger_name, evt=%self, "Event Broadcasted"),
            },
        };
    }
}
