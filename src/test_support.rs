//! Shared helpers for unit tests.

use crate::agent::{AgentName, TaskId};
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use std::sync::Mutex;

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct StepClock {
    now: Mutex<DateTime<Utc>>,
}

impl StepClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(
                Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0)
                    .single()
                    .expect("valid start instant"),
            ),
        }
    }

    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().expect("clock lock");
        *now += delta;
    }

    pub fn rewind(&self, delta: TimeDelta) {
        let mut now = self.now.lock().expect("clock lock");
        *now -= delta;
    }
}

impl Clock for StepClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}

pub fn agent(name: &str) -> AgentName {
    AgentName::new(name).expect("valid agent name")
}

pub fn task(id: &str) -> TaskId {
    TaskId::new(id).expect("valid task id")
}
