//! Shared helpers for the in-memory coordination integration tests.

use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use concord::{
    agent::{AgentName, TaskId},
    bus::{
        domain::AgentMessage,
        ports::{HandlerResult, MessageHandler, handler_fn},
    },
    config::CoordinationConfig,
    context::CoordinationContext,
};
use mockable::Clock;
use rstest::fixture;

static TRACING: Once = Once::new();

/// Installs a test-writer subscriber once per test binary.
///
/// Set `RUST_LOG=concord=debug` to see the bus and negotiation events.
pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

/// Clock that only moves when a test moves it.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock frozen at 2026-03-02 10:00 UTC.
    pub fn new() -> Self {
        let start = Utc
            .with_ymd_and_hms(2026, 3, 2, 10, 0, 0)
            .single()
            .expect("valid start instant");
        Self {
            now: Mutex::new(start),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, delta: TimeDelta) {
        *self.now.lock().expect("clock lock") += delta;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}

/// Context under test together with the clock driving it.
pub struct Coordination {
    pub context: CoordinationContext<ManualClock>,
    pub clock: Arc<ManualClock>,
}

/// Provides a fresh context with a short handler timeout.
#[fixture]
pub fn coordination() -> Coordination {
    init_tracing();
    let clock = Arc::new(ManualClock::new());
    let config = CoordinationConfig::default().with_handler_timeout(Duration::from_millis(250));
    Coordination {
        context: CoordinationContext::new(config, Arc::clone(&clock)),
        clock,
    }
}

/// Builds an agent name, panicking on invalid input.
pub fn agent(name: &str) -> AgentName {
    AgentName::new(name).expect("valid agent name")
}

/// Builds a task id, panicking on invalid input.
pub fn task(id: &str) -> TaskId {
    TaskId::new(id).expect("valid task id")
}

/// Messages captured by a [`recorder`] handler.
pub type Inbox = Arc<Mutex<Vec<AgentMessage>>>;

/// Returns a handler that stores every message it receives.
pub fn recorder() -> (Inbox, Arc<dyn MessageHandler>) {
    let inbox: Inbox = Arc::default();
    let sink = Arc::clone(&inbox);
    let handler = handler_fn(move |message| {
        let target = Arc::clone(&sink);
        async move {
            target.lock().expect("inbox lock").push(message);
            HandlerResult::Ok(())
        }
    });
    (inbox, Arc::new(handler))
}

/// Returns the bodies recorded so far.
pub fn bodies(inbox: &Inbox) -> Vec<String> {
    inbox
        .lock()
        .expect("inbox lock")
        .iter()
        .map(|message| message.body().to_owned())
        .collect()
}
