//! Recording collaborator mocks shared by the unit tests.

use async_trait::async_trait;
use nudge_core::{
    error::NudgeError,
    message::{ActionRecord, OutboundCommand, PersonField, ReplyFragmentSet, ReplyIntent},
    traits::{ActionHistory, IdentityResolver, ReplyGenerator, Transport},
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::Collaborators;

// ---------------------------------------------------------------------------
// Identity resolver
// ---------------------------------------------------------------------------

struct Person {
    id: String,
    user_id: String,
    name: String,
}

pub(crate) struct MockResolver {
    persons: Vec<Person>,
    fail: bool,
    calls: AtomicUsize,
}

impl MockResolver {
    pub(crate) fn with_person(id: &str, user_id: &str, name: &str) -> Self {
        Self {
            persons: vec![Person {
                id: id.to_string(),
                user_id: user_id.to_string(),
                name: name.to_string(),
            }],
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn empty() -> Self {
        Self {
            persons: Vec::new(),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::empty()
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<(), NudgeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(NudgeError::Identity("database is locked".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityResolver for MockResolver {
    async fn person_id(&self, platform: &str, user_id: &str) -> Result<Option<String>, NudgeError> {
        self.enter()?;
        if platform != "qq" {
            return Ok(None);
        }
        Ok(self
            .persons
            .iter()
            .find(|p| p.user_id == user_id)
            .map(|p| p.id.clone()))
    }

    async fn person_id_by_name(&self, name: &str) -> Result<Option<String>, NudgeError> {
        self.enter()?;
        Ok(self
            .persons
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.id.clone()))
    }

    async fn person_value(
        &self,
        person_id: &str,
        field: PersonField,
    ) -> Result<Option<String>, NudgeError> {
        self.enter()?;
        Ok(self
            .persons
            .iter()
            .find(|p| p.id == person_id)
            .map(|p| match field {
                PersonField::PersonName => p.name.clone(),
                PersonField::UserId => p.user_id.clone(),
            }))
    }
}

// ---------------------------------------------------------------------------
// Reply generator
// ---------------------------------------------------------------------------

pub(crate) struct MockGenerator {
    result: Result<Vec<String>, String>,
    intents: Mutex<Vec<ReplyIntent>>,
}

impl MockGenerator {
    pub(crate) fn replying(fragments: &[&str]) -> Self {
        Self {
            result: Ok(fragments.iter().map(|s| s.to_string()).collect()),
            intents: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            result: Err("model overloaded".to_string()),
            intents: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn intents(&self) -> Vec<ReplyIntent> {
        self.intents.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplyGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, intent: &ReplyIntent) -> Result<ReplyFragmentSet, NudgeError> {
        self.intents.lock().unwrap().push(intent.clone());
        match &self.result {
            Ok(fragments) => Ok(ReplyFragmentSet::new(fragments.clone())),
            Err(e) => Err(NudgeError::Generator(e.clone())),
        }
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Sent {
    Text { session: String, text: String },
    Command { session: String, command: OutboundCommand },
}

#[derive(Clone, Copy)]
pub(crate) enum CommandResult {
    Accept,
    Reject,
    Error,
}

pub(crate) struct MockTransport {
    command_result: CommandResult,
    fail_text: bool,
    sent: Mutex<Vec<(Sent, Instant)>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::with_command_result(CommandResult::Accept)
    }

    pub(crate) fn with_command_result(command_result: CommandResult) -> Self {
        Self {
            command_result,
            fail_text: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing_text() -> Self {
        Self {
            fail_text: true,
            ..Self::new()
        }
    }

    pub(crate) fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().iter().map(|(s, _)| s.clone()).collect()
    }

    pub(crate) fn timed(&self) -> Vec<(Sent, Instant)> {
        self.sent.lock().unwrap().clone()
    }

    pub(crate) fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text { text, .. } => Some(text),
                Sent::Command { .. } => None,
            })
            .collect()
    }

    pub(crate) fn commands(&self) -> Vec<OutboundCommand> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Command { command, .. } => Some(command),
                Sent::Text { .. } => None,
            })
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send_text(&self, session_id: &str, text: &str) -> Result<(), NudgeError> {
        if self.fail_text {
            return Err(NudgeError::Transport("connection reset".to_string()));
        }
        self.sent.lock().unwrap().push((
            Sent::Text {
                session: session_id.to_string(),
                text: text.to_string(),
            },
            Instant::now(),
        ));
        Ok(())
    }

    async fn send_command(
        &self,
        session_id: &str,
        command: &OutboundCommand,
    ) -> Result<bool, NudgeError> {
        self.sent.lock().unwrap().push((
            Sent::Command {
                session: session_id.to_string(),
                command: command.clone(),
            },
            Instant::now(),
        ));
        match self.command_result {
            CommandResult::Accept => Ok(true),
            CommandResult::Reject => Ok(false),
            CommandResult::Error => Err(NudgeError::Transport("adapter offline".to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Action history
// ---------------------------------------------------------------------------

#[derive(Default)]
pub(crate) struct MockHistory {
    fail: bool,
    records: Mutex<Vec<ActionRecord>>,
}

impl MockHistory {
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub(crate) fn records(&self) -> Vec<ActionRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActionHistory for MockHistory {
    async fn store_action(&self, record: &ActionRecord) -> Result<(), NudgeError> {
        if self.fail {
            return Err(NudgeError::Memory("disk full".to_string()));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

/// Handles to every mock so tests can inspect them after the run.
pub(crate) struct Mocks {
    pub resolver: Arc<MockResolver>,
    pub generator: Arc<MockGenerator>,
    pub transport: Arc<MockTransport>,
    pub history: Arc<MockHistory>,
}

impl Mocks {
    pub(crate) fn new(
        resolver: MockResolver,
        generator: MockGenerator,
        transport: MockTransport,
        history: MockHistory,
    ) -> Self {
        Self {
            resolver: Arc::new(resolver),
            generator: Arc::new(generator),
            transport: Arc::new(transport),
            history: Arc::new(history),
        }
    }

    /// Alice (`123`) is known, the generator says "hi!", the transport accepts everything.
    pub(crate) fn alice() -> Self {
        Self::new(
            MockResolver::with_person("p-alice", "123", "Alice"),
            MockGenerator::replying(&["hi!"]),
            MockTransport::new(),
            MockHistory::default(),
        )
    }

    pub(crate) fn collaborators(&self) -> Collaborators {
        Collaborators {
            resolver: self.resolver.clone(),
            generator: self.generator.clone(),
            transport: self.transport.clone(),
            history: self.history.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Log capture
// ---------------------------------------------------------------------------

/// Collects formatted log lines emitted on the current thread while alive.
pub(crate) struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
    _guard: tracing::subscriber::DefaultGuard,
}

impl LogCapture {
    pub(crate) fn start() -> Self {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let sink = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || CapturedWriter(sink.clone()))
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        Self { buf, _guard: guard }
    }

    /// Whether any line at `level` (e.g. `"ERROR"`) contains `needle`.
    pub(crate) fn has(&self, level: &str, needle: &str) -> bool {
        let text = String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned();
        text.lines()
            .any(|line| line.contains(level) && line.contains(needle))
    }
}

struct CapturedWriter(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for CapturedWriter {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
