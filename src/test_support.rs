use crate::agent::{
    Chat, ChatChunk, ChatError, ChatRequest, ChatResponse, ChatTransport, ChunkStream, Message,
};
use crate::task::TaskStore;
use crate::tools::{ConfirmationGate, ToolContext, ToolError};
use crate::workspace::Workspace;
use async_trait::async_trait;
use futures::StreamExt;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poison| poison.into_inner())
}

/// A chat request as the transport saw it.
#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub model: String,
    pub messages: Vec<Message>,
}

type Turn = Result<Vec<Result<ChatChunk, ChatError>>, ChatError>;

/// Transport that replays scripted turns and records every request.
///
/// Once the script runs out each turn yields an empty stream.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    turns: Mutex<VecDeque<Turn>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn with_turn(chunks: Vec<Result<ChatChunk, ChatError>>) -> Self {
        Self::with_turns(vec![chunks])
    }

    pub(crate) fn with_turns(turns: Vec<Vec<Result<ChatChunk, ChatError>>>) -> Self {
        Self {
            turns: Mutex::new(turns.into_iter().map(Ok).collect()),
            requests: Mutex::default(),
        }
    }

    /// Every request fails before any chunk is streamed.
    pub(crate) fn failing(error: ChatError) -> Self {
        Self {
            turns: Mutex::new(VecDeque::from([Err(error)])),
            requests: Mutex::default(),
        }
    }

    pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn stream_chat(&self, request: ChatRequest<'_>) -> Result<ChunkStream, ChatError> {
        lock(&self.requests).push(RecordedRequest {
            model: request.model.to_string(),
            messages: request.messages.to_vec(),
        });

        let chunks = lock(&self.turns).pop_front().unwrap_or_else(|| Ok(Vec::new()))?;
        Ok(futures::stream::iter(chunks).boxed())
    }
}

/// Agent that replays scripted chat results without any transport.
///
/// Prompts are recorded in a shared list so tests can inspect them after the
/// agent has moved into a registry. An exhausted script answers with an
/// empty response.
pub(crate) struct ScriptedAgent {
    name: String,
    script: VecDeque<Result<ChatResponse, ChatError>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedAgent {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            script: VecDeque::new(),
            prompts: Arc::default(),
        }
    }

    pub(crate) fn boxed(name: &str) -> Box<dyn Chat> {
        Box::new(Self::new(name))
    }

    pub(crate) fn reply(mut self, response: ChatResponse) -> Self {
        self.script.push_back(Ok(response));
        self
    }

    pub(crate) fn fail(mut self, error: ChatError) -> Self {
        self.script.push_back(Err(error));
        self
    }

    pub(crate) fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.prompts)
    }
}

#[async_trait]
impl Chat for ScriptedAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn chat(&mut self, text: &str) -> Result<ChatResponse, ChatError> {
        lock(&self.prompts).push(text.to_string());
        self.script
            .pop_front()
            .unwrap_or_else(|| Ok(ChatResponse::default()))
    }
}

/// Gate with a fixed answer that counts how often it was asked.
#[derive(Default)]
pub(crate) struct FixedGate {
    approve: bool,
    asked: AtomicUsize,
}

impl FixedGate {
    pub(crate) fn approving() -> Self {
        Self {
            approve: true,
            asked: AtomicUsize::new(0),
        }
    }

    pub(crate) fn declining() -> Self {
        Self::default()
    }

    pub(crate) fn asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfirmationGate for FixedGate {
    async fn confirm(
        &self,
        _command: &str,
        _dir: &Path,
        _cancel: &CancellationToken,
    ) -> Result<(), ToolError> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        if self.approve {
            Ok(())
        } else {
            Err(ToolError::SkippedByUser)
        }
    }
}

/// A workspace in a fresh temp directory plus the state tools need.
pub(crate) struct ToolFixture {
    pub temp: TempDir,
    pub workspace: Workspace,
    pub tasks: TaskStore,
    pub gate: FixedGate,
    pub cancel: CancellationToken,
}

impl ToolFixture {
    pub(crate) async fn new() -> Self {
        Self::with_gate(FixedGate::approving()).await
    }

    pub(crate) async fn with_gate(gate: FixedGate) -> Self {
        let temp = TempDir::new().unwrap();
        let workspace = Workspace::create(temp.path().join("output")).await.unwrap();
        Self {
            temp,
            workspace,
            tasks: TaskStore::new(),
            gate,
            cancel: CancellationToken::new(),
        }
    }

    pub(crate) fn ctx(&self) -> ToolContext<'_> {
        ToolContext {
            tasks: &self.tasks,
            workspace: &self.workspace,
            gate: &self.gate,
            cancel: &self.cancel,
        }
    }

    pub(crate) fn root(&self) -> &Path {
        self.workspace.root()
    }
}
