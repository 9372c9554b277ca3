//! Mock command invoker for testing.
//!
//! Scripted responses per command name plus full invocation recording,
//! so tests can verify both what the engine asked for and how often.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::traits::{CommandError, CommandInvoker};

/// A recorded command invocation for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedInvocation {
    pub command: String,
    pub args: Value,
}

/// Configuration for a scripted response.
#[derive(Debug, Clone)]
pub enum MockResult {
    /// Resolve with this payload.
    Success(Value),
    /// Reject with this message.
    Failure(String),
}

/// Mock command invoker.
///
/// Responses are scripted per command name: `enqueue` pushes a
/// one-shot response onto that command's queue, `set_default` installs
/// a repeating fallback used once the queue is drained. An invocation
/// with neither scripted is rejected, which keeps a test honest about
/// every command it triggers.
///
/// Cloning shares the script and the recording.
#[derive(Clone)]
pub struct MockCommandInvoker {
    inner: Arc<Mutex<MockState>>,
}

struct MockState {
    queues: HashMap<String, VecDeque<MockResult>>,
    defaults: HashMap<String, MockResult>,
    invocations: Vec<RecordedInvocation>,
}

impl MockCommandInvoker {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockState {
                queues: HashMap::new(),
                defaults: HashMap::new(),
                invocations: Vec::new(),
            })),
        }
    }

    /// Queue a one-shot response for a command.
    pub fn enqueue(&self, command: &str, result: MockResult) {
        let mut state = self.inner.lock().unwrap();
        state
            .queues
            .entry(command.to_string())
            .or_default()
            .push_back(result);
    }

    /// Install a repeating fallback response for a command.
    pub fn set_default(&self, command: &str, result: MockResult) {
        let mut state = self.inner.lock().unwrap();
        state.defaults.insert(command.to_string(), result);
    }

    /// All invocations recorded so far, in order.
    pub fn invocations(&self) -> Vec<RecordedInvocation> {
        self.inner.lock().unwrap().invocations.clone()
    }

    /// How many times one command was invoked.
    pub fn invocation_count(&self, command: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .invocations
            .iter()
            .filter(|call| call.command == command)
            .count()
    }
}

impl Default for MockCommandInvoker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandInvoker for MockCommandInvoker {
    async fn invoke(&self, command: &str, args: Value) -> Result<Value, CommandError> {
        let result = {
            let mut state = self.inner.lock().unwrap();
            state.invocations.push(RecordedInvocation {
                command: command.to_string(),
                args,
            });
            state
                .queues
                .get_mut(command)
                .and_then(VecDeque::pop_front)
                .or_else(|| state.defaults.get(command).cloned())
        };

        match result {
            Some(MockResult::Success(payload)) => Ok(payload),
            Some(MockResult::Failure(message)) => Err(CommandError::Rejected {
                command: command.to_string(),
                message,
            }),
            None => Err(CommandError::Rejected {
                command: command.to_string(),
                message: "no scripted response".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_queue_drains_before_default() {
        let invoker = MockCommandInvoker::new();
        invoker.enqueue("cmd", MockResult::Success(json!(1)));
        invoker.set_default("cmd", MockResult::Success(json!(2)));

        assert_eq!(invoker.invoke("cmd", json!({})).await.unwrap(), json!(1));
        assert_eq!(invoker.invoke("cmd", json!({})).await.unwrap(), json!(2));
        assert_eq!(invoker.invoke("cmd", json!({})).await.unwrap(), json!(2));
        assert_eq!(invoker.invocation_count("cmd"), 3);
    }

    #[tokio::test]
    async fn test_unscripted_command_is_rejected() {
        let invoker = MockCommandInvoker::new();
        let err = invoker.invoke("mystery", json!({})).await.unwrap_err();
        assert!(matches!(err, CommandError::Rejected { .. }));
    }

    #[tokio::test]
    async fn test_clones_share_script_and_recording() {
        let invoker = MockCommandInvoker::new();
        let clone = invoker.clone();
        clone.enqueue("cmd", MockResult::Success(json!("ok")));

        invoker.invoke("cmd", json!({"k": "v"})).await.unwrap();
        let calls = clone.invocations();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].args["k"], "v");
    }
}
