//! In-memory [`CommandRunner`] that records invocations
//!
//! Nothing is spawned; each command is answered by a responder closure (exit
//! code 0 by default).

use super::runner::{CommandRunner, CommandSpec};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Mutex;

type Responder = Box<dyn Fn(&CommandSpec) -> i32 + Send + Sync>;

pub struct RecordingRunner {
    responder: Responder,
    calls: Mutex<Vec<CommandSpec>>,
}

impl RecordingRunner {
    /// Answers every command with exit code 0
    pub fn new() -> Self {
        Self::with_responder(|_| 0)
    }

    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&CommandSpec) -> i32 + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answers commands for `program` with `code`, everything else with 0
    pub fn failing(program: &str, code: i32) -> Self {
        let program = program.to_string();
        Self::with_responder(move |cmd| if cmd.program == program { code } else { 0 })
    }

    /// Commands seen so far, in order
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Program names seen so far, in order
    pub fn programs(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.program).collect()
    }
}

impl Default for RecordingRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &CommandSpec) -> Result<i32> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(command.clone());
        }
        Ok((self.responder)(command))
    }
}
