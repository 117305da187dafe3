use crate::agent::{AgentLoop, Transcript};
use crate::error::AgentError;

pub const EXIT_COMMAND: &str = "sair";
pub const FAREWELL: &str = "Até a próxima!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The user asked to leave.
    Exit,
    /// Nothing to send.
    Skip,
    Answer(String),
}

pub fn is_exit_command(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case(EXIT_COMMAND)
}

/// A single conversation: the transcript plus the loop that extends it.
pub struct Session {
    agent: AgentLoop,
    transcript: Transcript,
}

impl Session {
    pub fn new(agent: AgentLoop) -> Self {
        Self {
            agent,
            transcript: Transcript::new(),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Handles one line of user input. A turn is fully resolved before this
    /// returns, so inputs are applied strictly in order.
    pub async fn handle(&mut self, input: &str) -> Result<Reply, AgentError> {
        if is_exit_command(input) {
            return Ok(Reply::Exit);
        }

        let message = input.trim();
        if message.is_empty() {
            return Ok(Reply::Skip);
        }

        let answer = self.agent.process(&mut self.transcript, message).await?;
        Ok(Reply::Answer(answer))
    }
}
