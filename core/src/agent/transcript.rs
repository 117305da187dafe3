use crate::traits::{ToolCall, ToolResult, Turn};

/// The conversation so far. Turns are only ever appended.
#[derive(Debug, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn append(&mut self, exchange: CompletedExchange) {
        self.turns.extend(exchange.turns);
    }
}

/// Turns produced while resolving a single user input.
///
/// Starts with the user turn. Calls and their responses can only be recorded
/// as a pair, so a call is always directly followed by its response.
#[derive(Debug)]
pub struct Exchange {
    turns: Vec<Turn>,
    tool_calls: usize,
}

impl Exchange {
    pub fn new(user_input: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::user(user_input)],
            tool_calls: 0,
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn tool_calls(&self) -> usize {
        self.tool_calls
    }

    pub fn record_tool_call(&mut self, call: ToolCall, result: ToolResult) {
        let response = Turn::function_response(&call, result);
        self.turns.push(Turn::function_call(call));
        self.turns.push(response);
        self.tool_calls += 1;
    }

    pub fn complete(mut self, text: impl Into<String>) -> CompletedExchange {
        self.turns.push(Turn::model(text));
        CompletedExchange { turns: self.turns }
    }
}

/// An exchange that ended on model text, ready to join the transcript.
#[derive(Debug)]
pub struct CompletedExchange {
    turns: Vec<Turn>,
}
