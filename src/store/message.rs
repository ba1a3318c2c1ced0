//! Message and tool invocation types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who sent a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Agent,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MessageRole::User => "user",
            MessageRole::Agent => "agent",
        })
    }
}

/// Simulated capabilities an agent can "call"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    WebSearch,
    CodeExecution,
    FileAnalysis,
    Reasoning,
}

impl ToolName {
    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::WebSearch => "web_search",
            ToolName::CodeExecution => "code_execution",
            ToolName::FileAnalysis => "file_analysis",
            ToolName::Reasoning => "reasoning",
        }
    }

    /// Human-readable description shown alongside the invocation
    pub fn description(self) -> &'static str {
        match self {
            ToolName::WebSearch => "Searching the web for current information",
            ToolName::CodeExecution => "Analyzing and executing code logic",
            ToolName::FileAnalysis => "Processing and analyzing data patterns",
            ToolName::Reasoning => "Applying advanced reasoning capabilities",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    Calling,
    Success,
    /// Modeled but never produced by the simulator
    Error,
}

/// Record of one simulated tool call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub id: String,
    pub name: ToolName,
    pub description: String,
    pub result: String,
    pub status: ToolStatus,
}

impl ToolInvocation {
    pub fn success(name: ToolName, result: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            description: name.description().to_string(),
            result: result.into(),
            status: ToolStatus::Success,
        }
    }
}

/// One turn in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: String,
    /// Position in the owning conversation, assigned on append (1-based)
    pub sequence_id: u64,
    pub role: MessageRole,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_invocations: Vec<ToolInvocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, text.into(), None)
    }

    pub fn agent(persona_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(MessageRole::Agent, text.into(), Some(persona_id.into()))
    }

    fn new(role: MessageRole, text: String, persona_id: Option<String>) -> Self {
        Self {
            message_id: uuid::Uuid::new_v4().to_string(),
            sequence_id: 0,
            role,
            text,
            created_at: Utc::now(),
            persona_id,
            tool_invocations: Vec::new(),
            reasoning: None,
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolInvocation>) -> Self {
        self.tool_invocations = tools;
        self
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    /// A user message never carries tool invocations or reasoning
    pub fn is_well_formed(&self) -> bool {
        match self.role {
            MessageRole::User => self.tool_invocations.is_empty() && self.reasoning.is_none(),
            MessageRole::Agent => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_message_shape() {
        let msg = Message::user("hello");
        assert_eq!(msg.role, MessageRole::User);
        assert!(msg.persona_id.is_none());
        assert!(msg.is_well_formed());

        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["role"], json!("user"));
        assert!(value.get("tool_invocations").is_none());
        assert!(value.get("reasoning").is_none());
    }

    #[test]
    fn test_user_message_with_tools_is_malformed() {
        let msg = Message::user("hello")
            .with_tools(vec![ToolInvocation::success(ToolName::WebSearch, "done")]);
        assert!(!msg.is_well_formed());

        let msg = Message::user("hello").with_reasoning("hmm");
        assert!(!msg.is_well_formed());
    }

    #[test]
    fn test_tool_invocation_serializes_snake_case() {
        let tool = ToolInvocation::success(ToolName::CodeExecution, "ok");
        let value = serde_json::to_value(&tool).unwrap();
        assert_eq!(value["name"], json!("code_execution"));
        assert_eq!(value["status"], json!("success"));
        assert_eq!(value["description"], json!("Analyzing and executing code logic"));
    }
}
