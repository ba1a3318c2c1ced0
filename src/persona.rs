//! Persona table
//!
//! Personas are static configuration: built once at startup and only read
//! afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Response style of a persona; selects reply templates and tool triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Specialty {
    Reasoning,
    Creative,
    Analytical,
    /// Also the fallback for any unrecognized specialty name
    #[serde(other)]
    General,
}

impl Specialty {
    pub fn as_str(self) -> &'static str {
        match self {
            Specialty::Reasoning => "reasoning",
            Specialty::Creative => "creative",
            Specialty::Analytical => "analytical",
            Specialty::General => "general",
        }
    }

    /// Parse a specialty name, falling back to `General`
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "reasoning" => Specialty::Reasoning,
            "creative" => Specialty::Creative,
            "analytical" => Specialty::Analytical,
            _ => Specialty::General,
        }
    }
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    Busy,
    Offline,
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Availability::Available => "available",
            Availability::Busy => "busy",
            Availability::Offline => "offline",
        })
    }
}

/// An agent persona the user can talk to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub id: String,
    pub name: String,
    pub description: String,
    pub capabilities: Vec<String>,
    pub availability: Availability,
    /// Short label, e.g. initials shown in place of an avatar
    pub label: String,
    pub specialty: Specialty,
}

impl Persona {
    /// Greeting that opens every fresh conversation with this persona
    pub fn greeting(&self) -> String {
        format!(
            "Hello! I'm {}, your {} specialist. I'm here to help you with advanced AI tasks. What can I assist you with today?",
            self.name, self.specialty
        )
    }
}

/// Read-only lookup table of personas
#[derive(Debug, Clone, Default)]
pub struct PersonaTable {
    personas: Vec<Persona>,
}

impl PersonaTable {
    pub fn new(personas: Vec<Persona>) -> Self {
        Self { personas }
    }

    /// The four built-in personas
    pub fn builtin() -> Self {
        Self::new(vec![
            persona(
                "gpt4-reasoning",
                "GPT-4 Reasoning",
                "Advanced reasoning and problem-solving capabilities with deep analytical thinking.",
                &[
                    "Complex Reasoning",
                    "Mathematical Analysis",
                    "Logical Deduction",
                    "Strategic Planning",
                    "Research Synthesis",
                ],
                Availability::Available,
                "G4",
                Specialty::Reasoning,
            ),
            persona(
                "claude-creative",
                "Claude Creative",
                "Creative content generation and artistic collaboration with human-like understanding.",
                &[
                    "Creative Writing",
                    "Content Strategy",
                    "Visual Concepts",
                    "Storytelling",
                    "Brand Messaging",
                ],
                Availability::Available,
                "CC",
                Specialty::Creative,
            ),
            persona(
                "gemini-analyst",
                "Gemini Analyst",
                "Data analysis and pattern recognition specialist for complex datasets.",
                &[
                    "Data Analysis",
                    "Pattern Recognition",
                    "Statistical Modeling",
                    "Trend Forecasting",
                    "Report Generation",
                ],
                Availability::Busy,
                "GA",
                Specialty::Analytical,
            ),
            persona(
                "universal-assistant",
                "Universal Assistant",
                "General-purpose AI assistant for everyday tasks and general inquiries.",
                &[
                    "General Knowledge",
                    "Task Automation",
                    "Information Retrieval",
                    "Basic Analysis",
                    "Conversation",
                ],
                Availability::Available,
                "UA",
                Specialty::General,
            ),
        ])
    }

    pub fn get(&self, id: &str) -> Option<&Persona> {
        self.personas.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Persona> {
        self.personas.iter()
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}

fn persona(
    id: &str,
    name: &str,
    description: &str,
    capabilities: &[&str],
    availability: Availability,
    label: &str,
    specialty: Specialty,
) -> Persona {
    Persona {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        capabilities: capabilities.iter().map(|c| (*c).to_string()).collect(),
        availability,
        label: label.to_string(),
        specialty,
    }
}
