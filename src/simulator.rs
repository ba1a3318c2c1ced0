//! Reply simulation rules
//!
//! Pure functions deciding each stage of a simulated reply: how long to think,
//! which tools fire, which template is used and how fast it is typed. The
//! state machine sequences them; nothing here sleeps.

use crate::persona::Specialty;
use crate::random::RandomSource;
use crate::store::{ToolInvocation, ToolName};
use std::time::Duration;

/// Inputs up to this many UTF-16 code units get the short think delay
pub const SHORT_INPUT_MAX_UNITS: usize = 100;
pub const SHORT_THINK_DELAY: Duration = Duration::from_millis(1000);
pub const LONG_THINK_DELAY: Duration = Duration::from_millis(2000);

/// Extra delay once at least one tool fired
pub const TOOL_EXECUTION_DELAY: Duration = Duration::from_millis(1500);

/// Per-character typing delay bounds, milliseconds, `[min, max)`
pub const REVEAL_DELAY_MIN_MS: u64 = 10;
pub const REVEAL_DELAY_MAX_MS: u64 = 40;

/// Bounds of the simulated web search hit count, inclusive
pub const SEARCH_RESULTS_MIN: u64 = 10;
pub const SEARCH_RESULTS_MAX: u64 = 59;

pub const URGENCY_SUFFIX: &str = " I've prioritized this request for immediate attention.";
pub const DETAIL_SUFFIX: &str = " I'll provide a comprehensive breakdown with all relevant details.";

const SEARCH_KEYWORDS: &[&str] = &["search", "find", "lookup"];
const CODE_KEYWORDS: &[&str] = &["code", "program", "function"];
const ANALYSIS_KEYWORDS: &[&str] = &["analyze", "data"];
const REASONING_KEYWORDS: &[&str] = &["think", "reason"];
const URGENCY_KEYWORDS: &[&str] = &["urgent", "quick"];
const DETAIL_KEYWORDS: &[&str] = &["detailed", "thorough"];

const REASONING_TEMPLATES: [&str; 3] = [
    "I've analyzed your request through multiple reasoning frameworks. Here's my systematic breakdown of the problem and potential solutions.",
    "After applying logical reasoning and evaluating various approaches, I can provide you with a comprehensive analysis.",
    "Let me walk you through my reasoning process step by step, considering all relevant factors and their implications.",
];

const CREATIVE_TEMPLATES: [&str; 3] = [
    "I've channeled my creative capabilities to generate some innovative ideas for your request. Let me share some exciting possibilities.",
    "Drawing from diverse creative approaches, I've developed several unique perspectives on your challenge.",
    "My creative analysis has uncovered some fascinating angles and fresh approaches to consider.",
];

const ANALYTICAL_TEMPLATES: [&str; 3] = [
    "I've performed a thorough analytical review of the data patterns and identified key insights for your consideration.",
    "My analysis reveals several important trends and correlations that directly address your inquiry.",
    "After processing the data through various analytical frameworks, here are the significant findings.",
];

const GENERAL_TEMPLATES: [&str; 3] = [
    "I've processed your request and have some helpful insights to share based on my general knowledge and capabilities.",
    "Let me provide you with a comprehensive response that addresses the key aspects of your question.",
    "I've analyzed your request and can offer several useful perspectives and recommendations.",
];

/// Think-stage delay, a function of input length only.
///
/// Length is measured in UTF-16 code units, so characters outside the basic
/// multilingual plane (most emoji) count twice.
pub fn think_delay(text: &str) -> Duration {
    if text.encode_utf16().count() <= SHORT_INPUT_MAX_UNITS {
        SHORT_THINK_DELAY
    } else {
        LONG_THINK_DELAY
    }
}

/// Case-insensitive substring match against any keyword
fn mentions_any(lowered: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| lowered.contains(k))
}

/// Tools triggered by `text` for a persona of `specialty`.
///
/// Checks are independent; results come back in the fixed order web search,
/// code execution, file analysis, reasoning.
pub fn detect_tools(
    text: &str,
    specialty: Specialty,
    random: &mut dyn RandomSource,
) -> Vec<ToolInvocation> {
    let lowered = text.to_lowercase();
    let mut tools = Vec::new();

    if mentions_any(&lowered, SEARCH_KEYWORDS) {
        let hits = random.range(SEARCH_RESULTS_MIN, SEARCH_RESULTS_MAX + 1);
        tools.push(ToolInvocation::success(
            ToolName::WebSearch,
            format!("Found {hits} relevant results"),
        ));
    }

    if mentions_any(&lowered, CODE_KEYWORDS) {
        tools.push(ToolInvocation::success(
            ToolName::CodeExecution,
            "Code analysis completed successfully",
        ));
    }

    if mentions_any(&lowered, ANALYSIS_KEYWORDS) || specialty == Specialty::Analytical {
        tools.push(ToolInvocation::success(
            ToolName::FileAnalysis,
            "Data analysis complete - insights generated",
        ));
    }

    if specialty == Specialty::Reasoning || mentions_any(&lowered, REASONING_KEYWORDS) {
        tools.push(ToolInvocation::success(
            ToolName::Reasoning,
            "Complex multi-step analysis completed",
        ));
    }

    tools
}

pub fn templates(specialty: Specialty) -> &'static [&'static str; 3] {
    match specialty {
        Specialty::Reasoning => &REASONING_TEMPLATES,
        Specialty::Creative => &CREATIVE_TEMPLATES,
        Specialty::Analytical => &ANALYTICAL_TEMPLATES,
        Specialty::General => &GENERAL_TEMPLATES,
    }
}

/// Pick a template and append the urgency and detail suffixes, in that order
pub fn compose_reply(text: &str, specialty: Specialty, random: &mut dyn RandomSource) -> String {
    let choices = templates(specialty);
    let mut reply = choices[random.index(choices.len())].to_string();

    let lowered = text.to_lowercase();
    if mentions_any(&lowered, URGENCY_KEYWORDS) {
        reply.push_str(URGENCY_SUFFIX);
    }
    if mentions_any(&lowered, DETAIL_KEYWORDS) {
        reply.push_str(DETAIL_SUFFIX);
    }
    reply
}

/// Delay before revealing the next character
pub fn reveal_delay(random: &mut dyn RandomSource) -> Duration {
    Duration::from_millis(random.range(REVEAL_DELAY_MIN_MS, REVEAL_DELAY_MAX_MS))
}

/// Internal reasoning note attached to every agent reply
pub fn reasoning_annotation(specialty: Specialty) -> String {
    format!(
        "Analyzing request context... Determining optimal approach for {specialty} processing... Activating specialized capabilities..."
    )
}
