//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use crate::persona::{PersonaTable, Specialty};
use crate::random::StdRandom;
use crate::simulator::{
    DETAIL_SUFFIX, LONG_THINK_DELAY, SHORT_INPUT_MAX_UNITS, SHORT_THINK_DELAY,
    TOOL_EXECUTION_DELAY, URGENCY_SUFFIX,
};
use crate::store::{ToolName, ToolStatus};
use proptest::prelude::*;
use std::time::Duration;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context(persona_id: &str) -> ConvContext {
    let persona = PersonaTable::builtin()
        .get(persona_id)
        .cloned()
        .expect("built-in persona");
    ConvContext::new("test-conv", persona)
}

/// Result of running one message through the whole pipeline
struct Run {
    states: Vec<ConvState>,
    suspensions: Vec<Duration>,
    persisted: Option<(String, Vec<crate::store::ToolInvocation>)>,
}

/// Feed a user message through the machine, answering every suspension with
/// its scheduled event.
fn run_pipeline(context: &ConvContext, text: &str, seed: u64) -> Run {
    let mut random = StdRandom::seeded(seed);
    let mut state = ConvState::Idle;
    let mut pending = vec![Event::UserMessage {
        message_id: "m1".to_string(),
        text: text.to_string(),
    }];
    let mut run = Run {
        states: Vec::new(),
        suspensions: Vec::new(),
        persisted: None,
    };

    while let Some(event) = pending.pop() {
        let result = transition(&state, context, event, &mut random).expect("valid transition");
        state = result.new_state;
        run.states.push(state.clone());
        for effect in result.effects {
            match effect {
                Effect::Suspend { delay, then } => {
                    run.suspensions.push(delay);
                    pending.push(then);
                }
                Effect::PersistAgentMessage { text, tools, .. } => {
                    run.persisted = Some((text, tools));
                }
                Effect::NotifyClient(_) => {}
            }
        }
    }
    run
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_persona_id() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("gpt4-reasoning"),
        Just("claude-creative"),
        Just("gemini-analyst"),
        Just("universal-assistant"),
    ]
}

/// Random casing of a fixed word
fn arb_cased(word: &'static str) -> impl Strategy<Value = String> {
    proptest::collection::vec(any::<bool>(), word.len()).prop_map(move |upper| {
        word.chars()
            .zip(upper)
            .map(|(c, u)| if u { c.to_ascii_uppercase() } else { c })
            .collect()
    })
}

fn arb_busy_state() -> impl Strategy<Value = ConvState> {
    prop_oneof![
        "[a-z ]{1,20}".prop_map(|user_text| ConvState::Thinking { user_text }),
        "[a-z ]{1,20}".prop_map(|user_text| ConvState::ExecutingTools {
            user_text,
            tools: vec![],
        }),
        ("[a-z ]{2,20}", 0usize..2).prop_map(|(text, revealed)| ConvState::Revealing {
            reply: PendingReply {
                text,
                tools: vec![],
            },
            revealed,
        }),
    ]
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    // Invariant 1: Every message runs to Idle with exactly one persisted reply
    #[test]
    fn prop_pipeline_always_completes(
        persona_id in arb_persona_id(),
        text in "[a-zA-Z ,.?]{1,150}",
        seed in any::<u64>(),
    ) {
        let context = test_context(persona_id);
        let run = run_pipeline(&context, &text, seed);

        prop_assert_eq!(run.states.last(), Some(&ConvState::Idle));
        let (reply, _) = run.persisted.expect("reply persisted");
        prop_assert!(!reply.is_empty());
        // Idle only at the very end
        prop_assert!(run.states[..run.states.len() - 1].iter().all(ConvState::is_working));
    }

    // Invariant 2: Think delay depends only on input length, 100 inclusive
    #[test]
    fn prop_think_delay_boundary(len in 1usize..250, seed in any::<u64>()) {
        let context = test_context("universal-assistant");
        let run = run_pipeline(&context, &"z".repeat(len), seed);
        let expected = if len <= SHORT_INPUT_MAX_UNITS { SHORT_THINK_DELAY } else { LONG_THINK_DELAY };
        prop_assert_eq!(run.suspensions[0], expected);
    }

    // Invariant 3: Tool stage delay appears iff tools fired, and one reveal
    // suspension per character follows
    #[test]
    fn prop_suspension_schedule(
        persona_id in arb_persona_id(),
        text in "[a-z ]{1,80}",
        seed in any::<u64>(),
    ) {
        let context = test_context(persona_id);
        let run = run_pipeline(&context, &text, seed);
        let (reply, tools) = run.persisted.expect("reply persisted");

        let reveal_start = if tools.is_empty() { 1 } else { 2 };
        if !tools.is_empty() {
            prop_assert_eq!(run.suspensions[1], TOOL_EXECUTION_DELAY);
        }
        let reveal = &run.suspensions[reveal_start..];
        prop_assert_eq!(reveal.len(), reply.chars().count());
        prop_assert!(reveal.iter().all(|d| *d >= Duration::from_millis(10) && *d < Duration::from_millis(40)));
    }

    // Invariant 4: "search" in any casing gives exactly one successful web search
    #[test]
    fn prop_search_gives_one_web_search(
        persona_id in arb_persona_id(),
        prefix in "[a-z ]{0,20}",
        keyword in arb_cased("search"),
        suffix in "[a-z ]{0,20}",
        seed in any::<u64>(),
    ) {
        let context = test_context(persona_id);
        let text = format!("{prefix}{keyword}{suffix}");
        let run = run_pipeline(&context, &text, seed);
        let (_, tools) = run.persisted.expect("reply persisted");

        let searches: Vec<_> = tools.iter().filter(|t| t.name == ToolName::WebSearch).collect();
        prop_assert_eq!(searches.len(), 1);
        prop_assert_eq!(searches[0].status, ToolStatus::Success);
    }

    // Invariant 5: Specialty triggers are unconditional
    #[test]
    fn prop_specialty_tools_always_fire(text in "[a-z ]{1,40}", seed in any::<u64>()) {
        for (persona_id, tool) in [
            ("gpt4-reasoning", ToolName::Reasoning),
            ("gemini-analyst", ToolName::FileAnalysis),
        ] {
            let context = test_context(persona_id);
            let run = run_pipeline(&context, &text, seed);
            let (_, tools) = run.persisted.expect("reply persisted");
            prop_assert!(tools.iter().any(|t| t.name == tool));
        }
    }

    // Invariant 6: Urgency suffix always precedes the detail suffix
    #[test]
    fn prop_suffix_order(
        urgent in arb_cased("urgent"),
        detailed in arb_cased("detailed"),
        detail_first in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let context = test_context("claude-creative");
        let text = if detail_first {
            format!("{detailed} and {urgent}")
        } else {
            format!("{urgent} and {detailed}")
        };
        let run = run_pipeline(&context, &text, seed);
        let (reply, _) = run.persisted.expect("reply persisted");
        let expected_suffix = format!("{URGENCY_SUFFIX}{DETAIL_SUFFIX}");
        prop_assert!(reply.ends_with(&expected_suffix));
    }

    // Invariant 7: A pending reply never accepts another message
    #[test]
    fn prop_busy_rejects_messages(state in arb_busy_state(), text in "[a-z]{1,10}", seed in any::<u64>()) {
        let mut random = StdRandom::seeded(seed);
        let event = Event::UserMessage { message_id: "m2".to_string(), text };
        let result = transition(&state, &test_context("universal-assistant"), event, &mut random);
        prop_assert_eq!(result.unwrap_err(), TransitionError::AgentBusy);
    }
}

#[test]
fn test_reasoning_example_schedule() {
    let context = test_context("gpt4-reasoning");
    assert_eq!(context.persona.specialty, Specialty::Reasoning);

    let run = run_pipeline(&context, "please reason through this quickly", 17);
    assert_eq!(run.suspensions[0] + run.suspensions[1], Duration::from_millis(2500));

    let (reply, tools) = run.persisted.unwrap();
    assert!(tools.iter().any(|t| t.name == ToolName::Reasoning));
    assert!(reply.ends_with(URGENCY_SUFFIX));
}
