//! Agent chat - terminal front-end for the simulated agent conversation engine
//!
//! Lists the personas, lets the user pick one and chat with it, streaming the
//! typed reveal of each reply.

use agent_chat_sim::activity::{ActivityFeed, ACTIVITY_INTERVAL};
use agent_chat_sim::random::StdRandom;
use agent_chat_sim::{MessageRole, PersonaTable, ProductionRuntime, SessionEvent, SimConfig};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging; stdout belongs to the chat
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agent_chat_sim=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = SimConfig::from_env();
    tracing::info!(
        seed = ?config.seed,
        speedup = config.speedup,
        persona = ?config.persona,
        "Starting agent chat"
    );

    let mut runtime = ProductionRuntime::from_config(&config);
    let printer = tokio::spawn(print_events(runtime.subscribe()));

    let mut feed = ActivityFeed::seeded();
    let mut feed_random = StdRandom::from_seed(config.seed.map(|s| s.wrapping_add(1)));
    let mut ticker = tokio::time::interval(ACTIVITY_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    print_help();
    print_personas(runtime.store().personas());
    if let Some(persona) = runtime.active_persona() {
        println!("Talking to {}.", persona.name);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match Command::parse(&line) {
                    Command::Quit => break,
                    Command::Help => print_help(),
                    Command::Agents => print_personas(runtime.store().personas()),
                    Command::Use(id) => {
                        if runtime.select_persona(id).is_none() {
                            println!("No agent named '{id}'. Try /agents.");
                        }
                    }
                    Command::Log => {
                        for message in runtime.log().iter() {
                            let who = match message.role {
                                MessageRole::User => "you",
                                MessageRole::Agent => "agent",
                            };
                            println!("#{} {who}> {}", message.sequence_id, message.text);
                        }
                    }
                    Command::Json => println!("{}", serde_json::to_string_pretty(&*runtime.log())?),
                    Command::Activity => {
                        for entry in feed.entries() {
                            println!("  {:<12} {}", entry.time, entry.action);
                        }
                    }
                    Command::Archive => {
                        for conversation in runtime.store().archived() {
                            println!(
                                "  {} with {} ({} messages)",
                                conversation.id,
                                conversation.persona_id,
                                conversation.messages().len()
                            );
                        }
                    }
                    Command::Unknown(cmd) => println!("Unknown command {cmd}. Try /help."),
                    Command::Say(text) => {
                        if let Err(e) = runtime.submit_user_text(text).await {
                            println!("error: {e}");
                        }
                    }
                }
            }
            _ = ticker.tick() => {
                if let Some(entry) = feed.tick(&mut feed_random) {
                    tracing::debug!(action = %entry.action, "Activity added");
                }
            }
        }
    }

    // Dropping the runtime closes the event channel and ends the printer
    drop(runtime);
    printer.await?;
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Help,
    Agents,
    Use(&'a str),
    Log,
    Json,
    Activity,
    Archive,
    Quit,
    Unknown(&'a str),
    Say(&'a str),
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Command::Say(line);
        };
        let (name, arg) = rest
            .split_once(char::is_whitespace)
            .map_or((rest, ""), |(n, a)| (n, a.trim()));
        match name {
            "help" => Command::Help,
            "agents" => Command::Agents,
            "use" if !arg.is_empty() => Command::Use(arg),
            "log" => Command::Log,
            "json" => Command::Json,
            "activity" => Command::Activity,
            "archive" => Command::Archive,
            "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(trimmed),
        }
    }
}

fn print_help() {
    println!("Commands: /agents  /use <id>  /log  /json  /activity  /archive  /help  /quit");
    println!("Anything else is sent to the selected agent.");
}

fn print_personas(personas: &PersonaTable) {
    for persona in personas.iter() {
        println!(
            "  [{}] {:<20} {:<20} {:<10} {}",
            persona.label, persona.id, persona.name, persona.availability, persona.description
        );
        println!("       {}", persona.capabilities.join(", "));
    }
}

async fn print_events(mut rx: broadcast::Receiver<SessionEvent>) {
    let mut typing = false;
    let mut shown = 0usize;

    loop {
        let event = match rx.recv().await {
            Ok(event) => event,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Display fell behind session events");
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };

        match event {
            SessionEvent::PersonaSelected { persona_id, .. } => {
                println!("-- new conversation with {persona_id} --");
            }
            SessionEvent::StateChange { state } => match state.as_str() {
                "thinking" => println!("  ... thinking"),
                "executing_tools" => println!("  ... running tools"),
                "typing" => {
                    typing = true;
                    shown = 0;
                    print!("agent> ");
                }
                _ => {}
            },
            SessionEvent::Typing { partial } => {
                let fresh: String = partial.chars().skip(shown).collect();
                shown += fresh.chars().count();
                print!("{fresh}");
            }
            SessionEvent::Message { message } if message.role == MessageRole::Agent => {
                if typing {
                    println!();
                    typing = false;
                } else {
                    println!("agent> {}", message.text);
                }
                for tool in &message.tool_invocations {
                    println!("  [{}] {} -> {}", tool.name, tool.description, tool.result);
                }
            }
            SessionEvent::ToolsExecuted { count } => {
                let plural = if count > 1 { "s" } else { "" };
                println!("  {count} tool{plural} executed successfully");
            }
            SessionEvent::Error { message } => println!("error: {message}"),
            SessionEvent::Message { .. } | SessionEvent::AgentDone => {}
        }
        let _ = std::io::stdout().flush();
    }
}
