//! Renders an agent's message traffic for prompt injection.

use super::MessageBus;
use crate::agent::AgentName;
use crate::bus::{domain::AgentMessage, error::BusResult, ports::MessageStore};
use mockable::Clock;

const HEADER: &str = "## Team Communication";

/// Builds a block listing every message that reaches `agent`, highest
/// priority first and newest first within a priority.
///
/// Replies are phrased as `X replies to Y: ...`. Returns an empty string
/// when nothing reaches the agent. Never mutates the bus.
///
/// # Errors
///
/// Returns [`BusError::Store`](crate::bus::error::BusError::Store) when the
/// store fails.
pub fn build_communication_context<S, C>(
    bus: &MessageBus<S, C>,
    agent: &AgentName,
) -> BusResult<String>
where
    S: MessageStore,
    C: Clock + Send + Sync,
{
    let mut messages = bus.get_for(agent, None)?;
    if messages.is_empty() {
        return Ok(String::new());
    }
    if let Some(limit) = bus.config().max_context_messages {
        messages.truncate(limit);
    }

    let mut block = format!("{HEADER} ({} messages for {agent})\n", messages.len());
    for message in &messages {
        let line = render_line(bus, message)?;
        block.push_str(&line);
        block.push('\n');
    }
    Ok(block)
}

fn render_line<S, C>(bus: &MessageBus<S, C>, message: &AgentMessage) -> BusResult<String>
where
    S: MessageStore,
    C: Clock + Send + Sync,
{
    let tag = format!(
        "{} [{}]",
        message.kind().glyph(),
        message.priority().label()
    );
    let parent = match message.reply_to_id() {
        Some(parent_id) => bus.get_message(parent_id)?,
        None => None,
    };

    // A parent cleared with its task still renders as a plain message.
    let line = match parent {
        Some(original) => format!(
            "{tag} {} replies to {}: {}",
            message.from(),
            original.from(),
            message.body()
        ),
        None => format!(
            "{tag} {} \u{2192} {}: {} - {}",
            message.from(),
            message.to(),
            message.subject(),
            message.body()
        ),
    };
    Ok(line)
}
