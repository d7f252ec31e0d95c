//! Token-budgeted rendering of the blackboard for prompts.

use super::{BlackboardResult, SharedBlackboard};
use crate::agent::TaskId;
use crate::blackboard::{
    domain::{BlackboardEntry, ConfidenceTier},
    ports::BlackboardStore,
};
use mockable::Clock;

/// First line of every rendered block.
pub const PROMPT_HEADER: &str = "## Shared Team Context";

/// Appended, on its own line, whenever content was cut to fit the budget.
pub const TRUNCATION_MARKER: &str = "[truncated]";

impl<B, C> SharedBlackboard<B, C>
where
    B: BlackboardStore,
    C: Clock + Send + Sync,
{
    /// Renders the task's entries grouped by confidence tier, cut to about
    /// `max_tokens` tokens.
    ///
    /// The character budget is `chars_per_token * max_tokens`. Output never
    /// exceeds that budget plus the length of [`TRUNCATION_MARKER`], and
    /// carries the marker exactly when content was cut. A task with no
    /// entries renders as an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`BlackboardError::Store`](super::BlackboardError::Store)
    /// when the store fails.
    pub fn format_for_prompt(
        &self,
        task_id: &TaskId,
        max_tokens: usize,
    ) -> BlackboardResult<String> {
        let entries = self.read_all(task_id, None)?;
        if entries.is_empty() {
            return Ok(String::new());
        }
        let rendered = render(&entries);
        Ok(fit_to_budget(rendered, self.config.char_budget(max_tokens)))
    }

    /// [`SharedBlackboard::format_for_prompt`] with the configured default
    /// token budget.
    ///
    /// # Errors
    ///
    /// Returns [`BlackboardError::Store`](super::BlackboardError::Store)
    /// when the store fails.
    pub fn format_for_prompt_default(&self, task_id: &TaskId) -> BlackboardResult<String> {
        self.format_for_prompt(task_id, self.config.default_token_budget)
    }
}

fn render(entries: &[BlackboardEntry]) -> String {
    let mut block = String::from(PROMPT_HEADER);
    block.push('\n');
    for tier in ConfidenceTier::ALL {
        let mut section = entries
            .iter()
            .filter(|entry| entry.confidence().tier() == tier)
            .peekable();
        if section.peek().is_none() {
            continue;
        }
        block.push('\n');
        block.push_str(tier.label());
        block.push('\n');
        for entry in section {
            block.push_str(&format!(
                "- {}: {} ({}, {})\n",
                entry.key(),
                entry.display_value(),
                entry.agent(),
                entry.confidence()
            ));
        }
    }
    block
}

/// Cuts `text` to `budget` characters including the marker line.
fn fit_to_budget(mut text: String, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text;
    }
    let keep = budget.saturating_sub(1);
    if keep == 0 {
        return TRUNCATION_MARKER.to_owned();
    }
    let cut = text
        .char_indices()
        .nth(keep)
        .map_or(text.len(), |(index, _)| index);
    text.truncate(cut);
    text.push('\n');
    text.push_str(TRUNCATION_MARKER);
    text
}
