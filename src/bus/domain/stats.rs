//! Aggregate bus statistics.

use super::{MessageType, Priority};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot of message counts for operational visibility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusStats {
    /// Number of recorded messages.
    pub total: usize,
    /// Message count per type; types never sent are absent.
    pub by_type: BTreeMap<MessageType, usize>,
    /// Message count per priority; priorities never used are absent.
    pub by_priority: BTreeMap<Priority, usize>,
    /// Number of broadcast messages.
    pub broadcasts: usize,
}

impl<'a> FromIterator<&'a super::AgentMessage> for BusStats {
    fn from_iter<I: IntoIterator<Item = &'a super::AgentMessage>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), |mut stats, message| {
            stats.total += 1;
            *stats.by_type.entry(message.kind()).or_default() += 1;
            *stats.by_priority.entry(message.priority()).or_default() += 1;
            if message.is_broadcast() {
                stats.broadcasts += 1;
            }
            stats
        })
    }
}
