use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const AGENT_ID_SEPARATOR: char = ';';

/// The projection of a customer row this tool reads: only the `agents` column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CustomerRecord {
    #[serde(default)]
    pub agents: Option<String>,
}

impl CustomerRecord {
    pub fn new(agents: impl Into<String>) -> Self {
        Self {
            agents: Some(agents.into()),
        }
    }

    /// `None` when the column is null or an empty string.
    pub fn agent_list(&self) -> Option<AgentList> {
        self.agents.as_deref().and_then(AgentList::parse)
    }
}

/// The raw `agents` value of a customer, split on `;`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentList {
    segments: Vec<String>,
}

impl AgentList {
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }

        Some(Self {
            segments: raw
                .split(AGENT_ID_SEPARATOR)
                .map(|s| s.to_string())
                .collect(),
        })
    }

    /// Number of `;`-separated segments, including blank ones.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Trimmed, non-empty identifiers in source order.
    pub fn ids(&self) -> Vec<String> {
        self.segments
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect()
    }
}

pub fn parse_agent_ids(raw: &str) -> Vec<String> {
    AgentList::parse(raw).map(|l| l.ids()).unwrap_or_default()
}
