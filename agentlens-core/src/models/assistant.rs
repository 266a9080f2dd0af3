use serde::{Deserialize, Serialize};

pub const DEFAULT_NAME: &str = "Unnamed";
pub const DEFAULT_MODEL: &str = "Unknown Model";
pub const DEFAULT_FIRST_MESSAGE: &str = "No first message set";

/// Assistant configuration as returned by `GET /assistant/{id}`.
///
/// Only the fields this tool prints are modelled; everything else in the
/// payload is ignored. Missing keys and explicit `null`s both deserialize to
/// `None` and fall back to the defaults in [`AssistantConfig::summary`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantConfig {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub model: Option<AssistantModel>,

    #[serde(default)]
    pub first_message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssistantModel {
    #[serde(default)]
    pub provider: Option<String>,

    #[serde(default)]
    pub model: Option<String>,
}

/// Display projection of an assistant, defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantSummary {
    pub name: String,
    pub model: String,
    pub first_message: String,
}

impl AssistantConfig {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    pub fn model_name(&self) -> &str {
        self.model
            .as_ref()
            .and_then(|m| m.model.as_deref())
            .unwrap_or(DEFAULT_MODEL)
    }

    pub fn first_message(&self) -> &str {
        self.first_message.as_deref().unwrap_or(DEFAULT_FIRST_MESSAGE)
    }

    pub fn summary(&self, first_message_chars: usize) -> AssistantSummary {
        AssistantSummary {
            name: self.name().to_string(),
            model: self.model_name().to_string(),
            first_message: truncate_chars(self.first_message(), first_message_chars),
        }
    }
}

/// Keeps at most `max` characters (not bytes).
pub fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}
