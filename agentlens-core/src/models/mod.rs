mod assistant;
mod customer;

pub use assistant::{
    truncate_chars, AssistantConfig, AssistantModel, AssistantSummary, DEFAULT_FIRST_MESSAGE,
    DEFAULT_MODEL, DEFAULT_NAME,
};
pub use customer::{parse_agent_ids, AgentList, CustomerRecord, AGENT_ID_SEPARATOR};
