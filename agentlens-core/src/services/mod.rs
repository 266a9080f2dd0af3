mod inspector;

pub use inspector::{AgentFetch, InspectionReport, Inspector, LookupOutcome};
