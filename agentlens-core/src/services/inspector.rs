use tracing::{info, warn};
use uuid::Uuid;

use crate::assistant::{AssistantSource, DynAssistantSource, FetchOutcome};
use crate::error::AgentlensError;
use crate::models::AgentList;
use crate::report::InspectionObserver;
use crate::store::{CustomerStore, DynCustomerStore};

/// Result of the customer lookup stage. Anything but `Linked` ends the run.
#[derive(Debug)]
pub enum LookupOutcome {
    Linked(AgentList),
    NotFound,
    NoAgents,
    Failed(AgentlensError),
}

impl LookupOutcome {
    pub fn is_linked(&self) -> bool {
        matches!(self, LookupOutcome::Linked(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            LookupOutcome::Linked(_) => "linked",
            LookupOutcome::NotFound => "not_found",
            LookupOutcome::NoAgents => "no_agents",
            LookupOutcome::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentFetch {
    pub agent_id: String,
    pub outcome: FetchOutcome,
}

#[derive(Debug)]
pub struct InspectionReport {
    pub customer_id: String,
    pub lookup: LookupOutcome,
    pub fetches: Vec<AgentFetch>,
}

impl InspectionReport {
    pub fn fetch_count(&self) -> usize {
        self.fetches.len()
    }

    pub fn succeeded(&self) -> usize {
        self.fetches.iter().filter(|f| f.outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.fetches.len() - self.succeeded()
    }
}

/// Runs the lookup-then-fetch pipeline for one customer.
pub struct Inspector {
    store: DynCustomerStore,
    assistants: DynAssistantSource,
}

impl Inspector {
    pub fn new(store: DynCustomerStore, assistants: DynAssistantSource) -> Self {
        Self { store, assistants }
    }

    pub fn store(&self) -> &dyn CustomerStore {
        self.store.as_ref()
    }

    pub fn assistants(&self) -> &dyn AssistantSource {
        self.assistants.as_ref()
    }

    pub async fn lookup(&self, customer_id: &str) -> LookupOutcome {
        if Uuid::parse_str(customer_id).is_err() {
            warn!(customer_id, "Customer ID is not a UUID, forwarding it unchanged");
        }

        match self.store.find_customer(customer_id).await {
            Err(e) => {
                e.log();
                LookupOutcome::Failed(e)
            }
            Ok(None) => {
                info!(customer_id, "No customer found");
                LookupOutcome::NotFound
            }
            Ok(Some(record)) => match record.agent_list() {
                Some(list) => {
                    info!(
                        customer_id,
                        segments = list.segment_count(),
                        "Customer has linked assistants"
                    );
                    LookupOutcome::Linked(list)
                }
                None => {
                    info!(customer_id, "Customer has no linked assistants");
                    LookupOutcome::NoAgents
                }
            },
        }
    }

    /// Fetches are issued one at a time in the order the identifiers appear.
    pub async fn inspect(
        &self,
        customer_id: &str,
        observer: &mut dyn InspectionObserver,
    ) -> InspectionReport {
        observer.lookup_started(customer_id);
        let lookup = self.lookup(customer_id).await;
        observer.lookup_finished(customer_id, &lookup);

        let mut fetches = Vec::new();
        if let LookupOutcome::Linked(list) = &lookup {
            for agent_id in list.ids() {
                observer.fetch_started(&agent_id);
                let outcome = self.assistants.fetch_assistant(&agent_id).await;
                observer.fetch_finished(&agent_id, &outcome);
                fetches.push(AgentFetch { agent_id, outcome });
            }
        }

        let report = InspectionReport {
            customer_id: customer_id.to_string(),
            lookup,
            fetches,
        };

        info!(
            customer_id,
            lookup = report.lookup.label(),
            fetched = report.succeeded(),
            failed = report.failed(),
            "Inspection finished"
        );

        observer.finished(&report);
        report
    }
}
