//! Route Task use case
//!
//! Classifies a task, detects specialized intent and selects an agent from
//! the capability matrix, optionally skipping agents that are not installed.

use crate::ports::agent_availability::{AgentAvailability, AssumeAvailable};
use router_domain::{
    AgentId, CLASSIFIER_VARIANT, CapabilityMatrix, Classifier, CostTier, DomainError,
    RoutingDecision, RoutingPreferences, Selector, SpeedTier, TaskDescription, TaskProfile,
    detect_specialized,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while routing a task
#[derive(Error, Debug)]
pub enum RouteTaskError {
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl RouteTaskError {
    /// No agent survived exclusions and availability filtering
    pub fn is_no_agent(&self) -> bool {
        matches!(self, RouteTaskError::Domain(e) if e.is_no_agent())
    }

    /// The forced agent is not in the capability matrix
    pub fn is_unknown_agent(&self) -> bool {
        matches!(self, RouteTaskError::Domain(DomainError::UnknownAgent(_)))
    }
}

/// Input for the RouteTask use case
#[derive(Debug, Clone)]
pub struct RouteTaskInput {
    pub task: TaskDescription,
    pub preferences: RoutingPreferences,
    /// Skip agents the availability probe reports as missing
    pub only_available: bool,
}

impl RouteTaskInput {
    pub fn new(task: TaskDescription) -> Self {
        Self {
            task,
            preferences: RoutingPreferences::default(),
            only_available: false,
        }
    }

    pub fn with_preferences(mut self, preferences: RoutingPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn with_only_available(mut self, only_available: bool) -> Self {
        self.only_available = only_available;
        self
    }
}

/// Output of the RouteTask use case
#[derive(Debug, Clone)]
pub struct RouteTaskOutput {
    pub decision: RoutingDecision,
    /// Agents skipped because they are not installed
    pub unavailable: Vec<AgentId>,
}

/// Classifier health as reported to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub classifier_variant: &'static str,
    pub status: &'static str,
    pub agents: usize,
}

/// One row of the agent listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentStatus {
    pub id: AgentId,
    pub description: String,
    pub command: String,
    pub speed: SpeedTier,
    pub cost: CostTier,
    pub available: bool,
}

/// Use case for routing a task to an agent
pub struct RouteTaskUseCase<A: AgentAvailability + 'static = AssumeAvailable> {
    classifier: Classifier,
    selector: Selector,
    availability: Arc<A>,
}

impl RouteTaskUseCase<AssumeAvailable> {
    pub fn new(matrix: Arc<CapabilityMatrix>) -> Self {
        Self::with_availability(matrix, Arc::new(AssumeAvailable))
    }
}

impl<A: AgentAvailability + 'static> RouteTaskUseCase<A> {
    pub fn with_availability(matrix: Arc<CapabilityMatrix>, availability: Arc<A>) -> Self {
        Self {
            classifier: Classifier::new(),
            selector: Selector::new(matrix),
            availability,
        }
    }

    pub fn matrix(&self) -> &CapabilityMatrix {
        self.selector.matrix()
    }

    /// Classify without selecting an agent
    pub fn classify(&self, task: &TaskDescription) -> TaskProfile {
        self.classifier.classify(task)
    }

    /// Classify the task and select an agent for it
    pub fn route(&self, input: RouteTaskInput) -> Result<RouteTaskOutput, RouteTaskError> {
        let profile = self.classifier.classify(&input.task);
        let specialized = detect_specialized(&input.task.searchable_text());
        if let Some(m) = &specialized {
            debug!("Specialized intent {} ({:.2})", m.name, m.confidence);
        }

        let mut preferences = input.preferences;
        let mut unavailable = Vec::new();
        if input.only_available {
            for agent in self.matrix().agents() {
                if self.availability.is_available(agent) {
                    continue;
                }
                if preferences.forced_agent.as_ref() == Some(&agent.id) {
                    warn!("Forced agent {} is not installed; routing to it anyway", agent.id);
                    continue;
                }
                unavailable.push(agent.id.clone());
            }
            if !unavailable.is_empty() {
                debug!("Skipping unavailable agents: {:?}", unavailable);
            }
            preferences = preferences.with_exclusions(unavailable.iter().cloned());
        }

        let decision = self
            .selector
            .select_with(&profile, &preferences, specialized.as_ref())?;

        info!(
            "Routed {} ({}) to {} with confidence {:.2}",
            profile.task_type, profile.complexity, decision.selected_agent, decision.confidence
        );

        Ok(RouteTaskOutput {
            decision,
            unavailable,
        })
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            classifier_variant: CLASSIFIER_VARIANT,
            status: "healthy",
            agents: self.matrix().agents().count(),
        }
    }

    /// Every agent in the matrix with its local availability
    pub fn list_agents(&self) -> Vec<AgentStatus> {
        self.matrix()
            .agents()
            .map(|agent| AgentStatus {
                id: agent.id.clone(),
                description: agent.description.clone(),
                command: agent.command.clone(),
                speed: agent.speed,
                cost: agent.cost,
                available: self.availability.is_available(agent),
            })
            .collect()
    }
}
