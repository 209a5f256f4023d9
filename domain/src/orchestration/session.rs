//! Orchestration session aggregate
//!
//! A session drives one request through Execute → Evaluate rounds against a
//! single agent. It is owned by the orchestrator for the duration of one run
//! and turned into an [`OrchestrationReport`] once it reaches a terminal
//! state.
//!
//! ```text
//! cycle 1: Executing ─(ok)─> Evaluating ─(gaps)─> AwaitingClarification
//! cycle 2: Executing ─(ok)─> Evaluating ─(clean)─> Accepted
//! ```

use super::attempt::ExecutionAttempt;
use super::state::SessionState;
use super::verdict::{EvaluationVerdict, VerdictDecision};
use crate::compression::CompressionResult;
use crate::core::error::DomainError;
use crate::routing::AgentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Hard cap on Execute → Evaluate rounds per session
pub const MAX_CYCLES: u32 = 3;

/// Unique identifier of an orchestration session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a session ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SessionOutcome {
    /// Response accepted; non-empty caveats mean the cycle limit was hit
    Accepted { caveats: Vec<String> },
    /// Fatal executor error, unfixable invocation or evaluator escalation
    Escalated { cause: String },
    /// Collaborator layer unreachable or the run was cancelled
    Failed { reason: String },
}

impl SessionOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            SessionOutcome::Accepted { .. } => "accepted",
            SessionOutcome::Escalated { .. } => "escalated",
            SessionOutcome::Failed { .. } => "failed",
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, SessionOutcome::Accepted { .. })
    }

    /// Accepted with nothing left unresolved
    pub fn is_clean(&self) -> bool {
        matches!(self, SessionOutcome::Accepted { caveats } if caveats.is_empty())
    }

    fn state(&self) -> SessionState {
        match self {
            SessionOutcome::Accepted { .. } => SessionState::Accepted,
            SessionOutcome::Escalated { .. } => SessionState::Escalated,
            SessionOutcome::Failed { .. } => SessionState::Failed,
        }
    }
}

impl std::fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionOutcome::Accepted { caveats } if caveats.is_empty() => write!(f, "accepted"),
            SessionOutcome::Accepted { caveats } => {
                write!(f, "accepted with caveats: {}", caveats.join(", "))
            }
            SessionOutcome::Escalated { cause } => write!(f, "escalated: {}", cause),
            SessionOutcome::Failed { reason } => write!(f, "failed: {}", reason),
        }
    }
}

/// What the orchestrator does after a verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextStep {
    Accept { caveats: Vec<String> },
    Escalate { cause: String },
    Clarify { gaps: Vec<String> },
}

/// State of one orchestration run
#[derive(Debug, Clone)]
pub struct OrchestrationSession {
    id: SessionId,
    agent: AgentId,
    request: String,
    max_cycles: u32,
    state: SessionState,
    cycle_count: u32,
    attempts: Vec<ExecutionAttempt>,
    context_handle: Option<String>,
    last_verdict: Option<EvaluationVerdict>,
    outcome: Option<SessionOutcome>,
}

impl OrchestrationSession {
    pub fn new(agent: AgentId, request: impl Into<String>) -> Self {
        Self {
            id: SessionId::new(),
            agent,
            request: request.into(),
            max_cycles: MAX_CYCLES,
            state: SessionState::Init,
            cycle_count: 0,
            attempts: Vec::new(),
            context_handle: None,
            last_verdict: None,
            outcome: None,
        }
    }

    /// Lower the cycle cap (clamped to `1..=MAX_CYCLES`)
    pub fn with_max_cycles(mut self, max_cycles: u32) -> Self {
        self.max_cycles = max_cycles.clamp(1, MAX_CYCLES);
        self
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn agent(&self) -> &AgentId {
        &self.agent
    }

    pub fn request(&self) -> &str {
        &self.request
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn cycle_count(&self) -> u32 {
        self.cycle_count
    }

    pub fn max_cycles(&self) -> u32 {
        self.max_cycles
    }

    pub fn attempts(&self) -> &[ExecutionAttempt] {
        &self.attempts
    }

    pub fn context_handle(&self) -> Option<&str> {
        self.context_handle.as_deref()
    }

    pub fn last_verdict(&self) -> Option<&EvaluationVerdict> {
        self.last_verdict.as_ref()
    }

    pub fn outcome(&self) -> Option<&SessionOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Response text of the most recent successful attempt
    pub fn last_response(&self) -> Option<&str> {
        self.attempts
            .iter()
            .rev()
            .find(|a| a.status.is_ok())
            .map(|a| a.response.as_str())
    }

    fn transition(&mut self, next: SessionState) -> Result<(), DomainError> {
        if !self.state.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }

    /// Enter `Executing` for a new cycle and return its number.
    ///
    /// Valid from `Init` (cycle 1) and `AwaitingClarification`. Retries stay
    /// within the current cycle and never call this.
    pub fn start_cycle(&mut self) -> Result<u32, DomainError> {
        if self.cycle_count >= self.max_cycles {
            return Err(DomainError::CycleLimitReached(self.max_cycles));
        }
        self.transition(SessionState::Executing)?;
        self.cycle_count += 1;
        Ok(self.cycle_count)
    }

    /// Append an attempt to the history
    pub fn record_attempt(&mut self, attempt: ExecutionAttempt) {
        self.attempts.push(attempt);
    }

    /// Keep the first context handle an executor hands back
    pub fn adopt_context_handle(&mut self, handle: Option<String>) {
        if self.context_handle.is_none() {
            self.context_handle = handle.filter(|h| !h.trim().is_empty());
        }
    }

    pub fn begin_evaluation(&mut self) -> Result<(), DomainError> {
        self.transition(SessionState::Evaluating)
    }

    /// What a verdict means for this session, without applying it.
    ///
    /// Clean verdicts accept; once the cycle cap is reached unresolved gaps
    /// become caveats; an escalating evaluator ends the session; anything
    /// else asks for clarification.
    pub fn next_step(&self, verdict: &EvaluationVerdict) -> NextStep {
        if verdict.gaps.is_empty() && verdict.decision != VerdictDecision::Escalate {
            NextStep::Accept {
                caveats: Vec::new(),
            }
        } else if verdict.decision != VerdictDecision::Escalate
            && self.cycle_count >= self.max_cycles
        {
            NextStep::Accept {
                caveats: verdict.gaps.clone(),
            }
        } else if verdict.decision == VerdictDecision::Escalate {
            NextStep::Escalate {
                cause: verdict
                    .cause
                    .clone()
                    .unwrap_or_else(|| "evaluator escalated the response".to_string()),
            }
        } else {
            NextStep::Clarify {
                gaps: verdict.gaps.clone(),
            }
        }
    }

    /// Store a verdict and apply the resulting step.
    ///
    /// `Clarify` leaves the session in `AwaitingClarification`; the caller
    /// fetches a follow-up and calls [`start_cycle`](Self::start_cycle).
    pub fn record_verdict(&mut self, verdict: EvaluationVerdict) -> Result<NextStep, DomainError> {
        let step = self.next_step(&verdict);
        self.last_verdict = Some(verdict);
        match &step {
            NextStep::Accept { caveats } => self.finish(SessionOutcome::Accepted {
                caveats: caveats.clone(),
            })?,
            NextStep::Escalate { cause } => self.escalate(cause.clone())?,
            NextStep::Clarify { .. } => self.transition(SessionState::AwaitingClarification)?,
        }
        Ok(step)
    }

    pub fn escalate(&mut self, cause: impl Into<String>) -> Result<(), DomainError> {
        self.finish(SessionOutcome::Escalated {
            cause: cause.into(),
        })
    }

    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), DomainError> {
        self.finish(SessionOutcome::Failed {
            reason: reason.into(),
        })
    }

    fn finish(&mut self, outcome: SessionOutcome) -> Result<(), DomainError> {
        self.transition(outcome.state())?;
        self.outcome = Some(outcome);
        Ok(())
    }

    /// Close the session into its report.
    ///
    /// A session dropped before reaching a terminal state reports as failed.
    pub fn into_report(self, compression: Option<CompressionResult>) -> OrchestrationReport {
        let final_response = self.last_response().map(str::to_string);
        let outcome = self.outcome.unwrap_or_else(|| SessionOutcome::Failed {
            reason: format!("session stopped in {} state", self.state),
        });
        OrchestrationReport {
            session_id: self.id,
            agent: self.agent,
            final_state: outcome.state(),
            outcome,
            cycle_count: self.cycle_count,
            attempts: self.attempts,
            final_verdict: self.last_verdict,
            final_response,
            compression,
        }
    }
}

/// Everything a finished session produced, including failed runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestrationReport {
    pub session_id: SessionId,
    pub agent: AgentId,
    pub outcome: SessionOutcome,
    pub final_state: SessionState,
    pub cycle_count: u32,
    pub attempts: Vec<ExecutionAttempt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_verdict: Option<EvaluationVerdict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<CompressionResult>,
}

impl OrchestrationReport {
    /// Compressed text when compression ran, the raw response otherwise
    pub fn output(&self) -> Option<&str> {
        self.compression
            .as_ref()
            .map(|c| c.compressed.as_str())
            .or(self.final_response.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestration::attempt::AttemptStatus;
    use crate::orchestration::verdict::Checklist;

    fn session() -> OrchestrationSession {
        OrchestrationSession::new(AgentId::from("cursor"), "fix the login bug")
    }

    fn gaps(items: &[&str]) -> EvaluationVerdict {
        EvaluationVerdict::with_gaps(
            Checklist::passing(),
            items.iter().map(|s| s.to_string()).collect(),
        )
    }

    fn run_cycle(session: &mut OrchestrationSession, response: &str) {
        let cycle = session.start_cycle().unwrap();
        session.record_attempt(ExecutionAttempt::succeeded(
            cycle,
            0,
            session.agent().clone(),
            "prompt",
            response,
        ));
        session.begin_evaluation().unwrap();
    }

    #[test]
    fn test_new_session_is_init() {
        let session = session();
        assert_eq!(session.state(), SessionState::Init);
        assert_eq!(session.cycle_count(), 0);
        assert!(session.outcome().is_none());
    }

    #[test]
    fn test_clean_verdict_accepts() {
        let mut session = session();
        run_cycle(&mut session, "done");
        let step = session.record_verdict(EvaluationVerdict::accept()).unwrap();

        assert_eq!(step, NextStep::Accept { caveats: vec![] });
        assert_eq!(session.state(), SessionState::Accepted);
        assert!(session.outcome().unwrap().is_clean());
    }

    #[test]
    fn test_gap_then_clean_accepts_on_second_cycle() {
        let mut session = session();
        run_cycle(&mut session, "partial");
        let step = session
            .record_verdict(gaps(&["missing error handling"]))
            .unwrap();
        assert_eq!(
            step,
            NextStep::Clarify {
                gaps: vec!["missing error handling".to_string()]
            }
        );
        assert_eq!(session.state(), SessionState::AwaitingClarification);

        run_cycle(&mut session, "complete");
        session.record_verdict(EvaluationVerdict::accept()).unwrap();
        assert_eq!(session.state(), SessionState::Accepted);
        assert_eq!(session.cycle_count(), 2);
    }

    #[test]
    fn test_cycle_cap_accepts_with_caveats() {
        let mut session = session();
        for _ in 0..2 {
            run_cycle(&mut session, "partial");
            session.record_verdict(gaps(&["missing tests"])).unwrap();
        }
        run_cycle(&mut session, "still partial");
        let step = session.record_verdict(gaps(&["missing tests"])).unwrap();

        assert_eq!(
            step,
            NextStep::Accept {
                caveats: vec!["missing tests".to_string()]
            }
        );
        assert_eq!(session.cycle_count(), MAX_CYCLES);
        assert!(!session.outcome().unwrap().is_clean());
        assert!(session.outcome().unwrap().is_accepted());
    }

    #[test]
    fn test_lower_cycle_cap() {
        let mut session = session().with_max_cycles(1);
        run_cycle(&mut session, "partial");
        let step = session.record_verdict(gaps(&["unclear explanation"])).unwrap();
        assert!(matches!(step, NextStep::Accept { .. }));
        assert_eq!(session.cycle_count(), 1);
    }

    #[test]
    fn test_max_cycles_is_clamped() {
        assert_eq!(session().with_max_cycles(0).max_cycles(), 1);
        assert_eq!(session().with_max_cycles(10).max_cycles(), MAX_CYCLES);
    }

    #[test]
    fn test_evaluator_escalation() {
        let mut session = session();
        run_cycle(&mut session, "");
        let verdict = EvaluationVerdict::escalate(Checklist::passing(), "empty response");
        let step = session.record_verdict(verdict).unwrap();
        assert_eq!(
            step,
            NextStep::Escalate {
                cause: "empty response".to_string()
            }
        );
        assert_eq!(session.state(), SessionState::Escalated);
    }

    #[test]
    fn test_cannot_start_cycle_while_evaluating() {
        let mut session = session();
        run_cycle(&mut session, "x");
        let err = session.start_cycle().unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
        assert_eq!(session.cycle_count(), 1);
    }

    #[test]
    fn test_terminal_session_rejects_changes() {
        let mut session = session();
        session.fail("cancelled").unwrap();
        assert!(session.is_terminal());
        assert!(session.escalate("late").is_err());
        assert!(session.start_cycle().is_err());
    }

    #[test]
    fn test_first_context_handle_wins() {
        let mut session = session();
        session.adopt_context_handle(None);
        session.adopt_context_handle(Some("chat-1".to_string()));
        session.adopt_context_handle(Some("chat-2".to_string()));
        assert_eq!(session.context_handle(), Some("chat-1"));
    }

    #[test]
    fn test_report_keeps_history_on_failure() {
        let mut session = session();
        let cycle = session.start_cycle().unwrap();
        session.record_attempt(ExecutionAttempt::failed(
            cycle,
            0,
            AgentId::from("cursor"),
            "prompt",
            AttemptStatus::FatalError,
            "executor unreachable",
        ));
        session.fail("executor unreachable").unwrap();

        let report = session.into_report(None);
        assert_eq!(report.final_state, SessionState::Failed);
        assert_eq!(report.attempts.len(), 1);
        assert!(report.final_response.is_none());
        assert_eq!(report.outcome.label(), "failed");
    }

    #[test]
    fn test_unfinished_session_reports_failed() {
        let mut session = session();
        run_cycle(&mut session, "answer");
        let report = session.into_report(None);
        assert_eq!(report.final_state, SessionState::Failed);
        assert_eq!(report.output(), Some("answer"));
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let outcome = SessionOutcome::Escalated {
            cause: "auth".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "escalated");
        assert_eq!(json["cause"], "auth");
    }
}
