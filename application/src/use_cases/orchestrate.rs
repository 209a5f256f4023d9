//! Orchestrate use case
//!
//! Drives one request through Execute → Evaluate cycles against a single
//! agent until the evaluator is satisfied, the cycle cap is reached or the
//! session escalates.
//!
//! # Flow
//!
//! ```text
//! ┌──────────┐  ok   ┌────────────┐ clean / cap ┌──────────┐
//! │ Executing│──────>│ Evaluating │────────────>│ Accepted │
//! └──────────┘       └────────────┘             └──────────┘
//!   │  ^  │ transient/malformed: retry once         │ gaps
//!   │  │  └──> same cycle                           v
//!   │  └─────────── follow-up prompt ──── AwaitingClarification
//!   └── fatal / retry exhausted ──> Escalated
//! ```
//!
//! Unreachable collaborators and cancellation end the session as `Failed`.
//! The report always carries the full attempt history.

use crate::config::OrchestrationParams;
use crate::ports::attempt_logger::{AttemptLogger, NoAttemptLogger};
use crate::ports::evaluator::{Clarifier, Evaluator};
use crate::ports::executor::{Executor, ExecutorError, InvocationRequest};
use crate::ports::progress::{NoProgress, OrchestrationProgress};
use router_domain::{
    AgentId, CompressionLevel, ExecutionAttempt, FailureClass, MAX_RETRIES_PER_CYCLE, NextStep,
    OrchestrationReport, OrchestrationSession, RoutingDecision, SessionState, compress,
};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Input for the Orchestrate use case
#[derive(Debug, Clone)]
pub struct OrchestrateInput {
    /// The original request, sent as the cycle 1 prompt
    pub request: String,
    pub agent: AgentId,
    /// Invocation flags (typically the routing decision's recommended flags)
    pub flags: BTreeMap<String, String>,
    /// Compress the final response to this level and token budget
    pub compression: Option<(CompressionLevel, usize)>,
}

impl OrchestrateInput {
    pub fn new(agent: AgentId, request: impl Into<String>) -> Self {
        Self {
            request: request.into(),
            agent,
            flags: BTreeMap::new(),
            compression: None,
        }
    }

    /// Run the request against a routing decision's agent and flags
    pub fn from_decision(decision: &RoutingDecision, request: impl Into<String>) -> Self {
        Self::new(decision.selected_agent.clone(), request)
            .with_flags(decision.recommended_flags.clone())
    }

    pub fn with_flags(mut self, flags: BTreeMap<String, String>) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_compression(mut self, level: CompressionLevel, max_tokens: usize) -> Self {
        self.compression = Some((level, max_tokens));
        self
    }
}

/// Why a session stopped before accepting
enum Halt {
    Escalate(String),
    Fail(String),
}

impl From<router_domain::DomainError> for Halt {
    fn from(e: router_domain::DomainError) -> Self {
        Halt::Fail(e.to_string())
    }
}

/// Use case for orchestrating Execute → Evaluate cycles
pub struct OrchestrateUseCase<E, V, C>
where
    E: Executor + 'static,
    V: Evaluator + 'static,
    C: Clarifier + 'static,
{
    executor: Arc<E>,
    evaluator: Arc<V>,
    clarifier: Arc<C>,
    params: OrchestrationParams,
    logger: Arc<dyn AttemptLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl<E, V, C> OrchestrateUseCase<E, V, C>
where
    E: Executor + 'static,
    V: Evaluator + 'static,
    C: Clarifier + 'static,
{
    pub fn new(executor: Arc<E>, evaluator: Arc<V>, clarifier: Arc<C>) -> Self {
        Self {
            executor,
            evaluator,
            clarifier,
            params: OrchestrationParams::default(),
            logger: Arc::new(NoAttemptLogger),
            cancellation_token: None,
        }
    }

    pub fn with_params(mut self, params: OrchestrationParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_attempt_logger(mut self, logger: Arc<dyn AttemptLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Run a session with default (no-op) progress
    pub async fn run(&self, input: OrchestrateInput) -> OrchestrationReport {
        self.run_with_progress(input, &NoProgress).await
    }

    /// Run a session with progress callbacks
    pub async fn run_with_progress(
        &self,
        input: OrchestrateInput,
        progress: &dyn OrchestrationProgress,
    ) -> OrchestrationReport {
        let mut session = OrchestrationSession::new(input.agent.clone(), input.request.clone())
            .with_max_cycles(self.params.max_cycles);
        info!(
            "Session {} started for agent {} (max {} cycles)",
            session.id(),
            session.agent(),
            session.max_cycles()
        );

        if let Err(halt) = self.drive(&mut session, &input, progress).await {
            let from = session.state();
            let result = match halt {
                Halt::Escalate(cause) => {
                    warn!("Session {} escalated: {}", session.id(), cause);
                    session.escalate(cause)
                }
                Halt::Fail(reason) => {
                    warn!("Session {} failed: {}", session.id(), reason);
                    session.fail(reason)
                }
            };
            if let Err(e) = result {
                warn!("Could not close session {}: {}", session.id(), e);
            }
            Self::notify_state(progress, &session, from);
        }

        let compression = match (input.compression, session.last_response()) {
            (Some((level, max_tokens)), Some(text)) => {
                let result = compress(text, level, max_tokens);
                debug!(
                    "Compressed final response {} -> {} chars ({})",
                    result.original_length, result.compressed_length, level
                );
                Some(result)
            }
            _ => None,
        };

        let report = session.into_report(compression);
        info!(
            "Session {} finished: {} after {} cycle(s), {} attempt(s)",
            report.session_id,
            report.outcome,
            report.cycle_count,
            report.attempts.len()
        );
        report
    }

    /// Run cycles until the session reaches a terminal state
    async fn drive(
        &self,
        session: &mut OrchestrationSession,
        input: &OrchestrateInput,
        progress: &dyn OrchestrationProgress,
    ) -> Result<(), Halt> {
        let mut prompt = input.request.clone();
        let mut flags = input.flags.clone();

        loop {
            let from = session.state();
            let cycle = session.start_cycle()?;
            Self::notify_state(progress, session, from);
            info!("Cycle {}/{}: executing", cycle, session.max_cycles());

            let response = self
                .execute_cycle(session, cycle, &prompt, &mut flags, progress)
                .await?;

            let from = session.state();
            session.begin_evaluation()?;
            Self::notify_state(progress, session, from);

            let verdict = self
                .cancellable(self.evaluator.evaluate(&response, &input.request))
                .await?
                .map_err(|e| Halt::Fail(format!("evaluator: {}", e)))?;
            debug!(
                "Cycle {} verdict: {} (gaps: {:?})",
                cycle, verdict.decision, verdict.gaps
            );
            progress.on_verdict(cycle, &verdict);

            let from = session.state();
            let step = session.record_verdict(verdict)?;
            Self::notify_state(progress, session, from);

            match step {
                NextStep::Accept { .. } | NextStep::Escalate { .. } => return Ok(()),
                NextStep::Clarify { gaps } => {
                    info!("Cycle {} left {} gap(s); asking for follow-up", cycle, gaps.len());
                    prompt = self
                        .cancellable(self.clarifier.followup(&gaps, &input.request))
                        .await?
                        .map_err(|e| Halt::Fail(format!("clarifier: {}", e)))?;
                }
            }
        }
    }

    /// Execute one cycle, retrying at most once without consuming a cycle
    async fn execute_cycle(
        &self,
        session: &mut OrchestrationSession,
        cycle: u32,
        prompt: &str,
        flags: &mut BTreeMap<String, String>,
        progress: &dyn OrchestrationProgress,
    ) -> Result<String, Halt> {
        let agent = session.agent().clone();
        let mut request = InvocationRequest::new(agent.clone(), prompt)
            .with_context_handle(session.context_handle().map(str::to_string))
            .with_flags(flags.clone());
        let mut retry = 0;

        loop {
            let timeout = self.params.invocation_timeout;
            let result = match self
                .cancellable(tokio::time::timeout(timeout, self.executor.invoke(&request)))
                .await?
            {
                Ok(result) => result,
                Err(_) => Err(ExecutorError::Timeout(timeout)),
            };

            let error = match result {
                Ok(response) => {
                    let attempt =
                        ExecutionAttempt::succeeded(cycle, retry, agent, prompt, &response.text);
                    self.record(session, attempt, progress);
                    session.adopt_context_handle(response.context_handle);
                    return Ok(response.text);
                }
                Err(error) => error,
            };

            let class = error.class();
            let attempt = ExecutionAttempt::failed(
                cycle,
                retry,
                agent.clone(),
                prompt,
                class.attempt_status(),
                error.to_string(),
            );
            self.record(session, attempt, progress);

            match class {
                FailureClass::Unreachable => return Err(Halt::Fail(error.to_string())),
                FailureClass::Fatal => return Err(Halt::Escalate(error.to_string())),
                _ if retry >= MAX_RETRIES_PER_CYCLE => {
                    return Err(Halt::Escalate(format!("{} (retry exhausted)", error)));
                }
                FailureClass::Transient => {
                    let backoff = self.params.retry_backoff;
                    warn!("Cycle {}: {}; retrying in {:?}", cycle, error, backoff);
                    progress.on_retry(cycle, class, backoff);
                    self.cancellable(tokio::time::sleep(backoff)).await?;
                }
                FailureClass::Malformed => {
                    let offending = match &error {
                        ExecutorError::MalformedInvocation { offending_flag, .. } => {
                            offending_flag.as_deref()
                        }
                        _ => None,
                    };
                    if !request.correct(offending) {
                        return Err(Halt::Escalate(format!(
                            "{} (no flag left to correct)",
                            error
                        )));
                    }
                    warn!(
                        "Cycle {}: {}; retrying with flags {:?}",
                        cycle,
                        error,
                        request.flags.keys().collect::<Vec<_>>()
                    );
                    progress.on_retry(cycle, class, Duration::ZERO);
                    *flags = request.flags.clone();
                }
            }
            retry += 1;
        }
    }

    fn record(
        &self,
        session: &mut OrchestrationSession,
        attempt: ExecutionAttempt,
        progress: &dyn OrchestrationProgress,
    ) {
        self.logger.record(&session.id(), &attempt);
        progress.on_attempt(&attempt);
        session.record_attempt(attempt);
    }

    /// Race a future against the cancellation token, if any
    async fn cancellable<T>(&self, future: impl Future<Output = T>) -> Result<T, Halt> {
        match &self.cancellation_token {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(Halt::Fail("cancelled".to_string())),
                output = future => Ok(output),
            },
            None => Ok(future.await),
        }
    }

    fn notify_state(
        progress: &dyn OrchestrationProgress,
        session: &OrchestrationSession,
        from: SessionState,
    ) {
        let to = session.state();
        if from != to {
            debug!("Session {}: {} -> {}", session.id(), from, to);
            progress.on_state_change(&session.id(), from, to);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::evaluator::CollaboratorError;
    use crate::ports::executor::InvocationResponse;
    use async_trait::async_trait;
    use router_domain::{
        AttemptStatus, Checklist, EvaluationVerdict, SessionId, SessionOutcome, TRUNCATION_MARKER,
    };
    use std::collections::VecDeque;
    use std::sync::Mutex;

    // ==================== Test Doubles ====================

    /// A scripted executor outcome
    enum Scripted {
        Reply(InvocationResponse),
        Error(ExecutorError),
        /// Never completes (exercises timeouts and cancellation)
        Hang,
    }

    fn reply(text: &str) -> Scripted {
        Scripted::Reply(InvocationResponse::new(text))
    }

    /// Executor that plays back scripted outcomes in order
    struct ScriptedExecutor {
        script: Mutex<VecDeque<Scripted>>,
        requests: Mutex<Vec<InvocationRequest>>,
    }

    impl ScriptedExecutor {
        fn new(script: Vec<Scripted>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<InvocationRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Executor for ScriptedExecutor {
        async fn invoke(
            &self,
            request: &InvocationRequest,
        ) -> Result<InvocationResponse, ExecutorError> {
            self.requests.lock().unwrap().push(request.clone());
            let next = self.script.lock().unwrap().pop_front();
            match next {
                Some(Scripted::Reply(response)) => Ok(response),
                Some(Scripted::Error(error)) => Err(error),
                Some(Scripted::Hang) => std::future::pending().await,
                None => Ok(InvocationResponse::new("(no more responses)")),
            }
        }
    }

    /// Evaluator that plays back verdicts, accepting once the script runs out
    struct ScriptedEvaluator {
        verdicts: Mutex<VecDeque<Result<EvaluationVerdict, CollaboratorError>>>,
    }

    impl ScriptedEvaluator {
        fn new(verdicts: Vec<Result<EvaluationVerdict, CollaboratorError>>) -> Self {
            Self {
                verdicts: Mutex::new(verdicts.into()),
            }
        }

        fn accepting() -> Self {
            Self::new(vec![])
        }
    }

    #[async_trait]
    impl Evaluator for ScriptedEvaluator {
        async fn evaluate(
            &self,
            _response: &str,
            _original_request: &str,
        ) -> Result<EvaluationVerdict, CollaboratorError> {
            self.verdicts
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(EvaluationVerdict::accept()))
        }
    }

    /// Clarifier that echoes the gaps into the follow-up prompt
    struct EchoClarifier {
        fail: bool,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl EchoClarifier {
        fn new() -> Self {
            Self {
                fail: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Clarifier for EchoClarifier {
        async fn followup(
            &self,
            gaps: &[String],
            _original_request: &str,
        ) -> Result<String, CollaboratorError> {
            self.calls.lock().unwrap().push(gaps.to_vec());
            if self.fail {
                return Err(CollaboratorError::Unavailable("clarifier offline".into()));
            }
            Ok(format!("Please address: {}", gaps.join(", ")))
        }
    }

    /// Progress recorder for transition assertions
    #[derive(Default)]
    struct RecordingProgress {
        transitions: Mutex<Vec<(SessionState, SessionState)>>,
        retries: Mutex<Vec<(u32, FailureClass)>>,
    }

    impl RecordingProgress {
        fn visited(&self, state: SessionState) -> bool {
            self.transitions
                .lock()
                .unwrap()
                .iter()
                .any(|(_, to)| *to == state)
        }
    }

    impl OrchestrationProgress for RecordingProgress {
        fn on_state_change(&self, _session: &SessionId, from: SessionState, to: SessionState) {
            self.transitions.lock().unwrap().push((from, to));
        }

        fn on_retry(&self, cycle: u32, class: FailureClass, _backoff: Duration) {
            self.retries.lock().unwrap().push((cycle, class));
        }
    }

    /// Attempt logger that keeps everything in memory
    #[derive(Default)]
    struct MemoryLogger {
        attempts: Mutex<Vec<ExecutionAttempt>>,
    }

    impl AttemptLogger for MemoryLogger {
        fn record(&self, _session: &SessionId, attempt: &ExecutionAttempt) {
            self.attempts.lock().unwrap().push(attempt.clone());
        }
    }

    fn gaps(items: &[&str]) -> Result<EvaluationVerdict, CollaboratorError> {
        Ok(EvaluationVerdict::with_gaps(
            Checklist::passing(),
            items.iter().map(|s| s.to_string()).collect(),
        ))
    }

    fn fast_params() -> OrchestrationParams {
        OrchestrationParams::default()
            .with_retry_backoff(Duration::from_millis(1))
            .with_invocation_timeout(Duration::from_millis(50))
    }

    fn use_case(
        executor: ScriptedExecutor,
        evaluator: ScriptedEvaluator,
        clarifier: EchoClarifier,
    ) -> (
        OrchestrateUseCase<ScriptedExecutor, ScriptedEvaluator, EchoClarifier>,
        Arc<ScriptedExecutor>,
        Arc<EchoClarifier>,
    ) {
        let executor = Arc::new(executor);
        let clarifier = Arc::new(clarifier);
        let use_case =
            OrchestrateUseCase::new(executor.clone(), Arc::new(evaluator), clarifier.clone())
                .with_params(fast_params());
        (use_case, executor, clarifier)
    }

    fn input() -> OrchestrateInput {
        OrchestrateInput::new(AgentId::from("cursor"), "Fix the authentication bug in login.py")
            .with_flags(BTreeMap::from([
                ("model".to_string(), "gpt-4o".to_string()),
                ("mode".to_string(), "agent".to_string()),
            ]))
    }

    // ==================== Flow Tests ====================

    #[tokio::test]
    async fn test_clean_first_cycle_accepts() {
        let (use_case, _, clarifier) = use_case(
            ScriptedExecutor::new(vec![reply("fixed the null check in login.py")]),
            ScriptedEvaluator::accepting(),
            EchoClarifier::new(),
        );
        let report = use_case.run(input()).await;

        assert!(report.outcome.is_clean());
        assert_eq!(report.final_state, SessionState::Accepted);
        assert_eq!(report.cycle_count, 1);
        assert_eq!(report.attempts.len(), 1);
        assert_eq!(
            report.final_response.as_deref(),
            Some("fixed the null check in login.py")
        );
        assert!(clarifier.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_scenario_c_gap_then_clean_accepts_at_cycle_two() {
        let progress = RecordingProgress::default();
        let (use_case, executor, clarifier) = use_case(
            ScriptedExecutor::new(vec![reply("patched"), reply("patched with error handling")]),
            ScriptedEvaluator::new(vec![gaps(&["missing error handling"]), gaps(&[])]),
            EchoClarifier::new(),
        );
        let report = use_case.run_with_progress(input(), &progress).await;

        assert!(progress.visited(SessionState::AwaitingClarification));
        assert!(report.outcome.is_clean());
        assert_eq!(report.cycle_count, 2);
        assert_eq!(
            clarifier.calls.lock().unwrap().as_slice(),
            &[vec!["missing error handling".to_string()]]
        );

        let requests = executor.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].prompt, "Please address: missing error handling");
    }

    #[tokio::test]
    async fn test_scenario_d_timeout_retry_stays_in_cycle_one() {
        let progress = RecordingProgress::default();
        let (use_case, _, _) = use_case(
            ScriptedExecutor::new(vec![Scripted::Hang, reply("done after retry")]),
            ScriptedEvaluator::accepting(),
            EchoClarifier::new(),
        );
        let report = use_case.run_with_progress(input(), &progress).await;

        assert_eq!(report.cycle_count, 1);
        assert_eq!(report.attempts.len(), 2);
        assert_eq!(report.attempts[0].status, AttemptStatus::TransientError);
        assert_eq!(report.attempts[1].status, AttemptStatus::Ok);
        assert_eq!(report.attempts[1].retry, 1);
        assert!(report.attempts.iter().all(|a| a.cycle == 1));
        assert!(progress.visited(SessionState::Evaluating));
        assert_eq!(
            progress.retries.lock().unwrap().as_slice(),
            &[(1, FailureClass::Transient)]
        );
        assert!(report.outcome.is_accepted());
    }

    #[tokio::test]
    async fn test_scenario_e_cycle_cap_accepts_with_caveats() {
        let (use_case, executor, _) = use_case(
            ScriptedExecutor::new(vec![reply("v1"), reply("v2"), reply("v3")]),
            ScriptedEvaluator::new(vec![
                gaps(&["missing tests"]),
                gaps(&["missing tests"]),
                gaps(&["missing tests"]),
            ]),
            EchoClarifier::new(),
        );
        let report = use_case.run(input()).await;

        assert_eq!(report.cycle_count, 3);
        assert_eq!(
            report.outcome,
            SessionOutcome::Accepted {
                caveats: vec!["missing tests".to_string()]
            }
        );
        assert_eq!(executor.requests().len(), 3);
        assert_eq!(report.final_response.as_deref(), Some("v3"));
    }

    #[tokio::test]
    async fn test_lowered_cycle_cap() {
        let (use_case, executor, _) = use_case(
            ScriptedExecutor::new(vec![reply("v1"), reply("v2")]),
            ScriptedEvaluator::new(vec![gaps(&["unclear explanation"])]),
            EchoClarifier::new(),
        );
        let use_case = use_case.with_params(fast_params().with_max_cycles(1));
        let report = use_case.run(input()).await;

        assert_eq!(report.cycle_count, 1);
        assert!(report.outcome.is_accepted());
        assert!(!report.outcome.is_clean());
        assert_eq!(executor.requests().len(), 1);
    }

    // ==================== Failure Handling ====================

    #[tokio::test]
    async fn test_second_transient_failure_escalates() {
        let (use_case, _, _) = use_case(
            ScriptedExecutor::new(vec![
                Scripted::Error(ExecutorError::Network("connection reset".into())),
                Scripted::Error(ExecutorError::Network("connection reset".into())),
            ]),
            ScriptedEvaluator::accepting(),
            EchoClarifier::new(),
        );
        let report = use_case.run(input()).await;

        assert_eq!(report.final_state, SessionState::Escalated);
        assert_eq!(report.cycle_count, 1);
        assert_eq!(report.attempts.len(), 2);
        assert!(report.final_verdict.is_none());
    }

    #[tokio::test]
    async fn test_fatal_error_escalates_without_retry() {
        let (use_case, executor, _) = use_case(
            ScriptedExecutor::new(vec![Scripted::Error(ExecutorError::Auth(
                "token expired".into(),
            ))]),
            ScriptedEvaluator::accepting(),
            EchoClarifier::new(),
        );
        let report = use_case.run(input()).await;

        assert_eq!(executor.requests().len(), 1);
        assert_eq!(report.attempts[0].status, AttemptStatus::FatalError);
        match report.outcome {
            SessionOutcome::Escalated { cause } => assert!(cause.contains("token expired")),
            other => panic!("expected escalation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_invocation_drops_named_flag() {
        let (use_case, executor, _) = use_case(
            ScriptedExecutor::new(vec![
                Scripted::Error(ExecutorError::MalformedInvocation {
                    offending_flag: Some("--model".into()),
                    message: "unknown model gpt-4o".into(),
                }),
                reply("done"),
            ]),
            ScriptedEvaluator::accepting(),
            EchoClarifier::new(),
        );
        let report = use_case.run(input()).await;

        assert!(report.outcome.is_clean());
        assert_eq!(report.cycle_count, 1);
        assert_eq!(
            report.attempts[0].status,
            AttemptStatus::MalformedInvocation
        );

        let requests = executor.requests();
        assert!(requests[0].flags.contains_key("model"));
        assert!(!requests[1].flags.contains_key("model"));
        assert!(requests[1].flags.contains_key("mode"));
    }

    #[tokio::test]
    async fn test_corrected_flags_carry_into_later_cycles() {
        let (use_case, executor, _) = use_case(
            ScriptedExecutor::new(vec![
                Scripted::Error(ExecutorError::MalformedInvocation {
                    offending_flag: None,
                    message: "unrecognized arguments".into(),
                }),
                reply("v1"),
                reply("v2"),
            ]),
            ScriptedEvaluator::new(vec![gaps(&["missing tests"]), gaps(&[])]),
            EchoClarifier::new(),
        );
        let report = use_case.run(input()).await;

        assert_eq!(report.cycle_count, 2);
        let requests = executor.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[2].flags.keys().collect::<Vec<_>>(), vec!["mode"]);
    }

    #[tokio::test]
    async fn test_still_malformed_escalates() {
        let malformed = || {
            Scripted::Error(ExecutorError::MalformedInvocation {
                offending_flag: None,
                message: "bad arguments".into(),
            })
        };
        let (use_case, _, _) = use_case(
            ScriptedExecutor::new(vec![malformed(), malformed()]),
            ScriptedEvaluator::accepting(),
            EchoClarifier::new(),
        );
        let report = use_case.run(input()).await;

        assert_eq!(report.final_state, SessionState::Escalated);
        assert_eq!(report.attempts.len(), 2);
    }

    #[tokio::test]
    async fn test_unavailable_executor_fails_session() {
        let (use_case, _, _) = use_case(
            ScriptedExecutor::new(vec![Scripted::Error(ExecutorError::Unavailable(
                "executor layer down".into(),
            ))]),
            ScriptedEvaluator::accepting(),
            EchoClarifier::new(),
        );
        let report = use_case.run(input()).await;

        assert_eq!(report.final_state, SessionState::Failed);
        assert_eq!(report.attempts.len(), 1);
    }

    #[tokio::test]
    async fn test_evaluator_error_fails_session() {
        let (use_case, _, _) = use_case(
            ScriptedExecutor::new(vec![reply("done")]),
            ScriptedEvaluator::new(vec![Err(CollaboratorError::Unavailable(
                "evaluator offline".into(),
            ))]),
            EchoClarifier::new(),
        );
        let report = use_case.run(input()).await;

        assert_eq!(report.final_state, SessionState::Failed);
        assert_eq!(report.final_response.as_deref(), Some("done"));
    }

    #[tokio::test]
    async fn test_clarifier_error_fails_session() {
        let (use_case, _, _) = use_case(
            ScriptedExecutor::new(vec![reply("partial")]),
            ScriptedEvaluator::new(vec![gaps(&["missing tests"])]),
            EchoClarifier::failing(),
        );
        let report = use_case.run(input()).await;

        assert_eq!(report.final_state, SessionState::Failed);
        assert_eq!(report.cycle_count, 1);
        assert!(report.final_verdict.is_some());
    }

    #[tokio::test]
    async fn test_evaluator_escalation() {
        let (use_case, _, _) = use_case(
            ScriptedExecutor::new(vec![reply("")]),
            ScriptedEvaluator::new(vec![Ok(EvaluationVerdict::escalate(
                Checklist::passing(),
                "empty response",
            ))]),
            EchoClarifier::new(),
        );
        let report = use_case.run(input()).await;

        assert_eq!(
            report.outcome,
            SessionOutcome::Escalated {
                cause: "empty response".to_string()
            }
        );
    }

    // ==================== Context, Cancellation, Logging ====================

    #[tokio::test]
    async fn test_first_context_handle_threaded_into_later_calls() {
        let (use_case, executor, _) = use_case(
            ScriptedExecutor::new(vec![
                Scripted::Reply(InvocationResponse::new("v1").with_context_handle("chat-42")),
                Scripted::Reply(InvocationResponse::new("v2").with_context_handle("chat-99")),
                reply("v3"),
            ]),
            ScriptedEvaluator::new(vec![gaps(&["missing tests"]), gaps(&["missing tests"])]),
            EchoClarifier::new(),
        );
        use_case.run(input()).await;

        let handles: Vec<_> = executor
            .requests()
            .into_iter()
            .map(|r| r.context_handle)
            .collect();
        assert_eq!(
            handles,
            vec![None, Some("chat-42".to_string()), Some("chat-42".to_string())]
        );
    }

    #[tokio::test]
    async fn test_cancellation_fails_session_and_keeps_history() {
        let token = CancellationToken::new();
        let (use_case, _, _) = use_case(
            ScriptedExecutor::new(vec![reply("v1"), Scripted::Hang]),
            ScriptedEvaluator::new(vec![gaps(&["missing tests"])]),
            EchoClarifier::new(),
        );
        let use_case = use_case
            .with_params(fast_params().with_invocation_timeout(Duration::from_secs(60)))
            .with_cancellation(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });
        let report = use_case.run(input()).await;
        canceller.await.unwrap();

        assert_eq!(
            report.outcome,
            SessionOutcome::Failed {
                reason: "cancelled".to_string()
            }
        );
        assert_eq!(report.attempts.len(), 1);
        assert_eq!(report.cycle_count, 2);
    }

    #[tokio::test]
    async fn test_every_attempt_is_logged() {
        let logger = Arc::new(MemoryLogger::default());
        let (use_case, _, _) = use_case(
            ScriptedExecutor::new(vec![Scripted::Hang, reply("done")]),
            ScriptedEvaluator::accepting(),
            EchoClarifier::new(),
        );
        let use_case = use_case.with_attempt_logger(logger.clone());
        let report = use_case.run(input()).await;

        assert_eq!(*logger.attempts.lock().unwrap(), report.attempts);
    }

    #[tokio::test]
    async fn test_final_response_compressed() {
        let long = "word ".repeat(200);
        let (use_case, _, _) = use_case(
            ScriptedExecutor::new(vec![reply(&long)]),
            ScriptedEvaluator::accepting(),
            EchoClarifier::new(),
        );
        let report = use_case
            .run(input().with_compression(CompressionLevel::Aggressive, 50))
            .await;

        let compression = report.compression.as_ref().unwrap();
        assert!(compression.truncated);
        assert!(compression.compressed.ends_with(TRUNCATION_MARKER));
        assert_eq!(report.output(), Some(compression.compressed.as_str()));
    }

    #[test]
    fn test_from_decision_uses_recommended_flags() {
        let matrix = Arc::new(router_domain::CapabilityMatrix::builtin());
        let selector = router_domain::Selector::new(matrix);
        let task = router_domain::TaskDescription::new("What is the capital of France?").unwrap();
        let profile = router_domain::Classifier::new().classify(&task);
        let decision = selector
            .select(&profile, &router_domain::RoutingPreferences::new())
            .unwrap();

        let input = OrchestrateInput::from_decision(&decision, task.text());
        assert_eq!(input.agent, decision.selected_agent);
        assert_eq!(input.flags, decision.recommended_flags);
    }
}
