//! Run Phase use case
//!
//! Drives one debate phase for the current roster:
//!
//! 1. Select the delegates with a model assigned.
//! 2. Snapshot each delegate's prompt context from the session.
//! 3. Call every delegate through the retry wrapper, parse the answer and
//!    commit it (artifact, call statistic, activity entry, busy flag).
//! 4. Surface the first delegate that still failed after its retries.
//!
//! The orchestrator is the only writer to the [`DebateSession`]: spawned
//! calls never touch it, their results are committed one at a time as they
//! come back.

use crate::config::{Concurrency, DebateParams};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::credentials::{CredentialProvider, normalize_credential};
use crate::ports::generation::{Generation, GenerationClient, GenerationRequest};
use crate::ports::progress::{DebateProgressNotifier, NoProgress};
use crate::use_cases::retry::{CallError, RetryPolicy, call_with_retry};
use arena_domain::{
    ActivityLogEntry, CallStatistic, DebatePhase, DebateSession, DelegateId, DomainError, ModelId,
    PhaseContext, PhaseOutcome, PromptTemplate, parse_phase_response,
};
use serde_json::json;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::{JoinError, JoinSet};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur while running a phase
#[derive(Error, Debug)]
pub enum RunPhaseError {
    #[error("API key is required")]
    CredentialMissing,

    #[error("Debate cancelled")]
    Cancelled,

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("{delegate} ({model}) failed: {source}")]
    DelegateFailed {
        delegate: DelegateId,
        model: ModelId,
        source: CallError,
    },

    #[error("{delegate} ({model}) call panicked: {message}")]
    DelegatePanicked {
        delegate: DelegateId,
        model: ModelId,
        message: String,
    },
}

impl RunPhaseError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunPhaseError::Cancelled)
    }

    /// The delegate whose call failed, if this is a call failure
    pub fn failed_delegate(&self) -> Option<DelegateId> {
        match self {
            RunPhaseError::DelegateFailed { delegate, .. }
            | RunPhaseError::DelegatePanicked { delegate, .. } => Some(*delegate),
            _ => None,
        }
    }
}

/// One delegate's request, independent of any session
#[derive(Debug, Clone)]
pub struct PhaseRequest {
    pub delegate: DelegateId,
    pub model: ModelId,
    pub scenario: String,
    pub context: PhaseContext,
    /// Used instead of the configured credential when non-blank
    pub credential: Option<String>,
}

impl PhaseRequest {
    pub fn new(
        delegate: DelegateId,
        model: ModelId,
        scenario: impl Into<String>,
        context: PhaseContext,
    ) -> Self {
        Self {
            delegate,
            model,
            scenario: scenario.into(),
            context,
            credential: None,
        }
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub fn phase(&self) -> DebatePhase {
        self.context.phase()
    }
}

/// A prepared call, owned so it can move into a spawned task
struct DelegateJob {
    delegate: DelegateId,
    phase: DebatePhase,
    request: GenerationRequest,
}

/// What came back from a delegate, not yet committed
struct DelegateCall {
    delegate: DelegateId,
    phase: DebatePhase,
    model: ModelId,
    result: Result<Generation, CallError>,
    attempts: u32,
    elapsed: Duration,
}

/// Use case for running debate phases
pub struct DebateOrchestrator<G: GenerationClient + 'static> {
    gateway: Arc<G>,
    credentials: Arc<dyn CredentialProvider>,
    params: DebateParams,
    progress: Arc<dyn DebateProgressNotifier>,
    conversation_logger: Arc<dyn ConversationLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl<G: GenerationClient + 'static> DebateOrchestrator<G> {
    pub fn new(gateway: Arc<G>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            gateway,
            credentials,
            params: DebateParams::default(),
            progress: Arc::new(NoProgress),
            conversation_logger: Arc::new(NoConversationLogger),
            cancellation_token: None,
        }
    }

    pub fn with_params(mut self, params: DebateParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn DebateProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn params(&self) -> &DebateParams {
        &self.params
    }

    // ==================== Public operations ====================

    /// Run a single request outside of any session.
    ///
    /// Checks the credential, builds the phase prompt, calls the model through
    /// the retry wrapper and parses the answer. No partial result is
    /// substituted on failure.
    pub async fn execute_request(
        &self,
        request: PhaseRequest,
    ) -> Result<PhaseOutcome, RunPhaseError> {
        self.ensure_not_cancelled()?;
        let credential = self.resolve_credential(request.credential.as_deref())?;
        let phase = request.phase();
        let messages = PromptTemplate::messages(&request.scenario, &request.context);
        let job = DelegateJob {
            delegate: request.delegate,
            phase,
            request: GenerationRequest::new(request.model.clone(), messages, credential),
        };

        let call = self
            .until_cancelled(Self::call_delegate(
                Arc::clone(&self.gateway),
                Arc::clone(&self.progress),
                self.params.retry_policy(),
                job,
            ))
            .await?;

        let generation = call
            .result
            .map_err(|source| RunPhaseError::DelegateFailed {
                delegate: request.delegate,
                model: request.model,
                source,
            })?;
        let outcome = parse_phase_response(phase, &generation.text)?;
        Ok(self.guard_target(request.delegate, outcome, None))
    }

    /// Run `phase` for every delegate with a model assigned
    pub async fn run_phase(
        &self,
        session: &mut DebateSession,
        phase: DebatePhase,
    ) -> Result<(), RunPhaseError> {
        let delegates = session.active_ids();
        self.run_phase_for(session, phase, &delegates).await
    }

    /// Run `phase` for the given delegates only.
    ///
    /// Entering the phase the session is already in is allowed, so the
    /// delegates that failed can be retried without re-running the others.
    pub async fn run_phase_for(
        &self,
        session: &mut DebateSession,
        phase: DebatePhase,
        delegates: &[DelegateId],
    ) -> Result<(), RunPhaseError> {
        self.ensure_not_cancelled()?;
        let credential = self.resolve_credential(None)?;
        session.begin_phase(phase)?;

        let result = self.dispatch(session, phase, delegates, &credential).await;
        match &result {
            Err(RunPhaseError::Cancelled) => session.stop(),
            _ => session.end_phase(),
        }

        self.progress.on_phase_complete(phase);
        self.conversation_logger.log(ConversationEvent::new(
            "phase_completed",
            json!({
                "phase": phase,
                "success": result.is_ok(),
                "error": result.as_ref().err().map(|e| e.to_string()),
            }),
        ));
        result
    }

    /// Run every remaining action phase, then announce the results.
    ///
    /// Starts at proposal from setup, or re-runs the current action phase
    /// when a previous run stopped part-way.
    pub async fn run_debate(
        &self,
        session: &mut DebateSession,
    ) -> Result<Option<DelegateId>, RunPhaseError> {
        let start = match session.phase() {
            DebatePhase::Setup => DebatePhase::Proposal,
            phase if phase.is_action_phase() => phase,
            phase => {
                return Err(DomainError::InvalidTransition {
                    from: phase,
                    to: DebatePhase::Proposal,
                }
                .into());
            }
        };

        info!(
            "Starting debate with {} delegate(s) from {}",
            session.active_delegates().count(),
            start
        );

        for phase in DebatePhase::ACTIONS.into_iter().filter(|p| *p >= start) {
            self.run_phase(session, phase).await?;
        }

        let winner = session.finish()?;
        match winner {
            Some(id) => info!("Debate finished: {} wins", id),
            None => info!("Debate finished without a winner"),
        }
        self.conversation_logger.log(ConversationEvent::new(
            "debate_finished",
            json!({
                "winner": winner,
                "tally": session.tally(),
            }),
        ));
        Ok(winner)
    }

    // ==================== Dispatch ====================

    async fn dispatch(
        &self,
        session: &mut DebateSession,
        phase: DebatePhase,
        delegates: &[DelegateId],
        credential: &str,
    ) -> Result<(), RunPhaseError> {
        let active = session.active_ids();

        // Every context is taken before any call goes out
        let mut jobs: Vec<DelegateJob> = Vec::with_capacity(delegates.len());
        for &id in delegates {
            if jobs.iter().any(|j| j.delegate == id) {
                continue;
            }
            let delegate = session
                .delegate(id)
                .ok_or_else(|| DomainError::UnknownDelegate(id.to_string()))?;
            if !delegate.is_active() {
                return Err(DomainError::InactiveDelegate(id.to_string()).into());
            }
            let context = session.phase_context(id, phase)?;
            let messages = PromptTemplate::messages(session.scenario(), &context);
            jobs.push(DelegateJob {
                delegate: id,
                phase,
                request: GenerationRequest::new(delegate.model.clone(), messages, credential),
            });
        }

        info!(
            "Phase {}: {} delegate(s), {}",
            phase.display_name(),
            jobs.len(),
            self.params.concurrency
        );
        self.progress.on_phase_start(phase, jobs.len());
        self.conversation_logger.log(ConversationEvent::new(
            "phase_started",
            json!({
                "phase": phase,
                "scenario": session.scenario(),
                "delegates": jobs.iter().map(|j| j.delegate).collect::<Vec<_>>(),
            }),
        ));

        match self.params.concurrency {
            Concurrency::Parallel => self.run_parallel(session, jobs, &active).await,
            Concurrency::Sequential => self.run_sequential(session, jobs, &active).await,
        }
    }

    /// All calls in flight at once; a failure does not stop the others
    async fn run_parallel(
        &self,
        session: &mut DebateSession,
        jobs: Vec<DelegateJob>,
        active: &[DelegateId],
    ) -> Result<(), RunPhaseError> {
        let policy = self.params.retry_policy();
        let mut join_set = JoinSet::new();
        let mut in_flight = HashMap::new();

        for job in jobs {
            self.start_job(session, &job)?;
            let seat = (job.delegate, job.phase, job.request.model.clone());
            let handle = join_set.spawn(Self::call_delegate(
                Arc::clone(&self.gateway),
                Arc::clone(&self.progress),
                policy,
                job,
            ));
            in_flight.insert(handle.id(), seat);
        }

        let mut first_error = None;
        loop {
            let result = if let Some(token) = &self.cancellation_token {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        join_set.abort_all();
                        return Err(RunPhaseError::Cancelled);
                    }
                    result = join_set.join_next_with_id() => result,
                }
            } else {
                join_set.join_next_with_id().await
            };

            let Some(result) = result else {
                break;
            };

            let committed = match result {
                Ok((id, call)) => {
                    in_flight.remove(&id);
                    self.commit(session, call, active)
                }
                Err(join_error) => match in_flight.remove(&join_error.id()) {
                    Some((delegate, phase, model)) => {
                        self.commit_join_error(session, delegate, phase, model, join_error)
                    }
                    None => {
                        warn!("Task join error for an unknown call: {}", join_error);
                        Ok(())
                    }
                },
            };
            if let Err(e) = committed
                && first_error.is_none()
            {
                first_error = Some(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// One call at a time in seat order; stops at the first failure
    async fn run_sequential(
        &self,
        session: &mut DebateSession,
        jobs: Vec<DelegateJob>,
        active: &[DelegateId],
    ) -> Result<(), RunPhaseError> {
        let policy = self.params.retry_policy();

        for job in jobs {
            self.start_job(session, &job)?;
            let (delegate, phase, model) = (job.delegate, job.phase, job.request.model.clone());
            let mut handle = tokio::spawn(Self::call_delegate(
                Arc::clone(&self.gateway),
                Arc::clone(&self.progress),
                policy,
                job,
            ));

            let outcome = self.until_cancelled(&mut handle).await;
            let joined = match outcome {
                Ok(joined) => joined,
                Err(e) => {
                    handle.abort();
                    return Err(e);
                }
            };
            match joined {
                Ok(call) => self.commit(session, call, active)?,
                Err(join_error) => {
                    self.commit_join_error(session, delegate, phase, model, join_error)?
                }
            }
        }
        Ok(())
    }

    fn start_job(&self, session: &mut DebateSession, job: &DelegateJob) -> Result<(), RunPhaseError> {
        session.mark_busy(job.delegate, job.phase)?;
        self.progress
            .on_delegate_start(job.phase, job.delegate, &job.request.model);
        self.conversation_logger.log(ConversationEvent::new(
            "delegate_request",
            json!({
                "delegate": job.delegate,
                "model": job.request.model,
                "phase": job.phase,
                "messages": job.request.messages,
            }),
        ));
        Ok(())
    }

    /// Call one delegate's model with retries. Never touches the session.
    async fn call_delegate(
        gateway: Arc<G>,
        progress: Arc<dyn DebateProgressNotifier>,
        policy: RetryPolicy,
        job: DelegateJob,
    ) -> DelegateCall {
        debug!(
            "{} calling {} for {}",
            job.delegate, job.request.model, job.phase
        );
        // Only the final attempt is timed
        let mut attempt_started = Instant::now();
        let mut attempts = 1;

        let result = call_with_retry(
            &policy,
            |failed, error| {
                attempts = failed + 1;
                progress.on_retry(job.delegate, failed, &error.to_string());
            },
            || {
                attempt_started = Instant::now();
                gateway.generate(&job.request)
            },
        )
        .await;

        DelegateCall {
            delegate: job.delegate,
            phase: job.phase,
            model: job.request.model,
            result,
            attempts,
            elapsed: attempt_started.elapsed(),
        }
    }

    // ==================== Commit ====================

    /// Write one delegate's result into the session
    fn commit(
        &self,
        session: &mut DebateSession,
        call: DelegateCall,
        active: &[DelegateId],
    ) -> Result<(), RunPhaseError> {
        let DelegateCall {
            delegate,
            phase,
            model,
            result,
            attempts,
            elapsed,
        } = call;
        let duration_ms = elapsed.as_millis() as u64;
        let stat = CallStatistic::new(model.clone(), phase, delegate)
            .with_duration_ms(duration_ms)
            .with_attempts(attempts);

        match result {
            Ok(generation) => {
                session.push_stat(
                    stat.with_tokens(generation.input_tokens, generation.output_tokens)
                        .with_cost(generation.cost),
                );
                let outcome = parse_phase_response(phase, &generation.text)?;
                let outcome = self.guard_target(delegate, outcome, Some(active));

                self.conversation_logger.log(ConversationEvent::new(
                    "delegate_response",
                    json!({
                        "delegate": delegate,
                        "model": model,
                        "phase": phase,
                        "attempts": attempts,
                        "duration_ms": duration_ms,
                        "text": generation.text,
                        "outcome": outcome,
                    }),
                ));

                session.record_outcome(delegate, outcome)?;
                info!(
                    "{} ({}) completed {} in {}ms",
                    delegate, model, phase, duration_ms
                );
                self.progress.on_delegate_complete(phase, delegate, true);
                Ok(())
            }
            Err(source) => {
                self.record_failure(
                    session,
                    stat,
                    format!("{} failed after {} attempt(s): {}", delegate, attempts, source),
                )?;
                Err(RunPhaseError::DelegateFailed {
                    delegate,
                    model,
                    source,
                })
            }
        }
    }

    /// A call whose task died (panicked or was aborted) still fails its delegate
    fn commit_join_error(
        &self,
        session: &mut DebateSession,
        delegate: DelegateId,
        phase: DebatePhase,
        model: ModelId,
        join_error: JoinError,
    ) -> Result<(), RunPhaseError> {
        let message = if join_error.is_panic() {
            "task panicked".to_string()
        } else {
            join_error.to_string()
        };
        let stat = CallStatistic::new(model.clone(), phase, delegate);
        self.record_failure(session, stat, format!("{} call {}", delegate, message))?;
        Err(RunPhaseError::DelegatePanicked {
            delegate,
            model,
            message,
        })
    }

    /// Failed stat, cleared busy flag, system log entry, transcript and progress
    fn record_failure(
        &self,
        session: &mut DebateSession,
        stat: CallStatistic,
        message: String,
    ) -> Result<(), RunPhaseError> {
        let (delegate, phase) = (stat.delegate, stat.phase);
        warn!("{} ({}) failed {}: {}", delegate, stat.model, phase, message);

        self.conversation_logger.log(ConversationEvent::new(
            "delegate_failed",
            json!({
                "delegate": delegate,
                "model": stat.model,
                "phase": phase,
                "attempts": stat.attempts,
                "error": message,
            }),
        ));
        session.push_stat(stat.failed());
        session.clear_busy(delegate)?;
        session.push_log(ActivityLogEntry::system(message).from_delegate(delegate));
        self.progress.on_delegate_complete(phase, delegate, false);
        Ok(())
    }

    /// Drop a target naming the caller itself or a seat outside `active`
    fn guard_target(
        &self,
        delegate: DelegateId,
        outcome: PhaseOutcome,
        active: Option<&[DelegateId]>,
    ) -> PhaseOutcome {
        if !self.params.strict_targets {
            return outcome;
        }
        let Some(target) = outcome.target() else {
            return outcome;
        };

        let reason = if target == delegate {
            "itself"
        } else if active.is_some_and(|ids| !ids.contains(&target)) {
            "an inactive seat"
        } else {
            return outcome;
        };
        warn!(
            "{} named {} ({}) in {}; target dropped",
            delegate,
            target,
            reason,
            outcome.phase()
        );
        outcome.without_target()
    }

    // ==================== Helpers ====================

    fn resolve_credential(&self, credential_override: Option<&str>) -> Result<String, RunPhaseError> {
        normalize_credential(credential_override)
            .or_else(|| normalize_credential(self.credentials.credential().as_deref()))
            .ok_or(RunPhaseError::CredentialMissing)
    }

    fn ensure_not_cancelled(&self) -> Result<(), RunPhaseError> {
        match &self.cancellation_token {
            Some(token) if token.is_cancelled() => Err(RunPhaseError::Cancelled),
            _ => Ok(()),
        }
    }

    async fn until_cancelled<T>(&self, future: impl Future<Output = T>) -> Result<T, RunPhaseError> {
        match &self.cancellation_token {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(RunPhaseError::Cancelled),
                output = future => Ok(output),
            },
            None => Ok(future.await),
        }
    }
}
