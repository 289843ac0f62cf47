//! Debate session — the single owner of all mutable debate state
//!
//! The session holds the roster, the current phase, the activity log and the
//! call statistics. Derived views ([`tally`](DebateSession::tally),
//! [`winner`](DebateSession::winner), [`performance`](DebateSession::performance))
//! are recomputed from owned state on every read.

use super::activity::{ActivityLogEntry, LogCategory};
use super::context::{DelegatePolicy, PhaseContext, PhaseOutcome, ReceivedCritique};
use super::delegate::{Ballot, Critique, Delegate, DelegateId};
use super::phase::DebatePhase;
use super::stats::CallStatistic;
use super::tally::VoteTally;
use crate::core::error::DomainError;
use crate::core::model::ModelId;
use crate::scoring::{ModelPerformance, score_models};
use serde::Serialize;

/// Session state store for one debate
#[derive(Debug, Clone, Serialize)]
pub struct DebateSession {
    delegates: Vec<Delegate>,
    scenario: String,
    phase: DebatePhase,
    running: bool,
    activity: Vec<ActivityLogEntry>,
    stats: Vec<CallStatistic>,
}

impl Default for DebateSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DebateSession {
    /// A session with the full roster of empty seats
    pub fn new() -> Self {
        Self {
            delegates: DelegateId::all().map(Delegate::new).collect(),
            scenario: String::new(),
            phase: DebatePhase::Setup,
            running: false,
            activity: Vec::new(),
            stats: Vec::new(),
        }
    }

    /// Seat models in table order: the first model goes to D1, and so on
    pub fn with_models(models: impl IntoIterator<Item = ModelId>) -> Self {
        let mut session = Self::new();
        for (delegate, model) in session.delegates.iter_mut().zip(models) {
            delegate.model = model;
        }
        session
    }

    pub fn with_scenario(mut self, scenario: impl Into<String>) -> Self {
        self.set_scenario(scenario);
        self
    }

    // ==================== Accessors ====================

    pub fn delegates(&self) -> &[Delegate] {
        &self.delegates
    }

    pub fn delegate(&self, id: DelegateId) -> Option<&Delegate> {
        self.delegates.iter().find(|d| d.id == id)
    }

    pub fn active_delegates(&self) -> impl Iterator<Item = &Delegate> {
        self.delegates.iter().filter(|d| d.is_active())
    }

    pub fn active_ids(&self) -> Vec<DelegateId> {
        self.active_delegates().map(|d| d.id).collect()
    }

    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    pub fn phase(&self) -> DebatePhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn activity_log(&self) -> &[ActivityLogEntry] {
        &self.activity
    }

    pub fn call_stats(&self) -> &[CallStatistic] {
        &self.stats
    }

    // ==================== Derived views ====================

    pub fn tally(&self) -> VoteTally {
        VoteTally::from_delegates(&self.delegates)
    }

    pub fn winner(&self) -> Option<DelegateId> {
        self.tally().winner()
    }

    pub fn performance(&self) -> Vec<ModelPerformance> {
        score_models(&self.delegates, &self.tally(), &self.stats)
    }

    // ==================== Setup ====================

    pub fn set_scenario(&mut self, scenario: impl Into<String>) {
        self.scenario = scenario.into().trim().to_string();
    }

    /// Assign a model to a seat; a blank model clears the seat's artifacts
    pub fn assign_model(&mut self, id: DelegateId, model: ModelId) -> Result<(), DomainError> {
        let delegate = self.delegate_mut(id)?;
        delegate.model = model;
        if !delegate.is_active() {
            delegate.clear_artifacts();
        }
        Ok(())
    }

    pub fn clear_model(&mut self, id: DelegateId) -> Result<(), DomainError> {
        self.assign_model(id, ModelId::unassigned())
    }

    // ==================== Phase transitions ====================

    /// Enter an action phase.
    ///
    /// Only the next phase in order may be entered. Re-entering the current
    /// action phase is allowed so failed delegates can be retried.
    pub fn begin_phase(&mut self, phase: DebatePhase) -> Result<(), DomainError> {
        if !phase.is_action_phase() {
            return Err(DomainError::NotAnActionPhase(phase));
        }
        let retry = phase == self.phase;
        if !retry && self.phase.next() != Some(phase) {
            return Err(DomainError::InvalidTransition {
                from: self.phase,
                to: phase,
            });
        }
        if phase == DebatePhase::Proposal && self.scenario.is_empty() {
            return Err(DomainError::EmptyScenario);
        }
        if self.active_delegates().next().is_none() {
            return Err(DomainError::NoActiveDelegates);
        }

        self.phase = phase;
        self.running = true;
        if !retry {
            self.push_log(ActivityLogEntry::system(format!(
                "Phase started: {}",
                phase.display_name()
            )));
        }
        Ok(())
    }

    /// Move from voting to results and announce the outcome
    pub fn finish(&mut self) -> Result<Option<DelegateId>, DomainError> {
        if self.phase != DebatePhase::Vote {
            return Err(DomainError::InvalidTransition {
                from: self.phase,
                to: DebatePhase::Results,
            });
        }
        self.phase = DebatePhase::Results;
        self.running = false;
        self.clear_all_busy();

        let tally = self.tally();
        let winner = tally.winner();
        let message = match winner {
            Some(id) => format!("{} wins with {} vote(s)", id, tally.votes_for(id)),
            None if tally.is_empty() => "No votes were cast".to_string(),
            None => format!(
                "Tie between {}",
                tally
                    .leaders()
                    .iter()
                    .map(|d| d.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        };
        self.push_log(ActivityLogEntry::new(LogCategory::Result, message).targeting(winner));
        Ok(winner)
    }

    /// The phase run is over (all delegates answered or one failed)
    pub fn end_phase(&mut self) {
        self.running = false;
        self.clear_all_busy();
    }

    /// Abandon the running phase: clears running and busy flags
    pub fn stop(&mut self) {
        if self.running {
            self.push_log(ActivityLogEntry::system("Debate stopped"));
        }
        self.running = false;
        self.clear_all_busy();
    }

    /// Back to setup: artifacts, log and statistics are wiped; models stay
    pub fn reset(&mut self) {
        for delegate in &mut self.delegates {
            delegate.clear_artifacts();
        }
        self.phase = DebatePhase::Setup;
        self.running = false;
        self.activity.clear();
        self.stats.clear();
    }

    // ==================== Prompt context ====================

    /// Snapshot of what `id` needs to see in `phase`
    pub fn phase_context(
        &self,
        id: DelegateId,
        phase: DebatePhase,
    ) -> Result<PhaseContext, DomainError> {
        let me = self.delegate(id).ok_or_else(|| DomainError::UnknownDelegate(id.to_string()))?;
        let others = self.active_delegates().filter(|d| d.id != id);

        Ok(match phase {
            DebatePhase::Proposal => PhaseContext::Proposal,
            DebatePhase::Critique => PhaseContext::Critique {
                policies: others
                    .filter_map(|d| {
                        d.policy.as_ref().filter(|p| !p.is_empty()).map(|p| DelegatePolicy {
                            delegate: d.id,
                            policy: p.clone(),
                        })
                    })
                    .collect(),
            },
            DebatePhase::Refactor => PhaseContext::Refactor {
                original_policy: me.policy.clone().unwrap_or_default(),
                critiques: others
                    .filter_map(|d| {
                        d.critique
                            .as_ref()
                            .filter(|c| c.target == Some(id))
                            .map(|c| ReceivedCritique {
                                from: d.id,
                                message: c.message.clone(),
                            })
                    })
                    .collect(),
            },
            DebatePhase::Vote => PhaseContext::Vote {
                policies: others
                    .filter_map(|d| {
                        d.latest_policy().map(|p| DelegatePolicy {
                            delegate: d.id,
                            policy: p.to_string(),
                        })
                    })
                    .collect(),
            },
            other => return Err(DomainError::NotAnActionPhase(other)),
        })
    }

    // ==================== Delegate writes ====================

    pub fn mark_busy(&mut self, id: DelegateId, phase: DebatePhase) -> Result<(), DomainError> {
        let delegate = self.delegate_mut(id)?;
        if !delegate.is_active() {
            return Err(DomainError::InactiveDelegate(id.to_string()));
        }
        delegate.busy = Some(phase);
        Ok(())
    }

    pub fn clear_busy(&mut self, id: DelegateId) -> Result<(), DomainError> {
        self.delegate_mut(id)?.busy = None;
        Ok(())
    }

    pub fn record_proposal(&mut self, id: DelegateId, policy: impl Into<String>) -> Result<(), DomainError> {
        self.active_delegate_mut(id)?.policy = Some(policy.into());
        Ok(())
    }

    pub fn record_refactor(&mut self, id: DelegateId, policy: impl Into<String>) -> Result<(), DomainError> {
        self.active_delegate_mut(id)?.refactored_policy = Some(policy.into());
        Ok(())
    }

    pub fn record_critique(
        &mut self,
        id: DelegateId,
        target: Option<DelegateId>,
        message: impl Into<String>,
    ) -> Result<(), DomainError> {
        self.active_delegate_mut(id)?.critique = Some(Critique {
            target,
            message: message.into(),
        });
        Ok(())
    }

    pub fn record_ballot(
        &mut self,
        id: DelegateId,
        target: Option<DelegateId>,
        explanation: Option<String>,
    ) -> Result<(), DomainError> {
        self.active_delegate_mut(id)?.ballot = Some(Ballot {
            target,
            explanation,
        });
        Ok(())
    }

    /// Commit one delegate's phase result: artifact, activity entry, busy flag
    pub fn record_outcome(&mut self, id: DelegateId, outcome: PhaseOutcome) -> Result<(), DomainError> {
        let entry = match outcome {
            PhaseOutcome::Proposal { policy } => {
                self.record_proposal(id, policy.clone())?;
                ActivityLogEntry::new(LogCategory::Proposal, policy)
            }
            PhaseOutcome::Critique { target, critique } => {
                self.record_critique(id, target, critique.clone())?;
                let category = if critique.trim_end().ends_with('?') {
                    LogCategory::Question
                } else {
                    LogCategory::Critique
                };
                ActivityLogEntry::new(category, critique).targeting(target)
            }
            PhaseOutcome::Refactor { policy } => {
                self.record_refactor(id, policy.clone())?;
                ActivityLogEntry::new(LogCategory::Proposal, policy)
            }
            PhaseOutcome::Vote { vote, explanation } => {
                let explanation = Some(explanation).filter(|e| !e.is_empty());
                self.record_ballot(id, vote, explanation.clone())?;
                let message = match vote {
                    Some(target) => explanation.unwrap_or_else(|| format!("Voted for {}", target)),
                    None => explanation.unwrap_or_else(|| "Abstained".to_string()),
                };
                ActivityLogEntry::new(LogCategory::Vote, message).targeting(vote)
            }
        };
        self.push_log(entry.from_delegate(id));
        self.clear_busy(id)
    }

    pub fn push_log(&mut self, entry: ActivityLogEntry) {
        self.activity.push(entry);
    }

    pub fn push_stat(&mut self, stat: CallStatistic) {
        self.stats.push(stat);
    }

    // ==================== Internals ====================

    fn delegate_mut(&mut self, id: DelegateId) -> Result<&mut Delegate, DomainError> {
        self.delegates
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| DomainError::UnknownDelegate(id.to_string()))
    }

    fn active_delegate_mut(&mut self, id: DelegateId) -> Result<&mut Delegate, DomainError> {
        let delegate = self.delegate_mut(id)?;
        if !delegate.is_active() {
            return Err(DomainError::InactiveDelegate(id.to_string()));
        }
        Ok(delegate)
    }

    fn clear_all_busy(&mut self) {
        for delegate in &mut self.delegates {
            delegate.busy = None;
        }
    }
}
