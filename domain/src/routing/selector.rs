//! Agent selection
//!
//! [`Selector`] turns a [`TaskProfile`] and caller preferences into a
//! [`RoutingDecision`] using the injected [`CapabilityMatrix`]. Selection is
//! pure: the same inputs against the same matrix give the same decision.

use super::agent::{AgentId, AgentProfile};
use super::decision::{Alternative, PickRule, RoutingDecision};
use super::matrix::CapabilityMatrix;
use super::preferences::RoutingPreferences;
use super::specialized::SpecializedMatch;
use crate::classification::TaskProfile;
use crate::classification::complexity::round2;
use crate::core::error::DomainError;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Maximum number of runner-ups reported in a decision
pub const MAX_ALTERNATIVES: usize = 2;

const BASE_CONFIDENCE: f64 = 0.6;
/// Added when the matrix cell had at least two viable candidates
const ROBUST_MATCH_BONUS: f64 = 0.2;
/// Subtracted per excluded agent ranked above the pick
const SKIP_PENALTY: f64 = 0.15;
const AFFINITY_WEIGHT: f64 = 0.1;

/// Rule-based agent selector
pub struct Selector {
    matrix: Arc<CapabilityMatrix>,
}

impl Selector {
    pub fn new(matrix: Arc<CapabilityMatrix>) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> &CapabilityMatrix {
        &self.matrix
    }

    /// Select an agent for a profile
    pub fn select(
        &self,
        profile: &TaskProfile,
        preferences: &RoutingPreferences,
    ) -> Result<RoutingDecision, DomainError> {
        self.select_with(profile, preferences, None)
    }

    /// Select an agent, annotating the decision with a detected specialized
    /// intent. The intent can change the recommended mode, never the agent.
    pub fn select_with(
        &self,
        profile: &TaskProfile,
        preferences: &RoutingPreferences,
        specialized: Option<&SpecializedMatch>,
    ) -> Result<RoutingDecision, DomainError> {
        if let Some(forced) = &preferences.forced_agent {
            return self.forced(forced, profile, preferences, specialized);
        }

        let ranked = self
            .matrix
            .candidates(profile.task_type, profile.complexity);
        let total = ranked.len();

        let viable: Vec<(usize, &AgentProfile)> = ranked
            .iter()
            .enumerate()
            .filter(|(_, id)| !preferences.is_excluded(id))
            .filter_map(|(rank, id)| self.matrix.agent(id).map(|agent| (rank, agent)))
            .collect();

        tracing::debug!(
            task_type = %profile.task_type,
            complexity = %profile.complexity,
            candidates = ?ranked,
            viable = viable.len(),
            "selecting agent"
        );

        let Some(&(_, leader)) = viable.first() else {
            let reasoning = if total == 0 {
                format!(
                    "capability matrix has no candidates for {}/{}",
                    profile.task_type, profile.complexity
                )
            } else {
                format!(
                    "all {} candidates excluded ({})",
                    total,
                    join_ids(ranked.iter())
                )
            };
            return Err(DomainError::NoAgentAvailable {
                task_type: profile.task_type,
                complexity: profile.complexity,
                reasoning,
            });
        };

        let mut ordered = viable.clone();
        if preferences.reorders() {
            // Stable: agents on the same tier keep their matrix order
            ordered.sort_by(|(_, a), (_, b)| compare_by_preference(a, b, preferences));
        }
        let (rank, agent) = ordered[0];

        let viable_above = viable.iter().filter(|(r, _)| *r < rank).count();
        let skipped = rank - viable_above;

        let pick_rule = if agent.id != leader.id {
            if preferences.prefer_speed && agent.speed != leader.speed {
                PickRule::SpeedPreference
            } else {
                PickRule::CostPreference
            }
        } else if skipped > 0 {
            PickRule::FallbackPastExclusions
        } else {
            PickRule::MatrixRank
        };

        let mut confidence = BASE_CONFIDENCE;
        if viable.len() >= 2 {
            confidence += ROBUST_MATCH_BONUS;
        }
        confidence -= SKIP_PENALTY * skipped as f64;
        confidence += AFFINITY_WEIGHT * agent.affinity_for(profile.task_type);
        let confidence = round2(confidence.clamp(0.0, 1.0));

        let alternatives = ordered[1..]
            .iter()
            .take(MAX_ALTERNATIVES)
            .map(|(r, a)| Alternative {
                agent: a.id.clone(),
                score: rank_score(*r, total),
            })
            .collect();

        let detail = match pick_rule {
            PickRule::SpeedPreference => format!(
                "{} is {}, matrix leader {} is {}",
                agent.id, agent.speed, leader.id, leader.speed
            ),
            PickRule::CostPreference => format!(
                "{} costs {}, matrix leader {} costs {}",
                agent.id, agent.cost, leader.id, leader.cost
            ),
            PickRule::FallbackPastExclusions => format!(
                "rank {} of {}, skipped {}",
                rank + 1,
                total,
                join_ids(ranked[..rank].iter().filter(|id| preferences.is_excluded(id)))
            ),
            _ => format!("rank {} of {}", rank + 1, total),
        };
        let reasoning = format!(
            "{}: {} selected by {} ({})",
            describe_profile(profile),
            agent.id,
            pick_rule,
            detail
        );

        Ok(build_decision(
            agent,
            confidence,
            reasoning,
            pick_rule,
            alternatives,
            profile,
            specialized,
        ))
    }

    fn forced(
        &self,
        forced: &AgentId,
        profile: &TaskProfile,
        preferences: &RoutingPreferences,
        specialized: Option<&SpecializedMatch>,
    ) -> Result<RoutingDecision, DomainError> {
        let agent = self
            .matrix
            .agent(forced)
            .ok_or_else(|| DomainError::UnknownAgent(forced.to_string()))?;

        let ranked = self
            .matrix
            .candidates(profile.task_type, profile.complexity);
        let alternatives = ranked
            .iter()
            .enumerate()
            .filter(|(_, id)| *id != forced && !preferences.is_excluded(id))
            .take(MAX_ALTERNATIVES)
            .map(|(rank, id)| Alternative {
                agent: id.clone(),
                score: rank_score(rank, ranked.len()),
            })
            .collect();

        let reasoning = format!(
            "{}: {} selected by {} (bypasses exclusions and matrix ranking)",
            describe_profile(profile),
            agent.id,
            PickRule::ForcedOverride
        );

        Ok(build_decision(
            agent,
            1.0,
            reasoning,
            PickRule::ForcedOverride,
            alternatives,
            profile,
            specialized,
        ))
    }
}

fn build_decision(
    agent: &AgentProfile,
    confidence: f64,
    mut reasoning: String,
    pick_rule: PickRule,
    alternatives: Vec<Alternative>,
    profile: &TaskProfile,
    specialized: Option<&SpecializedMatch>,
) -> RoutingDecision {
    let mut recommended_flags: BTreeMap<String, String> = agent.default_flags.clone();
    if let Some(model) = agent.model_for(profile.complexity) {
        recommended_flags.insert("model".to_string(), model.to_string());
    }

    let specialized_mode = specialized
        .map(|s| s.mode.as_str())
        .filter(|mode| agent.supports_mode(mode));
    let mode = specialized_mode.or_else(|| agent.mode_for(profile.task_type, profile.complexity));
    if let Some(mode) = mode {
        recommended_flags.insert("mode".to_string(), mode.to_string());
    }

    if let Some(specialized) = specialized {
        reasoning.push_str(&format!("; detected {} intent", specialized.name));
        if let Some(mode) = specialized_mode {
            reasoning.push_str(&format!(" (mode {})", mode));
        }
    }
    if profile.fallback {
        reasoning.push_str("; classification fell back to open_qa");
    }

    tracing::debug!(
        agent = %agent.id,
        confidence,
        rule = %pick_rule,
        "agent selected"
    );

    RoutingDecision {
        selected_agent: agent.id.clone(),
        confidence,
        reasoning,
        pick_rule,
        alternatives,
        recommended_flags,
        specialized_task: specialized.map(|s| s.name.clone()),
        task_profile: profile.clone(),
    }
}

/// Speed first when preferred, then cost
fn compare_by_preference(
    a: &AgentProfile,
    b: &AgentProfile,
    preferences: &RoutingPreferences,
) -> Ordering {
    let speed = if preferences.prefer_speed {
        a.speed.cmp(&b.speed)
    } else {
        Ordering::Equal
    };
    let cost = if preferences.prefer_cost {
        a.cost.cmp(&b.cost)
    } else {
        Ordering::Equal
    };
    speed.then(cost)
}

/// Inverted matrix rank scaled to (0, 1]
fn rank_score(rank: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2((total - rank) as f64 / total as f64)
}

fn describe_profile(profile: &TaskProfile) -> String {
    format!(
        "{} task with {} complexity",
        profile.task_type, profile.complexity
    )
}

fn join_ids<'a>(ids: impl Iterator<Item = &'a AgentId>) -> String {
    ids.map(AgentId::as_str).collect::<Vec<_>>().join(", ")
}
