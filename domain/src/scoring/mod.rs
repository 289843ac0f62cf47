//! Scoring engine — ranks participating models after a debate
//!
//! A pure function of the roster, the vote tally and the call statistics.
//! Each model gets four components, scaled against the best raw value in
//! the round:
//!
//! | Component | Weight | Raw metric |
//! |-----------|--------|------------|
//! | vote | 40 | votes received by all its seats |
//! | participation | 20 | artifacts produced (0-4 per seat) |
//! | quality | 20 | mean policy length, full marks at 200 chars |
//! | speed | 20 | mean call duration, fastest gets 20 |
//!
//! Models without any timed call get the full speed score. Ranks are the
//! 1-based sort position; equal scores still get distinct ranks.

mod performance;

pub use performance::{
    ModelPerformance, PARTICIPATION_WEIGHT, QUALITY_TARGET_CHARS, QUALITY_WEIGHT, SPEED_WEIGHT,
    VOTE_WEIGHT,
};

use crate::core::string::char_len;
use crate::debate::delegate::Delegate;
use crate::debate::stats::CallStatistic;
use crate::debate::tally::VoteTally;

/// Compute the ranked performance list for every assigned model.
pub fn score_models(
    delegates: &[Delegate],
    tally: &VoteTally,
    stats: &[CallStatistic],
) -> Vec<ModelPerformance> {
    let mut performances: Vec<ModelPerformance> = Vec::new();

    // Aggregate raw metrics per model, in order of first appearance
    for seat in delegates.iter().filter(|d| d.is_active()) {
        let index = match performances.iter().position(|p| p.model == seat.model) {
            Some(i) => i,
            None => {
                performances.push(ModelPerformance::new(seat.model.clone()));
                performances.len() - 1
            }
        };
        let perf = &mut performances[index];

        perf.seats.push(seat.id);
        perf.votes_received += tally.votes_for(seat.id);

        for stat in stats.iter().filter(|s| s.delegate == seat.id) {
            if let Some(duration) = stat.timed_duration() {
                perf.total_duration_ms += duration as f64;
            }
            perf.total_tokens += stat.total_tokens();
            perf.call_count += 1;
        }

        perf.participation += seat.participation();
    }

    for perf in performances.iter_mut() {
        if perf.call_count > 0 {
            perf.avg_duration_ms = perf.total_duration_ms / perf.call_count as f64;
        }

        let policy_lengths: Vec<usize> = delegates
            .iter()
            .filter(|d| d.model == perf.model)
            .filter_map(|d| d.policy.as_deref())
            .filter(|p| !p.is_empty())
            .map(char_len)
            .collect();
        if !policy_lengths.is_empty() {
            perf.avg_policy_chars =
                policy_lengths.iter().sum::<usize>() as f64 / policy_lengths.len() as f64;
        }
    }

    let max_votes = performances
        .iter()
        .map(|p| p.votes_received)
        .max()
        .unwrap_or(0)
        .max(1) as f64;
    let max_participation = performances
        .iter()
        .map(|p| p.participation)
        .max()
        .unwrap_or(0)
        .max(1) as f64;

    let timed: Vec<f64> = performances
        .iter()
        .map(|p| p.avg_duration_ms)
        .filter(|d| *d > 0.0)
        .collect();
    let fastest = timed.iter().copied().fold(f64::INFINITY, f64::min);
    let slowest = timed.iter().copied().fold(0.0, f64::max);

    for perf in performances.iter_mut() {
        perf.vote_score = perf.votes_received as f64 / max_votes * VOTE_WEIGHT;
        perf.participation_score = perf.participation as f64 / max_participation * PARTICIPATION_WEIGHT;
        perf.quality_score =
            (perf.avg_policy_chars / QUALITY_TARGET_CHARS * QUALITY_WEIGHT).min(QUALITY_WEIGHT);

        perf.speed_score = if !timed.is_empty() && perf.is_timed() && slowest > fastest {
            (slowest - perf.avg_duration_ms) / (slowest - fastest) * SPEED_WEIGHT
        } else {
            SPEED_WEIGHT
        };

        perf.final_score =
            perf.vote_score + perf.participation_score + perf.quality_score + perf.speed_score;
    }

    // Stable sort keeps seat order among equal scores
    performances.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
    for (index, perf) in performances.iter_mut().enumerate() {
        perf.rank = index + 1;
    }

    performances
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::ModelId;
    use crate::debate::delegate::{Ballot, Critique, DelegateId};
    use crate::debate::phase::DebatePhase;

    fn id(n: u8) -> DelegateId {
        DelegateId::new(n).unwrap()
    }

    fn seat(n: u8, model: &str, policy: &str) -> Delegate {
        let mut d = Delegate::new(id(n));
        d.model = ModelId::new(model);
        d.policy = Some(policy.to_string());
        d
    }

    fn stat(n: u8, model: &str, duration: u64) -> CallStatistic {
        CallStatistic::new(ModelId::new(model), DebatePhase::Proposal, id(n))
            .with_duration_ms(duration)
    }

    fn find<'a>(perfs: &'a [ModelPerformance], model: &str) -> &'a ModelPerformance {
        perfs.iter().find(|p| p.model.as_str() == model).unwrap()
    }

    #[test]
    fn test_faster_model_scores_higher_speed() {
        let roster = vec![seat(1, "a/fast", "same"), seat(2, "b/slow", "same")];
        let stats = vec![
            stat(1, "a/fast", 10),
            stat(1, "a/fast", 20),
            stat(2, "b/slow", 30),
            stat(2, "b/slow", 40),
        ];
        let perfs = score_models(&roster, &VoteTally::default(), &stats);

        let fast = find(&perfs, "a/fast");
        let slow = find(&perfs, "b/slow");
        assert_eq!(fast.avg_duration_ms, 15.0);
        assert_eq!(slow.avg_duration_ms, 35.0);
        assert!(fast.speed_score > slow.speed_score);
        assert_eq!(fast.speed_score, 20.0);
        assert_eq!(slow.speed_score, 0.0);
        assert_eq!(fast.rank, 1);
    }

    #[test]
    fn test_untimed_round_gets_full_speed() {
        let roster = vec![seat(1, "a/x", "p"), seat(2, "b/y", "p")];
        let stats = vec![stat(1, "a/x", 0), stat(2, "b/y", 0)];
        let perfs = score_models(&roster, &VoteTally::default(), &stats);
        assert!(perfs.iter().all(|p| p.speed_score == 20.0));
    }

    #[test]
    fn test_untimed_model_among_timed_gets_full_speed() {
        let roster = vec![seat(1, "a/x", "p"), seat(2, "b/y", "p"), seat(3, "c/z", "p")];
        let stats = vec![stat(1, "a/x", 100), stat(2, "b/y", 300)];
        let perfs = score_models(&roster, &VoteTally::default(), &stats);
        assert_eq!(find(&perfs, "c/z").speed_score, 20.0);
        assert_eq!(find(&perfs, "b/y").speed_score, 0.0);
    }

    #[test]
    fn test_average_counts_untimed_calls() {
        let roster = vec![seat(1, "a/x", "p")];
        let stats = vec![stat(1, "a/x", 100), stat(1, "a/x", 0)];
        let perfs = score_models(&roster, &VoteTally::default(), &stats);
        assert_eq!(perfs[0].total_duration_ms, 100.0);
        assert_eq!(perfs[0].call_count, 2);
        assert_eq!(perfs[0].avg_duration_ms, 50.0);
    }

    #[test]
    fn test_seats_sharing_a_model_are_aggregated() {
        let mut roster = vec![
            seat(1, "a/x", &"x".repeat(100)),
            seat(2, "a/x", &"x".repeat(300)),
            seat(3, "b/y", &"y".repeat(50)),
        ];
        roster[2].ballot = Some(Ballot {
            target: Some(id(1)),
            explanation: None,
        });
        roster[0].ballot = Some(Ballot {
            target: Some(id(2)),
            explanation: None,
        });
        let tally = VoteTally::from_delegates(&roster);
        let stats = vec![
            stat(1, "a/x", 10).with_tokens(Some(5), Some(7)),
            stat(2, "a/x", 10).with_tokens(Some(1), None),
        ];

        let perfs = score_models(&roster, &tally, &stats);
        assert_eq!(perfs.len(), 2);

        let shared = find(&perfs, "a/x");
        assert_eq!(shared.seats, vec![id(1), id(2)]);
        assert_eq!(shared.votes_received, 2);
        assert_eq!(shared.total_tokens, 13);
        assert_eq!(shared.avg_policy_chars, 200.0);
        assert_eq!(shared.quality_score, 20.0);
        assert_eq!(shared.vote_score, 40.0);
        assert_eq!(shared.provider, "a");

        let other = find(&perfs, "b/y");
        assert_eq!(other.vote_score, 0.0);
        assert_eq!(other.quality_score, 5.0);
    }

    #[test]
    fn test_participation_scaled_to_best() {
        let mut roster = vec![seat(1, "a/x", "p"), seat(2, "b/y", "p")];
        roster[0].critique = Some(Critique {
            target: Some(id(2)),
            message: "m".to_string(),
        });
        roster[0].refactored_policy = Some("r".to_string());
        roster[0].ballot = Some(Ballot {
            target: Some(id(2)),
            explanation: None,
        });
        let perfs = score_models(&roster, &VoteTally::default(), &[]);
        assert_eq!(find(&perfs, "a/x").participation, 4);
        assert_eq!(find(&perfs, "a/x").participation_score, 20.0);
        assert_eq!(find(&perfs, "b/y").participation_score, 5.0);
    }

    #[test]
    fn test_ties_get_consecutive_ranks() {
        let roster = vec![seat(1, "a/x", "p"), seat(2, "b/y", "p")];
        let perfs = score_models(&roster, &VoteTally::default(), &[]);
        assert_eq!(perfs[0].final_score, perfs[1].final_score);
        assert_eq!(perfs[0].rank, 1);
        assert_eq!(perfs[1].rank, 2);
        assert_eq!(perfs[0].model.as_str(), "a/x");
    }

    #[test]
    fn test_inactive_seats_ignored() {
        let mut roster = vec![seat(1, "a/x", "p"), Delegate::new(id(2))];
        roster[1].policy = None;
        let perfs = score_models(&roster, &VoteTally::default(), &[]);
        assert_eq!(perfs.len(), 1);
    }

    #[test]
    fn test_empty_roster() {
        assert!(score_models(&[], &VoteTally::default(), &[]).is_empty());
    }
}
