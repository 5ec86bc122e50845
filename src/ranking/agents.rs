use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::{AgentAnalytics, CallRecord};

#[derive(Default)]
struct Tally {
    sentiment_sum: f64,
    sentiment_count: usize,
    talk_ratio_sum: f64,
    talk_ratio_count: usize,
    calls: usize,
}

impl Tally {
    fn mean(sum: f64, count: usize) -> Option<f64> {
        (count > 0).then(|| sum / count as f64)
    }
}

/// Aggregate stored signals per agent, best average sentiment first
///
/// Calls without a signal do not count towards that signal's average.
/// Agents with no sentiment at all are listed last and report 0.0.
pub fn agent_leaderboard(records: &[CallRecord]) -> Vec<AgentAnalytics> {
    let mut tallies: BTreeMap<&str, Tally> = BTreeMap::new();

    for record in records {
        let tally = tallies.entry(record.agent_id.as_str()).or_default();
        tally.calls += 1;
        if let Some(sentiment) = record.customer_sentiment_score {
            tally.sentiment_sum += sentiment;
            tally.sentiment_count += 1;
        }
        if let Some(ratio) = record.agent_talk_ratio {
            tally.talk_ratio_sum += ratio;
            tally.talk_ratio_count += 1;
        }
    }

    let mut rows: Vec<(Option<f64>, AgentAnalytics)> = tallies
        .into_iter()
        .map(|(agent_id, tally)| {
            let avg_sentiment = Tally::mean(tally.sentiment_sum, tally.sentiment_count);
            let avg_talk_ratio = Tally::mean(tally.talk_ratio_sum, tally.talk_ratio_count);
            (
                avg_sentiment,
                AgentAnalytics {
                    agent_id: agent_id.to_string(),
                    avg_sentiment: avg_sentiment.unwrap_or(0.0),
                    avg_talk_ratio: avg_talk_ratio.unwrap_or(0.0),
                    total_calls: tally.calls,
                },
            )
        })
        .collect();

    // Rows arrive sorted by agent_id, and the stable sort keeps that for ties
    rows.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    rows.into_iter().map(|(_, row)| row).collect()
}
