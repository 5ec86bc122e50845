use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{AgentAnalytics, CallRecord, Recommendations};

/// Write call records as a pretty-printed JSON array
pub fn write_calls_json(calls: &[CallRecord], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, calls).context("Failed to write JSON")?;
    Ok(())
}

/// Text width of a coaching nudge, excluding its bullet
const NUDGE_WIDTH: usize = 76;

/// Human-readable view of one call's recommendations
pub struct RecommendationReport<'a> {
    call_id: &'a str,
    recommendations: &'a Recommendations,
}

impl<'a> RecommendationReport<'a> {
    pub fn new(call_id: &'a str, recommendations: &'a Recommendations) -> Self {
        Self {
            call_id,
            recommendations,
        }
    }

    pub fn format(&self) -> String {
        let mut output = format!("Recommendations for {}\n\n", self.call_id);

        output.push_str("Similar calls:\n");
        if self.recommendations.similar_calls.is_empty() {
            output.push_str("  (none)\n");
        }
        for (rank, similar) in self.recommendations.similar_calls.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {} (agent {}) similarity {:.3}, sentiment {}\n",
                rank + 1,
                similar.call_id,
                similar.agent_id,
                similar.similarity,
                format_optional(similar.sentiment),
            ));
        }

        output.push_str("\nCoaching:\n");
        for nudge in &self.recommendations.coaching_nudges {
            for (i, line) in wrap_words(nudge, NUDGE_WIDTH).iter().enumerate() {
                let bullet = if i == 0 { "  - " } else { "    " };
                output.push_str(bullet);
                output.push_str(line);
                output.push('\n');
            }
        }

        output
    }

    /// Write the formatted report to `out`
    pub fn write_to(&self, out: &mut impl Write) -> Result<()> {
        write!(out, "{}", self.format()).context("Failed to write report")?;
        Ok(())
    }
}

/// Fixed-width table of per-agent analytics
pub fn format_leaderboard(rows: &[AgentAnalytics]) -> String {
    let mut output = format!(
        "{:<16} {:>13} {:>14} {:>7}\n",
        "agent", "avg_sentiment", "avg_talk_ratio", "calls"
    );
    for row in rows {
        output.push_str(&format!(
            "{:<16} {:>13.3} {:>14.3} {:>7}\n",
            row.agent_id, row.avg_sentiment, row.avg_talk_ratio, row.total_calls
        ));
    }
    output
}

fn format_optional(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.3}", v))
        .unwrap_or_else(|| "n/a".to_string())
}

/// Greedy word wrap; a single word longer than `width` gets its own line
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for word in text.split_whitespace() {
        let fits = |line: &&mut String| line.len() + 1 + word.len() <= width;
        if let Some(line) = lines.last_mut().filter(fits) {
            line.push(' ');
            line.push_str(word);
        } else {
            lines.push(word.to_string());
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::load_calls;
    use crate::models::SimilarCall;

    #[test]
    fn test_report_lists_calls_and_nudges() {
        let recommendations = Recommendations {
            similar_calls: vec![SimilarCall {
                call_id: "c2".to_string(),
                similarity: 0.91234,
                agent_id: "a7".to_string(),
                sentiment: None,
            }],
            coaching_nudges: vec!["Ask open-ended questions.".to_string()],
        };

        let text = RecommendationReport::new("c1", &recommendations).format();

        assert!(text.starts_with("Recommendations for c1"));
        assert!(text.contains("1. c2 (agent a7) similarity 0.912, sentiment n/a"));
        assert!(text.contains("  - Ask open-ended questions."));
    }

    #[test]
    fn test_report_without_similar_calls() {
        let recommendations = Recommendations {
            similar_calls: vec![],
            coaching_nudges: vec![],
        };
        let text = RecommendationReport::new("c1", &recommendations).format();
        assert!(text.contains("(none)"));
    }

    #[test]
    fn test_format_leaderboard() {
        let rows = vec![AgentAnalytics {
            agent_id: "agent_1".to_string(),
            avg_sentiment: 0.5,
            avg_talk_ratio: 0.25,
            total_calls: 4,
        }];
        let table = format_leaderboard(&rows);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("agent_1"));
        assert!(lines[1].contains("0.500"));
        assert!(lines[1].contains("0.250"));
    }

    #[test]
    fn test_write_calls_json_round_trip() {
        let json = r#"[{
            "call_id": "c1",
            "agent_id": "a1",
            "customer_id": "u1",
            "start_time": "2024-05-01T09:00:00Z",
            "duration_seconds": 60,
            "transcript": "Agent: Hi",
            "agent_talk_ratio": 1.0
        }]"#;
        let calls = crate::io::parse_calls_json(json).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calls.json");

        write_calls_json(&calls, &path).unwrap();
        let reloaded = load_calls(&path).unwrap();

        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded[0].id, calls[0].id);
        assert_eq!(reloaded[0].agent_talk_ratio, Some(1.0));
    }

    #[test]
    fn test_long_nudges_are_wrapped() {
        let nudge = "Acknowledge the customer's frustration before moving to a fix, then restate \
                     the problem in your own words so they know you heard them and confirm the \
                     next step before ending the call.";
        let recommendations = Recommendations {
            similar_calls: vec![],
            coaching_nudges: vec![nudge.to_string()],
        };

        let text = RecommendationReport::new("c1", &recommendations).format();
        let coaching: Vec<&str> = text
            .lines()
            .skip_while(|line| *line != "Coaching:")
            .skip(1)
            .collect();

        assert!(coaching.len() > 1);
        assert!(coaching[0].starts_with("  - Acknowledge"));
        for line in &coaching {
            assert!(line.len() <= NUDGE_WIDTH + 4, "line too long: {:?}", line);
        }
        for line in &coaching[1..] {
            assert!(line.starts_with("    ") && !line.starts_with("     "));
        }

        let rejoined: Vec<&str> = coaching
            .iter()
            .flat_map(|line| line.trim_start_matches("  - ").split_whitespace())
            .collect();
        assert_eq!(rejoined.join(" "), nudge);
    }
}
