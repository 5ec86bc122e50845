/// Transcript text split by speaker
///
/// Derived on demand from the raw transcript and never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeakerText {
    /// Everything said on `Agent:` lines, space-joined
    pub agent: String,
    /// Everything said on `Customer:` lines, space-joined
    pub customer: String,
}

const AGENT_PREFIX: &str = "Agent:";
const CUSTOMER_PREFIX: &str = "Customer:";

/// Split a raw transcript into agent and customer text
///
/// Each line is trimmed; `Agent:` and `Customer:` lines contribute their
/// remainder to the matching speaker, every other line is ignored.
pub fn parse_transcript(transcript: &str) -> SpeakerText {
    let mut agent = Vec::new();
    let mut customer = Vec::new();

    for line in transcript.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix(AGENT_PREFIX) {
            agent.push(rest.trim());
        } else if let Some(rest) = line.strip_prefix(CUSTOMER_PREFIX) {
            customer.push(rest.trim());
        }
    }

    SpeakerText {
        agent: agent.join(" "),
        customer: customer.join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transcript() {
        let speakers = parse_transcript(
            "Agent: Hello there how are you\nCustomer: I am doing well thanks\nAgent: Great!",
        );

        assert_eq!(speakers.agent, "Hello there how are you Great!");
        assert_eq!(speakers.customer, "I am doing well thanks");
    }

    #[test]
    fn test_unlabeled_lines_are_ignored() {
        let speakers = parse_transcript(
            "[call started]\n  Agent:   Thanks for calling  \nSupervisor: listening in\nagent: lowercase label\nCustomer:hi",
        );

        assert_eq!(speakers.agent, "Thanks for calling");
        assert_eq!(speakers.customer, "hi");
    }

    #[test]
    fn test_windows_line_endings() {
        let speakers = parse_transcript("Agent: one\r\nCustomer: two\r\n");
        assert_eq!(speakers.agent, "one");
        assert_eq!(speakers.customer, "two");
    }

    #[test]
    fn test_empty_transcript() {
        assert_eq!(parse_transcript(""), SpeakerText::default());
        assert_eq!(parse_transcript("Agent:\nCustomer:   "), SpeakerText::default());
    }
}
