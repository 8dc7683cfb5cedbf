use crate::{Reply, ReplyOrigin};

/// Phrases that indicate possible self-harm risk.
pub const CRISIS_KEYWORDS: &[&str] = &[
    "suicide",
    "suicidal",
    "kill myself",
    "end my life",
    "want to die",
    "self-harm",
    "hurt myself",
];

/// India mental health helplines (24/7, toll-free).
pub const CRISIS_MESSAGE: &str = "I'm concerned about what you've shared. If you're in crisis, please reach out immediately. \
India helplines (24/7, toll-free): \
Tele-MANAS: 14416 or 1800-89-14416 | \
Hello! Lifeline: 1800-121-3667 | \
KIRAN: 1800-599-0019 | \
Vandrevala Foundation: 1860-2662-345 / 1800-2333-330";

pub const CRISIS_SUGGESTIONS: [&str; 3] = [
    "Call Tele-MANAS 14416",
    "Call KIRAN 1800-599-0019",
    "Reach out to someone you trust",
];

pub fn is_crisis(message: &str) -> bool {
    let lower = message.to_lowercase();
    CRISIS_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// The fixed safety reply, if `message` mentions self-harm.
pub fn check(message: &str) -> Option<Reply> {
    is_crisis(message).then(|| Reply::new(CRISIS_MESSAGE.to_string(), &CRISIS_SUGGESTIONS, ReplyOrigin::Crisis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_keywords_case_insensitively() {
        assert!(is_crisis("I want to kill myself"));
        assert!(is_crisis("Thinking about SUICIDE lately"));
        assert!(is_crisis("sometimes I want to die."));
        assert!(is_crisis("I've been having thoughts of self-harm"));
    }

    #[test]
    fn ordinary_messages_pass() {
        assert!(!is_crisis("I feel so anxious today"));
        assert!(!is_crisis("my exam killed me"));
    }

    #[test]
    fn crisis_reply_carries_helplines() {
        let reply = check("I want to end my life").unwrap();
        assert_eq!(reply.text, CRISIS_MESSAGE);
        assert_eq!(reply.suggestions, CRISIS_SUGGESTIONS);
        assert_eq!(reply.origin, ReplyOrigin::Crisis);
        assert!(reply.text.contains("Tele-MANAS"));
    }
}
