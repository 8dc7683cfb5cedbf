//! Locally computed replies for when no provider answers.

use rand::Rng;

use crate::topics::Topic;
use crate::{Reply, ReplyOrigin};

/// Wrappers that echo part of the user's message back before the template.
pub const REFLECTION_PREFIXES: [&str; 3] = ["You shared that {} — ", "It sounds like {} — ", "Hearing that {} — "];

const REFLECTION_MIN_CHARS: usize = 10;
const REFLECTION_MAX_WORDS: usize = 8;

/// Short lowercase phrase taken from the first clause of `message`, or
/// `None` when the message is too short to reflect meaningfully.
pub fn short_reflection(message: &str) -> Option<String> {
    let message = message.trim();
    if message.chars().count() < REFLECTION_MIN_CHARS {
        return None;
    }

    let first = message.split(['.', '!', '?']).next().unwrap_or_default().trim();
    let words: Vec<&str> = first.split_whitespace().take(REFLECTION_MAX_WORDS).collect();
    if words.len() < 2 {
        return None;
    }

    Some(words.join(" ").to_lowercase())
}

/// Builds a templated reply for `message`, drawing all randomness from `rng`.
pub fn synthesize<R: Rng + ?Sized>(message: &str, rng: &mut R) -> Reply {
    let topic = Topic::detect(message);
    let pool = topic.responses();
    let base = pool[rng.random_range(0..pool.len())];

    // The coin is only flipped when there is something to reflect.
    let text = match short_reflection(message) {
        Some(reflection) if rng.random_bool(0.5) => {
            let prefix = REFLECTION_PREFIXES[rng.random_range(0..REFLECTION_PREFIXES.len())];
            format!("{}{}", prefix.replacen("{}", &reflection, 1), base)
        }
        _ => base.to_string(),
    };

    Reply::new(text, topic.suggestions(), ReplyOrigin::Fallback(topic))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn reflection_takes_first_clause() {
        assert_eq!(
            short_reflection("I Have Been Feeling Low. Work is hard").as_deref(),
            Some("i have been feeling low")
        );
        assert_eq!(short_reflection("Why does this keep happening? Ugh").as_deref(), Some("why does this keep happening"));
    }

    #[test]
    fn reflection_caps_word_count() {
        let reflection = short_reflection("one two three four five six seven eight nine ten").unwrap();
        assert_eq!(reflection, "one two three four five six seven eight");
    }

    #[test]
    fn reflection_needs_enough_text() {
        assert_eq!(short_reflection("   hi there "), None);
        assert_eq!(short_reflection("Overwhelmed!!!!!"), None);
        assert_eq!(short_reflection("Hmm. I feel off today"), None);
    }

    #[test]
    fn anxious_message_uses_anxiety_pool() {
        let message = "I feel so anxious today";
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let reply = synthesize(message, &mut rng);

            assert_eq!(reply.origin, ReplyOrigin::Fallback(Topic::Anxiety));
            assert_eq!(reply.suggestions, Topic::Anxiety.suggestions());
            assert!(
                Topic::Anxiety.responses().iter().any(|t| reply.text.ends_with(t)),
                "unexpected text: {}",
                reply.text
            );
        }
    }

    #[test]
    fn reflection_prefix_appears_for_some_seeds() {
        let message = "I feel so anxious today";
        let mut reflected = 0;
        let mut plain = 0;
        for seed in 0..64 {
            let reply = synthesize(message, &mut StdRng::seed_from_u64(seed));
            if reply.text.contains("i feel so anxious today — ") {
                reflected += 1;
            } else {
                plain += 1;
            }
        }
        assert!(reflected > 0 && plain > 0);
    }

    #[test]
    fn same_seed_same_reply() {
        let a = synthesize("I can't stop worrying about work", &mut StdRng::seed_from_u64(7));
        let b = synthesize("I can't stop worrying about work", &mut StdRng::seed_from_u64(7));
        assert_eq!(a.text, b.text);
    }

    #[test]
    fn short_messages_are_never_reflected() {
        for seed in 0..32 {
            let reply = synthesize("sad", &mut StdRng::seed_from_u64(seed));
            assert!(Topic::Depression.responses().contains(&reply.text.as_str()));
        }
    }
}
