//! Topic classification and the static template pools behind the fallback
//! responder.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Depression,
    Anxiety,
    Stress,
    Loneliness,
    Sleep,
    Anger,
    General,
}

/// Keyword rules in priority order. The first topic with a matching keyword
/// wins, so "tired" lands in `Stress` before `Sleep` gets a chance.
static TOPIC_RULES: [(Topic, &[&str]); 6] = [
    (Topic::Depression, &["depress", "sad", "hopeless", "empty", "worthless", "down", "low"]),
    (Topic::Anxiety, &["anxious", "anxiety", "panic", "worry", "worried", "nervous", "scared"]),
    (Topic::Stress, &["stress", "stressed", "overwhelm", "pressure", "busy", "tired"]),
    (Topic::Loneliness, &["lonely", "alone", "isolat", "disconnect", "no one", "friend"]),
    (Topic::Sleep, &["sleep", "insomnia", "tired", "exhausted", "can't sleep"]),
    (Topic::Anger, &["angry", "anger", "frustrat", "irritat", "mad"]),
];

static DEPRESSION_RESPONSES: [&str; 5] = [
    "I hear you, and what you're feeling is valid. Depression can make everything feel heavy. \
     Remember, you don't have to face this alone. Have you considered reaching out to a trusted friend or professional?",
    "That sounds really difficult. It takes courage to open up about what you're going through. \
     Small steps matter—even getting through today is an achievement. Be gentle with yourself.",
    "Thank you for sharing. Depression can feel isolating, but many people understand what you're experiencing. \
     Consider talking to a counselor or therapist who can provide professional support.",
    "What you're describing is hard to carry. You matter, and your feelings are real. \
     Sometimes the bravest thing is to ask for help. Would you feel able to reach out to someone today?",
    "I'm glad you're here. It's okay to not be okay. \
     Many people find that small routines—getting outside, a short walk, or a phone call—can help a little. What feels possible for you right now?",
];

static ANXIETY_RESPONSES: [&str; 4] = [
    "I understand how overwhelming anxiety can feel. Your feelings are valid. \
     Have you tried grounding techniques like the 5-4-3-2-1 method? Notice 5 things you see, 4 you hear, 3 you touch, 2 you smell, 1 you taste.",
    "Anxiety can make everything feel urgent. Remember to breathe—slow, deep breaths can help calm your nervous system. \
     You're not alone in this. Many find relief through therapy, mindfulness, or talking to someone they trust.",
    "What you're experiencing is real and challenging. It's okay to take things one moment at a time. \
     Would it help to focus on something simple right now, like your breathing?",
    "I hear you. When anxiety spikes, it can feel like too much. \
     Try naming what you see around you or feeling your feet on the ground. You're safe in this moment.",
];

static STRESS_RESPONSES: [&str; 4] = [
    "Stress can feel overwhelming when it builds up. It's important to take breaks when you can. \
     Going for a short walk, listening to music, or doing something you enjoy can help reset your mind.",
    "You're carrying a lot right now. Remember that it's okay to ask for help or say no to things that feel like too much. \
     Prioritizing your wellbeing isn't selfish—it's necessary.",
    "Stress takes a real toll. What's one small thing you could do today to give yourself a moment of rest? \
     Even 5 minutes of quiet can make a difference.",
    "It sounds like a lot is on your plate. You don't have to do everything at once. \
     What's one thing you could set aside or delegate, even just for today?",
];

static LONELINESS_RESPONSES: [&str; 4] = [
    "Feeling lonely is difficult, and it's more common than many people realize. \
     Even small connections—a text, a call, or joining an online community—can help.",
    "Loneliness can make us feel invisible. But you matter. \
     Consider reaching out to someone today, even if it feels hard. They might be glad you did.",
    "You're not alone in feeling alone. Many people struggle with this. \
     Support groups, hobby clubs, or volunteering can be ways to build meaningful connections.",
    "Connection doesn't have to be big. A short message, a wave to a neighbour, or a walk in a park can remind us we're part of the world. \
     Is there one person or place you could reach out to this week?",
];

static SLEEP_RESPONSES: [&str; 2] = [
    "Sleep and mood are closely linked. Struggling to sleep can make everything feel harder. \
     A consistent bedtime, limiting screens before bed, and a calm routine can help. If it persists, a doctor can help rule out sleep issues.",
    "Not sleeping well is exhausting and can affect how you feel during the day. \
     Try to keep a regular schedule and avoid caffeine late in the day. You're not alone in this.",
];

static ANGER_RESPONSES: [&str; 2] = [
    "Anger can be a way our mind and body respond to stress or hurt. It's valid to feel it. \
     Taking a pause, stepping away, or writing it out can sometimes help before we respond.",
    "Feeling angry doesn't make you a bad person. It often means something matters to you or something feels unfair. \
     If you can, give yourself a moment before reacting. You deserve that space.",
];

static GENERAL_RESPONSES: [&str; 5] = [
    "I'm here to listen. Whatever you're going through, your feelings matter. \
     Would you like to tell me more about what's on your mind?",
    "Thank you for reaching out. It takes strength to acknowledge when you're struggling. \
     Remember, seeking support is a sign of courage, not weakness.",
    "I hear you. Mental health challenges are real and valid. \
     If things feel overwhelming, please consider speaking with a mental health professional—they're trained to help.",
    "You're not alone. Many people have walked similar paths and found their way through. \
     What would feel helpful to talk about right now?",
    "Whatever you're feeling, it's okay to feel it. \
     Take your time. I'm here when you want to share more.",
];

impl Topic {
    pub const ALL: [Topic; 7] = [
        Topic::Depression,
        Topic::Anxiety,
        Topic::Stress,
        Topic::Loneliness,
        Topic::Sleep,
        Topic::Anger,
        Topic::General,
    ];

    /// Classifies a message by case-insensitive substring match.
    pub fn detect(message: &str) -> Topic {
        let lower = message.to_lowercase();
        TOPIC_RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
            .map(|(topic, _)| *topic)
            .unwrap_or(Topic::General)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Topic::Depression => "depression",
            Topic::Anxiety => "anxiety",
            Topic::Stress => "stress",
            Topic::Loneliness => "loneliness",
            Topic::Sleep => "sleep",
            Topic::Anger => "anger",
            Topic::General => "general",
        }
    }

    /// Template pool for this topic. Never empty.
    pub fn responses(self) -> &'static [&'static str] {
        match self {
            Topic::Depression => &DEPRESSION_RESPONSES,
            Topic::Anxiety => &ANXIETY_RESPONSES,
            Topic::Stress => &STRESS_RESPONSES,
            Topic::Loneliness => &LONELINESS_RESPONSES,
            Topic::Sleep => &SLEEP_RESPONSES,
            Topic::Anger => &ANGER_RESPONSES,
            Topic::General => &GENERAL_RESPONSES,
        }
    }

    pub fn suggestions(self) -> &'static [&'static str; 3] {
        match self {
            Topic::Depression => &["Talk about what helps", "I want to try therapy", "Coping strategies"],
            Topic::Anxiety => &["Breathing exercises", "Grounding techniques", "When to see a professional"],
            Topic::Stress => &["Stress management tips", "Setting boundaries", "Self-care ideas"],
            Topic::Loneliness => &["Building connections", "Online communities", "Volunteering"],
            Topic::Sleep => &["Sleep routine tips", "When to see a doctor", "Relaxation before bed"],
            Topic::Anger => &["Managing anger", "Safe ways to express", "When to get support"],
            Topic::General => &["Tell me more", "I need resources", "Crisis support"],
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_each_topic() {
        assert_eq!(Topic::detect("I feel so anxious today"), Topic::Anxiety);
        assert_eq!(Topic::detect("Everything seems HOPELESS"), Topic::Depression);
        assert_eq!(Topic::detect("work pressure is unreal"), Topic::Stress);
        assert_eq!(Topic::detect("I have no friends here"), Topic::Loneliness);
        assert_eq!(Topic::detect("insomnia again"), Topic::Sleep);
        assert_eq!(Topic::detect("so frustrating"), Topic::Anger);
        assert_eq!(Topic::detect("hello there"), Topic::General);
    }

    #[test]
    fn earlier_rules_take_precedence() {
        // "tired" appears under both stress and sleep
        assert_eq!(Topic::detect("I'm tired"), Topic::Stress);
        // sad + anxious: depression is checked first
        assert_eq!(Topic::detect("sad and anxious"), Topic::Depression);
    }

    #[test]
    fn keywords_match_inside_words() {
        // "low" inside "slowly"
        assert_eq!(Topic::detect("things are moving slowly"), Topic::Depression);
    }

    #[test]
    fn every_topic_has_templates_and_three_suggestions() {
        for topic in Topic::ALL {
            assert!(!topic.responses().is_empty(), "{topic} has no templates");
            assert_eq!(topic.suggestions().len(), 3);
        }
    }
}
