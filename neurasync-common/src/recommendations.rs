//! Per-emotion coping suggestions

/// Canonical emotion keys with their suggestions
const SUGGESTIONS: [(&str, [&str; 4]); 7] = [
    (
        "happy",
        [
            "Take a moment to notice what brought on this good feeling",
            "Share the moment with someone you care about",
            "Write a few lines about it so you can revisit it later",
            "Put the energy toward something creative you have been postponing",
        ],
    ),
    (
        "sad",
        [
            "Acknowledge the feeling without judging yourself for it",
            "Reach out to a friend or family member you trust",
            "Do something gentle that usually comforts you",
            "Try a short mindfulness exercise focused on acceptance",
        ],
    ),
    (
        "angry",
        [
            "Take several slow, deep breaths before reacting",
            "Go for a brisk walk or stretch to release tension",
            "Write down what triggered you without filtering it",
            "Ask yourself whether a boundary needs to be set or communicated",
        ],
    ),
    (
        "surprise",
        [
            "Give yourself time to take in what just happened",
            "Jot down your first reactions and open questions",
            "Gather more information before making any decisions",
            "Consider whether this opens up new opportunities",
        ],
    ),
    (
        "fear",
        [
            "Ground yourself with the 5-4-3-2-1 senses exercise",
            "Separate the real risks from anxious what-ifs",
            "Break the worry into smaller, manageable pieces",
            "Let someone you trust know how you are feeling",
        ],
    ),
    (
        "disgust",
        [
            "Step away from the situation if you can",
            "Try a few cleansing breaths or a calming visualization",
            "Reflect on which of your values this reaction points to",
            "Do something that helps you feel restored",
        ],
    ),
    (
        "neutral",
        [
            "Check in with yourself for quieter feelings under the surface",
            "Use this steady moment to plan something you look forward to",
            "Take a short walk to refresh body and mind",
            "Practice a brief gratitude reflection",
        ],
    ),
];

/// Map label variants onto the keys used in [`SUGGESTIONS`]
fn canonical(emotion: &str) -> String {
    let emotion = emotion.trim().to_lowercase();
    match emotion.as_str() {
        "joy" | "joyful" => "happy".to_string(),
        "surprised" => "surprise".to_string(),
        "fearful" | "afraid" | "anxious" => "fear".to_string(),
        "disgusted" => "disgust".to_string(),
        "anger" => "angry".to_string(),
        "sadness" => "sad".to_string(),
        _ => emotion,
    }
}

/// Four coping suggestions for an emotion; unknown emotions get the neutral set
pub fn coping_suggestions(emotion: &str) -> Vec<String> {
    let key = canonical(emotion);
    SUGGESTIONS
        .iter()
        .find(|(name, _)| *name == key)
        .or_else(|| SUGGESTIONS.iter().find(|(name, _)| *name == "neutral"))
        .map(|(_, tips)| tips.iter().map(|tip| tip.to_string()).collect())
        .unwrap_or_default()
}

/// Whether the label has its own suggestion set
pub fn is_known_emotion(emotion: &str) -> bool {
    let key = canonical(emotion);
    SUGGESTIONS.iter().any(|(name, _)| *name == key)
}
