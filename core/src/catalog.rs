//! Emotions offered on the record screen.

use moodping_types::{EmotionType, EmotionTypeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmotionOption {
    pub code: &'static str,
    pub emoji: &'static str,
    pub label_ko: &'static str,
    pub label_en: &'static str,
}

impl EmotionOption {
    pub fn emotion_type(&self) -> Result<EmotionType, EmotionTypeError> {
        EmotionType::new(self.code)
    }
}

pub const DEFAULT_EMOTIONS: &[EmotionOption] = &[
    EmotionOption {
        code: "happy",
        emoji: "😊",
        label_ko: "기쁨",
        label_en: "Happy",
    },
    EmotionOption {
        code: "calm",
        emoji: "😌",
        label_ko: "평온",
        label_en: "Calm",
    },
    EmotionOption {
        code: "sad",
        emoji: "😢",
        label_ko: "슬픔",
        label_en: "Sad",
    },
    EmotionOption {
        code: "angry",
        emoji: "😠",
        label_ko: "분노",
        label_en: "Angry",
    },
    EmotionOption {
        code: "anxious",
        emoji: "😰",
        label_ko: "불안",
        label_en: "Anxious",
    },
    EmotionOption {
        code: "tired",
        emoji: "😴",
        label_ko: "피곤",
        label_en: "Tired",
    },
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::DEFAULT_EMOTIONS;

    #[test]
    fn codes_are_unique_and_valid() {
        let mut seen = HashSet::new();
        for option in DEFAULT_EMOTIONS {
            assert!(seen.insert(option.code), "duplicate code {}", option.code);
            assert_eq!(option.emotion_type().unwrap().as_str(), option.code);
        }
    }
}
