use moodping_engine::moodping_config::Locale;
use moodping_engine::moodping_core::EmotionOption;

/// Fixed UI text for one locale.
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    pub app_title: &'static str,
    pub emotion_title: &'static str,
    pub intensity_title: &'static str,
    pub intensity_low: &'static str,
    pub intensity_high: &'static str,
    pub note_title: &'static str,
    pub note_placeholder: &'static str,
    pub submit: &'static str,
    pub result_title: &'static str,
    pub loading: &'static str,
    pub confirm: &'static str,
    pub alert_title: &'static str,
    pub alert_dismiss: &'static str,
    pub hint_move: &'static str,
    pub hint_select: &'static str,
    pub hint_quit: &'static str,
}

const KOREAN: Labels = Labels {
    app_title: "무드핑",
    emotion_title: "지금 기분이 어떤가요?",
    intensity_title: "얼마나 강하게 느끼나요?",
    intensity_low: "약함",
    intensity_high: "강함",
    note_title: "조금 더 이야기해 주세요 (선택)",
    note_placeholder: "오늘 있었던 일을 적어보세요",
    submit: "기록하기",
    result_title: "마음 리포트",
    loading: "마음을 살펴보는 중...",
    confirm: "확인",
    alert_title: "알림",
    alert_dismiss: "아무 키나 눌러 닫기",
    hint_move: "이동",
    hint_select: "선택",
    hint_quit: "종료",
};

const ENGLISH: Labels = Labels {
    app_title: "Moodping",
    emotion_title: "How are you feeling right now?",
    intensity_title: "How strong is it?",
    intensity_low: "mild",
    intensity_high: "strong",
    note_title: "Tell us a little more (optional)",
    note_placeholder: "Write about your day",
    submit: "Save",
    result_title: "Your mood report",
    loading: "Reading your mood...",
    confirm: "Done",
    alert_title: "Notice",
    alert_dismiss: "Press any key to close",
    hint_move: "move",
    hint_select: "select",
    hint_quit: "quit",
};

#[must_use]
pub fn labels(locale: Locale) -> &'static Labels {
    match locale {
        Locale::Korean => &KOREAN,
        Locale::English => &ENGLISH,
    }
}

#[must_use]
pub fn emotion_label(option: &EmotionOption, locale: Locale) -> &'static str {
    match locale {
        Locale::Korean => option.label_ko,
        Locale::English => option.label_en,
    }
}
