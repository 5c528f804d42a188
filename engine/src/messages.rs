//! User-facing alert text.

use moodping_config::Locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert {
    /// The record endpoint answered with a non-success status.
    SaveFailed,
    /// Transport failure, unreadable response, or feedback failure.
    Communication,
}

impl Alert {
    #[must_use]
    pub const fn message(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Alert::SaveFailed, Locale::Korean) => "기록 저장에 실패했습니다. 다시 시도해주세요.",
            (Alert::SaveFailed, Locale::English) => "Failed to save your record. Please try again.",
            (Alert::Communication, Locale::Korean) => "서버 통신 중 오류가 발생했습니다.",
            (Alert::Communication, Locale::English) => {
                "Something went wrong while talking to the server."
            }
        }
    }
}
