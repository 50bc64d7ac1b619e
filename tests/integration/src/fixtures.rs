//! Test fixtures and data generators
//!
//! Provides question sheets and dates shared by the scenario tests.

use chrono::NaiveDate;
use potd_core::{QuestionRow, Snowflake};
use potd_service::services::testing::FakeQuestions;

/// Bot user reported by READY
pub const BOT_USER: Snowflake = Snowflake::new(1);

/// Community members reacting to announcements
pub const ALICE: i64 = 7001;
pub const BOB: i64 = 7002;
pub const CAROL: i64 = 7003;
pub const DAVE: i64 = 7004;

/// A sheet with a holiday in the middle:
///
/// | row | label      |
/// |-----|------------|
/// | 1   | Two Sum    |
/// | 2   | Valid Anagram |
/// | 3   | Climbing Stairs |
/// | 4   | Coin Change |
/// | 5   | Holiday    |
/// | 6   | Jump Game  |
/// | 7   | House Robber |
pub fn week_sheet() -> Vec<QuestionRow> {
    [
        "Two Sum",
        "Valid Anagram",
        "Climbing Stairs",
        "Coin Change",
        "Holiday",
        "Jump Game",
        "House Robber",
    ]
    .iter()
    .map(|label| {
        let link = if label.eq_ignore_ascii_case("holiday") {
            String::new()
        } else {
            format!("https://leetcode.com/problems/{}/", label.to_lowercase().replace(' ', "-"))
        };
        QuestionRow::new(*label, link)
    })
    .collect()
}

pub fn week_questions() -> FakeQuestions {
    FakeQuestions::new(week_sheet())
}

/// Consecutive dates starting on 2024-03-01
pub fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, n).expect("March has 31 days")
}
