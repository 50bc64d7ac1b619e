//! Announcement text

use std::fmt::Write;

use chrono::NaiveDate;
use potd_core::{QuestionBatch, Snowflake, TaskEmoji};

/// Sent instead of questions when the row at the cursor is a holiday
pub const HOLIDAY_MESSAGE: &str = "We are not posting any POTD today!\n\
Prepare well for OPC and revise previous POTDs!!!\n\
Best of Luck 🤞🤞";

/// Render the announcement for `batch`
///
/// One task line per question and a legend mapping each keycap emoji to its task.
/// Batches never exceed the nine available keycaps.
pub fn format_announcement(batch: &QuestionBatch, date: NaiveDate, role_ids: &[Snowflake]) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "🎯 **Problem of the Day (POTD #{})**", batch.sequence);
    let _ = writeln!(out, "📆 **Date: {}**", date.format("%d/%m/%Y"));
    if !role_ids.is_empty() {
        let mentions: Vec<String> = role_ids.iter().map(|id| format!("<@&{id}>")).collect();
        let _ = writeln!(out, "{}", mentions.join(" "));
    }
    out.push('\n');

    for (i, question) in batch.questions.iter().enumerate() {
        let _ = writeln!(
            out,
            "🔸 **Task {}:** [{}](<{}>)",
            i + 1,
            question.label.trim(),
            question.link.trim()
        );
    }

    out.push_str("\nReact with:\n");
    for emoji in task_emoji(batch) {
        let _ = writeln!(out, "{emoji} if you completed Task {}", emoji.task());
    }

    out.trim_end().to_string()
}

/// Emoji the bot adds under an announcement, in task order
pub fn task_emoji(batch: &QuestionBatch) -> impl Iterator<Item = TaskEmoji> + '_ {
    (1..=batch.len()).map_while(TaskEmoji::for_task)
}
