//! Numbered task emoji (1️⃣ - 9️⃣)
//!
//! Each announced task gets one keycap emoji; users react with it to mark the task done.
//! Only these emoji count toward the leaderboard.

use std::fmt;

/// Keycap emoji in task order
const KEYCAPS: [&str; 9] = [
    "1\u{fe0f}\u{20e3}",
    "2\u{fe0f}\u{20e3}",
    "3\u{fe0f}\u{20e3}",
    "4\u{fe0f}\u{20e3}",
    "5\u{fe0f}\u{20e3}",
    "6\u{fe0f}\u{20e3}",
    "7\u{fe0f}\u{20e3}",
    "8\u{fe0f}\u{20e3}",
    "9\u{fe0f}\u{20e3}",
];

/// A numbered task emoji, 1 through 9
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskEmoji(u8);

impl TaskEmoji {
    /// Largest task number that has an emoji
    pub const MAX: u8 = 9;

    /// Create the emoji for a 1-based task number
    #[must_use]
    pub fn for_task(task: usize) -> Option<Self> {
        u8::try_from(task)
            .ok()
            .filter(|n| (1..=Self::MAX).contains(n))
            .map(Self)
    }

    /// All allow-listed emoji in task order
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=Self::MAX).map(Self)
    }

    /// Match a unicode emoji name against the allow-list
    ///
    /// The gateway sometimes drops the variation selector, so both forms are accepted.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::all().find(|emoji| {
            let keycap = emoji.as_str();
            name == keycap || name == keycap.replace('\u{fe0f}', "")
        })
    }

    /// 1-based task number
    #[inline]
    pub const fn task(self) -> u8 {
        self.0
    }

    /// Unicode representation
    #[must_use]
    pub fn as_str(self) -> &'static str {
        KEYCAPS[usize::from(self.0 - 1)]
    }
}

impl fmt::Display for TaskEmoji {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
