//! The narrative message log.
//!
//! Systems do not write here directly; they spawn transient log-carrier
//! entities, and the game façade drains those into this log at the end of
//! each tick. Consecutive duplicate lines collapse into a counter so "The
//! Goblin mauls you!" spam reads as one line.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ecs::components::LogKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    pub text: String,
    pub kind: LogKind,
    /// How many consecutive repeats this line absorbed.
    pub dups: u32,
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dups == 0 {
            write!(f, "{}", self.text)
        } else {
            write!(f, "{} ({}x)", self.text, self.dups + 1)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageLog {
    lines: Vec<LogLine>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line, folding it into the previous one when the text
    /// repeats.
    pub fn push(&mut self, text: impl Into<String>, kind: LogKind) {
        let text = text.into();
        if let Some(last) = self.lines.last_mut() {
            if last.text == text {
                last.dups += 1;
                return;
            }
        }
        self.lines.push(LogLine {
            text,
            kind,
            dups: 0,
        });
    }

    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_appends_lines_in_order() {
        let mut log = MessageLog::new();
        log.push("first", LogKind::Info);
        log.push("second", LogKind::Special);
        assert_eq!(log.len(), 2);
        assert_eq!(log.lines()[0].text, "first");
        assert_eq!(log.lines()[1].text, "second");
    }

    #[test]
    fn consecutive_duplicates_collapse() {
        let mut log = MessageLog::new();
        log.push("The Goblin mauls you!", LogKind::MonsterAttack);
        log.push("The Goblin mauls you!", LogKind::MonsterAttack);
        log.push("The Goblin mauls you!", LogKind::MonsterAttack);
        assert_eq!(log.len(), 1);
        assert_eq!(log.lines()[0].dups, 2);
        assert_eq!(log.lines()[0].to_string(), "The Goblin mauls you! (3x)");
    }

    #[test]
    fn non_consecutive_duplicates_stay_separate() {
        let mut log = MessageLog::new();
        log.push("hit", LogKind::Info);
        log.push("miss", LogKind::Info);
        log.push("hit", LogKind::Info);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn singular_lines_render_without_a_counter() {
        let mut log = MessageLog::new();
        log.push("You have died!", LogKind::MonsterAttack);
        assert_eq!(log.lines()[0].to_string(), "You have died!");
    }
}
