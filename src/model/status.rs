use serde::{Deserialize, Serialize};

/// Task status as shown in a status cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Completed,
    Abandoned,
    Planned,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Abandoned,
        TaskStatus::Planned,
    ];

    /// The checkbox symbol stored in the task source (`- [x]`)
    pub fn symbol(self) -> char {
        match self {
            TaskStatus::NotStarted => ' ',
            TaskStatus::InProgress => '/',
            TaskStatus::Completed => 'x',
            TaskStatus::Abandoned => '-',
            TaskStatus::Planned => '>',
        }
    }

    /// Parse a checkbox symbol. Unrecognized symbols fall back to `NotStarted`.
    pub fn from_symbol(symbol: &str) -> TaskStatus {
        match symbol.trim() {
            "" => TaskStatus::NotStarted,
            "/" => TaskStatus::InProgress,
            "x" | "X" => TaskStatus::Completed,
            "-" => TaskStatus::Abandoned,
            ">" => TaskStatus::Planned,
            _ => TaskStatus::NotStarted,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "○",
            TaskStatus::InProgress => "◐",
            TaskStatus::Completed => "●",
            TaskStatus::Abandoned => "⊘",
            TaskStatus::Planned => "◇",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "Not started",
            TaskStatus::InProgress => "In progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Abandoned => "Abandoned",
            TaskStatus::Planned => "Planned",
        }
    }

    /// CSS-style class suffix (`status-in-progress`)
    pub fn class_name(self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "status-not-started",
            TaskStatus::InProgress => "status-in-progress",
            TaskStatus::Completed => "status-completed",
            TaskStatus::Abandoned => "status-abandoned",
            TaskStatus::Planned => "status-planned",
        }
    }
}

/// Task priority, 1 (lowest) through 5 (highest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    Lowest = 1,
    Low = 2,
    Medium = 3,
    High = 4,
    Highest = 5,
}

impl Priority {
    pub fn from_level(level: u8) -> Option<Priority> {
        match level {
            1 => Some(Priority::Lowest),
            2 => Some(Priority::Low),
            3 => Some(Priority::Medium),
            4 => Some(Priority::High),
            5 => Some(Priority::Highest),
            _ => None,
        }
    }

    /// Coerce user input into a priority level. Anything that is not an
    /// integer in 1..=5 means "no priority".
    pub fn coerce(input: &str) -> Option<u8> {
        input
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(Priority::from_level)
            .map(|p| p as u8)
    }

    pub fn icon(self) -> &'static str {
        match self {
            Priority::Lowest => "⏬",
            Priority::Low => "🔽",
            Priority::Medium => "🔼",
            Priority::High => "⏫",
            Priority::Highest => "🔺",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Lowest => "Lowest",
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Highest => "Highest",
        }
    }
}
