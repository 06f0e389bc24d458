use chrono::NaiveDate;

/// Relative-time badge shown next to a date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBadge {
    Today,
    Tomorrow,
    Yesterday,
    Overdue,
    /// Due within the next week, in days (2..=7)
    Upcoming(i64),
}

impl DateBadge {
    /// Badge for `date` relative to `today`, comparing calendar days only.
    pub fn relative_to(date: NaiveDate, today: NaiveDate) -> Option<DateBadge> {
        let days = (date - today).num_days();
        match days {
            0 => Some(DateBadge::Today),
            1 => Some(DateBadge::Tomorrow),
            -1 => Some(DateBadge::Yesterday),
            d if d < 0 => Some(DateBadge::Overdue),
            d if d <= 7 => Some(DateBadge::Upcoming(d)),
            _ => None,
        }
    }

    pub fn label(self) -> String {
        match self {
            DateBadge::Today => "Today".into(),
            DateBadge::Tomorrow => "Tomorrow".into(),
            DateBadge::Yesterday => "Yesterday".into(),
            DateBadge::Overdue => "Overdue".into(),
            DateBadge::Upcoming(days) => format!("{days}d"),
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            DateBadge::Today => "badge-today",
            DateBadge::Tomorrow => "badge-tomorrow",
            DateBadge::Yesterday => "badge-yesterday",
            DateBadge::Overdue => "badge-overdue",
            DateBadge::Upcoming(_) => "badge-upcoming",
        }
    }
}

/// ISO `YYYY-MM-DD` rendering used when no display value is supplied
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
