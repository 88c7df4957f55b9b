//! Effective-date windows for rate queries.

use std::fmt;
use std::str::FromStr;

use currency_convert_common::Timestamp;

/// Inclusive window over effective timestamps. A missing bound is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateWindow {
    start: Option<Timestamp>,
    end: Option<Timestamp>,
}

impl DateWindow {
    /// Window with both ends open; matches every rate.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Window from optional bounds.
    pub fn new(start: Option<Timestamp>, end: Option<Timestamp>) -> Self {
        Self { start, end }
    }

    /// Closed window `[start, end]`.
    pub fn between(start: Timestamp, end: Timestamp) -> Self {
        Self::new(Some(start), Some(end))
    }

    /// Window that matches a single instant.
    pub fn at(instant: Timestamp) -> Self {
        Self::between(instant, instant)
    }

    /// Lower bound, if any.
    pub fn start(&self) -> Option<Timestamp> {
        self.start
    }

    /// Upper bound, if any.
    pub fn end(&self) -> Option<Timestamp> {
        self.end
    }

    /// Whether `instant` falls inside the window.
    pub fn contains(&self, instant: Timestamp) -> bool {
        self.start.map_or(true, |start| instant >= start)
            && self.end.map_or(true, |end| instant <= end)
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |b: Option<Timestamp>| b.map_or_else(|| "*".to_string(), |t| t.to_rfc3339());
        write!(f, "[{}, {}]", bound(self.start), bound(self.end))
    }
}

/// How omitted query bounds are filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowDefault {
    /// Leave omitted bounds open, so the newest stored rate wins.
    #[default]
    Latest,
    /// Replace omitted bounds with the current instant.
    Now,
}

impl WindowDefault {
    /// Build the query window from optional bounds.
    pub fn resolve(
        self,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
        now: Timestamp,
    ) -> DateWindow {
        match self {
            WindowDefault::Latest => DateWindow::new(start, end),
            WindowDefault::Now => DateWindow::between(start.unwrap_or(now), end.unwrap_or(now)),
        }
    }
}

impl FromStr for WindowDefault {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latest" => Ok(WindowDefault::Latest),
            "now" => Ok(WindowDefault::Now),
            other => Err(format!("unknown window default: {other}")),
        }
    }
}
