//! Non-blocking user messages

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Severity of a [`Notice`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Action succeeded
    Success,
    /// Action succeeded with a caveat, or was ignored
    Info,
    /// Input needs fixing
    Warning,
    /// Action failed
    Error,
}

impl NoticeLevel {
    /// Check if the notice reports a problem
    #[inline]
    #[must_use]
    pub fn is_problem(self) -> bool {
        matches!(self, Self::Warning | Self::Error)
    }
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}

/// Message shown to the visitor after an action (a toast)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Text shown
    pub message: String,
}

impl Notice {
    /// Create notice
    #[inline]
    #[must_use]
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// Success notice
    #[inline]
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    /// Info notice
    #[inline]
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    /// Warning notice
    #[inline]
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    /// Error notice
    #[inline]
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// Fill `{name}` placeholders from `values`; unknown placeholders stay as is
///
/// The template is scanned once. Substituted values are never scanned
/// again, so a value containing `{other}` is emitted literally. When a name
/// appears more than once in `values` the first one wins.
#[must_use]
pub fn render_template<'a, I>(template: &str, values: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut lookup: HashMap<&str, &str> = HashMap::new();
    for (name, value) in values {
        lookup.entry(name).or_insert(value);
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        match tail[1..].find(['{', '}']) {
            Some(end) if tail.as_bytes()[end + 1] == b'}' => {
                let name = &tail[1..=end];
                match lookup.get(name) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&tail[..=end + 1]),
                }
                rest = &tail[end + 2..];
            }
            _ => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
