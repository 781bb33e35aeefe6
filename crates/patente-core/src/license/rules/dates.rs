//! Date token resolution for license dates.

use std::sync::Arc;

use regex::Captures;

use crate::clock::{Clock, SystemClock};

use super::ExtractionMatch;
use super::patterns::DATE_TOKEN;

/// Separator written between day, month and year.
pub const DATE_SEPARATOR: char = '.';

/// Default forward tolerance, in years, for 2-digit years.
pub const DEFAULT_YEAR_WINDOW: u32 = 5;

/// Resolves `DD?MM?YY[YY]` tokens into `DD.MM.YYYY`.
///
/// A 2-digit year `yy` becomes `20yy` when `yy <= pivot + window`, where
/// `pivot` is the last two digits of the current year read from the clock
/// at call time; otherwise it becomes `19yy`. The window is a heuristic:
/// it cannot tell a birth year from an unexpected value outside it.
#[derive(Debug, Clone)]
pub struct DateResolver {
    clock: Arc<dyn Clock>,
    window: u32,
}

impl DateResolver {
    /// Create a resolver reading the system clock.
    pub fn new() -> Self {
        Self {
            clock: Arc::new(SystemClock::default()),
            window: DEFAULT_YEAR_WINDOW,
        }
    }

    /// Use a different clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set the forward tolerance for 2-digit years.
    pub fn with_window(mut self, window: u32) -> Self {
        self.window = window;
        self
    }

    /// Resolve a date token; empty string when it is not a date token.
    pub fn resolve(&self, token: &str) -> String {
        self.try_resolve(token).unwrap_or_default()
    }

    /// Resolve a date token that must span the whole (trimmed) input.
    pub fn try_resolve(&self, token: &str) -> Option<String> {
        let token = token.trim();
        let caps = DATE_TOKEN.captures(token)?;
        let (start, end) = token_span(&caps)?;
        if start != 0 || end != token.len() {
            return None;
        }
        Some(self.format(&caps[1], &caps[2], &caps[3]))
    }

    /// Find and resolve the first date token in `text`.
    pub fn find(&self, text: &str) -> Option<ExtractionMatch<String>> {
        let caps = DATE_TOKEN.captures(text)?;
        let (start, end) = token_span(&caps)?;
        let value = self.format(&caps[1], &caps[2], &caps[3]);
        let confidence = if caps[3].len() == 4 { 0.95 } else { 0.8 };

        Some(
            ExtractionMatch::new(value, confidence, &text[start..end])
                .with_position(start, end),
        )
    }

    fn format(&self, day: &str, month: &str, year: &str) -> String {
        let year = if year.len() == 2 {
            // DATE_TOKEN guarantees two ASCII digits
            let yy: u32 = year.parse().unwrap_or(0);
            expand_year(yy, self.clock.pivot_year(), self.window).to_string()
        } else {
            year.to_string()
        };

        format!("{day}{DATE_SEPARATOR}{month}{DATE_SEPARATOR}{year}")
    }
}

/// Span of the date itself, without the non-digit borders the pattern
/// matches around it.
fn token_span(caps: &Captures<'_>) -> Option<(usize, usize)> {
    Some((caps.get(1)?.start(), caps.get(3)?.end()))
}

impl Default for DateResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Expand a 2-digit year around `pivot` with a forward `window`.
pub fn expand_year(yy: u32, pivot: u32, window: u32) -> u32 {
    if yy <= pivot.saturating_add(window) {
        2000 + yy
    } else {
        1900 + yy
    }
}
