use chrono::{FixedOffset, Offset, Utc};

use crate::error::{ConverterError, Result};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Per-request context handed to every row materialization.
///
/// The cancellation flag is shared between clones, so the request owner can
/// keep one clone and cancel while a scan holds another.
#[derive(Clone, Debug, Default)]
pub struct Context {
    request_id: String,
    cancelled: Arc<AtomicBool>,
}

impl Context {
    pub fn new(request_id: &str) -> Self {
        Self {
            request_id: request_id.to_string(),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(ConverterError::Cancelled);
        }
        Ok(())
    }
}

/// The user an import or export runs on behalf of.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct User {
    pub uid: i64,
    pub language: String,
    /// Offset from UTC in minutes.
    pub timezone_utc_offset: i16,
}

impl User {
    pub fn new(uid: i64, timezone_utc_offset: i16) -> Self {
        Self {
            uid,
            language: String::new(),
            timezone_utc_offset,
        }
    }

    pub fn timezone(&self) -> FixedOffset {
        FixedOffset::east_opt(i32::from(self.timezone_utc_offset) * 60).unwrap_or_else(|| Utc.fix())
    }

    /// The user's offset rendered as `+HH:MM`.
    pub fn timezone_name(&self) -> String {
        format_utc_offset(self.timezone_utc_offset)
    }
}

pub fn format_utc_offset(minutes: i16) -> String {
    let sign = if minutes < 0 { '-' } else { '+' };
    let minutes = i32::from(minutes).abs();
    format!("{}{:02}:{:02}", sign, minutes / 60, minutes % 60)
}

/// Parses `+HH:MM`, `-HH:MM` or `Z` back into minutes east of UTC.
pub fn parse_utc_offset(text: &str) -> Option<i16> {
    let text = text.trim();
    if text == "Z" {
        return Some(0);
    }

    let (sign, rest) = match text.chars().next()? {
        '+' => (1, &text[1..]),
        '-' => (-1, &text[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    let two_digits = |s: &str| s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit());
    if !two_digits(hours) || !two_digits(minutes) {
        return None;
    }

    let hours: i16 = hours.parse().ok()?;
    let minutes: i16 = minutes.parse().ok()?;
    if hours > 14 || minutes > 59 {
        return None;
    }
    Some(sign * (hours * 60 + minutes))
}
