//! Display formatting shared by the console views.
//!
//! Everything here is pure. Functions that render wall-clock time take an
//! explicit [`UtcOffset`]; the `*_local` variants resolve it from the host.

use serde_json::Value;
use sinker_model::{TaskStatus, TimeValue};
use time::{
    OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339, macros::format_description,
};

/// Severity bucket of a consumer lag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LagLevel {
    Normal,
    Warning,
    Critical,
}

impl LagLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LagLevel::Normal => "normal",
            LagLevel::Warning => "warning",
            LagLevel::Critical => "critical",
        }
    }
}

/// `> 10000` critical, `(1000, 10000]` warning, otherwise normal.
pub fn lag_level(lag: i64) -> LagLevel {
    if lag > 10_000 {
        LagLevel::Critical
    } else if lag > 1_000 {
        LagLevel::Warning
    } else {
        LagLevel::Normal
    }
}

/// Task-table status label; unknown statuses are shown verbatim, a missing one as `""`.
pub fn status_label(status: Option<&TaskStatus>) -> &str {
    match status {
        Some(TaskStatus::Running) => "运行中",
        Some(TaskStatus::Stopped) => "已停止",
        Some(TaskStatus::Error) => "错误",
        Some(TaskStatus::Other(raw)) => raw,
        None => "",
    }
}

/// Badge style of a task status. No status, no class.
pub fn status_class(status: Option<&TaskStatus>) -> &'static str {
    match status {
        Some(TaskStatus::Running) => "status-running",
        Some(TaskStatus::Stopped) => "status-stopped",
        Some(TaskStatus::Error) => "status-error",
        Some(TaskStatus::Other(_)) => "status-unknown",
        None => "",
    }
}

/// Status-panel label; anything unrecognised reads as "unknown".
pub fn snapshot_status_label(status: Option<&TaskStatus>) -> &'static str {
    match status {
        Some(TaskStatus::Running) => "运行中",
        Some(TaskStatus::Stopped) => "已停止",
        Some(TaskStatus::Error) => "错误",
        _ => "未知",
    }
}

/// Thousands-separated integer: `1234567` -> `"1,234,567"`.
pub fn format_number(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Offset of the host time zone right now, UTC when it cannot be determined.
///
/// Read once at startup and then applied to every timestamp, so instants on
/// the other side of a daylight-saving change render one hour off. The offset
/// cannot be resolved per instant once the runtime has spawned its threads.
pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

/// Epoch milliseconds as `YYYY-MM-DD HH:mm:ss` at `offset`; absent or zero gives `""`.
///
/// `offset` is fixed: it is not adjusted for daylight saving at `ms`.
pub fn format_datetime_ms(ms: Option<i64>, offset: UtcOffset) -> String {
    match ms {
        Some(ms) if ms != 0 => wall_clock(i128::from(ms) * 1_000_000, offset),
        _ => String::new(),
    }
}

fn wall_clock(unix_nanos: i128, offset: UtcOffset) -> String {
    // Shift first so the calendar fields below already carry the offset.
    let shifted = unix_nanos + i128::from(offset.whole_seconds()) * 1_000_000_000;
    OffsetDateTime::from_unix_timestamp_nanos(shifted)
        .ok()
        .and_then(|dt| {
            dt.format(format_description!(
                "[year]-[month]-[day] [hour]:[minute]:[second]"
            ))
            .ok()
        })
        .unwrap_or_default()
}

/// Status-panel timestamp; `"-"` when absent. Unparseable text is shown as-is.
pub fn format_time_value(value: Option<&TimeValue>, offset: UtcOffset) -> String {
    match value {
        None | Some(TimeValue::Millis(0)) => "-".to_string(),
        Some(TimeValue::Millis(ms)) => format_datetime_ms(Some(*ms), offset),
        Some(TimeValue::Text(text)) if text.is_empty() => "-".to_string(),
        Some(TimeValue::Text(text)) => match OffsetDateTime::parse(text, &Rfc3339) {
            Ok(dt) => wall_clock(dt.unix_timestamp_nanos(), offset),
            Err(_) => text.clone(),
        },
    }
}

/// Message counter; absent counts as zero.
pub fn format_count(n: Option<i64>) -> String {
    format_number(n.unwrap_or(0))
}

/// Messages per second: `"1.5k/s"` from 1000 up, whole numbers below.
pub fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(r) if r != 0.0 && !r.is_nan() => {
            if r >= 1000.0 {
                format!("{:.1}k/s", r / 1000.0)
            } else {
                format!("{}/s", r.round() as i64)
            }
        }
        _ => "0/s".to_string(),
    }
}

/// Abbreviated lag: `"2.5M"`, `"12.0K"`, `"999"`; `"-"` when absent.
pub fn format_lag_short(lag: Option<i64>) -> String {
    match lag {
        None => "-".to_string(),
        Some(l) if l >= 1_000_000 => format!("{:.1}M", l as f64 / 1_000_000.0),
        Some(l) if l >= 1_000 => format!("{:.1}K", l as f64 / 1_000.0),
        Some(l) => l.to_string(),
    }
}

/// Lag bucket of a status snapshot; nothing when the lag was not reported.
pub fn snapshot_lag_level(lag: Option<i64>) -> Option<LagLevel> {
    lag.map(lag_level)
}

/// Bytes in the largest fitting unit up to GB, two decimals with trailing zeros dropped.
pub fn format_memory(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{} {}", trim_decimals(&format!("{:.2}", value)), UNITS[unit])
}

fn trim_decimals(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// `90061` -> `"1d 1h 1m 1s"`; zero units are skipped.
pub fn format_uptime(seconds: u64) -> String {
    let parts = [
        (seconds / 86_400, "d"),
        ((seconds % 86_400) / 3_600, "h"),
        ((seconds % 3_600) / 60, "m"),
        (seconds % 60, "s"),
    ];
    let out: Vec<String> = parts
        .iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, unit)| format!("{n}{unit}"))
        .collect();
    if out.is_empty() {
        "0s".to_string()
    } else {
        out.join(" ")
    }
}

/// Process start time given in epoch seconds; `"N/A"` when unknown.
pub fn format_start_time(epoch_secs: i64, offset: UtcOffset) -> String {
    if epoch_secs == 0 {
        return "N/A".to_string();
    }
    wall_clock(i128::from(epoch_secs) * 1_000_000_000, offset)
}

/// Short commit hash.
pub fn format_commit(commit: &str) -> &str {
    if commit.is_empty() {
        return "N/A";
    }
    match commit.char_indices().nth(8) {
        Some((idx, _)) => &commit[..idx],
        None => commit,
    }
}

pub fn format_cpu(cpu: f64) -> String {
    format!("{:.1}%", cpu)
}

pub fn or_na(s: &str) -> &str {
    if s.is_empty() { "N/A" } else { s }
}

/// Config key for display: `"ClickHouse"` -> `"Click House"`, `"logLevel"` -> `"Log Level"`.
pub fn format_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push(' ');
        }
        out.push(ch);
    }
    let trimmed = out.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Config value for display; nested structures are pretty-printed JSON.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Array(_) | Value::Object(_) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
    }
}
