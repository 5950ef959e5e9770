use crate::error::TopTradersError;
use crate::model::{Scope, Timeframe};

pub const MAX_HANDLE_LENGTH: usize = 64;

/// Parse a timeframe: `24h`/`1d`/`day` or `7d`/`1w`/`week`, case-insensitive.
pub fn parse_timeframe(input: &str) -> Result<Timeframe, TopTradersError> {
    match input.trim().to_lowercase().as_str() {
        "24h" | "1d" | "day" => Ok(Timeframe::Day),
        "7d" | "1w" | "week" => Ok(Timeframe::Week),
        _ => Err(TopTradersError::InvalidInput(format!(
            "unknown timeframe '{}'. Valid values: 24h, 7d",
            input
        ))),
    }
}

/// Parse a ranking scope: `user` (alias `following`) or `global` (alias `all`).
pub fn parse_scope(input: &str) -> Result<Scope, TopTradersError> {
    match input.trim().to_lowercase().as_str() {
        "user" | "following" => Ok(Scope::User),
        "global" | "all" => Ok(Scope::Global),
        _ => Err(TopTradersError::InvalidInput(format!(
            "unknown scope '{}'. Valid values: user, global",
            input
        ))),
    }
}

/// Validate a social-graph id given as text. Must be a positive integer.
pub fn validate_fid(input: &str) -> Result<u64, TopTradersError> {
    match input.trim().parse::<u64>() {
        Ok(fid) if fid > 0 => Ok(fid),
        _ => Err(TopTradersError::InvalidInput(format!(
            "invalid fid '{}': expected a positive integer",
            input
        ))),
    }
}

/// Validate a ranking limit. Non-positive values are rejected, never clamped.
pub fn validate_limit(limit: i64) -> Result<usize, TopTradersError> {
    if limit <= 0 {
        return Err(TopTradersError::InvalidLimit(limit));
    }
    usize::try_from(limit).map_err(|_| TopTradersError::InvalidLimit(limit))
}

/// Normalize a handle: strip control characters, surrounding whitespace and a
/// leading `@`. Returns `None` when nothing usable is left or the handle is
/// longer than [`MAX_HANDLE_LENGTH`] bytes.
pub fn sanitize_handle(input: &str) -> Option<String> {
    let cleaned: String = input.chars().filter(|c| !c.is_control()).collect();
    let handle = cleaned.trim().trim_start_matches('@').trim();
    if handle.is_empty() || handle.len() > MAX_HANDLE_LENGTH {
        return None;
    }
    Some(handle.to_string())
}
