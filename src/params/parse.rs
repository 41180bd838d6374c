use super::kind::EnumDef;
use super::value::Value;
use crate::error::ValueError;
use chrono::TimeDelta;

fn owned(token: &str) -> String {
    token.to_string()
}

/// Parse a signed whole number.
pub fn parse_int(token: &str) -> Result<i64, ValueError> {
    token.trim().parse::<i64>().map_err(|_| ValueError::NotInteger { token: owned(token) })
}

/// Parse a finite decimal number. `inf` and `NaN` are rejected.
pub fn parse_float(token: &str) -> Result<f64, ValueError> {
    match token.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ValueError::NotNumber { token: owned(token) }),
    }
}

/// Parse a yes/no style flag.
pub fn parse_bool(token: &str) -> Result<bool, ValueError> {
    match token.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "on" | "1" => Ok(true),
        "false" | "no" | "n" | "off" | "0" => Ok(false),
        _ => Err(ValueError::NotBoolean { token: owned(token) }),
    }
}

/// Parse a numeric identifier such as `42` or `#42`.
pub fn parse_id(token: &str) -> Result<u64, ValueError> {
    let caps = regex!(r"^#?(\d{1,20})$")
        .captures(token.trim())
        .ok_or_else(|| ValueError::NotIdentifier { token: owned(token) })?;
    let digits = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    digits.parse::<u64>().map_err(|_| ValueError::OutOfRange { token: owned(token) })
}

/// Parse `N` numeric components separated by commas and/or whitespace,
/// optionally wrapped in `(..)` or `[..]`.
///
/// ```text
/// "1,2,3"  "(1, 2, 3)"  "[1 2 3]"  -> [1.0, 2.0, 3.0]
/// ```
pub fn parse_vector<const N: usize>(token: &str) -> Result<[f64; N], ValueError> {
    let err = || ValueError::NotVector { token: owned(token), dims: N };

    let trimmed = token.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .or_else(|| trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')))
        .unwrap_or(trimmed);

    let parts: Vec<&str> = regex!(r"[,\s]+").split(inner.trim()).filter(|p| !p.is_empty()).collect();
    if parts.len() != N {
        return Err(err());
    }

    let mut out = [0.0; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = parse_float(part).map_err(|_| err())?;
    }
    Ok(out)
}

/// Parse a compact duration made of `<number><unit>` pairs.
///
/// Units: `s`, `m`, `h`, `d`, `w`. Pairs may repeat (`1h30m`); a bare number
/// without a unit is not a duration.
pub fn parse_duration(token: &str) -> Result<TimeDelta, ValueError> {
    let lower = token.trim().to_lowercase();
    if !regex!(r"^(?:\d+\s*[smhdw]\s*)+$").is_match(&lower) {
        return Err(ValueError::NotDuration { token: owned(token) });
    }

    let overflow = || ValueError::OutOfRange { token: owned(token) };
    let mut total = TimeDelta::zero();
    for caps in regex!(r"(\d+)\s*([smhdw])").captures_iter(&lower) {
        let amount: i64 = caps[1].parse().map_err(|_| overflow())?;
        let part = match &caps[2] {
            "s" => TimeDelta::try_seconds(amount),
            "m" => TimeDelta::try_minutes(amount),
            "h" => TimeDelta::try_hours(amount),
            "d" => TimeDelta::try_days(amount),
            _ => TimeDelta::try_weeks(amount),
        }
        .ok_or_else(overflow)?;
        total = total.checked_add(&part).ok_or_else(overflow)?;
    }
    Ok(total)
}

/// Match `token` against the variants of `def`, ignoring case.
pub fn parse_variant(def: &EnumDef, token: &str) -> Result<Value, ValueError> {
    let wanted = token.trim().to_lowercase();
    def.variants
        .iter()
        .position(|v| v.to_lowercase() == wanted)
        .map(|index| Value::Enum { variant: def.variants[index].clone(), index })
        .ok_or_else(|| ValueError::UnknownVariant { token: owned(token), expected: def.variants.join("|") })
}
