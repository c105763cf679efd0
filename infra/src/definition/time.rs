use chrono::{DateTime, FixedOffset, SecondsFormat};
use human_task_base::{error::HumanTaskError, limits::MAX_FRACTION_DIGITS};
use std::{fmt, str::FromStr};

const DATE_DESIGNATORS: [char; 4] = ['Y', 'M', 'W', 'D'];
const TIME_DESIGNATORS: [char; 3] = ['H', 'M', 'S'];

/// ISO 8601 duration (`PnYnMnWnDTnHnMnS`).
///
/// Components keep whether they were written, so `P0D` and `PT0S` stay distinct and
/// re-encode exactly as read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IsoDuration {
    pub negative: bool,
    pub years: Option<u64>,
    pub months: Option<u64>,
    pub weeks: Option<u64>,
    pub days: Option<u64>,
    pub hours: Option<u64>,
    pub minutes: Option<u64>,
    pub seconds: Option<u64>,
    /// fraction of `seconds`, only meaningful when `seconds` is present
    pub nanos: u32,
}

impl IsoDuration {
    pub fn from_millis(milliseconds: u64) -> Self {
        Self::from_std(std::time::Duration::from_millis(milliseconds))
    }

    pub fn from_std(duration: std::time::Duration) -> Self {
        let r = duration.as_secs();
        let seconds = r % 60;
        let r = r / 60;
        let minutes = r % 60;
        let r = r / 60;
        let hours = r % 24;
        let days = r / 24;
        let nanos = duration.subsec_nanos();

        let non_zero = |v: u64| if v > 0 { Some(v) } else { None };
        let mut d = IsoDuration {
            days: non_zero(days),
            hours: non_zero(hours),
            minutes: non_zero(minutes),
            seconds: non_zero(seconds),
            nanos: 0,
            ..Default::default()
        };
        if nanos > 0 {
            d.seconds = Some(seconds);
            d.nanos = nanos;
        }
        if d.is_unset() {
            d.seconds = Some(0);
        }
        d
    }

    pub fn minutes(minutes: u64) -> Self {
        Self {
            minutes: Some(minutes),
            ..Default::default()
        }
    }

    pub fn hours(hours: u64) -> Self {
        Self {
            hours: Some(hours),
            ..Default::default()
        }
    }

    pub fn days(days: u64) -> Self {
        Self {
            days: Some(days),
            ..Default::default()
        }
    }

    /// Approximate length in milliseconds (a year is 365.25 days, a month 30.44 days).
    pub fn to_millis(&self) -> i64 {
        const DAY_MS: f64 = 24.0 * 60.0 * 60.0 * 1000.0;
        let mut total_ms: f64 = 0.0;
        let f = |v: Option<u64>| v.unwrap_or(0) as f64;
        total_ms += f(self.years) * 365.25 * DAY_MS;
        total_ms += f(self.months) * 30.44 * DAY_MS;
        total_ms += f(self.weeks) * 7.0 * DAY_MS;
        total_ms += f(self.days) * DAY_MS;
        total_ms += f(self.hours) * 60.0 * 60.0 * 1000.0;
        total_ms += f(self.minutes) * 60.0 * 1000.0;
        total_ms += f(self.seconds) * 1000.0;
        total_ms += self.nanos as f64 / 1_000_000.0;
        let ms = if total_ms >= i64::MAX as f64 {
            i64::MAX
        } else {
            total_ms as i64
        };
        if self.negative {
            -ms
        } else {
            ms
        }
    }

    pub fn is_zero(&self) -> bool {
        [
            self.years,
            self.months,
            self.weeks,
            self.days,
            self.hours,
            self.minutes,
            self.seconds,
        ]
        .iter()
        .all(|c| c.unwrap_or(0) == 0)
            && self.nanos == 0
    }

    fn is_unset(&self) -> bool {
        self.years.is_none()
            && self.months.is_none()
            && self.weeks.is_none()
            && self.days.is_none()
            && self.hours.is_none()
            && self.minutes.is_none()
            && self.seconds.is_none()
    }

    pub fn parse(input: &str) -> Result<Self, HumanTaskError> {
        let malformed = || HumanTaskError::MalformedDuration(input.to_string());
        // only the canonical spelling is accepted so that printing reproduces the input
        let (negative, rest) = match input.strip_prefix('-') {
            Some(r) => (true, r),
            None => (false, input),
        };
        let body = rest.strip_prefix('P').ok_or_else(malformed)?;
        let (date_part, time_part) = match body.split_once('T') {
            Some((d, t)) => {
                if t.is_empty() {
                    return Err(malformed());
                }
                (d, Some(t))
            }
            None => (body, None),
        };

        let mut d = IsoDuration {
            negative,
            ..Default::default()
        };
        let mut last = None;
        for (number, designator) in split_components(date_part).ok_or_else(malformed)? {
            let pos = DATE_DESIGNATORS
                .iter()
                .position(|c| *c == designator)
                .ok_or_else(malformed)?;
            if last.is_some_and(|l| pos <= l) {
                return Err(malformed());
            }
            last = Some(pos);
            let value = parse_integer(number).ok_or_else(malformed)?;
            match designator {
                'Y' => d.years = Some(value),
                'M' => d.months = Some(value),
                'W' => d.weeks = Some(value),
                _ => d.days = Some(value),
            }
        }

        if let Some(time_part) = time_part {
            let mut last = None;
            for (number, designator) in split_components(time_part).ok_or_else(malformed)? {
                let pos = TIME_DESIGNATORS
                    .iter()
                    .position(|c| *c == designator)
                    .ok_or_else(malformed)?;
                if last.is_some_and(|l| pos <= l) {
                    return Err(malformed());
                }
                last = Some(pos);
                match designator {
                    'H' => d.hours = Some(parse_integer(number).ok_or_else(malformed)?),
                    'M' => d.minutes = Some(parse_integer(number).ok_or_else(malformed)?),
                    _ => {
                        let (whole, nanos) = parse_seconds(number).ok_or_else(malformed)?;
                        d.seconds = Some(whole);
                        d.nanos = nanos;
                    }
                }
            }
        }

        if d.is_unset() {
            return Err(malformed());
        }
        Ok(d)
    }
}

// "1Y2M" -> [("1", 'Y'), ("2", 'M')]
fn split_components(part: &str) -> Option<Vec<(&str, char)>> {
    let mut components = Vec::new();
    let mut start = 0;
    for (i, c) in part.char_indices() {
        if c.is_ascii_digit() || c == '.' || c == ',' {
            continue;
        }
        if !c.is_ascii_uppercase() || i == start {
            return None;
        }
        components.push((&part[start..i], c));
        start = i + c.len_utf8();
    }
    if start != part.len() {
        // trailing number without designator
        return None;
    }
    Some(components)
}

fn parse_integer(number: &str) -> Option<u64> {
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if number.len() > 1 && number.starts_with('0') {
        return None;
    }
    number.parse().ok()
}

fn parse_seconds(number: &str) -> Option<(u64, u32)> {
    match number.split_once(['.', ',']) {
        None => parse_integer(number).map(|w| (w, 0)),
        Some((whole, fraction)) => {
            if fraction.is_empty()
                || fraction.len() > MAX_FRACTION_DIGITS
                || !fraction.bytes().all(|b| b.is_ascii_digit())
            {
                return None;
            }
            let whole = parse_integer(whole)?;
            let scale = 10u32.pow((MAX_FRACTION_DIGITS - fraction.len()) as u32);
            let nanos = fraction.parse::<u32>().ok()? * scale;
            Some((whole, nanos))
        }
    }
}

impl fmt::Display for IsoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str("P")?;
        if self.is_unset() {
            return f.write_str("T0S");
        }
        for (value, designator) in [
            (self.years, 'Y'),
            (self.months, 'M'),
            (self.weeks, 'W'),
            (self.days, 'D'),
        ] {
            if let Some(v) = value {
                write!(f, "{v}{designator}")?;
            }
        }
        if self.hours.is_some() || self.minutes.is_some() || self.seconds.is_some() {
            f.write_str("T")?;
            if let Some(v) = self.hours {
                write!(f, "{v}H")?;
            }
            if let Some(v) = self.minutes {
                write!(f, "{v}M")?;
            }
            if let Some(v) = self.seconds {
                if self.nanos > 0 {
                    let fraction = format!("{:09}", self.nanos);
                    write!(f, "{v}.{}S", fraction.trim_end_matches('0'))?;
                } else {
                    write!(f, "{v}S")?;
                }
            }
        }
        Ok(())
    }
}

impl FromStr for IsoDuration {
    type Err = HumanTaskError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<std::time::Duration> for IsoDuration {
    fn from(value: std::time::Duration) -> Self {
        Self::from_std(value)
    }
}

/// Blank input is an absent value.
pub fn decode_duration(input: &str) -> Result<Option<IsoDuration>, HumanTaskError> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    IsoDuration::parse(input).map(Some)
}

pub fn encode_duration(duration: &IsoDuration) -> String {
    duration.to_string()
}

pub type Instant = DateTime<FixedOffset>;

/// ISO 8601 timestamp with a mandatory offset (`Z`, `+hh:mm` or `+hhmm`).
pub fn parse_instant(input: &str) -> Result<Instant, HumanTaskError> {
    let s = input.trim();
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map_err(|e| {
            tracing::debug!("cannot parse instant '{}': {:?}", input, e);
            HumanTaskError::MalformedInstant(input.to_string())
        })
}

/// Blank input is an absent value.
pub fn decode_instant(input: &str) -> Result<Option<Instant>, HumanTaskError> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_instant(input).map(Some)
}

pub fn encode_instant(instant: &Instant) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}
