//! Deadline parsing and display.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, TimeZone, Timelike, Utc};

use crate::error::{Result, TaskError};

/// Shapes accepted for deadlines without an explicit zone. They are read in
/// the configured local offset.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Zoned shapes that RFC 3339 does not cover (no seconds).
const ZONED_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M%:z", "%Y-%m-%d %H:%M%:z"];

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 1440;
/// Below this many minutes the countdown is shown in minutes.
const MINUTE_DISPLAY_LIMIT: i64 = 180;

/// Parse an LMS deadline. Returns `None` for anything unrecognised.
pub fn parse_deadline(raw: &str, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    NAIVE_FORMATS.iter().find_map(|fmt| {
        let naive = NaiveDateTime::parse_from_str(raw, fmt).ok()?;
        offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
    })
}

/// Like [`parse_deadline`] but names the offending task on failure.
pub fn require_deadline(task_id: &str, raw: &str, offset: FixedOffset) -> Result<DateTime<Utc>> {
    parse_deadline(raw, offset).ok_or_else(|| TaskError::InvalidDeadline {
        task_id: task_id.to_string(),
        value: raw.to_string(),
    })
}

/// Whole minutes from `now` until `deadline`, truncated toward zero.
pub fn minutes_until(deadline: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (deadline - now).num_minutes()
}

/// Countdown label: minutes under 3 hours, hours under a day, else days.
pub fn relative_time(deadline: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = minutes_until(deadline, now);
    if diff < MINUTE_DISPLAY_LIMIT {
        format!("残り約{diff}分")
    } else if diff < MINUTES_PER_DAY {
        format!("残り約{}時間", diff / MINUTES_PER_HOUR)
    } else {
        format!("残り約{}日", diff / MINUTES_PER_DAY)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Year,
    YearShort,
    Month { pad: bool },
    MonthName,
    Day { pad: bool },
    Hour { pad: bool },
    Hour12 { pad: bool },
    Minute { pad: bool },
    Second { pad: bool },
    Weekday,
    WeekdayLong,
    DayPeriod,
}

const WEEKDAYS: [&str; 7] = ["月", "火", "水", "木", "金", "土", "日"];

/// A compiled date-fns style format string such as `yyyy/MM/dd HH:mm`.
///
/// Text in single quotes is literal (`''` is a quote). Non-letters are
/// literal. Weekdays, month names and AM/PM render in Japanese.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    source: String,
    tokens: Vec<Token>,
}

impl DatePattern {
    pub fn parse(pattern: &str) -> Result<Self> {
        let invalid = |reason: String| TaskError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        };

        let chars: Vec<char> = pattern.chars().collect();
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            if c == '\'' {
                if chars.get(i + 1) == Some(&'\'') {
                    literal.push('\'');
                    i += 2;
                    continue;
                }
                i += 1;
                while i < chars.len() {
                    if chars[i] == '\'' {
                        if chars.get(i + 1) == Some(&'\'') {
                            literal.push('\'');
                            i += 2;
                            continue;
                        }
                        break;
                    }
                    literal.push(chars[i]);
                    i += 1;
                }
                i += 1;
                continue;
            }
            if !c.is_ascii_alphabetic() {
                literal.push(c);
                i += 1;
                continue;
            }

            let run = chars[i..].iter().take_while(|&&x| x == c).count();
            let token = match (c, run) {
                ('y', 2) => Token::YearShort,
                ('y', _) => Token::Year,
                ('M', 1) => Token::Month { pad: false },
                ('M', 2) => Token::Month { pad: true },
                ('M', _) => Token::MonthName,
                ('d', 1) => Token::Day { pad: false },
                ('d', 2) => Token::Day { pad: true },
                ('H', 1) => Token::Hour { pad: false },
                ('H', 2) => Token::Hour { pad: true },
                ('h', 1) => Token::Hour12 { pad: false },
                ('h', 2) => Token::Hour12 { pad: true },
                ('m', 1) => Token::Minute { pad: false },
                ('m', 2) => Token::Minute { pad: true },
                ('s', 1) => Token::Second { pad: false },
                ('s', 2) => Token::Second { pad: true },
                ('E', 1..=3) => Token::Weekday,
                ('E', _) => Token::WeekdayLong,
                ('a', _) => Token::DayPeriod,
                _ => {
                    let run: String = chars[i..i + run].iter().collect();
                    return Err(invalid(format!("unsupported token {run:?}")));
                }
            };
            if !literal.is_empty() {
                tokens.push(Token::Literal(std::mem::take(&mut literal)));
            }
            tokens.push(token);
            i += run;
        }
        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Ok(Self {
            source: pattern.to_string(),
            tokens,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Render `at` in the given offset.
    pub fn format(&self, at: DateTime<Utc>, offset: FixedOffset) -> String {
        let local = at.with_timezone(&offset);
        let mut out = String::new();
        for token in &self.tokens {
            match token {
                Token::Literal(s) => out.push_str(s),
                Token::Year => out.push_str(&format!("{:04}", local.year())),
                Token::YearShort => out.push_str(&format!("{:02}", local.year().rem_euclid(100))),
                Token::Month { pad } => push_num(&mut out, local.month(), *pad),
                Token::MonthName => out.push_str(&format!("{}月", local.month())),
                Token::Day { pad } => push_num(&mut out, local.day(), *pad),
                Token::Hour { pad } => push_num(&mut out, local.hour(), *pad),
                Token::Hour12 { pad } => {
                    let h = match local.hour() % 12 {
                        0 => 12,
                        h => h,
                    };
                    push_num(&mut out, h, *pad)
                }
                Token::Minute { pad } => push_num(&mut out, local.minute(), *pad),
                Token::Second { pad } => push_num(&mut out, local.second(), *pad),
                Token::Weekday => {
                    out.push_str(WEEKDAYS[local.weekday().num_days_from_monday() as usize])
                }
                Token::WeekdayLong => {
                    out.push_str(WEEKDAYS[local.weekday().num_days_from_monday() as usize]);
                    out.push_str("曜日");
                }
                Token::DayPeriod => out.push_str(if local.hour() < 12 { "午前" } else { "午後" }),
            }
        }
        out
    }
}

fn push_num(out: &mut String, n: u32, pad: bool) {
    if pad {
        out.push_str(&format!("{n:02}"));
    } else {
        out.push_str(&n.to_string());
    }
}

/// Absolute deadline label in the user's pattern.
pub fn absolute_time(deadline: DateTime<Utc>, pattern: &DatePattern, offset: FixedOffset) -> String {
    pattern.format(deadline, offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn jst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn relative_minutes_hours_days() {
        let n = now();
        assert_eq!(relative_time(n + Duration::minutes(45), n), "残り約45分");
        // the minute band runs up to 3 hours
        assert_eq!(relative_time(n + Duration::minutes(125), n), "残り約125分");
        assert_eq!(relative_time(n + Duration::minutes(200), n), "残り約3時間");
        assert_eq!(relative_time(n + Duration::minutes(1800), n), "残り約1日");
        assert_eq!(relative_time(n + Duration::minutes(4000), n), "残り約2日");
    }

    #[test]
    fn relative_threshold_edges() {
        let n = now();
        assert_eq!(relative_time(n + Duration::minutes(179), n), "残り約179分");
        assert_eq!(relative_time(n + Duration::minutes(180), n), "残り約3時間");
        assert_eq!(relative_time(n + Duration::minutes(1439), n), "残り約23時間");
        assert_eq!(relative_time(n + Duration::minutes(1440), n), "残り約1日");
        // partial minutes truncate
        assert_eq!(relative_time(n + Duration::seconds(59), n), "残り約0分");
    }

    #[test]
    fn parses_zoned_and_naive_deadlines() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 14, 59, 0).unwrap();
        assert_eq!(parse_deadline("2024-05-01T23:59:00+09:00", jst()), Some(expected));
        assert_eq!(parse_deadline("2024-05-01T14:59:00Z", jst()), Some(expected));
        assert_eq!(parse_deadline("2024-05-01T23:59+09:00", jst()), Some(expected));
        assert_eq!(parse_deadline("2024-05-01T23:59:00", jst()), Some(expected));
        assert_eq!(parse_deadline("2024/05/01 23:59", jst()), Some(expected));
        assert_eq!(parse_deadline(" 2024-05-01 23:59:00 ", jst()), Some(expected));
        assert_eq!(parse_deadline("2024-05-01T23:59:00.000", jst()), Some(expected));
    }

    #[test]
    fn rejects_garbage_deadlines() {
        assert_eq!(parse_deadline("", jst()), None);
        assert_eq!(parse_deadline("next friday", jst()), None);
        assert_eq!(parse_deadline("2024-13-40T99:00:00", jst()), None);
        assert!(matches!(
            require_deadline("t1", "soon", jst()),
            Err(TaskError::InvalidDeadline { .. })
        ));
    }

    #[test]
    fn default_pattern_renders_in_local_offset() {
        let p = DatePattern::parse("yyyy/MM/dd HH:mm").unwrap();
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 14, 59, 0).unwrap();
        assert_eq!(p.format(at, jst()), "2024/05/01 23:59");
        assert_eq!(absolute_time(at, &p, FixedOffset::east_opt(0).unwrap()), "2024/05/01 14:59");
    }

    #[test]
    fn unpadded_tokens_weekday_and_literals() {
        let p = DatePattern::parse("M/d(E) H:mm 'まで'").unwrap();
        let at = Utc.with_ymd_and_hms(2024, 5, 3, 0, 5, 0).unwrap(); // Friday 09:05 JST
        assert_eq!(p.format(at, jst()), "5/3(金) 9:05 まで");

        let p = DatePattern::parse("yy年MMM d日 EEEE a h時").unwrap();
        assert_eq!(p.format(at, jst()), "24年5月 3日 金曜日 午前 9時");
    }

    #[test]
    fn quoted_apostrophe_and_latin_text() {
        let p = DatePattern::parse("'Due' HH:mm o''clock").unwrap_err();
        assert!(matches!(p, TaskError::InvalidPattern { .. }));

        let p = DatePattern::parse("'Due' HH:mm 'o''clock'").unwrap();
        let at = Utc.with_ymd_and_hms(2024, 5, 3, 3, 0, 0).unwrap();
        assert_eq!(p.format(at, jst()), "Due 12:00 o'clock");
    }
}
