//! Field extraction for horoscope.com reading pages.
//!
//! Every page carries the reading as the first `<p>` inside
//! `<div class="main-horoscope">`, shaped as `<label> - <body>`. The weekly
//! label itself contains a separator (`Mar 3, 2025 - Mar 9, 2025`), and the
//! monthly body ends with the standout/challenging day lists.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;
use thiserror::Error;

const SEPARATOR: &str = " - ";
const SIGN_OFF: &str = "Good luck this month";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("horoscope container not found")]
    MissingContainer,

    #[error("horoscope paragraph not found")]
    MissingParagraph,

    #[error("unexpected horoscope text shape: {0}")]
    UnexpectedShape(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyFields {
    pub date: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyFields {
    pub week: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyFields {
    pub month: String,
    pub body: String,
    pub standout_days: String,
    pub challenging_days: String,
}

struct Selectors {
    container: Selector,
    paragraph: Selector,
}

impl Selectors {
    fn get() -> &'static Self {
        static INSTANCE: OnceLock<Selectors> = OnceLock::new();
        INSTANCE.get_or_init(|| Self {
            container: Selector::parse("div.main-horoscope").expect("Invalid selector"),
            paragraph: Selector::parse("p").expect("Invalid selector"),
        })
    }
}

struct DayPatterns {
    standout: Regex,
    challenging: Regex,
    sign_off: Regex,
}

impl DayPatterns {
    fn get() -> &'static Self {
        static INSTANCE: OnceLock<DayPatterns> = OnceLock::new();
        INSTANCE.get_or_init(|| Self {
            standout: Regex::new(r"(?i)Standout (?:days|dates):\s*([\d, ]+)").expect("Invalid regex"),
            challenging: Regex::new(r"(?i)Challenging (?:days|dates):\s*([\d, ]+)")
                .expect("Invalid regex"),
            sign_off: Regex::new(r"(\S)Good luck this month").expect("Invalid regex"),
        })
    }
}

/// Returns the full text of the reading paragraph, including text nested in
/// inline markup such as the bolded date.
pub fn extract_paragraph(html: &str) -> Result<String, ParseError> {
    let selectors = Selectors::get();
    let document = Html::parse_document(html);

    let container = document
        .select(&selectors.container)
        .next()
        .ok_or(ParseError::MissingContainer)?;

    let paragraph = container
        .select(&selectors.paragraph)
        .next()
        .ok_or(ParseError::MissingParagraph)?;

    let text = paragraph.text().collect::<String>();
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::MissingParagraph);
    }

    Ok(text.to_string())
}

pub fn parse_daily(html: &str) -> Result<DailyFields, ParseError> {
    split_daily(&extract_paragraph(html)?)
}

pub fn parse_weekly(html: &str) -> Result<WeeklyFields, ParseError> {
    split_weekly(&extract_paragraph(html)?)
}

pub fn parse_monthly(html: &str) -> Result<MonthlyFields, ParseError> {
    split_monthly(&extract_paragraph(html)?)
}

pub fn split_daily(text: &str) -> Result<DailyFields, ParseError> {
    let (date, body) = text
        .split_once(SEPARATOR)
        .ok_or_else(|| ParseError::UnexpectedShape(preview(text)))?;

    Ok(DailyFields {
        date: date.trim().to_string(),
        body: body.trim().to_string(),
    })
}

pub fn split_weekly(text: &str) -> Result<WeeklyFields, ParseError> {
    let mut parts = text.splitn(3, SEPARATOR);
    let (Some(start), Some(end), Some(body)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ParseError::UnexpectedShape(preview(text)));
    };

    Ok(WeeklyFields {
        week: format!("{}{SEPARATOR}{}", start.trim(), end.trim()),
        body: body.trim().to_string(),
    })
}

pub fn split_monthly(text: &str) -> Result<MonthlyFields, ParseError> {
    let (month, body) = text
        .split_once(SEPARATOR)
        .ok_or_else(|| ParseError::UnexpectedShape(preview(text)))?;

    let (standout_days, challenging_days, body) = split_standout_challenging(body);

    Ok(MonthlyFields {
        month: month.trim().to_string(),
        body,
        standout_days,
        challenging_days,
    })
}

/// Pulls the `Standout days:` and `Challenging days:` lists out of a monthly
/// body. Returns `(standout, challenging, remaining_text)`; a missing list is
/// an empty string.
#[must_use]
pub fn split_standout_challenging(text: &str) -> (String, String, String) {
    let patterns = DayPatterns::get();

    let capture = |re: &Regex| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| clean_day_list(m.as_str()))
            .unwrap_or_default()
    };

    let standout = capture(&patterns.standout);
    let challenging = capture(&patterns.challenging);

    let remaining = patterns.standout.replace_all(text, "");
    let remaining = patterns.challenging.replace_all(&remaining, "");
    let remaining = patterns
        .sign_off
        .replace_all(&remaining, format!("$1 {SIGN_OFF}").as_str());

    (standout, challenging, remaining.trim().to_string())
}

fn clean_day_list(raw: &str) -> String {
    raw.trim_end_matches([',', ' ']).trim().to_string()
}

fn preview(text: &str) -> String {
    text.chars().take(80).collect()
}
