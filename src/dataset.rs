use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Win,
    Draw,
    Loss,
}

impl MatchOutcome {
    pub fn parse(raw: &str) -> Option<Self> {
        // The scraped corpus uses single letters; be tolerant of full words.
        match raw.trim().chars().next()?.to_ascii_uppercase() {
            'W' => Some(Self::Win),
            'D' => Some(Self::Draw),
            'L' => Some(Self::Loss),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Self::Win => 'W',
            Self::Draw => 'D',
            Self::Loss => 'L',
        }
    }
}

/// One historical fixture with its derived feature columns. Derived once at
/// load; immutable afterwards.
#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub date: NaiveDate,
    pub team: String,
    pub opponent: String,
    pub venue: String,
    pub result: MatchOutcome,
    /// Leading hour component of the kickoff time string.
    pub hour: u8,
    /// ISO weekday index of `date`: Monday=0 .. Sunday=6.
    pub day_code: u8,
}

/// Raw CSV row. The scraped corpus carries many more columns (comp, round,
/// gf, ga, day, ...) plus a leading unnamed index; serde ignores what we do
/// not name here.
#[derive(Debug, Deserialize)]
struct RawRow {
    date: String,
    time: String,
    venue: String,
    result: String,
    opponent: String,
    team: String,
}

pub fn load_matches_csv(path: &Path) -> Result<Vec<MatchRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("open matches csv {}", path.display()))?;

    let mut out = Vec::new();
    for (idx, row) in reader.deserialize::<RawRow>().enumerate() {
        // Header is line 1, so the first data row is line 2.
        let line = idx + 2;
        let raw = row.with_context(|| format!("decode csv row at line {line}"))?;
        out.push(record_from_raw(raw, line)?);
    }

    if out.is_empty() {
        return Err(anyhow!("matches csv {} has no data rows", path.display()));
    }
    Ok(out)
}

fn record_from_raw(raw: RawRow, line: usize) -> Result<MatchRecord> {
    for (field, value) in [
        ("date", &raw.date),
        ("time", &raw.time),
        ("venue", &raw.venue),
        ("result", &raw.result),
        ("opponent", &raw.opponent),
        ("team", &raw.team),
    ] {
        if value.trim().is_empty() {
            return Err(anyhow!("line {line}: required field {field} is blank"));
        }
    }

    let date = NaiveDate::parse_from_str(raw.date.trim(), "%Y-%m-%d")
        .with_context(|| format!("line {line}: unparseable date {:?}", raw.date))?;
    let hour = parse_hour(&raw.time)
        .ok_or_else(|| anyhow!("line {line}: unparseable kickoff time {:?}", raw.time))?;
    let result = MatchOutcome::parse(&raw.result)
        .ok_or_else(|| anyhow!("line {line}: unparseable result {:?}", raw.result))?;

    Ok(MatchRecord {
        date,
        team: raw.team.trim().to_string(),
        opponent: raw.opponent.trim().to_string(),
        venue: raw.venue.trim().to_string(),
        result,
        hour,
        day_code: date.weekday().num_days_from_monday() as u8,
    })
}

/// Leading integer hour of a "H:MM" / "HH:MM" kickoff string.
pub fn parse_hour(raw: &str) -> Option<u8> {
    let head = raw.trim().split(':').next()?;
    let hour = head.parse::<u8>().ok()?;
    if hour <= 23 { Some(hour) } else { None }
}

/// Last `n` results for `team`, oldest first, for the rolling-form chart.
pub fn recent_form<'a>(
    records: &'a [MatchRecord],
    team: &str,
    n: usize,
) -> Vec<&'a MatchRecord> {
    let mut rows: Vec<&MatchRecord> = records.iter().filter(|m| m.team == team).collect();
    rows.sort_by_key(|m| m.date);
    let start = rows.len().saturating_sub(n);
    rows.split_off(start)
}

pub fn distinct_sorted<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out: Vec<String> = values.into_iter().map(|v| v.to_string()).collect();
    out.sort();
    out.dedup();
    out
}
