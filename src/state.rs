use std::collections::VecDeque;

use crate::engine::DisplayResult;
use crate::features::{QuerySelection, WEEKDAYS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Team,
    Opponent,
    Venue,
    Hour,
    Weekday,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Team,
        FormField::Opponent,
        FormField::Venue,
        FormField::Hour,
        FormField::Weekday,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Team => "Team",
            FormField::Opponent => "Opponent",
            FormField::Venue => "Venue",
            FormField::Hour => "Kickoff hour",
            FormField::Weekday => "Weekday",
        }
    }
}

/// Everything the form screen reads and writes. Option lists are copied out
/// of the fitted engine once at startup, so a form selection can never fall
/// outside the fitted domain.
pub struct AppState {
    pub teams: Vec<String>,
    pub opponents: Vec<String>,
    pub venues: Vec<String>,

    pub team_idx: usize,
    pub opponent_idx: usize,
    pub venue_idx: usize,
    pub hour: u8,
    pub weekday_idx: usize,

    pub focus: usize,
    pub prediction: Option<DisplayResult>,
    pub warning: Option<String>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new(teams: Vec<String>, opponents: Vec<String>, venues: Vec<String>) -> Self {
        Self {
            teams,
            opponents,
            venues,
            team_idx: 0,
            opponent_idx: 0,
            venue_idx: 0,
            // The original form defaults to a 15:00 Saturday kickoff.
            hour: 15,
            weekday_idx: 5,
            focus: 0,
            prediction: None,
            warning: None,
            logs: VecDeque::with_capacity(64),
            help_overlay: false,
        }
    }

    pub fn focused_field(&self) -> FormField {
        FormField::ALL[self.focus]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % FormField::ALL.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + FormField::ALL.len() - 1) % FormField::ALL.len();
    }

    /// Cycles the focused field's value forward (`step` = 1) or back
    /// (`step` = -1). Returns true when the selection actually changed, so
    /// the caller knows to re-run the pipeline.
    pub fn cycle_value(&mut self, step: i64) -> bool {
        match self.focused_field() {
            FormField::Team => cycle(&mut self.team_idx, self.teams.len(), step),
            FormField::Opponent => cycle(&mut self.opponent_idx, self.opponents.len(), step),
            FormField::Venue => cycle(&mut self.venue_idx, self.venues.len(), step),
            FormField::Weekday => cycle(&mut self.weekday_idx, WEEKDAYS.len(), step),
            FormField::Hour => {
                let next = (self.hour as i64 + step).rem_euclid(24) as u8;
                let changed = next != self.hour;
                self.hour = next;
                changed
            }
        }
    }

    pub fn selection(&self) -> QuerySelection {
        QuerySelection {
            team: self.teams.get(self.team_idx).cloned().unwrap_or_default(),
            opponent: self
                .opponents
                .get(self.opponent_idx)
                .cloned()
                .unwrap_or_default(),
            venue: self.venues.get(self.venue_idx).cloned().unwrap_or_default(),
            hour: self.hour,
            weekday: WEEKDAYS[self.weekday_idx].to_string(),
        }
    }

    pub fn field_value(&self, field: FormField) -> String {
        match field {
            FormField::Team => self.teams.get(self.team_idx).cloned().unwrap_or_default(),
            FormField::Opponent => self
                .opponents
                .get(self.opponent_idx)
                .cloned()
                .unwrap_or_default(),
            FormField::Venue => self.venues.get(self.venue_idx).cloned().unwrap_or_default(),
            FormField::Hour => format!("{:02}:00", self.hour),
            FormField::Weekday => WEEKDAYS[self.weekday_idx].to_string(),
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

fn cycle(idx: &mut usize, len: usize, step: i64) -> bool {
    if len <= 1 {
        return false;
    }
    let next = (*idx as i64 + step).rem_euclid(len as i64) as usize;
    let changed = next != *idx;
    *idx = next;
    changed
}
