use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ConnectError, ConnectResult};

/// A recurring weekly interval during which a teacher accepts meetings.
/// Weekdays are numbered 0 = Monday through 6 = Sunday. Boundaries are
/// wall-clock times in the teacher's own timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyWindow {
    pub weekday: u8,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl WeeklyWindow {
    pub fn new(weekday: u8, start: NaiveTime, end: NaiveTime) -> ConnectResult<Self> {
        if weekday > 6 {
            return Err(ConnectError::Validation(format!(
                "Weekday must be 0-6 (0 = Monday), got {weekday}"
            )));
        }
        if start >= end {
            return Err(ConnectError::Validation(format!(
                "Window start {start} must be before end {end}"
            )));
        }
        Ok(Self { weekday, start, end })
    }

    /// Build a window from persisted `HH:MM` boundary text.
    pub fn parse(weekday: u8, start_hm: &str, end_hm: &str) -> ConnectResult<Self> {
        Self::new(weekday, parse_hm(start_hm)?, parse_hm(end_hm)?)
    }
}

/// Parse an `HH:MM` time-of-day string.
pub fn parse_hm(value: &str) -> ConnectResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| ConnectError::Validation(format!("Invalid HH:MM time: {value:?}")))
}

/// Parse an IANA timezone name (e.g. `America/New_York`).
pub fn parse_timezone(name: &str) -> ConnectResult<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| ConnectError::Validation(format!("Unknown IANA timezone: {name:?}")))
}

/// A teacher's directory entry together with their recurring weekly
/// schedule, constructed once at the storage boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherAvailability {
    pub teacher_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub timezone: Tz,
    pub weekly_windows: Vec<WeeklyWindow>,
}

/// Wire representation of a single weekly window, with `HH:MM` boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSpec {
    pub weekday: u8,
    pub start: String,
    pub end: String,
}

impl WindowSpec {
    pub fn to_window(&self) -> ConnectResult<WeeklyWindow> {
        WeeklyWindow::parse(self.weekday, &self.start, &self.end)
    }
}

impl From<&WeeklyWindow> for WindowSpec {
    fn from(window: &WeeklyWindow) -> Self {
        Self {
            weekday: window.weekday,
            start: window.start.format("%H:%M").to_string(),
            end: window.end.format("%H:%M").to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeacherRequest {
    pub name: String,
    pub email: Option<String>,
    pub timezone: String,
    #[serde(default)]
    pub windows: Vec<WindowSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeacherResponse {
    pub id: Uuid,
    pub name: String,
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetTeacherResponse {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub timezone: String,
    pub windows: Vec<WindowSpec>,
}

impl From<&TeacherAvailability> for GetTeacherResponse {
    fn from(teacher: &TeacherAvailability) -> Self {
        Self {
            id: teacher.teacher_id,
            name: teacher.name.clone(),
            email: teacher.email.clone(),
            timezone: teacher.timezone.name().to_string(),
            windows: teacher.weekly_windows.iter().map(WindowSpec::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherSummary {
    pub id: Uuid,
    pub name: String,
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListTeachersResponse {
    pub teachers: Vec<TeacherSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceAvailabilityRequest {
    pub windows: Vec<WindowSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceAvailabilityResponse {
    pub teacher_id: Uuid,
    pub windows: Vec<WindowSpec>,
}
