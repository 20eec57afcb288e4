//! Medicine and timer models.
//!
//! `Medicine` and `Timer` mirror the stored columns and are what the API
//! serializes. `MedicineInput` is the raw request shape; `validate` turns it
//! into a `MedicineDraft` that the store can write without further checks.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::FieldErrors;
use crate::{Error, Result};

/// Maximum length of a medicine name.
pub const NAME_MAX_CHARS: usize = 100;

/// Maximum length of a timer label.
pub const LABEL_MAX_CHARS: usize = 50;

/// Message shared by absent and foreign-owned medicines.
pub const MEDICINE_NOT_FOUND: &str = "Medicine not found";

/// A medication course owned by one user.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Medicine {
    pub id: i64,
    pub name: String,
    pub pieces: i64,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
    /// Attached after loading; not a column.
    #[sqlx(skip)]
    #[serde(default)]
    pub timers: Vec<Timer>,
}

/// One reminder slot of a medicine.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Timer {
    pub id: i64,
    pub medicine_id: i64,
    pub label: Option<String>,
    /// Time of day as `HH:MM`.
    pub time: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Positive integer identifier of a medicine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MedicineId(i64);

impl MedicineId {
    pub fn new(id: i64) -> Result<Self> {
        if id < 1 {
            return Err(Error::Validation("The id field must be at least 1.".into()));
        }
        Ok(Self(id))
    }

    /// Parse an id taken from a URL path segment.
    ///
    /// Only plain decimal digits (optionally negative) are accepted, so
    /// `+5` or ` 7 ` are not integers here.
    pub fn parse(raw: &str) -> Result<Self> {
        let not_integer = || Error::Validation("The id field must be an integer.".into());

        let digits = raw.strip_prefix('-').unwrap_or(raw);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(not_integer());
        }

        let id: i64 = raw.parse().map_err(|_| not_integer())?;
        Self::new(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for MedicineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Create/update request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MedicineInput {
    pub name: Option<String>,
    pub pieces: Option<i64>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub timers: Option<Vec<TimerInput>>,
}

/// One timer of a create/update request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerInput {
    /// Accepted for compatibility with clients that echo existing timers.
    /// Never used: updates always replace the whole timer set.
    pub id: Option<i64>,
    pub label: Option<String>,
    pub time: Option<String>,
}

/// Validated medicine fields ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct MedicineDraft {
    pub name: String,
    pub pieces: i64,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub timers: Vec<TimerDraft>,
}

/// Validated timer ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerDraft {
    pub label: Option<String>,
    pub time: NaiveTime,
}

impl TimerDraft {
    /// Stored representation of the time of day.
    pub fn time_string(&self) -> String {
        self.time.format("%H:%M").to_string()
    }
}

impl MedicineInput {
    /// Check every field and collect all failures into one validation error.
    pub fn validate(&self) -> Result<MedicineDraft> {
        let mut errors = FieldErrors::new();

        let name = errors.required_text("name", self.name.as_deref(), NAME_MAX_CHARS);

        let pieces = match self.pieces {
            None => {
                errors.push("The pieces field is required.");
                None
            }
            Some(p) if p < 0 => {
                errors.push("The pieces field must be at least 0.");
                None
            }
            Some(p) => Some(p),
        };

        let description =
            errors.optional_text("description", self.description.as_deref(), None);

        let start_date = errors.required_date("start date", self.start_date.as_deref());
        let end_date = errors.required_date("end date", self.end_date.as_deref());
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if end < start {
                errors.push("The end date field must be a date after or equal to start date.");
            }
        }

        let mut timers = Vec::new();
        match self.timers.as_deref() {
            None | Some([]) => errors.push("The timers field is required."),
            Some(inputs) => {
                for (i, timer) in inputs.iter().enumerate() {
                    let label = errors.optional_text(
                        &format!("timers.{}.label", i),
                        timer.label.as_deref(),
                        Some(LABEL_MAX_CHARS),
                    );
                    let time =
                        errors.required_time(&format!("timers.{}.time", i), timer.time.as_deref());
                    if let Some(time) = time {
                        timers.push(TimerDraft { label, time });
                    }
                }
            }
        }

        errors.into_result()?;

        match (name, pieces, start_date, end_date) {
            (Some(name), Some(pieces), Some(start_date), Some(end_date)) => Ok(MedicineDraft {
                name,
                pieces,
                description,
                start_date,
                end_date,
                timers,
            }),
            _ => Err(Error::Internal("validation passed with missing fields".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn aspirin() -> MedicineInput {
        MedicineInput {
            name: Some("Aspirin".into()),
            pieces: Some(30),
            description: None,
            start_date: Some("2025-01-01".into()),
            end_date: Some("2025-01-10".into()),
            timers: Some(vec![TimerInput {
                id: None,
                label: Some("Morning".into()),
                time: Some("08:00".into()),
            }]),
        }
    }

    #[test]
    fn test_valid_input() {
        let draft = aspirin().validate().unwrap();
        assert_eq!(draft.name, "Aspirin");
        assert_eq!(draft.pieces, 30);
        assert_eq!(draft.start_date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(draft.timers.len(), 1);
        assert_eq!(draft.timers[0].label.as_deref(), Some("Morning"));
        assert_eq!(draft.timers[0].time_string(), "08:00");
    }

    #[test]
    fn test_same_start_and_end_date_is_valid() {
        let mut input = aspirin();
        input.end_date = Some("2025-01-01".into());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let mut input = aspirin();
        input.start_date = Some("2025-01-10".into());
        input.end_date = Some("2025-01-01".into());
        let err = input.validate().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(
            err.to_string(),
            "The end date field must be a date after or equal to start date."
        );
    }

    #[test]
    fn test_empty_timers_rejected() {
        let mut input = aspirin();
        input.timers = Some(vec![]);
        assert_eq!(
            input.validate().unwrap_err().to_string(),
            "The timers field is required."
        );

        input.timers = None;
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_label_is_optional() {
        let mut input = aspirin();
        input.timers = Some(vec![TimerInput {
            id: None,
            label: None,
            time: Some("21:30".into()),
        }]);
        let draft = input.validate().unwrap();
        assert_eq!(draft.timers[0].label, None);
    }

    #[test]
    fn test_blank_description_becomes_none() {
        let mut input = aspirin();
        input.description = Some("   ".into());
        assert_eq!(input.validate().unwrap().description, None);

        input.description = Some("after food".into());
        assert_eq!(input.validate().unwrap().description.as_deref(), Some("after food"));
    }

    #[test]
    fn test_all_failures_are_counted() {
        let input = MedicineInput::default();
        let message = input.validate().unwrap_err().to_string();
        // name, pieces, start date, end date, timers
        assert_eq!(message, "The name field is required. (and 4 more errors)");
    }

    #[test]
    fn test_timer_errors_name_their_index() {
        let mut input = aspirin();
        input.timers = Some(vec![
            TimerInput {
                id: None,
                label: None,
                time: Some("07:00".into()),
            },
            TimerInput {
                id: Some(9),
                label: Some("x".repeat(51)),
                time: Some("7pm".into()),
            },
        ]);
        let message = input.validate().unwrap_err().to_string();
        assert_eq!(
            message,
            "The timers.1.label field must not be greater than 50 characters. (and 1 more error)"
        );
    }

    #[rstest]
    #[case(Some(0), true)]
    #[case(Some(120), true)]
    #[case(Some(-1), false)]
    #[case(None, false)]
    fn test_pieces(#[case] pieces: Option<i64>, #[case] valid: bool) {
        let mut input = aspirin();
        input.pieces = pieces;
        assert_eq!(input.validate().is_ok(), valid);
    }

    #[rstest]
    #[case("1", Some(1))]
    #[case("42", Some(42))]
    #[case("0", None)]
    #[case("-3", None)]
    #[case("abc", None)]
    #[case("1.5", None)]
    #[case("+5", None)]
    #[case(" 7 ", None)]
    #[case("", None)]
    fn test_medicine_id_parse(#[case] raw: &str, #[case] expected: Option<i64>) {
        assert_eq!(MedicineId::parse(raw).ok().map(MedicineId::get), expected);
    }

    #[rstest]
    #[case("2025-1-5")]
    #[case("+2025-01-05")]
    fn test_dates_must_be_zero_padded(#[case] start_date: &str) {
        let mut input = aspirin();
        input.start_date = Some(start_date.into());
        assert_eq!(
            input.validate().unwrap_err().to_string(),
            "The start date field must be a valid date."
        );
    }

    #[test]
    fn test_medicine_serializes_timers_inline() {
        let medicine = Medicine {
            id: 1,
            name: "Aspirin".into(),
            pieces: 30,
            description: None,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            user_id: "user-1".into(),
            created_at: "2025-01-01 08:00:00".into(),
            updated_at: "2025-01-01 08:00:00".into(),
            timers: vec![Timer {
                id: 7,
                medicine_id: 1,
                label: Some("Morning".into()),
                time: "08:00".into(),
                created_at: "2025-01-01 08:00:00".into(),
                updated_at: "2025-01-01 08:00:00".into(),
            }],
        };

        let json = serde_json::to_value(&medicine).unwrap();
        assert_eq!(json["start_date"], "2025-01-01");
        assert_eq!(json["end_date"], "2025-01-10");
        assert_eq!(json["timers"][0]["time"], "08:00");
        assert_eq!(json["timers"][0]["medicine_id"], 1);
        assert!(json["description"].is_null());
    }
}
