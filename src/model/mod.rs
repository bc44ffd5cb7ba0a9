use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single offer row as stored remotely. The store assigns `id`; every
/// other column is filled at create time and never updated in place.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Offer {
    pub id: i64,
    pub date: Option<NaiveDate>,
    pub title: Option<String>,
    pub vertical: Option<String>,
    pub settle: Option<String>,
    pub rate: Option<f64>,
    pub volume: Option<i64>,
    #[serde(default)]
    pub insurance: bool,
}

/// Row payload for an insert. Absent optional columns are omitted from the
/// serialized body entirely, never sent as empty strings or zeroes.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewOffer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<i64>,
    pub date: NaiveDate,
    pub insurance: bool,
}

/// Raw create-form input, exactly as the user typed it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OfferDraft {
    pub title: String,
    pub vertical: String,
    pub settle: String,
    pub rate: String,
    pub volume: String,
    pub date: String,
    pub insurance: bool,
}

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("invalid rate '{value}', expected a decimal number")]
    InvalidRate { value: String },

    #[error("invalid volume '{value}', expected an integer")]
    InvalidVolume { value: String },

    #[error("invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },
}

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, DraftError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| DraftError::InvalidDate {
        value: value.trim().to_string(),
    })
}

impl OfferDraft {
    /// Coerce the raw form input into a validated insert payload. Blank
    /// optional fields become absent, a blank date becomes `today`.
    pub fn parse(&self, today: NaiveDate) -> Result<NewOffer, DraftError> {
        let rate = match self.rate.trim() {
            "" => None,
            raw => Some(raw.parse::<f64>().map_err(|_| DraftError::InvalidRate {
                value: raw.to_string(),
            })?),
        };
        let volume = match self.volume.trim() {
            "" => None,
            raw => Some(raw.parse::<i64>().map_err(|_| DraftError::InvalidVolume {
                value: raw.to_string(),
            })?),
        };
        let date = match self.date.trim() {
            "" => today,
            raw => parse_date(raw)?,
        };
        Ok(NewOffer {
            title: optional_text(&self.title),
            vertical: optional_text(&self.vertical),
            settle: optional_text(&self.settle),
            rate,
            volume,
            date,
            insurance: self.insurance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn blank_optionals_become_absent() {
        let draft = OfferDraft {
            title: "  ".to_string(),
            vertical: String::new(),
            settle: String::new(),
            rate: String::new(),
            volume: "".to_string(),
            date: String::new(),
            insurance: false,
        };
        let offer = draft.parse(day("2024-03-01")).unwrap();
        assert_eq!(offer.title, None);
        assert_eq!(offer.rate, None);
        assert_eq!(offer.volume, None);
        assert_eq!(offer.date, day("2024-03-01"));
    }

    #[test]
    fn absent_rate_and_volume_are_omitted_from_json() {
        let draft = OfferDraft::default();
        let offer = draft.parse(day("2024-03-01")).unwrap();
        let json = serde_json::to_string(&offer).unwrap();
        assert!(!json.contains("rate"));
        assert!(!json.contains("volume"));
        assert!(json.contains("\"date\":\"2024-03-01\""));
    }

    #[test]
    fn text_fields_are_trimmed() {
        let draft = OfferDraft {
            vertical: " Gambling ".to_string(),
            ..OfferDraft::default()
        };
        let offer = draft.parse(day("2024-03-01")).unwrap();
        assert_eq!(offer.vertical.as_deref(), Some("Gambling"));
    }

    #[test]
    fn bad_rate_is_rejected_with_field_name() {
        let draft = OfferDraft {
            rate: "abc".to_string(),
            ..OfferDraft::default()
        };
        let err = draft.parse(day("2024-03-01")).unwrap_err();
        assert!(err.to_string().contains("rate"));
    }

    #[test]
    fn bad_date_is_rejected() {
        let draft = OfferDraft {
            date: "01/02/2024".to_string(),
            ..OfferDraft::default()
        };
        assert!(draft.parse(day("2024-03-01")).is_err());
    }

    #[test]
    fn explicit_values_survive() {
        let draft = OfferDraft {
            title: "Acme push".to_string(),
            vertical: "Gambling".to_string(),
            settle: "Net7".to_string(),
            rate: "250.5".to_string(),
            volume: "1000".to_string(),
            date: "2024-02-20".to_string(),
            insurance: true,
        };
        let offer = draft.parse(day("2024-03-01")).unwrap();
        assert_eq!(offer.rate, Some(250.5));
        assert_eq!(offer.volume, Some(1000));
        assert_eq!(offer.date, day("2024-02-20"));
        assert!(offer.insurance);
    }
}
