//! Content checks on the immunization records carried by a health card.
//!
//! These entries go into the report before the signature verdict.
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::report::StatusEntry;
use crate::trust::TrustLevel;

/// Days after the last dose before a vaccination counts as complete.
pub const WAITING_PERIOD: i64 = 14;

pub const CVX_SYSTEM: &str = "http://hl7.org/fhir/sid/cvx";
/// Two-dose series: Moderna (207) and Pfizer-BioNTech (208).
const TWO_DOSE_CVX_CODES: [&str; 2] = ["207", "208"];

const UNKNOWN: &str = "UNKNOWN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coding {
    pub system: String,
    pub code: String,
}

impl Coding {
    pub fn from_uri_and_code(system: &str, code: &str) -> Self {
        Self {
            system: system.to_string(),
            code: code.to_string(),
        }
    }
}

impl fmt::Display for Coding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.system == CVX_SYSTEM {
            write!(f, "CVX {}", self.code)
        } else {
            write!(f, "{}#{}", self.system, self.code)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImmunizationStatus {
    Completed,
    EnteredInError,
    NotDone,
}

/// Immunization record extracted from the credential by the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Immunization {
    pub vaccine_codes: Vec<Coding>,
    #[serde(default)]
    pub vaccine_display: Option<String>,
    pub occurrence: NaiveDate,
    #[serde(default)]
    pub performers: Vec<String>,
    #[serde(default)]
    pub lot_number: Option<String>,
    pub status: ImmunizationStatus,
    /// Bundle entry URL of the patient this record belongs to.
    #[serde(default)]
    pub patient_reference: Option<String>,
}

impl Immunization {
    pub fn code(&self) -> String {
        match self.vaccine_display {
            Some(ref display) => display.clone(),
            None => self
                .vaccine_codes
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<String>>()
                .join(", "),
        }
    }

    /// Whether the vaccine needs two jabs, when it can be told from a single coding.
    pub fn is_two_dose(&self) -> Option<bool> {
        match self.vaccine_codes.as_slice() {
            [coding] => Some(
                coding.system == CVX_SYSTEM && TWO_DOSE_CVX_CODES.contains(&coding.code.as_str()),
            ),
            _ => None,
        }
    }

    pub fn provider(&self) -> String {
        if self.performers.is_empty() {
            return UNKNOWN.to_string();
        }
        self.performers.join("; ")
    }

    pub fn completed(&self) -> bool {
        self.status == ImmunizationStatus::Completed
    }

    pub fn detail(&self) -> VaxDetail {
        VaxDetail {
            mark: if self.completed() {
                TrustLevel::Trusted
            } else {
                TrustLevel::Untrusted
            },
            code: self.code(),
            date: self.occurrence.to_string(),
            location: self.provider(),
            lot: self
                .lot_number
                .clone()
                .unwrap_or_else(|| UNKNOWN.to_string()),
        }
    }
}

/// Display row for one immunization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaxDetail {
    pub mark: TrustLevel,
    pub code: String,
    pub date: String,
    pub location: String,
    pub lot: String,
}

/// Days since the most recent dose, `None` without any record.
pub fn days_since_latest(immunizations: &[Immunization], today: NaiveDate) -> Option<i64> {
    immunizations
        .iter()
        .map(|imm| (today - imm.occurrence).num_days())
        .min()
}

/// Overall vaccination status of a card, `None` when it holds no immunization.
pub fn vaccination_status(immunizations: &[Immunization], today: NaiveDate) -> Option<StatusEntry> {
    let days_since = days_since_latest(immunizations, today)?;

    let completed: Vec<&Immunization> = immunizations.iter().filter(|i| i.completed()).collect();
    let is_two_dose = completed.iter().any(|i| i.is_two_dose() == Some(true));

    let complete = |days_since: i64| {
        if days_since < WAITING_PERIOD {
            StatusEntry::new(
                TrustLevel::PartiallyTrusted,
                "Vaccination complete, less than two weeks since last jab",
            )
        } else {
            StatusEntry::new(TrustLevel::Trusted, "Vaccination complete")
        }
    };

    let entry = match (is_two_dose, completed.len()) {
        (true, 2) => complete(days_since),
        (true, _) => StatusEntry::new(
            TrustLevel::Untrusted,
            "Vaccination incomplete, second dose missing",
        ),
        (false, 1) => complete(days_since),
        (false, _) => StatusEntry::new(
            TrustLevel::Untrusted,
            "Vaccination incomplete, no completed vaccinations found",
        ),
    };
    Some(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn imm(code: &str, occurrence: NaiveDate, status: ImmunizationStatus) -> Immunization {
        Immunization {
            vaccine_codes: vec![Coding::from_uri_and_code(CVX_SYSTEM, code)],
            vaccine_display: None,
            occurrence,
            performers: vec![],
            lot_number: None,
            status,
            patient_reference: None,
        }
    }

    use ImmunizationStatus::*;

    #[test]
    fn two_dose_codes() {
        assert_eq!(imm("207", date(2021, 1, 1), Completed).is_two_dose(), Some(true));
        assert_eq!(imm("208", date(2021, 1, 1), Completed).is_two_dose(), Some(true));
        assert_eq!(imm("212", date(2021, 1, 1), Completed).is_two_dose(), Some(false));
        let mut both = imm("207", date(2021, 1, 1), Completed);
        both.vaccine_codes.push(Coding::from_uri_and_code(CVX_SYSTEM, "208"));
        assert_eq!(both.is_two_dose(), None);
    }

    #[test]
    fn two_doses_complete() {
        let today = date(2021, 6, 1);
        let imms = [
            imm("208", date(2021, 4, 1), Completed),
            imm("208", date(2021, 4, 22), Completed),
        ];
        let status = vaccination_status(&imms, today).unwrap();
        assert_eq!(status.level, TrustLevel::Trusted);
        assert_eq!(status.message, "Vaccination complete");
    }

    #[test]
    fn waiting_period_counts_from_latest_dose() {
        let imms = [
            imm("207", date(2021, 4, 1), Completed),
            imm("207", date(2021, 5, 1), Completed),
        ];
        let status = vaccination_status(&imms, date(2021, 5, 10)).unwrap();
        assert_eq!(status.level, TrustLevel::PartiallyTrusted);
        assert_eq!(
            status.message,
            "Vaccination complete, less than two weeks since last jab"
        );
        let status = vaccination_status(&imms, date(2021, 5, 15)).unwrap();
        assert_eq!(status.level, TrustLevel::Trusted);
    }

    #[test]
    fn second_dose_missing() {
        let imms = [imm("207", date(2021, 4, 1), Completed)];
        let status = vaccination_status(&imms, date(2021, 6, 1)).unwrap();
        assert_eq!(status.level, TrustLevel::Untrusted);
        assert_eq!(status.message, "Vaccination incomplete, second dose missing");
    }

    #[test]
    fn single_dose() {
        let imms = [imm("212", date(2021, 4, 1), Completed)];
        let status = vaccination_status(&imms, date(2021, 6, 1)).unwrap();
        assert_eq!(status.level, TrustLevel::Trusted);

        let imms = [imm("212", date(2021, 4, 1), NotDone)];
        let status = vaccination_status(&imms, date(2021, 6, 1)).unwrap();
        assert_eq!(status.level, TrustLevel::Untrusted);
        assert_eq!(
            status.message,
            "Vaccination incomplete, no completed vaccinations found"
        );
    }

    #[test]
    fn no_records() {
        assert_eq!(vaccination_status(&[], date(2021, 6, 1)), None);
    }

    #[test]
    fn detail_row() {
        let mut record = imm("207", date(2021, 3, 9), Completed);
        let detail = record.detail();
        assert_eq!(detail.mark, TrustLevel::Trusted);
        assert_eq!(detail.code, "CVX 207");
        assert_eq!(detail.date, "2021-03-09");
        assert_eq!(detail.location, "UNKNOWN");
        assert_eq!(detail.lot, "UNKNOWN");

        record.performers = vec!["ABC General Hospital".into(), "Clinic".into()];
        record.lot_number = Some("0000002".into());
        record.vaccine_display = Some("Moderna".into());
        record.status = EnteredInError;
        let detail = record.detail();
        assert_eq!(detail.mark, TrustLevel::Untrusted);
        assert_eq!(detail.code, "Moderna");
        assert_eq!(detail.location, "ABC General Hospital; Clinic");
        assert_eq!(detail.lot, "0000002");
    }

    #[test]
    fn deserialize_record() {
        let record: Immunization = serde_json::from_value(serde_json::json!({
            "vaccineCodes": [{ "system": CVX_SYSTEM, "code": "207" }],
            "occurrence": "2021-01-01",
            "status": "completed"
        }))
        .unwrap();
        assert!(record.completed());
        assert_eq!(record.lot_number, None);
        assert_eq!(record.patient_reference, None);
    }
}
