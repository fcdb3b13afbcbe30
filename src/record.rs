//! Patient and immunization resources of a health card bundle.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::immunization::{vaccination_status, Immunization};
use crate::report::{ReportBuilder, StatusEntry};
use crate::trust::TrustLevel;

pub const MESSAGE_MULTIPLE_PATIENTS: &str = "Multiple patients";
pub const MESSAGE_NAME_MISMATCH: &str = "Name mismatch";

/// Patient resource of the bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Bundle entry URL, e.g. `resource:0`.
    pub id: String,
    #[serde(default)]
    pub names: Vec<String>,
}

impl Patient {
    pub fn name(&self) -> String {
        self.names.join("; ")
    }
}

/// Resources extracted from the credential subject by the decoder.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    #[serde(default)]
    pub patients: Vec<Patient>,
    #[serde(default)]
    pub immunizations: Vec<Immunization>,
}

impl HealthRecord {
    pub fn patient(&self) -> Option<&Patient> {
        self.patients.first()
    }

    /// Red entry when the bundle does not describe a single patient, or when
    /// an immunization refers to someone else.
    pub fn subject_status(&self) -> Option<StatusEntry> {
        let patient = match self.patients.as_slice() {
            [] => return None,
            [patient] => patient,
            _ => {
                return Some(StatusEntry::new(
                    TrustLevel::Untrusted,
                    MESSAGE_MULTIPLE_PATIENTS,
                ))
            }
        };
        let mismatch = self
            .immunizations
            .iter()
            .any(|imm| imm.patient_reference.as_deref() != Some(patient.id.as_str()));
        if mismatch {
            return Some(StatusEntry::new(TrustLevel::Untrusted, MESSAGE_NAME_MISMATCH));
        }
        None
    }

    pub fn records_found(&self) -> String {
        match self.immunizations.len() {
            1 => "Found 1 record".to_string(),
            n => format!("Found {} records", n),
        }
    }

    /// Append the content checks to `report`, ahead of the signature verdict.
    ///
    /// Returns `false` when the subject check failed; only its entry is
    /// appended in that case.
    pub fn check_into(&self, today: NaiveDate, report: &mut ReportBuilder) -> bool {
        if let Some(entry) = self.subject_status() {
            log::warn!("Inconsistent credential subject: {}", entry.message);
            report.append(entry);
            return false;
        }
        report.summary(self.records_found());
        if let Some(patient) = self.patient() {
            report.patient_name(patient.name());
        }
        for imm in self.immunizations.iter() {
            report.vaccination(imm.detail());
        }
        if let Some(entry) = vaccination_status(&self.immunizations, today) {
            report.append(entry);
        }
        true
    }
}
