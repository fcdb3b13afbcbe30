//! Ordered status report handed to the presentation layer.
use serde::{Deserialize, Serialize};

use crate::immunization::VaxDetail;
use crate::trust::TrustLevel;

/// One check outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub level: TrustLevel,
    pub message: String,
}

impl StatusEntry {
    pub fn new(level: TrustLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn mark(&self) -> &'static str {
        self.level.mark()
    }
}

/// Immutable outcome of a verification, in discovery order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    status: Vec<StatusEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    patient_name: Option<String>,
    vaccinations: Vec<VaxDetail>,
}

impl VerificationReport {
    pub fn builder() -> ReportBuilder {
        ReportBuilder::default()
    }

    pub fn status(&self) -> &[StatusEntry] {
        &self.status
    }

    /// Short description of what the card holds, such as "Found 2 records".
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn patient_name(&self) -> Option<&str> {
        self.patient_name.as_deref()
    }

    pub fn vaccinations(&self) -> &[VaxDetail] {
        &self.vaccinations
    }

    /// Lowest trust level in the report, `None` when nothing was reported.
    pub fn worst_level(&self) -> Option<TrustLevel> {
        self.status.iter().map(|entry| entry.level).min()
    }
}

/// Accumulates status entries; never reorders, filters or deduplicates them.
#[derive(Debug, Default, Clone)]
pub struct ReportBuilder {
    report: VerificationReport,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: StatusEntry) -> &mut Self {
        self.report.status.push(entry);
        self
    }

    pub fn summary(&mut self, summary: impl Into<String>) -> &mut Self {
        self.report.summary = Some(summary.into());
        self
    }

    pub fn patient_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.report.patient_name = Some(name.into());
        self
    }

    pub fn vaccination(&mut self, detail: VaxDetail) -> &mut Self {
        self.report.vaccinations.push(detail);
        self
    }

    pub fn len(&self) -> usize {
        self.report.status.len()
    }

    pub fn is_empty(&self) -> bool {
        self.report.status.is_empty()
    }

    pub fn build(self) -> VerificationReport {
        self.report
    }
}
