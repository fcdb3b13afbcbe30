//! Presentation data derived from a [`VerificationReport`].
//!
//! Rendering is a pure function of the report: there is no shared template
//! state, and the markup itself is left to the caller.
use serde::Serialize;

use crate::immunization::VaxDetail;
use crate::report::VerificationReport;
use crate::trust::TrustLevel;

/// Glyph shown next to an entry of the given level.
pub fn glyph(level: TrustLevel) -> &'static str {
    match level {
        TrustLevel::Trusted => "\u{2713}",
        TrustLevel::PartiallyTrusted => "\u{203c}",
        TrustLevel::Untrusted => "\u{2718}",
    }
}

/// CSS colour class for the given level.
pub fn color_class(level: TrustLevel) -> &'static str {
    match level {
        TrustLevel::Trusted => "cl-green",
        TrustLevel::PartiallyTrusted => "cl-yellow",
        TrustLevel::Untrusted => "cl-red",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRow {
    pub glyph: &'static str,
    pub class: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VaxRow {
    pub glyph: &'static str,
    pub class: &'static str,
    pub code: String,
    pub lot: String,
    pub location: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayData {
    pub summary: Option<String>,
    pub name: Option<String>,
    pub vax: Vec<VaxRow>,
    pub status: Vec<StatusRow>,
    /// Worst level over all status entries.
    pub overall: TrustLevel,
}

impl DisplayData {
    /// Whether the summary line should show the happy face.
    pub fn all_clear(&self) -> bool {
        self.overall == TrustLevel::Trusted
    }
}

fn vax_row(detail: &VaxDetail) -> VaxRow {
    VaxRow {
        glyph: glyph(detail.mark),
        class: color_class(detail.mark),
        code: detail.code.clone(),
        lot: detail.lot.clone(),
        location: detail.location.clone(),
        date: detail.date.clone(),
    }
}

pub fn render(report: &VerificationReport) -> DisplayData {
    DisplayData {
        summary: report.summary().map(str::to_string),
        name: report.patient_name().map(str::to_string),
        vax: report.vaccinations().iter().map(vax_row).collect(),
        status: report
            .status()
            .iter()
            .map(|entry| StatusRow {
                glyph: glyph(entry.level),
                class: color_class(entry.level),
                text: entry.message.clone(),
            })
            .collect(),
        overall: report.worst_level().unwrap_or(TrustLevel::Untrusted),
    }
}
