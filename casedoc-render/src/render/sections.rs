//! Heuristic sections
//!
//! Each section is claimed by the presence of any of its trigger keys at the
//! top level of a document. Sections are emitted in the order of
//! [`HEURISTIC_SECTIONS`]; keys nobody claims end up in
//! [`SectionKind::Leftovers`].

/// Where a top-level key was rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// The key supplied the document (or item) heading
    Title,
    Patient,
    Presentation,
    Diagnosis,
    Treatment,
    Results,
    Vitals,
    Notes,
    /// `Остальные поля`
    Leftovers,
}

#[derive(Debug, Clone, Copy)]
pub struct SectionSpec {
    pub kind: SectionKind,
    pub triggers: &'static [&'static str],
    pub heading: &'static str,
}

pub const HEURISTIC_SECTIONS: &[SectionSpec] = &[
    SectionSpec {
        kind: SectionKind::Patient,
        triggers: &["patient", "person", "subject"],
        heading: "Patient",
    },
    SectionSpec {
        kind: SectionKind::Presentation,
        triggers: &["presentation", "history", "chief_complaint", "symptoms"],
        heading: "Presentation / History",
    },
    SectionSpec {
        kind: SectionKind::Diagnosis,
        triggers: &["diagnosis", "diagnoses", "correct_answers"],
        heading: "Diagnosis",
    },
    SectionSpec {
        kind: SectionKind::Treatment,
        triggers: &["treatment", "medications", "procedures"],
        heading: "Treatment / Management",
    },
    SectionSpec {
        kind: SectionKind::Results,
        triggers: &["labs", "cbc", "real_test_results", "results"],
        heading: "Results / Labs",
    },
    SectionSpec {
        kind: SectionKind::Vitals,
        triggers: &["vital_signs", "vitals"],
        heading: "Vital signs",
    },
    SectionSpec {
        kind: SectionKind::Notes,
        triggers: &["notes", "comments", "description"],
        heading: "Notes / Description",
    },
];

pub const LEFTOVERS_HEADING: &str = "Остальные поля";
pub const LAB_GROUP_HEADING: &str = "Лабораторные данные";
pub const RAW_JSON_HEADING: &str = "Raw JSON";

/// The section a top-level key triggers, if any.
#[cfg(test)]
fn section_for_key(key: &str) -> Option<&'static SectionSpec> {
    HEURISTIC_SECTIONS
        .iter()
        .find(|spec| spec.triggers.contains(&key))
}
