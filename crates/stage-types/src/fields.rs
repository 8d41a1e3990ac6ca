//! Record field layout.
//!
//! The engine reads each record as an ordered vector of string fields. The
//! index of every field is a fixed contract between the engine and whatever
//! supplies the records.

use std::fmt;

/// A field of the input record, in layout order.
///
/// # Examples
///
/// ```
/// use stage_types::RecordField;
///
/// assert_eq!(RecordField::YearOfDiagnosis.index(), 1);
/// assert_eq!(RecordField::from_name("cs_schema"), Some(RecordField::CsSchema));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RecordField {
    /// Type of reporting source ("7" = death certificate only).
    ReportingSource,
    /// Year of diagnosis.
    YearOfDiagnosis,
    /// Primary site with its one-character prefix, e.g. `C619`.
    PrimarySite,
    /// Histology (ICD-O).
    Histology,
    /// EOD extension (scheme 4).
    Extension,
    /// EOD lymph node involvement (scheme 4).
    Nodes,
    /// Prostate pathological extension.
    ProstatePathExtension,
    /// EOD coding system ("0" to "4", blank from 2004).
    EodCodingSystem,
    /// Old 4-digit EOD extent.
    Old4DigitExtent,
    /// Old 4-digit EOD nodes.
    Old4DigitNodes,
    /// Old 4-digit EOD size.
    Old4DigitSize,
    /// Old 13-digit EOD code.
    Old13Digit,
    /// Old 2-digit EOD code.
    Old2Digit,
    /// Registry identifier.
    Registry,
    /// Behavior code.
    Behavior,
    /// CS extension.
    CsExtension,
    /// CS lymph nodes.
    CsNodes,
    /// CS mets at diagnosis.
    CsMets,
    /// CS site-specific factor 1.
    CsSiteSpecificFactor1,
    /// CS site-specific factor 2.
    CsSiteSpecificFactor2,
    /// CS schema number.
    CsSchema,
}

impl RecordField {
    /// Number of fields in the layout.
    pub const COUNT: usize = 21;

    /// All fields in layout order.
    pub const ALL: [RecordField; Self::COUNT] = [
        Self::ReportingSource,
        Self::YearOfDiagnosis,
        Self::PrimarySite,
        Self::Histology,
        Self::Extension,
        Self::Nodes,
        Self::ProstatePathExtension,
        Self::EodCodingSystem,
        Self::Old4DigitExtent,
        Self::Old4DigitNodes,
        Self::Old4DigitSize,
        Self::Old13Digit,
        Self::Old2Digit,
        Self::Registry,
        Self::Behavior,
        Self::CsExtension,
        Self::CsNodes,
        Self::CsMets,
        Self::CsSiteSpecificFactor1,
        Self::CsSiteSpecificFactor2,
        Self::CsSchema,
    ];

    /// Returns the position of this field in the record vector.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the column name used by record files.
    pub fn name(self) -> &'static str {
        match self {
            Self::ReportingSource => "reporting_source",
            Self::YearOfDiagnosis => "year_of_diagnosis",
            Self::PrimarySite => "primary_site",
            Self::Histology => "histology",
            Self::Extension => "extension",
            Self::Nodes => "nodes",
            Self::ProstatePathExtension => "prostate_path_extension",
            Self::EodCodingSystem => "eod_coding_system",
            Self::Old4DigitExtent => "old_4_digit_extent",
            Self::Old4DigitNodes => "old_4_digit_nodes",
            Self::Old4DigitSize => "old_4_digit_size",
            Self::Old13Digit => "old_13_digit",
            Self::Old2Digit => "old_2_digit",
            Self::Registry => "registry",
            Self::Behavior => "behavior",
            Self::CsExtension => "cs_extension",
            Self::CsNodes => "cs_nodes",
            Self::CsMets => "cs_mets",
            Self::CsSiteSpecificFactor1 => "cs_ssf1",
            Self::CsSiteSpecificFactor2 => "cs_ssf2",
            Self::CsSchema => "cs_schema",
        }
    }

    /// Creates a field from its column name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.name() == name)
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The fields of one input record.
///
/// Fields missing from the supplied vector read as the empty string.
/// The field source may flag a record whose input fields it found invalid;
/// flagged records are recoded to sentinel codes.
///
/// # Examples
///
/// ```
/// use stage_types::{RecordField, RecordFields};
///
/// let record = RecordFields::default()
///     .with(RecordField::YearOfDiagnosis, "1990")
///     .with(RecordField::PrimarySite, "C080");
///
/// assert_eq!(record.get(RecordField::YearOfDiagnosis), "1990");
/// assert_eq!(record.get(RecordField::CsSchema), "");
/// assert!(!record.is_flagged());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordFields {
    values: Vec<String>,
    flagged: bool,
}

impl RecordFields {
    /// Creates a record from values in layout order.
    pub fn new(values: Vec<String>) -> Self {
        Self {
            values,
            flagged: false,
        }
    }

    /// Returns the value of a field, or `""` if it was not supplied.
    pub fn get(&self, field: RecordField) -> &str {
        self.values
            .get(field.index())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Sets the value of a field, growing the vector if needed.
    pub fn set(&mut self, field: RecordField, value: impl Into<String>) {
        let index = field.index();
        if self.values.len() <= index {
            self.values.resize(index + 1, String::new());
        }
        self.values[index] = value.into();
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, field: RecordField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Marks the record as carrying invalid input fields.
    pub fn with_flagged(mut self, flagged: bool) -> Self {
        self.flagged = flagged;
        self
    }

    /// Returns true if the field source flagged this record.
    pub fn is_flagged(&self) -> bool {
        self.flagged
    }

    /// Returns the raw values in layout order.
    pub fn values(&self) -> &[String] {
        &self.values
    }
}
