//! Stage recode enumeration types.
//!
//! This module provides enum representations for the recode outputs produced
//! for every record and for the Collaborative Stage recode categories used as
//! keys into the CS historic stage table.

use std::fmt;

/// An output produced by the stage recode for every record.
///
/// The order of the variants is the fixed output-vector order
/// (`PRE88AJCC` first, `PSTHISTORIC2000` last).
///
/// # Examples
///
/// ```
/// use stage_types::RecodeKind;
///
/// assert_eq!(RecodeKind::from_name("SSG2000"), Some(RecodeKind::Ssg2000));
/// assert_eq!(RecodeKind::Historic2000.index(), 3);
/// assert!(RecodeKind::ProstateSsg77.is_prostate());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RecodeKind {
    /// AJCC stage for cases diagnosed before 1988.
    Pre88Ajcc,
    /// SEER Summary Stage 2000 (clinical).
    Ssg2000,
    /// SEER Summary Stage 1977 (clinical).
    Ssg77,
    /// Historic Stage (2000 grouping).
    Historic2000,
    /// Summary Stage 2000 from the prostate pathological extension.
    ProstateSsg2000,
    /// Summary Stage 1977 from the prostate pathological extension.
    ProstateSsg77,
    /// Historic Stage from the prostate pathological extension.
    ProstateHistoric2000,
}

impl RecodeKind {
    /// Number of output kinds.
    pub const COUNT: usize = 7;

    /// All output kinds in output-vector order.
    pub const ALL: [RecodeKind; Self::COUNT] = [
        Self::Pre88Ajcc,
        Self::Ssg2000,
        Self::Ssg77,
        Self::Historic2000,
        Self::ProstateSsg2000,
        Self::ProstateSsg77,
        Self::ProstateHistoric2000,
    ];

    /// Returns the position of this kind in the output vector.
    pub fn index(self) -> usize {
        match self {
            Self::Pre88Ajcc => 0,
            Self::Ssg2000 => 1,
            Self::Ssg77 => 2,
            Self::Historic2000 => 3,
            Self::ProstateSsg2000 => 4,
            Self::ProstateSsg77 => 5,
            Self::ProstateHistoric2000 => 6,
        }
    }

    /// Creates a kind from its output-vector position.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Returns the conventional output column name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Pre88Ajcc => "PRE88AJCC",
            Self::Ssg2000 => "SSG2000",
            Self::Ssg77 => "SSG77",
            Self::Historic2000 => "HISTORIC2000",
            Self::ProstateSsg2000 => "PSTSSG2000",
            Self::ProstateSsg77 => "PSTSSG77",
            Self::ProstateHistoric2000 => "PSTHISTORIC2000",
        }
    }

    /// Creates a kind from its output column name.
    ///
    /// Returns `None` if the name is not recognized.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// Returns true for the three prostate pathological outputs.
    pub fn is_prostate(self) -> bool {
        matches!(
            self,
            Self::ProstateSsg2000 | Self::ProstateSsg77 | Self::ProstateHistoric2000
        )
    }
}

impl fmt::Display for RecodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Collaborative Stage recode category.
///
/// The CS extension, lymph node and metastasis recode tables produce one of
/// these categories; the triple is the key of the CS historic stage table.
///
/// # Examples
///
/// ```
/// use stage_types::CsRecode;
///
/// let recode = CsRecode::from_code("7");
/// assert_eq!(recode, Some(CsRecode::Distant));
/// assert_eq!(CsRecode::Distant.abbreviation(), "D");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CsRecode {
    /// In situ (IS).
    InSitu,
    /// Localized (L).
    Localized,
    /// Regional by direct extension (RE).
    RegionalExtension,
    /// Regional lymph nodes only (RN).
    RegionalNodes,
    /// Regional by both direct extension and nodes (RE+RN).
    RegionalExtensionAndNodes,
    /// Regional, not otherwise specified (RNOS).
    RegionalNos,
    /// Error category.
    Error,
    /// Distant (D).
    Distant,
    /// Not applicable (NA).
    NotApplicable,
    /// Unknown (U).
    Unknown,
}

impl CsRecode {
    /// Creates a category from its table code.
    ///
    /// Returns `None` if the code doesn't match a known category.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "0" => Some(Self::InSitu),
            "1" => Some(Self::Localized),
            "2" => Some(Self::RegionalExtension),
            "3" => Some(Self::RegionalNodes),
            "4" => Some(Self::RegionalExtensionAndNodes),
            "5" => Some(Self::RegionalNos),
            "6" => Some(Self::Error),
            "7" => Some(Self::Distant),
            "8" => Some(Self::NotApplicable),
            "9" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Returns the table code for this category.
    pub fn code(self) -> &'static str {
        match self {
            Self::InSitu => "0",
            Self::Localized => "1",
            Self::RegionalExtension => "2",
            Self::RegionalNodes => "3",
            Self::RegionalExtensionAndNodes => "4",
            Self::RegionalNos => "5",
            Self::Error => "6",
            Self::Distant => "7",
            Self::NotApplicable => "8",
            Self::Unknown => "9",
        }
    }

    /// Returns the short clinical abbreviation.
    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::InSitu => "IS",
            Self::Localized => "L",
            Self::RegionalExtension => "RE",
            Self::RegionalNodes => "RN",
            Self::RegionalExtensionAndNodes => "RE+RN",
            Self::RegionalNos => "RNOS",
            Self::Error => "ERROR",
            Self::Distant => "D",
            Self::NotApplicable => "NA",
            Self::Unknown => "U",
        }
    }
}

impl fmt::Display for CsRecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}
