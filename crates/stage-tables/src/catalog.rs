//! Catalog of the lookup tables consulted by the stage recode.
//!
//! Every table has a fixed identity: a display name, a file stem, a key
//! arity and a minimum result arity.

use std::fmt;

/// Identifies one lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableId {
    /// EOD scheme 0 historic stage: (site, histology, d1, d2).
    Eod0HistoricStage,
    /// EOD scheme 1 extension recode: (histology, site, d1, d2).
    Eod1Extension,
    /// EOD scheme 1 nodes recode: (site, d1, d2).
    Eod1Nodes,
    /// EOD scheme 1 direct historic stage: (site, histology, d1, d2).
    Eod1HistoricStageDirect,
    /// EOD scheme 1 historic stage from recodes: (site, histology, ext, nodes).
    Eod1HistoricStageFromExtNodes,
    /// EOD scheme 2 extension recode: (site, d4, d5, d6, d7, d8, d13).
    Eod2Extension,
    /// EOD scheme 2 nodes recode: (site, d7..d12).
    Eod2Nodes,
    /// EOD scheme 2 lung historic stage: (d4..d13).
    Eod2HistoricStageLung,
    /// EOD scheme 2 melanoma historic stage: (site, d5, d6, d9..d13).
    Eod2HistoricStageMelanoma,
    /// EOD scheme 2 bladder historic stage: (d5, d6, d7, d9..d13).
    Eod2HistoricStageBladder,
    /// EOD scheme 2 historic stage from recodes: (site, ext, nodes).
    Eod2HistoricStageFromExtNodes,
    /// EOD scheme 3 historic stage: (histology, site, ext, nodes).
    Eod3HistoricStage,
    /// Historic stage patch for schemes 0-3: (reporting source, site, histology).
    HistoricStagePatch,
    /// Legacy node recode: (site, histology, nodes), three results.
    LegacyNodeRecode,
    /// Legacy extension recode: (year, site, histology, extension), three results.
    LegacyExtensionRecode,
    /// Stage combination: (ext recode, node recode).
    Stage,
    /// Summary Stage 2000 combination: (ext recode, node recode).
    SummaryStage2000,
    /// Pre-1988 AJCC from the 2-digit code: (d1, d2).
    Eod0Ajcc,
    /// Pre-1988 AJCC for schemes 1-3: (site, ext, nodes).
    Eod1To3Ajcc,
    /// Pre-1988 AJCC melanoma: (d2, d5, d6, d9..d13).
    Eod2AjccMelanoma,
    /// Pre-1988 AJCC bladder: (d5, d6, d7, d9..d13).
    Eod2AjccBladder,
    /// Pre-1988 AJCC generic: (site, histology, d1, d2, ext, nodes).
    Eod2AjccFromExtNodes,
    /// Gate deciding whether AJCC applies: (scheme, histology, site).
    AjccShouldBeCoded,
    /// Pre-1988 AJCC breast: (histology, size, ext, nodes).
    Eod3AjccBreast,
    /// Extension recode, 2000 version: (year, site, histology, extension), three results.
    Extension2000,
    /// Prostate path extension recode: (year, path extension), three results.
    ProstateExtension2000,
    /// Node recode, 2000 version: (site, histology, nodes), three results.
    Nodes2000,
    /// CS extension recode: (schema, cs extension).
    CsExtension,
    /// CS lymph nodes recode: (schema, cs nodes).
    CsNodes,
    /// CS mets at diagnosis recode: (schema, cs mets).
    CsMets,
    /// CS historic stage: (ext recode, node recode, mets recode).
    CsHistoricStage,
    /// Leukemia classification: (site, histology).
    Leukemia,
}

impl TableId {
    /// Number of tables in the catalog.
    pub const COUNT: usize = 32;

    /// All tables in catalog order.
    pub const ALL: [TableId; Self::COUNT] = [
        Self::Eod0HistoricStage,
        Self::Eod1Extension,
        Self::Eod1Nodes,
        Self::Eod1HistoricStageDirect,
        Self::Eod1HistoricStageFromExtNodes,
        Self::Eod2Extension,
        Self::Eod2Nodes,
        Self::Eod2HistoricStageLung,
        Self::Eod2HistoricStageMelanoma,
        Self::Eod2HistoricStageBladder,
        Self::Eod2HistoricStageFromExtNodes,
        Self::Eod3HistoricStage,
        Self::HistoricStagePatch,
        Self::LegacyNodeRecode,
        Self::LegacyExtensionRecode,
        Self::Stage,
        Self::SummaryStage2000,
        Self::Eod0Ajcc,
        Self::Eod1To3Ajcc,
        Self::Eod2AjccMelanoma,
        Self::Eod2AjccBladder,
        Self::Eod2AjccFromExtNodes,
        Self::AjccShouldBeCoded,
        Self::Eod3AjccBreast,
        Self::Extension2000,
        Self::ProstateExtension2000,
        Self::Nodes2000,
        Self::CsExtension,
        Self::CsNodes,
        Self::CsMets,
        Self::CsHistoricStage,
        Self::Leukemia,
    ];

    /// Returns the position of this table in the catalog.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the display name of the table.
    pub fn name(self) -> &'static str {
        match self {
            Self::Eod0HistoricStage => "EOD0 Historic Stage",
            Self::Eod1Extension => "EOD1 Extension",
            Self::Eod1Nodes => "EOD1 Nodes",
            Self::Eod1HistoricStageDirect => "EOD1 Historic Stage Direct",
            Self::Eod1HistoricStageFromExtNodes => "EOD1 Historic Stage from Extension and Nodes",
            Self::Eod2Extension => "EOD2 Extension",
            Self::Eod2Nodes => "EOD2 Nodes",
            Self::Eod2HistoricStageLung => "EOD2 Historic Stage Lung",
            Self::Eod2HistoricStageMelanoma => "EOD2 Historic Stage Melanoma",
            Self::Eod2HistoricStageBladder => "EOD2 Historic Stage Bladder",
            Self::Eod2HistoricStageFromExtNodes => "EOD2 Historic Stage from Extension and Nodes",
            Self::Eod3HistoricStage => "EOD3 Historic Stage",
            Self::HistoricStagePatch => "EOD 0-3 Historic Stage Patch Table",
            Self::LegacyNodeRecode => "LRD Histology Node Recode",
            Self::LegacyExtensionRecode => "LRD Extension Table",
            Self::Stage => "LRD Stage",
            Self::SummaryStage2000 => "Summary Stage 2000",
            Self::Eod0Ajcc => "EOD0 AJCC Stage",
            Self::Eod1To3Ajcc => "EOD1-3 AJCC Stage",
            Self::Eod2AjccMelanoma => "EOD2 AJCC Stage Melanoma",
            Self::Eod2AjccBladder => "EOD2 AJCC Stage Bladder",
            Self::Eod2AjccFromExtNodes => "EOD2 AJCC Stage from Extension and Nodes",
            Self::AjccShouldBeCoded => "AJCC Stage Should Be Coded",
            Self::Eod3AjccBreast => "EOD3 AJCC Stage Breast",
            Self::Extension2000 => "New LRD Extension Table",
            Self::ProstateExtension2000 => "New LRD Prostate Extension Table",
            Self::Nodes2000 => "New LRD Nodes Table",
            Self::CsExtension => "CS Extension",
            Self::CsNodes => "CS Lymph Nodes",
            Self::CsMets => "CS Mets at Dx",
            Self::CsHistoricStage => "CS Historic Stage",
            Self::Leukemia => "Leukemia Table",
        }
    }

    /// Returns the file stem; the table file is `<stem>.csv`.
    pub fn file_stem(self) -> &'static str {
        match self {
            Self::Eod0HistoricStage => "eod0_historic_stage",
            Self::Eod1Extension => "eod1_extension",
            Self::Eod1Nodes => "eod1_nodes",
            Self::Eod1HistoricStageDirect => "eod1_historic_stage_direct",
            Self::Eod1HistoricStageFromExtNodes => "eod1_historic_stage_from_ext_nodes",
            Self::Eod2Extension => "eod2_extension",
            Self::Eod2Nodes => "eod2_nodes",
            Self::Eod2HistoricStageLung => "eod2_historic_stage_lung",
            Self::Eod2HistoricStageMelanoma => "eod2_historic_stage_melanoma",
            Self::Eod2HistoricStageBladder => "eod2_historic_stage_bladder",
            Self::Eod2HistoricStageFromExtNodes => "eod2_historic_stage_from_ext_nodes",
            Self::Eod3HistoricStage => "eod3_historic_stage",
            Self::HistoricStagePatch => "eod0_3_historic_stage_patch",
            Self::LegacyNodeRecode => "lrd_histology_node_recode",
            Self::LegacyExtensionRecode => "lrd_extension",
            Self::Stage => "lrd_stage",
            Self::SummaryStage2000 => "summary_stage_2000",
            Self::Eod0Ajcc => "eod0_ajcc_stage",
            Self::Eod1To3Ajcc => "eod1_3_ajcc_stage",
            Self::Eod2AjccMelanoma => "eod2_ajcc_stage_melanoma",
            Self::Eod2AjccBladder => "eod2_ajcc_stage_bladder",
            Self::Eod2AjccFromExtNodes => "eod2_ajcc_stage_from_ext_nodes",
            Self::AjccShouldBeCoded => "ajcc_stage_should_be_coded",
            Self::Eod3AjccBreast => "eod3_ajcc_stage_breast",
            Self::Extension2000 => "new_lrd_extension",
            Self::ProstateExtension2000 => "new_lrd_prostate_extension",
            Self::Nodes2000 => "new_lrd_nodes",
            Self::CsExtension => "cs_extension",
            Self::CsNodes => "cs_lymph_nodes",
            Self::CsMets => "cs_mets_at_dx",
            Self::CsHistoricStage => "cs_historic_stage",
            Self::Leukemia => "leukemia",
        }
    }

    /// Returns the file name of the table (`<stem>.csv`).
    pub fn file_name(self) -> String {
        format!("{}.csv", self.file_stem())
    }

    /// Returns the number of key columns.
    pub fn key_arity(self) -> usize {
        match self {
            Self::Eod0Ajcc
            | Self::Stage
            | Self::SummaryStage2000
            | Self::ProstateExtension2000
            | Self::CsExtension
            | Self::CsNodes
            | Self::CsMets
            | Self::Leukemia => 2,
            Self::Eod1Nodes
            | Self::Eod2HistoricStageFromExtNodes
            | Self::HistoricStagePatch
            | Self::LegacyNodeRecode
            | Self::Eod1To3Ajcc
            | Self::AjccShouldBeCoded
            | Self::Nodes2000
            | Self::CsHistoricStage => 3,
            Self::Eod0HistoricStage
            | Self::Eod1Extension
            | Self::Eod1HistoricStageDirect
            | Self::Eod1HistoricStageFromExtNodes
            | Self::Eod3HistoricStage
            | Self::LegacyExtensionRecode
            | Self::Eod3AjccBreast
            | Self::Extension2000 => 4,
            Self::Eod2AjccFromExtNodes => 6,
            Self::Eod2Extension | Self::Eod2Nodes => 7,
            Self::Eod2HistoricStageMelanoma
            | Self::Eod2HistoricStageBladder
            | Self::Eod2AjccMelanoma
            | Self::Eod2AjccBladder => 8,
            Self::Eod2HistoricStageLung => 10,
        }
    }

    /// Returns the minimum number of result columns.
    pub fn result_arity(self) -> usize {
        match self {
            Self::LegacyNodeRecode
            | Self::LegacyExtensionRecode
            | Self::Extension2000
            | Self::ProstateExtension2000
            | Self::Nodes2000 => 3,
            _ => 1,
        }
    }

    /// Finds a table by display name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| id.name() == name)
    }

    /// Finds a table by file stem.
    pub fn from_file_stem(stem: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| id.file_stem() == stem)
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_order() {
        for (i, id) in TableId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn test_names_and_stems_unique() {
        let names: HashSet<_> = TableId::ALL.iter().map(|id| id.name()).collect();
        let stems: HashSet<_> = TableId::ALL.iter().map(|id| id.file_stem()).collect();
        assert_eq!(names.len(), TableId::COUNT);
        assert_eq!(stems.len(), TableId::COUNT);
    }

    #[test]
    fn test_lookup_by_name_and_stem() {
        assert_eq!(TableId::from_name("CS Mets at Dx"), Some(TableId::CsMets));
        assert_eq!(
            TableId::from_file_stem("eod2_historic_stage_lung"),
            Some(TableId::Eod2HistoricStageLung)
        );
        assert_eq!(TableId::from_name("Unknown Table"), None);
        assert_eq!(TableId::Leukemia.file_name(), "leukemia.csv");
    }

    #[test]
    fn test_arities() {
        assert_eq!(TableId::Eod2HistoricStageLung.key_arity(), 10);
        assert_eq!(TableId::Eod2AjccFromExtNodes.key_arity(), 6);
        assert_eq!(TableId::CsHistoricStage.key_arity(), 3);
        assert_eq!(TableId::Nodes2000.result_arity(), 3);
        assert_eq!(TableId::Stage.result_arity(), 1);
    }
}
