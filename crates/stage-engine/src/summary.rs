//! SEER Summary Stage 1977/2000 and Historic Stage 2000 from modern EOD
//! extension and nodes, including the prostate pathological path.
//!
//! Each of the three clinical outputs has its own extension and node recode
//! slot; the slot pair keys the stage table for that output. Summary stage
//! outputs use the 2000 table, historic stage uses the shared stage table.

use stage_tables::TableId;
use stage_types::well_known::{
    BEHAVIOR_IN_SITU, BEHAVIOR_MALIGNANT, BLADDER_HISTORIC_STAGE, UNKNOWN_HISTORIC_STAGE,
    UNKNOWN_SUMMARY_STAGE, UNSTAGED_HISTORIC_STAGE,
};
use stage_types::{RecodeKind, RecordField};
use tracing::debug;

use crate::classify::{
    is_bladder, is_blanking_histology, is_brain, is_brain_unstaged_histology, is_breast,
    is_melanoma_nodal_override, is_prostate, is_ssg2000_blank_window, is_ssg77_blank_window,
};
use crate::context::RecodeContext;
use crate::error::RecordFailure;

/// Clinical outputs in slot order.
const CLINICAL_SLOTS: [RecodeKind; 3] = [
    RecodeKind::Ssg2000,
    RecodeKind::Ssg77,
    RecodeKind::Historic2000,
];

/// Prostate pathological outputs in slot order.
const PROSTATE_SLOTS: [RecodeKind; 3] = [
    RecodeKind::ProstateSsg2000,
    RecodeKind::ProstateSsg77,
    RecodeKind::ProstateHistoric2000,
];

/// Prostate cases diagnosed after this year take the pathological path.
const PROSTATE_PATH_AFTER_YEAR: i64 = 1994;

/// Extension code whose breast recode depends on behavior.
pub(crate) const BREAST_BEHAVIOR_EXTENSION: &str = "05";

/// Node code and extension code of the melanoma nodal override.
const MELANOMA_NODAL_NODES: &str = "3";
const MELANOMA_NODAL_EXTENSION: &str = "99";
/// Recode forced into the overridden extension slot.
pub(crate) const MELANOMA_NODAL_RECODE: &str = "3";

/// Chooses between the clinical and the prostate pathological SSG2000.
///
/// Equal codes stay; an unknown (`"9"`) side yields to the other; otherwise
/// the lexicographically greater code wins.
///
/// ```
/// use stage_engine::reconcile_ssg2000;
///
/// assert_eq!(reconcile_ssg2000("9", "2"), "2");
/// assert_eq!(reconcile_ssg2000("1", "9"), "1");
/// assert_eq!(reconcile_ssg2000("1", "4"), "4");
/// assert_eq!(reconcile_ssg2000("7", "2"), "7");
/// ```
pub fn reconcile_ssg2000<'s>(clinical: &'s str, prostate: &'s str) -> &'s str {
    if clinical == prostate || prostate == UNKNOWN_SUMMARY_STAGE {
        clinical
    } else if clinical == UNKNOWN_SUMMARY_STAGE || prostate > clinical {
        prostate
    } else {
        clinical
    }
}

/// Sentinel for an output that could not be staged.
pub(crate) fn unknown_code(kind: RecodeKind) -> &'static str {
    match kind {
        RecodeKind::Ssg2000
        | RecodeKind::Ssg77
        | RecodeKind::ProstateSsg2000
        | RecodeKind::ProstateSsg77 => UNKNOWN_SUMMARY_STAGE,
        RecodeKind::Pre88Ajcc | RecodeKind::Historic2000 | RecodeKind::ProstateHistoric2000 => {
            UNKNOWN_HISTORIC_STAGE
        }
    }
}

fn stage_table(kind: RecodeKind) -> TableId {
    match kind {
        RecodeKind::Historic2000 | RecodeKind::ProstateHistoric2000 => TableId::Stage,
        _ => TableId::SummaryStage2000,
    }
}

/// True when the melanoma nodal override applies to the record.
pub(crate) fn melanoma_nodal_override(ctx: &RecodeContext<'_>) -> bool {
    is_melanoma_nodal_override(ctx.site_code, ctx.histology_code)
        && ctx.field(RecordField::Nodes) == MELANOMA_NODAL_NODES
        && ctx.field(RecordField::Extension) == MELANOMA_NODAL_EXTENSION
}

/// Clears SSG2000 and SSG77 in the site and year windows where no valid code
/// exists for the histology.
pub(crate) fn apply_blanking(ctx: &mut RecodeContext<'_>) {
    if !is_blanking_histology(ctx.histology_code) {
        return;
    }
    if is_ssg2000_blank_window(ctx.site_code, ctx.year_code) {
        debug!(site = ctx.site, year = ctx.year, "SSG2000 blanked");
        ctx.clear(RecodeKind::Ssg2000);
    }
    if is_ssg77_blank_window(ctx.site_code, ctx.year_code) {
        debug!(site = ctx.site, year = ctx.year, "SSG77 blanked");
        ctx.clear(RecodeKind::Ssg77);
    }
}

/// Resolves SSG2000, SSG77 and HISTORIC2000, plus the prostate outputs for
/// prostate cases after 1994.
pub(crate) fn resolve_summary_stage(ctx: &mut RecodeContext<'_>) {
    let mut prostate_computed = false;

    match clinical_stages(ctx, &mut prostate_computed) {
        Ok(codes) => {
            for (kind, code) in CLINICAL_SLOTS.into_iter().zip(codes) {
                ctx.set(kind, code);
            }
        }
        Err(e) => {
            debug!(error = %e, "summary stage unresolved");
            for kind in CLINICAL_SLOTS {
                ctx.unresolved(kind, unknown_code(kind));
            }
        }
    }

    if prostate_computed {
        let chosen = reconcile_ssg2000(
            ctx.get(RecodeKind::Ssg2000),
            ctx.get(RecodeKind::ProstateSsg2000),
        )
        .to_string();
        ctx.set(RecodeKind::Ssg2000, chosen);
    }

    apply_blanking(ctx);
}

/// All three clinical codes, or the first failure. Nothing is written to the
/// outputs from here except by the prostate path.
fn clinical_stages(
    ctx: &mut RecodeContext<'_>,
    prostate_computed: &mut bool,
) -> Result<[String; 3], RecordFailure> {
    let extension = ctx.field(RecordField::Extension);
    let nodes_key = [ctx.site, ctx.histology, ctx.field(RecordField::Nodes)];
    let nodes = ctx.lookup_triple(TableId::Nodes2000, &nodes_key)?;

    if is_prostate(ctx.site_code) && ctx.year_code > PROSTATE_PATH_AFTER_YEAR {
        *prostate_computed = true;
        resolve_prostate(ctx, &nodes);
    }

    let extension_key = [ctx.year, ctx.site, ctx.histology, extension];
    let mut extensions = ctx.lookup_triple(TableId::Extension2000, &extension_key)?;

    if is_breast(ctx.site_code) && extension == BREAST_BEHAVIOR_EXTENSION {
        let recode = match ctx.field(RecordField::Behavior) {
            BEHAVIOR_IN_SITU => Some("1"),
            BEHAVIOR_MALIGNANT => Some("2"),
            _ => None,
        };
        if let Some(recode) = recode {
            extensions = [recode.to_string(), recode.to_string(), recode.to_string()];
        }
    }
    if melanoma_nodal_override(ctx) {
        extensions[2] = MELANOMA_NODAL_RECODE.to_string();
    }

    let mut codes = stage_codes(ctx, CLINICAL_SLOTS, &extensions, &nodes)?;

    if is_bladder(ctx.site_code) {
        if codes[2] == "00" || codes[2] == "10" {
            codes[2] = BLADDER_HISTORIC_STAGE.to_string();
        }
        if codes[1] == "0" {
            codes[1] = "1".to_string();
        }
    }
    if is_brain(ctx.site_code) && is_brain_unstaged_histology(ctx.histology_code) {
        codes[2] = UNSTAGED_HISTORIC_STAGE.to_string();
    }

    Ok(codes)
}

fn resolve_prostate(ctx: &mut RecodeContext<'_>, nodes: &[String; 3]) {
    let path_extension = ctx.field(RecordField::ProstatePathExtension);
    if path_extension.is_empty() {
        debug!("prostate path extension missing");
        for kind in PROSTATE_SLOTS {
            ctx.set(kind, unknown_code(kind));
        }
        return;
    }

    let result = ctx
        .lookup_triple(TableId::ProstateExtension2000, &[ctx.year, path_extension])
        .map_err(RecordFailure::from)
        .and_then(|extensions| stage_codes(ctx, PROSTATE_SLOTS, &extensions, nodes));
    match result {
        Ok(codes) => {
            for (kind, code) in PROSTATE_SLOTS.into_iter().zip(codes) {
                ctx.set(kind, code);
            }
        }
        Err(e) => {
            debug!(error = %e, "prostate pathological stage unresolved");
            for kind in PROSTATE_SLOTS {
                ctx.unresolved(kind, unknown_code(kind));
            }
        }
    }
}

fn stage_codes(
    ctx: &RecodeContext<'_>,
    slots: [RecodeKind; 3],
    extensions: &[String; 3],
    nodes: &[String; 3],
) -> Result<[String; 3], RecordFailure> {
    let mut codes: [String; 3] = Default::default();
    for (u, kind) in slots.into_iter().enumerate() {
        let key = [extensions[u].as_str(), nodes[u].as_str()];
        codes[u] = ctx.lookup_first(stage_table(kind), &key)?.to_string();
    }
    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recoder::EngineConfig;
    use stage_tables::StageTables;
    use stage_types::{RecodeOutputSet, RecordFields};

    fn make_record(site: &str, histology: &str, year: &str) -> RecordFields {
        RecordFields::default()
            .with(RecordField::PrimarySite, site)
            .with(RecordField::Histology, histology)
            .with(RecordField::YearOfDiagnosis, year)
            .with(RecordField::Extension, "10")
            .with(RecordField::Nodes, "0")
    }

    fn make_tables(site: &str, histology: &str, year: &str) -> StageTables {
        let mut tables = StageTables::new();
        tables
            .insert(TableId::Nodes2000, &[site, histology, "0"], &["0", "0", "0"])
            .unwrap();
        tables
            .insert(TableId::Extension2000, &[year, site, histology, "10"], &["1", "1", "1"])
            .unwrap();
        tables.insert(TableId::SummaryStage2000, &["1", "0"], &["1"]).unwrap();
        tables.insert(TableId::SummaryStage2000, &["2", "0"], &["2"]).unwrap();
        tables.insert(TableId::SummaryStage2000, &["4", "0"], &["4"]).unwrap();
        tables.insert(TableId::Stage, &["1", "0"], &["10"]).unwrap();
        tables.insert(TableId::Stage, &["4", "0"], &["40"]).unwrap();
        tables
    }

    fn summary(tables: &StageTables, record: &RecordFields) -> (RecodeOutputSet, bool) {
        let config = EngineConfig::default();
        let mut ctx = RecodeContext::new(tables, &config, record);
        resolve_summary_stage(&mut ctx);
        let (output, tally) = ctx.finish();
        (output, tally.unresolved)
    }

    #[test]
    fn test_reconcile() {
        assert_eq!(reconcile_ssg2000("2", "2"), "2");
        assert_eq!(reconcile_ssg2000("9", "4"), "4");
        assert_eq!(reconcile_ssg2000("4", "9"), "4");
        assert_eq!(reconcile_ssg2000("2", "7"), "7");
        assert_eq!(reconcile_ssg2000("7", "2"), "7");
        assert_eq!(reconcile_ssg2000("", "9"), "");
        assert_eq!(reconcile_ssg2000("", "1"), "1");
    }

    #[test]
    fn test_clinical_stages() {
        let tables = make_tables("180", "8140", "1996");
        let (output, unresolved) = summary(&tables, &make_record("C180", "8140", "1996"));
        assert_eq!(output.get(RecodeKind::Ssg2000), "1");
        assert_eq!(output.get(RecodeKind::Ssg77), "1");
        assert_eq!(output.get(RecodeKind::Historic2000), "10");
        assert_eq!(output.get(RecodeKind::ProstateSsg2000), "");
        assert!(!unresolved);
    }

    #[test]
    fn test_missing_node_recode_sets_sentinels() {
        let tables = StageTables::new();
        let (output, unresolved) = summary(&tables, &make_record("C180", "8140", "1996"));
        assert_eq!(output.get(RecodeKind::Ssg2000), "9");
        assert_eq!(output.get(RecodeKind::Ssg77), "9");
        assert_eq!(output.get(RecodeKind::Historic2000), "99");
        assert!(unresolved);
    }

    #[test]
    fn test_no_partial_clinical_results() {
        let mut tables = make_tables("180", "8140", "1996");
        tables
            .insert(TableId::Extension2000, &["1996", "180", "8141", "10"], &["1", "1", "3"])
            .unwrap();
        tables
            .insert(TableId::Nodes2000, &["180", "8141", "0"], &["0", "0", "0"])
            .unwrap();
        let (output, unresolved) = summary(&tables, &make_record("C180", "8141", "1996"));
        assert_eq!(output.get(RecodeKind::Ssg2000), "9");
        assert_eq!(output.get(RecodeKind::Historic2000), "99");
        assert!(unresolved);
    }

    #[test]
    fn test_bladder_and_brain_overrides() {
        let tables = make_tables("670", "8120", "1996");
        let (output, _) = summary(&tables, &make_record("C670", "8120", "1996"));
        assert_eq!(output.get(RecodeKind::Historic2000), "11");

        let tables = make_tables("711", "9400", "1996");
        let (output, _) = summary(&tables, &make_record("C711", "9400", "1996"));
        assert_eq!(output.get(RecodeKind::Historic2000), "90");

        let tables = make_tables("711", "9530", "1996");
        let (output, _) = summary(&tables, &make_record("C711", "9530", "1996"));
        assert_eq!(output.get(RecodeKind::Historic2000), "10");
    }

    #[test]
    fn test_breast_behavior_override() {
        let mut tables = make_tables("501", "8500", "1996");
        tables
            .insert(TableId::Extension2000, &["1996", "501", "8500", "05"], &["4", "4", "4"])
            .unwrap();
        let record = make_record("C501", "8500", "1996")
            .with(RecordField::Extension, "05")
            .with(RecordField::Behavior, "2");
        let (output, _) = summary(&tables, &record);
        assert_eq!(output.get(RecodeKind::Ssg2000), "1");

        let record = record.with(RecordField::Behavior, "1");
        let (output, _) = summary(&tables, &record);
        assert_eq!(output.get(RecodeKind::Ssg2000), "4");
    }

    #[test]
    fn test_prostate_path_reconciles() {
        let mut tables = make_tables("619", "8140", "1999");
        tables
            .insert(TableId::ProstateExtension2000, &["1999", "40"], &["4", "4", "4"])
            .unwrap();
        let record = make_record("C619", "8140", "1999").with(RecordField::ProstatePathExtension, "40");
        let (output, unresolved) = summary(&tables, &record);
        assert_eq!(output.get(RecodeKind::ProstateSsg2000), "4");
        assert_eq!(output.get(RecodeKind::ProstateSsg77), "4");
        assert_eq!(output.get(RecodeKind::ProstateHistoric2000), "40");
        assert_eq!(output.get(RecodeKind::Ssg2000), "4");
        assert_eq!(output.get(RecodeKind::Ssg77), "1");
        assert!(!unresolved);
    }

    #[test]
    fn test_prostate_blank_path_is_not_counted() {
        let tables = make_tables("619", "8140", "1999");
        let record = make_record("C619", "8140", "1999");
        let config = EngineConfig::default();
        let mut ctx = RecodeContext::new(&tables, &config, &record);
        resolve_summary_stage(&mut ctx);
        let (output, tally) = ctx.finish();
        assert_eq!(output.get(RecodeKind::ProstateSsg2000), "9");
        assert_eq!(output.get(RecodeKind::ProstateHistoric2000), "99");
        assert_eq!(output.get(RecodeKind::Ssg2000), "1");
        assert!(!tally.unresolved);
        assert_eq!(tally.counts[RecodeKind::ProstateSsg2000.index()], 0);
    }

    #[test]
    fn test_prostate_failure_is_counted() {
        let tables = make_tables("619", "8140", "1999");
        let record = make_record("C619", "8140", "1999").with(RecordField::ProstatePathExtension, "77");
        let config = EngineConfig::default();
        let mut ctx = RecodeContext::new(&tables, &config, &record);
        resolve_summary_stage(&mut ctx);
        let (output, tally) = ctx.finish();
        assert_eq!(output.get(RecodeKind::ProstateSsg77), "9");
        assert_eq!(tally.counts[RecodeKind::ProstateHistoric2000.index()], 1);
        assert!(tally.unresolved);
    }

    #[test]
    fn test_blanking_overrides_table_result() {
        let tables = make_tables("080", "8050", "1990");
        let (output, _) = summary(&tables, &make_record("C080", "8050", "1990"));
        assert_eq!(output.get(RecodeKind::Ssg2000), "");
        assert_eq!(output.get(RecodeKind::Ssg77), "1");
    }

    #[test]
    fn test_melanoma_nodal_override_slot() {
        let mut tables = StageTables::new();
        tables
            .insert(TableId::Nodes2000, &["445", "8720", "3"], &["0", "0", "0"])
            .unwrap();
        tables
            .insert(TableId::Extension2000, &["1996", "445", "8720", "99"], &["1", "1", "1"])
            .unwrap();
        tables.insert(TableId::SummaryStage2000, &["1", "0"], &["1"]).unwrap();
        tables.insert(TableId::Stage, &["3", "0"], &["20"]).unwrap();
        let record = make_record("C445", "8720", "1996")
            .with(RecordField::Extension, "99")
            .with(RecordField::Nodes, "3");
        let (output, unresolved) = summary(&tables, &record);
        assert_eq!(output.get(RecodeKind::Historic2000), "20");
        assert!(!unresolved);
    }
}
