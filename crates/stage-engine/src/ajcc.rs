//! Pre-1988 AJCC stage for EOD schemes 0 through 3.

use stage_tables::TableId;
use stage_types::well_known::{AJCC_LAST_YEAR_EXCLUSIVE, UNKNOWN_HISTORIC_STAGE};
use stage_types::{RecodeKind, RecordField};
use tracing::debug;

use crate::classify::{
    is_bladder, is_breast, is_malignant_melanoma, is_scheme2_melanoma_site, is_staged_histology,
    EOD0_AJCC_SITES,
};
use crate::context::RecodeContext;
use crate::derive::{atoi, digit, digits};
use crate::fallback::FallbackChain;
use crate::historic::LegacyRecodes;

/// Builds the ordered AJCC lookup attempts for a record.
///
/// At most one of the scheme 0 and scheme 1-3 direct lookups applies; the
/// breast, melanoma, bladder and generic lookups follow as the single
/// fallback for schemes 3 and 2.
fn ajcc_chain(ctx: &RecodeContext<'_>, scheme: &str, recodes: &LegacyRecodes) -> FallbackChain {
    let staged = is_staged_histology(ctx.histology_code);
    let extension = recodes.extension.as_str();
    let nodes = recodes.nodes.as_str();
    let mut chain = FallbackChain::new();

    if scheme == "0" && EOD0_AJCC_SITES.contains(&ctx.site_code) && staged {
        let two_digit = ctx.field(RecordField::Old2Digit);
        chain = chain.then(TableId::Eod0Ajcc, digits(two_digit, &[1, 2]));
    } else if staged && (1..=3).contains(&atoi(scheme)) {
        chain = chain.then(TableId::Eod1To3Ajcc, [ctx.site, extension, nodes]);
    }

    if scheme == "3" && is_breast(ctx.site_code) {
        chain = chain.then(
            TableId::Eod3AjccBreast,
            [ctx.histology, ctx.field(RecordField::Old4DigitSize), extension, nodes],
        );
    } else if scheme == "2" {
        let code = ctx.field(RecordField::Old13Digit);
        if is_scheme2_melanoma_site(ctx.site_code) && is_malignant_melanoma(ctx.histology_code) {
            chain = chain.then(
                TableId::Eod2AjccMelanoma,
                digits(code, &[2, 5, 6, 9, 10, 11, 12, 13]),
            );
        } else if staged && is_bladder(ctx.site_code) {
            chain = chain.then(
                TableId::Eod2AjccBladder,
                digits(code, &[5, 6, 7, 9, 10, 11, 12, 13]),
            );
        } else {
            chain = chain.then(
                TableId::Eod2AjccFromExtNodes,
                [ctx.site, ctx.histology, digit(code, 1), digit(code, 2), extension, nodes],
            );
        }
    }

    chain
}

/// Resolves PRE88AJCC.
///
/// Records the gate table does not list keep a blank AJCC. Otherwise the
/// first matching attempt wins; with no match, records diagnosed before 1988
/// are unresolved and later ones stay blank.
pub(crate) fn resolve_ajcc(ctx: &mut RecodeContext<'_>, scheme: &str, recodes: &LegacyRecodes) {
    let gate = [scheme, ctx.histology, ctx.site];
    if ctx.lookup_first(TableId::AjccShouldBeCoded, &gate).is_err() {
        debug!(scheme, "AJCC stage not coded for record");
        return;
    }

    match ajcc_chain(ctx, scheme, recodes).resolve(ctx.tables()) {
        Some(resolved) => {
            debug!(table = resolved.table.name(), stage = resolved.value, "AJCC stage resolved");
            ctx.set(RecodeKind::Pre88Ajcc, resolved.value);
        }
        None if ctx.year_code < AJCC_LAST_YEAR_EXCLUSIVE => {
            ctx.unresolved(RecodeKind::Pre88Ajcc, UNKNOWN_HISTORIC_STAGE);
        }
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recoder::EngineConfig;
    use stage_tables::StageTables;
    use stage_types::RecordFields;

    fn make_record(site: &str, histology: &str, year: &str) -> RecordFields {
        RecordFields::default()
            .with(RecordField::PrimarySite, site)
            .with(RecordField::Histology, histology)
            .with(RecordField::YearOfDiagnosis, year)
            .with(RecordField::Old2Digit, "12")
            .with(RecordField::Old13Digit, "1234567890123")
    }

    fn make_recodes(extension: &str, nodes: &str) -> LegacyRecodes {
        LegacyRecodes {
            extension: extension.to_string(),
            nodes: nodes.to_string(),
        }
    }

    fn ajcc(tables: &StageTables, record: &RecordFields, scheme: &str, recodes: &LegacyRecodes) -> (String, bool) {
        let config = EngineConfig::default();
        let mut ctx = RecodeContext::new(tables, &config, record);
        resolve_ajcc(&mut ctx, scheme, recodes);
        let (output, tally) = ctx.finish();
        (output.get(RecodeKind::Pre88Ajcc).to_string(), tally.unresolved)
    }

    fn gated(scheme: &str, histology: &str, site: &str) -> StageTables {
        let mut tables = StageTables::new();
        tables
            .insert(TableId::AjccShouldBeCoded, &[scheme, histology, site], &["1"])
            .unwrap();
        tables
    }

    #[test]
    fn test_gate_miss_leaves_blank() {
        let tables = StageTables::new();
        let (code, unresolved) = ajcc(&tables, &make_record("C180", "8140", "1980"), "0", &LegacyRecodes::default());
        assert_eq!(code, "");
        assert!(!unresolved);
    }

    #[test]
    fn test_scheme0_direct() {
        let mut tables = gated("0", "8140", "100");
        tables.insert(TableId::Eod0Ajcc, &["1", "2"], &["20"]).unwrap();
        let (code, _) = ajcc(&tables, &make_record("C100", "8140", "1980"), "0", &LegacyRecodes::default());
        assert_eq!(code, "20");
    }

    #[test]
    fn test_unresolved_before_1988_only() {
        let tables = gated("1", "8140", "180");
        let recodes = make_recodes("1", "0");
        let (code, unresolved) = ajcc(&tables, &make_record("C180", "8140", "1987"), "1", &recodes);
        assert_eq!(code, "99");
        assert!(unresolved);

        let tables = gated("1", "8140", "180");
        let (code, unresolved) = ajcc(&tables, &make_record("C180", "8140", "1988"), "1", &recodes);
        assert_eq!(code, "");
        assert!(!unresolved);
    }

    #[test]
    fn test_scheme3_breast_fallback() {
        let mut tables = gated("3", "8500", "501");
        tables
            .insert(TableId::Eod3AjccBreast, &["8500", "025", "10", "0"], &["21"])
            .unwrap();
        let record = make_record("C501", "8500", "1985").with(RecordField::Old4DigitSize, "025");
        let (code, unresolved) = ajcc(&tables, &record, "3", &make_recodes("10", "0"));
        assert_eq!(code, "21");
        assert!(!unresolved);
    }

    #[test]
    fn test_scheme2_direct_wins_over_fallback() {
        let mut tables = gated("2", "8140", "180");
        tables.insert(TableId::Eod1To3Ajcc, &["180", "1", "0"], &["10"]).unwrap();
        tables
            .insert(TableId::Eod2AjccFromExtNodes, &["180", "8140", "1", "2", "1", "0"], &["30"])
            .unwrap();
        let (code, _) = ajcc(&tables, &make_record("C180", "8140", "1985"), "2", &make_recodes("1", "0"));
        assert_eq!(code, "10");
    }

    #[test]
    fn test_scheme2_fallbacks() {
        let mut tables = gated("2", "8140", "180");
        tables
            .insert(TableId::Eod2AjccFromExtNodes, &["180", "8140", "1", "2", "1", "0"], &["30"])
            .unwrap();
        let (code, _) = ajcc(&tables, &make_record("C180", "8140", "1985"), "2", &make_recodes("1", "0"));
        assert_eq!(code, "30");

        let mut tables = gated("2", "8720", "445");
        tables
            .insert(TableId::Eod2AjccMelanoma, &["2", "5", "6", "9", "0", "1", "2", "3"], &["11"])
            .unwrap();
        let (code, _) = ajcc(&tables, &make_record("C445", "8720", "1985"), "2", &make_recodes("1", "0"));
        assert_eq!(code, "11");

        let mut tables = gated("2", "8120", "672");
        tables
            .insert(TableId::Eod2AjccBladder, &["5", "6", "7", "9", "0", "1", "2", "3"], &["12"])
            .unwrap();
        let (code, _) = ajcc(&tables, &make_record("C672", "8120", "1985"), "2", &make_recodes("1", "0"));
        assert_eq!(code, "12");
    }

    #[test]
    fn test_scheme0_failed_direct_does_not_try_schemes_1_to_3() {
        let mut tables = gated("0", "8140", "100");
        tables.insert(TableId::Eod1To3Ajcc, &["100", "", ""], &["10"]).unwrap();
        let (code, unresolved) = ajcc(&tables, &make_record("C100", "8140", "1980"), "0", &LegacyRecodes::default());
        assert_eq!(code, "99");
        assert!(unresolved);
    }
}
