//! Historic Stage resolvers for EOD coding schemes 0 through 3.
//!
//! Each resolver writes HISTORIC2000 and returns the extension and nodes
//! recodes it derived, which the pre-1988 AJCC resolver keys on afterwards.
//! A scheme that derives none leaves both empty.

use stage_tables::TableId;
use stage_types::well_known::{
    DISTANT_HISTORIC_STAGE, UNKNOWN_HISTORIC_STAGE, UNKNOWN_RECODE, UNSTAGED_LYMPHOMA_LEUKEMIA,
};
use stage_types::{RecodeKind, RecordField};
use tracing::debug;

use crate::classify::{
    is_bladder, is_lung, is_lymphoma_leukemia, is_malignant_melanoma, is_scheme2_melanoma_site,
    is_staged_histology, SCHEME3_DISTANT_OVERRIDE_SITE,
};
use crate::context::RecodeContext;
use crate::derive::{atoi, digit, digits, is_integer};
use crate::fallback::FallbackChain;

/// Legacy size code that, with a positive extension, forces site 569 distant.
const SCHEME3_DISTANT_SIZE: &str = "02";

/// Extension and nodes recodes derived by a legacy scheme.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct LegacyRecodes {
    pub extension: String,
    pub nodes: String,
}

/// Historic stage patch table keyed by (reporting source, site, histology).
///
/// Returns true if the patch table supplied HISTORIC2000.
pub(crate) fn resolve_patch(ctx: &mut RecodeContext<'_>) -> bool {
    let key = [ctx.field(RecordField::ReportingSource), ctx.site, ctx.histology];
    match ctx.lookup_first(TableId::HistoricStagePatch, &key) {
        Ok(code) => {
            debug!(code, "historic stage patched");
            ctx.set(RecodeKind::Historic2000, code);
            true
        }
        Err(_) => false,
    }
}

/// Runs the resolver for a scheme 0 to 3 coding system value.
///
/// Unknown coding systems run nothing and derive nothing.
pub(crate) fn resolve_scheme(ctx: &mut RecodeContext<'_>, scheme: &str) -> LegacyRecodes {
    match scheme {
        "3" => resolve_scheme3(ctx),
        "2" => resolve_scheme2(ctx),
        "1" => resolve_scheme1(ctx),
        "0" => {
            resolve_scheme0(ctx);
            LegacyRecodes::default()
        }
        other => {
            debug!(scheme = other, "no historic stage resolver for coding system");
            LegacyRecodes::default()
        }
    }
}

// =============================================================================
// Scheme 0
// =============================================================================

pub(crate) fn resolve_scheme0(ctx: &mut RecodeContext<'_>) {
    let two_digit = ctx.field(RecordField::Old2Digit);
    let key = [ctx.site, ctx.histology, digit(two_digit, 1), digit(two_digit, 2)];
    match ctx.lookup_first(TableId::Eod0HistoricStage, &key) {
        Ok(code) => ctx.set(RecodeKind::Historic2000, code),
        Err(_) => ctx.unresolved(RecodeKind::Historic2000, UNKNOWN_HISTORIC_STAGE),
    }
}

// =============================================================================
// Scheme 1
// =============================================================================

pub(crate) fn resolve_scheme1(ctx: &mut RecodeContext<'_>) -> LegacyRecodes {
    let two_digit = ctx.field(RecordField::Old2Digit);
    let (d1, d2) = (digit(two_digit, 1), digit(two_digit, 2));
    let mut recodes = LegacyRecodes::default();

    recodes.extension = ctx
        .lookup_first(TableId::Eod1Extension, &[ctx.histology, ctx.site, d1, d2])
        .unwrap_or(UNKNOWN_RECODE)
        .to_string();

    if is_staged_histology(ctx.histology_code) {
        recodes.nodes = ctx
            .lookup_first(TableId::Eod1Nodes, &[ctx.site, d1, d2])
            .unwrap_or(UNKNOWN_RECODE)
            .to_string();
    }

    let chain = FallbackChain::new()
        .then(TableId::Eod1HistoricStageDirect, [ctx.site, ctx.histology, d1, d2])
        .then(
            TableId::Eod1HistoricStageFromExtNodes,
            [ctx.site, ctx.histology, recodes.extension.as_str(), recodes.nodes.as_str()],
        );
    match chain.resolve(ctx.tables()) {
        Some(resolved) => ctx.set(RecodeKind::Historic2000, resolved.value),
        None => ctx.unresolved(RecodeKind::Historic2000, UNKNOWN_HISTORIC_STAGE),
    }

    recodes
}

// =============================================================================
// Scheme 2
// =============================================================================

pub(crate) fn resolve_scheme2(ctx: &mut RecodeContext<'_>) -> LegacyRecodes {
    let mut recodes = LegacyRecodes::default();

    if is_lymphoma_leukemia(ctx.histology_code) {
        ctx.set(RecodeKind::Historic2000, UNSTAGED_LYMPHOMA_LEUKEMIA);
        return recodes;
    }
    if !is_staged_histology(ctx.histology_code) {
        ctx.unresolved(RecodeKind::Historic2000, UNKNOWN_HISTORIC_STAGE);
        return recodes;
    }

    let code = ctx.field(RecordField::Old13Digit);
    let d = |position: usize| digit(code, position);

    let mut nodes_key = vec![ctx.site];
    nodes_key.extend(digits(code, &[7, 8, 9, 10, 11, 12]));
    recodes.nodes = ctx
        .lookup_first(TableId::Eod2Nodes, nodes_key.as_slice())
        .unwrap_or(UNKNOWN_RECODE)
        .to_string();

    let extension_key = [ctx.site, d(4), d(5), d(6), d(7), d(8), d(13)];
    recodes.extension = ctx
        .lookup_first(TableId::Eod2Extension, &extension_key)
        .unwrap_or(UNKNOWN_RECODE)
        .to_string();

    let (table, key): (TableId, Vec<&str>) = if is_lung(ctx.site_code) {
        (TableId::Eod2HistoricStageLung, digits(code, &[4, 5, 6, 7, 8, 9, 10, 11, 12, 13]))
    } else if is_scheme2_melanoma_site(ctx.site_code) && is_malignant_melanoma(ctx.histology_code) {
        let mut key = vec![ctx.site];
        key.extend(digits(code, &[5, 6, 9, 10, 11, 12, 13]));
        (TableId::Eod2HistoricStageMelanoma, key)
    } else if is_bladder(ctx.site_code) {
        (TableId::Eod2HistoricStageBladder, digits(code, &[5, 6, 7, 9, 10, 11, 12, 13]))
    } else {
        (
            TableId::Eod2HistoricStageFromExtNodes,
            vec![ctx.site, recodes.extension.as_str(), recodes.nodes.as_str()],
        )
    };
    debug!(table = table.name(), "scheme 2 historic stage table selected");

    match ctx.lookup_first(table, key.as_slice()) {
        Ok(stage) => ctx.set(RecodeKind::Historic2000, stage),
        Err(_) => ctx.unresolved(RecodeKind::Historic2000, UNKNOWN_HISTORIC_STAGE),
    }

    recodes
}

// =============================================================================
// Scheme 3
// =============================================================================

pub(crate) fn resolve_scheme3(ctx: &mut RecodeContext<'_>) -> LegacyRecodes {
    let integer_or_unknown = |value: &str| {
        if is_integer(value) {
            value.to_string()
        } else {
            UNKNOWN_RECODE.to_string()
        }
    };
    let recodes = LegacyRecodes {
        extension: integer_or_unknown(ctx.field(RecordField::Old4DigitExtent)),
        nodes: integer_or_unknown(ctx.field(RecordField::Old4DigitNodes)),
    };

    let key = [ctx.histology, ctx.site, recodes.extension.as_str(), recodes.nodes.as_str()];
    match ctx.lookup_first(TableId::Eod3HistoricStage, &key) {
        Ok(stage) => ctx.set(RecodeKind::Historic2000, stage),
        Err(_) => ctx.unresolved(RecodeKind::Historic2000, UNKNOWN_HISTORIC_STAGE),
    }

    if ctx.site == SCHEME3_DISTANT_OVERRIDE_SITE
        && ctx.field(RecordField::Old4DigitSize) == SCHEME3_DISTANT_SIZE
        && atoi(&recodes.extension) > 0
    {
        debug!("scheme 3 site 569 forced distant");
        ctx.set(RecodeKind::Historic2000, DISTANT_HISTORIC_STAGE);
    }

    recodes
}
