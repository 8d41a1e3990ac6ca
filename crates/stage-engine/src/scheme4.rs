//! EOD coding scheme 4 (modern EOD).

use stage_tables::TableId;
use stage_types::well_known::{
    BEHAVIOR_IN_SITU, DEATH_CERTIFICATE_ONLY, DISTANT_HISTORIC_STAGE, LOS_ANGELES_REGISTRY,
    UNKNOWN_SUMMARY_STAGE, UNSTAGED_HISTORIC_STAGE,
};
use stage_types::{RecodeKind, RecordField};
use tracing::{debug, trace, warn};

use crate::classify::is_breast;
use crate::context::RecodeContext;
use crate::derive::{atoi, is_integer};
use crate::summary::{
    apply_blanking, melanoma_nodal_override, resolve_summary_stage, unknown_code,
    BREAST_BEHAVIOR_EXTENSION, MELANOMA_NODAL_RECODE,
};

/// Years the Los Angeles registry reported no EOD codes.
const LOS_ANGELES_NO_EOD_YEARS: std::ops::RangeInclusive<i64> = 1988..=1991;

const SUMMARY_SLOTS: [RecodeKind; 3] = [
    RecodeKind::Ssg2000,
    RecodeKind::Ssg77,
    RecodeKind::Historic2000,
];

/// Extension and node recodes from the legacy LRD tables. Blank where the
/// tables have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct LegacyStageRecodes {
    pub extension: [String; 3],
    pub nodes: [String; 3],
}

pub(crate) fn resolve_scheme4(ctx: &mut RecodeContext<'_>) {
    if atoi(ctx.field(RecordField::Registry)) == LOS_ANGELES_REGISTRY
        && LOS_ANGELES_NO_EOD_YEARS.contains(&ctx.year_code)
    {
        debug!(year = ctx.year, "registry without EOD codes, outputs left blank");
        for kind in SUMMARY_SLOTS {
            ctx.clear(kind);
        }
        return;
    }

    let extension = ctx.field(RecordField::Extension);
    let nodes = ctx.field(RecordField::Nodes);
    if !is_integer(ctx.year) || !is_integer(extension) || !is_integer(nodes) {
        warn!(
            year = ctx.year,
            extension, nodes, "malformed EOD fields, summary stages unresolved"
        );
        for kind in SUMMARY_SLOTS {
            ctx.unresolved(kind, unknown_code(kind));
        }
        return;
    }

    if ctx.field(RecordField::ReportingSource) == DEATH_CERTIFICATE_ONLY {
        resolve_death_certificate_only(ctx);
        return;
    }

    let legacy = legacy_recodes(ctx);
    trace!(extension = ?legacy.extension, nodes = ?legacy.nodes, "legacy LRD recodes");

    resolve_summary_stage(ctx);
}

fn resolve_death_certificate_only(ctx: &mut RecodeContext<'_>) {
    debug!("death certificate only case");
    ctx.set(RecodeKind::Ssg2000, UNKNOWN_SUMMARY_STAGE);
    ctx.set(RecodeKind::Ssg77, UNKNOWN_SUMMARY_STAGE);
    ctx.set(RecodeKind::Historic2000, UNSTAGED_HISTORIC_STAGE);
    ctx.set(RecodeKind::ProstateSsg2000, UNKNOWN_SUMMARY_STAGE);
    ctx.set(RecodeKind::ProstateSsg77, UNKNOWN_SUMMARY_STAGE);
    ctx.set(RecodeKind::ProstateHistoric2000, UNSTAGED_HISTORIC_STAGE);

    apply_blanking(ctx);

    if ctx.leukemia {
        ctx.set(RecodeKind::Historic2000, DISTANT_HISTORIC_STAGE);
    }
}

pub(crate) fn legacy_recodes(ctx: &RecodeContext<'_>) -> LegacyStageRecodes {
    let extension = ctx.field(RecordField::Extension);
    let nodes = ctx.field(RecordField::Nodes);

    let mut recodes = LegacyStageRecodes {
        extension: ctx
            .lookup_triple(
                TableId::LegacyExtensionRecode,
                &[ctx.year, ctx.site, ctx.histology, extension],
            )
            .unwrap_or_default(),
        nodes: ctx
            .lookup_triple(TableId::LegacyNodeRecode, &[ctx.site, ctx.histology, nodes])
            .unwrap_or_default(),
    };

    if is_breast(ctx.site_code) && extension == BREAST_BEHAVIOR_EXTENSION {
        let recode = if ctx.field(RecordField::Behavior) == BEHAVIOR_IN_SITU {
            "1"
        } else {
            "2"
        };
        recodes.extension = [recode.to_string(), recode.to_string(), recode.to_string()];
    }
    if melanoma_nodal_override(ctx) {
        recodes.extension[1] = MELANOMA_NODAL_RECODE.to_string();
    }

    recodes
}
