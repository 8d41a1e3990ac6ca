//! Historic Stage for Collaborative Stage era records (diagnosed 2004 on).
//!
//! The CS extension, lymph nodes and mets at diagnosis are each recoded to a
//! [`CsRecode`] category through their schema tables, with schema-specific
//! overrides on the extension, and the three categories key the CS historic
//! stage table.

use std::borrow::Cow;

use stage_tables::{LookupError, TableId};
use stage_types::well_known::{
    BEHAVIOR_IN_SITU, BEHAVIOR_MALIGNANT, CS_UNRESOLVED_HISTORIC_STAGE,
};
use stage_types::{CsRecode, RecodeKind, RecordField};
use tracing::{debug, warn};

use crate::classify::{is_cs_longevity_site, CS_LONGEVITY_EXTENSION, CS_LONGEVITY_HISTOLOGIES};
use crate::context::RecodeContext;
use crate::derive::{atoi, is_integer, repad_cs_extension, repad_cs_mets, repad_cs_nodes};
use crate::error::RecordFailure;

/// Corpus uteri schema whose localized extension moves to regional with SSF2 010.
const CORPUS_SCHEMA: i64 = 62;
const CORPUS_REGIONAL_SSF2: [&str; 2] = ["010", "10"];
/// Breast schema whose extensions 050 and 070 depend on behavior.
const BREAST_SCHEMA: i64 = 58;
const BREAST_BEHAVIOR_EXTENSIONS: [i64; 2] = [50, 70];
/// Pleura schema with the extension by SSF1 switch.
const PLEURA_SCHEMA: i64 = 49;

/// Extension category for the pleura schema, from the CS extension and SSF1.
///
/// Returns `None` for any combination outside the enumerated extension ranges
/// (100-305, 420-650, 690-850, 950-999) and SSF1 values (000, 010, 020, 030,
/// 999).
///
/// ```
/// use stage_engine::pleura_extension_recode;
/// use stage_types::CsRecode;
///
/// assert_eq!(pleura_extension_recode(150, 20), Some(CsRecode::Distant));
/// assert_eq!(pleura_extension_recode(500, 0), Some(CsRecode::RegionalExtension));
/// assert_eq!(pleura_extension_recode(500, 50), None);
/// ```
pub fn pleura_extension_recode(extension: i64, ssf1: i64) -> Option<CsRecode> {
    let pleural_invasion = match ssf1 {
        0 | 10 | 999 => false,
        20 | 30 => true,
        _ => return None,
    };
    let recode = match extension {
        100..=305 => CsRecode::Localized,
        420..=650 => CsRecode::RegionalExtension,
        690..=850 => CsRecode::Distant,
        950..=999 => CsRecode::Unknown,
        _ => return None,
    };
    Some(if pleural_invasion { CsRecode::Distant } else { recode })
}

/// Resolves HISTORIC2000 from the CS fields.
///
/// Any failure sets the CS fallback code and marks the record without
/// counting it against an output.
pub(crate) fn resolve_collaborative_stage(ctx: &mut RecodeContext<'_>) {
    match collaborative_stage(ctx) {
        Ok(stage) => ctx.set(RecodeKind::Historic2000, stage),
        Err(e) => {
            match &e {
                RecordFailure::Lookup(_) => debug!(error = %e, "collaborative stage unresolved"),
                _ => warn!(error = %e, "collaborative stage input rejected"),
            }
            ctx.set(RecodeKind::Historic2000, CS_UNRESOLVED_HISTORIC_STAGE);
            ctx.mark_unresolved();
        }
    }
}

fn collaborative_stage<'a>(ctx: &RecodeContext<'a>) -> Result<&'a str, RecordFailure> {
    let version = ctx.config().cs_version;
    let schema = ctx.field(RecordField::CsSchema);
    let extension = repad_cs_extension(ctx.field(RecordField::CsExtension), version);
    let nodes = repad_cs_nodes(ctx.field(RecordField::CsNodes), version);
    let mets = repad_cs_mets(ctx.field(RecordField::CsMets), version);

    let extension_recode = extension_recode(ctx, schema, &extension)?;
    let nodes_recode = ctx.lookup_first(TableId::CsNodes, &[schema, &*nodes])?;
    let mets_recode = ctx.lookup_first(TableId::CsMets, &[schema, &*mets])?;

    let stage = ctx.lookup_first(
        TableId::CsHistoricStage,
        &[&*extension_recode, nodes_recode, mets_recode],
    )?;
    debug!(
        extension = %extension_recode,
        nodes = nodes_recode,
        mets = mets_recode,
        stage,
        "collaborative stage resolved"
    );
    Ok(stage)
}

/// Extension recode after the schema overrides. The overrides apply even
/// when the extension table has no row; only a recode still missing after
/// them is a lookup failure.
fn extension_recode<'a>(
    ctx: &RecodeContext<'a>,
    schema: &str,
    extension: &str,
) -> Result<Cow<'a, str>, RecordFailure> {
    let mut recode = match ctx.lookup_first(TableId::CsExtension, &[schema, extension]) {
        Ok(value) => Some(Cow::Borrowed(value)),
        Err(e) if e.is_no_match() => None,
        Err(e) => return Err(e.into()),
    };

    let schema_code = atoi(schema);
    let extension_code = atoi(extension);

    if CS_LONGEVITY_HISTOLOGIES.contains(&ctx.histology_code)
        && extension_code == CS_LONGEVITY_EXTENSION
        && is_cs_longevity_site(ctx.site_code)
    {
        recode = Some(Cow::Borrowed(CsRecode::Unknown.code()));
    }

    if schema_code == CORPUS_SCHEMA
        && recode.as_deref() == Some(CsRecode::Localized.code())
        && CORPUS_REGIONAL_SSF2.contains(&ctx.field(RecordField::CsSiteSpecificFactor2))
    {
        recode = Some(Cow::Borrowed(CsRecode::RegionalExtension.code()));
    }

    if schema_code == BREAST_SCHEMA && BREAST_BEHAVIOR_EXTENSIONS.contains(&extension_code) {
        recode = match ctx.field(RecordField::Behavior) {
            BEHAVIOR_IN_SITU => Some(Cow::Borrowed(CsRecode::InSitu.code())),
            BEHAVIOR_MALIGNANT => Some(Cow::Borrowed(CsRecode::Localized.code())),
            other => {
                return Err(RecordFailure::BadBreastBehavior {
                    behavior: other.to_string(),
                })
            }
        };
    }

    if schema_code == PLEURA_SCHEMA {
        let ssf1 = ctx.field(RecordField::CsSiteSpecificFactor1);
        let pleura = (is_integer(extension) && is_integer(ssf1))
            .then(|| pleura_extension_recode(extension_code, atoi(ssf1)))
            .flatten()
            .ok_or_else(|| RecordFailure::BadPleuraExtension {
                extension: extension.to_string(),
                ssf1: ssf1.to_string(),
            })?;
        recode = Some(Cow::Borrowed(pleura.code()));
    }

    recode.ok_or(RecordFailure::Lookup(LookupError::NoMatch {
        table: TableId::CsExtension.name(),
    }))
}
