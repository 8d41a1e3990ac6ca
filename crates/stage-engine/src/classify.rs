//! Site and histology classifiers.
//!
//! Bounds are inclusive unless the predicate says otherwise. Sites are the
//! numeric part of the primary site code, histologies the ICD-O code.

use std::ops::RangeInclusive;

// =============================================================================
// Site Ranges
// =============================================================================

/// Brain sites.
pub const BRAIN_SITES: RangeInclusive<i64> = 710..=719;
/// Breast sites.
pub const BREAST_SITES: RangeInclusive<i64> = 500..=509;
/// Lung sites.
pub const LUNG_SITES: RangeInclusive<i64> = 340..=349;
/// Bladder sites.
pub const BLADDER_SITES: RangeInclusive<i64> = 670..=679;
/// Vulva sites.
pub const VULVA_SITES: RangeInclusive<i64> = 510..=519;
/// Prostate site.
pub const PROSTATE_SITE: i64 = 619;
/// Site whose scheme 3 size/extension combination forces distant stage.
pub const SCHEME3_DISTANT_OVERRIDE_SITE: &str = "569";
/// Sites eligible for the scheme 0 AJCC lookup.
pub const EOD0_AJCC_SITES: RangeInclusive<i64> = 0..=149;

// =============================================================================
// Histology Ranges
// =============================================================================

/// Histologies staged by the EOD tables.
pub const STAGED_HISTOLOGY: RangeInclusive<i64> = 8000..=9589;
/// Lymphoma and leukemia family, unstaged.
pub const LYMPHOMA_LEUKEMIA_HISTOLOGY: RangeInclusive<i64> = 9590..=9979;
/// Malignant melanoma histologies.
pub const MELANOMA_HISTOLOGY: RangeInclusive<i64> = 8720..=8799;
/// Melanoma histologies for the nodal extension override.
pub const MELANOMA_NODAL_HISTOLOGY: RangeInclusive<i64> = 8720..=8790;
/// Histology recoded to unstaged through 1983.
pub const EARLY_UNSTAGED_HISTOLOGY: &str = "9140";
/// Last diagnosis year with histology 9140 unstaged.
pub const EARLY_UNSTAGED_LAST_YEAR: i64 = 1983;
/// Histologies where the CS longevity override applies.
pub const CS_LONGEVITY_HISTOLOGIES: [i64; 2] = [9823, 9827];
/// CS extension where the longevity override applies.
pub const CS_LONGEVITY_EXTENSION: i64 = 800;

/// Returns true for brain sites.
pub fn is_brain(site: i64) -> bool {
    BRAIN_SITES.contains(&site)
}

/// Returns true for breast sites.
pub fn is_breast(site: i64) -> bool {
    BREAST_SITES.contains(&site)
}

/// Returns true for lung sites.
pub fn is_lung(site: i64) -> bool {
    LUNG_SITES.contains(&site)
}

/// Returns true for bladder sites.
pub fn is_bladder(site: i64) -> bool {
    BLADDER_SITES.contains(&site)
}

/// Returns true for vulva sites.
pub fn is_vulva(site: i64) -> bool {
    VULVA_SITES.contains(&site)
}

/// Returns true for the prostate site.
pub fn is_prostate(site: i64) -> bool {
    site == PROSTATE_SITE
}

/// Returns true for malignant melanoma histologies.
pub fn is_malignant_melanoma(histology: i64) -> bool {
    MELANOMA_HISTOLOGY.contains(&histology)
}

/// Returns true for histologies staged by the EOD tables.
pub fn is_staged_histology(histology: i64) -> bool {
    STAGED_HISTOLOGY.contains(&histology)
}

/// Returns true for the lymphoma and leukemia family.
pub fn is_lymphoma_leukemia(histology: i64) -> bool {
    LYMPHOMA_LEUKEMIA_HISTOLOGY.contains(&histology)
}

/// Sites routed to the scheme 2 melanoma tables.
pub fn is_scheme2_melanoma_site(site: i64) -> bool {
    (440..=447).contains(&site) || is_vulva(site) || matches!(site, 600 | 601 | 608 | 609)
}

/// Site and histology combination for the melanoma nodal override, before
/// the nodes and extension checks.
pub fn is_melanoma_nodal_override(site: i64, histology: i64) -> bool {
    let site_match = (440..=449).contains(&site)
        || (510..=519).contains(&site)
        || (600..=602).contains(&site)
        || (608..=609).contains(&site)
        || site == 632;
    site_match && MELANOMA_NODAL_HISTOLOGY.contains(&histology)
}

/// Histologies subject to the summary stage blanking rules:
/// 8000-9139 and 9141-9589.
pub fn is_blanking_histology(histology: i64) -> bool {
    (8000..=9139).contains(&histology) || (9141..=9589).contains(&histology)
}

/// Site and year windows with no valid SSG2000 code.
pub fn is_ssg2000_blank_window(site: i64, year: i64) -> bool {
    let mouth = (79..=81).contains(&site) || (88..=89).contains(&site);
    (mouth && (1984..=1997).contains(&year))
        || ((90..=109).contains(&site) && (1984..=1988).contains(&year))
        || (site == PROSTATE_SITE && (1984..=1997).contains(&year))
}

/// Site and year windows with no valid SSG77 code.
pub fn is_ssg77_blank_window(site: i64, year: i64) -> bool {
    site == PROSTATE_SITE && year < 1995
}

/// Brain histologies whose historic stage is forced to unstaged:
/// below 9530, or strictly between 9539 and 9590.
pub fn is_brain_unstaged_histology(histology: i64) -> bool {
    histology < 9530 || (9539 < histology && histology < 9590)
}

/// Sites where the CS longevity override applies.
pub fn is_cs_longevity_site(site: i64) -> bool {
    (0..=419).contains(&site) || (422..=423).contains(&site) || (425..=809).contains(&site)
}
