//! Per-asset-kind wording
//!
//! Narratives are written against these fields directly, so a compressor
//! narrative talks about servicing a cartridge without any text rewriting.

use crate::types::{AssetKind, Location};

/// Domain nouns and units for one asset kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetVocabulary {
    /// Lower-case singular, e.g. "strainer".
    pub noun: &'static str,
    /// Title-case singular, e.g. "Strainer".
    pub title: &'static str,
    pub plural: &'static str,
    /// Maintenance verb: "clean", "service", "pigging".
    pub service_verb: &'static str,
    /// Maintenance noun: "cleaning", "service", "pigging".
    pub service_noun: &'static str,
    /// The part that fouls.
    pub element: &'static str,
    /// The part that degrades under load.
    pub mesh: &'static str,
    pub id_prefix: &'static str,
    pub pressure_unit: &'static str,
    pub flow_unit: &'static str,
    site_unit: &'static str,
    site_equipment: &'static str,
    site_position: &'static str,
}

impl AssetVocabulary {
    /// Identity used when a batch carries no id.
    pub fn default_id(&self) -> String {
        format!("{}-REAL", self.id_prefix)
    }

    /// Location used when a batch carries none.
    pub fn default_location(&self) -> Location {
        Location {
            unit: self.site_unit.to_string(),
            equipment: self.site_equipment.to_string(),
            position: self.site_position.to_string(),
        }
    }

    /// Rate-of-change unit per projection period, e.g. `"psi/day"`.
    pub fn rate_unit(&self, period: &str) -> String {
        format!("{}/{period}", self.pressure_unit)
    }
}

pub const STRAINER: AssetVocabulary = AssetVocabulary {
    noun: "strainer",
    title: "Strainer",
    plural: "Strainers",
    service_verb: "clean",
    service_noun: "cleaning",
    element: "element",
    mesh: "mesh",
    id_prefix: "STR",
    pressure_unit: "psi",
    flow_unit: "bbl/d",
    site_unit: "Crude Unit 2A \u{2022} Live Feed",
    site_equipment: "Feed Pump P-1051A",
    site_position: "Suction",
};

pub const COMPRESSOR: AssetVocabulary = AssetVocabulary {
    noun: "compressor",
    title: "Compressor",
    plural: "Compressors",
    service_verb: "service",
    service_noun: "service",
    element: "cartridge",
    mesh: "impeller",
    id_prefix: "COMP",
    pressure_unit: "psi",
    flow_unit: "MMSCFD",
    site_unit: "Residue Compression",
    site_equipment: "Train K-401A",
    site_position: "Residue Gas",
};

pub const PIPELINE_SEGMENT: AssetVocabulary = AssetVocabulary {
    noun: "pipeline segment",
    title: "Pipeline Segment",
    plural: "Pipeline Segments",
    service_verb: "pigging",
    service_noun: "pigging",
    element: "bore",
    mesh: "wall thickness",
    id_prefix: "PIPE",
    pressure_unit: "psi",
    flow_unit: "kbpd",
    site_unit: "Export Loop A",
    site_equipment: "Block Valve BV-401",
    site_position: "North Span",
};

impl AssetKind {
    pub fn vocabulary(self) -> &'static AssetVocabulary {
        match self {
            AssetKind::Strainer => &STRAINER,
            AssetKind::Compressor => &COMPRESSOR,
            AssetKind::PipelineSegment => &PIPELINE_SEGMENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_identity_per_kind() {
        assert_eq!(AssetKind::Strainer.vocabulary().default_id(), "STR-REAL");
        assert_eq!(AssetKind::Compressor.vocabulary().default_id(), "COMP-REAL");
        assert_eq!(AssetKind::PipelineSegment.vocabulary().default_id(), "PIPE-REAL");
    }

    #[test]
    fn test_default_location_per_kind() {
        let loc = AssetKind::Compressor.vocabulary().default_location();
        assert_eq!(loc.equipment, "Train K-401A");
        let loc = AssetKind::Strainer.vocabulary().default_location();
        assert_eq!(loc.position, "Suction");
    }

    #[test]
    fn test_element_differs_from_noun() {
        for vocab in [&STRAINER, &COMPRESSOR, &PIPELINE_SEGMENT] {
            assert!(
                !vocab.noun.contains(vocab.element),
                "\"{} {}\" repeats itself",
                vocab.noun,
                vocab.element
            );
        }
    }

    #[test]
    fn test_rate_unit_follows_period() {
        assert_eq!(STRAINER.rate_unit("day"), "psi/day");
        assert_eq!(PIPELINE_SEGMENT.rate_unit("hour"), "psi/hour");
    }
}
