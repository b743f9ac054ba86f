//! Ward and bed auto-assignment for device registration.
//!
//! Wards are named "Block A" through "Block Z" and hold at most
//! [`BEDS_PER_WARD`] beds each. When registration omits the ward or bed, the
//! first ward with free capacity and the first free zero-padded bed number
//! in it are chosen.

use std::collections::HashMap;

/// Maximum beds per ward block.
pub const BEDS_PER_WARD: usize = 6;

/// Pick the first ward block with free capacity.
///
/// `existing` is the (ward, bed_number) assignment of every registered
/// device. Falls back to "Block A" when every block A-Z is full.
pub fn assign_ward(existing: &[(String, String)]) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for (ward, _) in existing {
        *counts.entry(ward.as_str()).or_default() += 1;
    }

    for letter in 'A'..='Z' {
        let block = format!("Block {letter}");
        if counts.get(block.as_str()).copied().unwrap_or(0) < BEDS_PER_WARD {
            return block;
        }
    }
    "Block A".to_string()
}

/// Pick the first free bed number ("01".."06") in a ward.
///
/// Returns `None` when the ward is full.
pub fn assign_bed(existing: &[(String, String)], ward: &str) -> Option<String> {
    let taken: Vec<&str> = existing
        .iter()
        .filter(|(w, _)| w == ward)
        .map(|(_, bed)| bed.as_str())
        .collect();

    (1..=BEDS_PER_WARD)
        .map(|n| format!("{n:02}"))
        .find(|bed| !taken.contains(&bed.as_str()))
}

/// Canonical device identity from its placement: `BED_<WARD>_<NN>`,
/// uppercased with spaces collapsed to underscores.
pub fn device_id_for(ward: &str, bed_number: &str) -> String {
    format!("BED_{ward}_{bed_number}")
        .to_uppercase()
        .replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placements(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(w, b)| (w.to_string(), b.to_string()))
            .collect()
    }

    #[test]
    fn first_block_is_chosen_when_empty() {
        assert_eq!(assign_ward(&[]), "Block A");
    }

    #[test]
    fn full_block_spills_into_the_next() {
        let existing = placements(&[
            ("Block A", "01"),
            ("Block A", "02"),
            ("Block A", "03"),
            ("Block A", "04"),
            ("Block A", "05"),
            ("Block A", "06"),
        ]);
        assert_eq!(assign_ward(&existing), "Block B");
    }

    #[test]
    fn first_free_bed_number_is_assigned() {
        let existing = placements(&[("Block A", "01"), ("Block A", "03")]);
        assert_eq!(assign_bed(&existing, "Block A").as_deref(), Some("02"));
    }

    #[test]
    fn full_ward_has_no_free_bed() {
        let existing = placements(&[
            ("Block A", "01"),
            ("Block A", "02"),
            ("Block A", "03"),
            ("Block A", "04"),
            ("Block A", "05"),
            ("Block A", "06"),
        ]);
        assert_eq!(assign_bed(&existing, "Block A"), None);
    }

    #[test]
    fn device_id_is_uppercased_with_underscores() {
        assert_eq!(device_id_for("Block A", "01"), "BED_BLOCK_A_01");
    }
}
