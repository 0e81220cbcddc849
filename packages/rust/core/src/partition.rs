//! Split built packages into standard and add-on sets.

use catalogsync_shared::{BuiltPackage, PartitionResult};

/// Naming convention marking add-on packages (matched case-insensitively).
pub const ADD_ON_MARKER: &str = "add-on";

/// Whether a package name follows the add-on convention.
pub fn is_add_on(name: &str) -> bool {
    name.to_lowercase().contains(ADD_ON_MARKER)
}

/// Partition by [`BuiltPackage::name`], keeping relative order.
///
/// Every package lands in exactly one of the two lists. A name that is not
/// text never marks an add-on.
pub fn partition(built: Vec<BuiltPackage>) -> PartitionResult {
    let (add_ons, standard): (Vec<_>, Vec<_>) = built
        .into_iter()
        .partition(|pkg| is_add_on(pkg.name()));

    PartitionResult { standard, add_ons }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn named(id: &str, name: &str) -> BuiltPackage {
        BuiltPackage {
            package_id: Some(json!(id)),
            package_name: Some(json!(name)),
            ..Default::default()
        }
    }

    #[test]
    fn add_on_predicate() {
        assert!(is_add_on("Lighting Add-On"));
        assert!(is_add_on("Lighting add-on Kit"));
        assert!(is_add_on("ADD-ON"));
        assert!(!is_add_on("Standard Lighting"));
        assert!(!is_add_on("Addon Speakers"));
        assert!(!is_add_on(""));
    }

    #[test]
    fn partition_is_total_and_ordered() {
        let built = vec![
            named("1", "Core Rack"),
            named("2", "Audio Add-On"),
            named("3", "Standard Lighting"),
            named("4", "Lighting add-on Kit"),
        ];

        let result = partition(built);
        let ids = |pkgs: &[BuiltPackage]| -> Vec<Value> {
            pkgs.iter().filter_map(|p| p.package_id.clone()).collect()
        };

        assert_eq!(ids(&result.standard), [json!("1"), json!("3")]);
        assert_eq!(ids(&result.add_ons), [json!("2"), json!("4")]);
    }

    #[test]
    fn missing_or_non_text_name_is_standard() {
        let built = vec![
            BuiltPackage {
                package_id: Some(json!(1)),
                package_name: None,
                ..Default::default()
            },
            BuiltPackage {
                package_id: Some(json!(2)),
                package_name: Some(json!(["Add-On"])),
                ..Default::default()
            },
        ];
        let result = partition(built);
        assert_eq!(result.standard.len(), 2);
        assert!(result.add_ons.is_empty());
    }

    #[test]
    fn empty_input_gives_empty_partitions() {
        assert_eq!(partition(Vec::new()), PartitionResult::default());
    }
}
