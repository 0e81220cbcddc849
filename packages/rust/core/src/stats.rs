use catalogsync_shared::{BuiltPackage, PartitionResult, SyncStats};

/// Count packages per partition and items across both.
pub fn compute_stats(result: &PartitionResult) -> SyncStats {
    SyncStats {
        package_count: result.standard.len(),
        add_on_count: result.add_ons.len(),
        total_item_count: item_count(&result.standard) + item_count(&result.add_ons),
    }
}

fn item_count(packages: &[BuiltPackage]) -> usize {
    packages.iter().map(|p| p.items.len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalogsync_shared::NormalizedItem;

    fn with_items(n: usize) -> BuiltPackage {
        BuiltPackage {
            items: vec![NormalizedItem::default(); n],
            ..Default::default()
        }
    }

    #[test]
    fn empty_result_is_all_zero() {
        assert_eq!(compute_stats(&PartitionResult::default()), SyncStats::default());
    }

    #[test]
    fn items_summed_across_partitions() {
        let result = PartitionResult {
            standard: vec![with_items(2), with_items(0)],
            add_ons: vec![with_items(3)],
        };
        let stats = compute_stats(&result);
        assert_eq!(stats.package_count, 2);
        assert_eq!(stats.add_on_count, 1);
        assert_eq!(stats.total_item_count, 5);
    }
}
