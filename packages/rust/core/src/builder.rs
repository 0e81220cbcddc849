//! Nest flat catalog items under their owning packages.

use catalogsync_shared::{BuiltPackage, PackageSummary, RawCatalogResponse, RawItem, RawPackage};
use serde_json::Value;
use tracing::{debug, warn};

use crate::normalize::{normalize_item, present, truthy};

/// Build one [`BuiltPackage`] per catalog package, in response order.
///
/// Each package receives, in original order, every item whose `PackageId`
/// equals its `Id`. Packages without items are kept with an empty list.
/// Items pointing at unknown packages are dropped.
pub fn build_packages(raw: &RawCatalogResponse) -> Vec<BuiltPackage> {
    let items = raw.items();

    let built: Vec<BuiltPackage> = raw
        .packages()
        .iter()
        .map(|pkg| BuiltPackage {
            package_id: present(pkg.id.as_ref()),
            package_name: package_name(pkg),
            description: truthy(pkg.description.as_ref()),
            items: items_for(pkg, items).map(normalize_item).collect(),
        })
        .collect();

    debug!(
        packages = built.len(),
        items = built.iter().map(|p| p.items.len()).sum::<usize>(),
        "packages built"
    );

    built
}

/// Count each package's items without nesting them.
pub fn summarize_packages(raw: &RawCatalogResponse) -> Vec<PackageSummary> {
    let items = raw.items();

    raw.packages()
        .iter()
        .map(|pkg| PackageSummary {
            package_id: present(pkg.id.as_ref()),
            package_name: package_name(pkg),
            description: truthy(pkg.description.as_ref()),
            item_count: items_for(pkg, items).count(),
        })
        .collect()
}

/// Items belonging to `pkg`, matched by JSON value equality.
/// A package without an `Id` owns nothing.
fn items_for<'a>(pkg: &'a RawPackage, items: &'a [RawItem]) -> impl Iterator<Item = &'a RawItem> {
    let pkg_id = pkg.id.as_ref().filter(|id| !id.is_null());
    items
        .iter()
        .filter(move |item| pkg_id.is_some_and(|id| item.package_id.as_ref() == Some(id)))
}

fn package_name(pkg: &RawPackage) -> Option<Value> {
    let name = present(pkg.name.as_ref());
    if !name.as_ref().is_some_and(Value::is_string) {
        warn!(package_id = ?pkg.id, "package name missing or not text, treating as standard");
    }
    name
}
