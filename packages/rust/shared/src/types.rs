//! Catalog wire types and the shapes derived from them.
//!
//! Field names on the wire are PascalCase, as the catalog API sends them and
//! as the persisted artifacts carry them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CatalogSyncError, Result};

// ---------------------------------------------------------------------------
// Raw catalog response
// ---------------------------------------------------------------------------

/// A package record as returned by the catalog service.
///
/// Fields are kept as raw JSON values so an unexpected type in one record
/// passes through instead of rejecting the whole response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawPackage {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
}

/// An item record as returned by the catalog service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawItem {
    /// Foreign key to [`RawPackage::id`].
    #[serde(default)]
    pub package_id: Option<Value>,
    #[serde(default)]
    pub manufacturer: Option<Value>,
    #[serde(default)]
    pub model: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub quantity: Option<Value>,
    #[serde(default)]
    pub unit_cost: Option<Value>,
    #[serde(default)]
    pub unit_price: Option<Value>,
}

/// Typed view of the catalog body. Absent or `null` lists mean empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawCatalogResponse {
    #[serde(default)]
    pub packages: Option<Vec<RawPackage>>,
    #[serde(default)]
    pub items: Option<Vec<RawItem>>,
}

impl RawCatalogResponse {
    /// Packages in response order, empty if absent.
    pub fn packages(&self) -> &[RawPackage] {
        self.packages.as_deref().unwrap_or_default()
    }

    /// Items in response order, empty if absent.
    pub fn items(&self) -> &[RawItem] {
        self.items.as_deref().unwrap_or_default()
    }
}

/// The catalog body exactly as received, alongside its typed view.
///
/// `raw` is what gets persisted as `project-details.json`; `catalog` feeds the
/// transformation steps.
#[derive(Debug, Clone)]
pub struct CatalogPayload {
    pub raw: Value,
    pub catalog: RawCatalogResponse,
}

impl CatalogPayload {
    /// Interpret a parsed JSON body as a catalog response.
    pub fn from_json(raw: Value) -> Result<Self> {
        let catalog = RawCatalogResponse::deserialize(&raw).map_err(|e| {
            CatalogSyncError::malformed(format!("unexpected catalog response shape: {e}"))
        })?;
        Ok(Self { raw, catalog })
    }
}

// ---------------------------------------------------------------------------
// Derived shapes
// ---------------------------------------------------------------------------

/// An item with every optional field explicitly present (serialized as `null`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NormalizedItem {
    pub manufacturer: Option<Value>,
    pub model: Option<Value>,
    pub description: Option<Value>,
    pub quantity: Option<Value>,
    pub unit_cost: Option<Value>,
    pub unit_price: Option<Value>,
}

/// A package with its items nested under it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BuiltPackage {
    pub package_id: Option<Value>,
    pub package_name: Option<Value>,
    pub description: Option<Value>,
    pub items: Vec<NormalizedItem>,
}

impl BuiltPackage {
    /// Package name as text; empty when missing or not a string.
    pub fn name(&self) -> &str {
        value_str(self.package_name.as_ref())
    }
}

/// Built packages split into standard and add-on sets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartitionResult {
    pub standard: Vec<BuiltPackage>,
    pub add_ons: Vec<BuiltPackage>,
}

/// Counts reported to the caller after a sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStats {
    /// Number of standard packages.
    #[serde(rename = "packages")]
    pub package_count: usize,
    /// Number of add-on packages.
    #[serde(rename = "addons")]
    pub add_on_count: usize,
    /// Items across both partitions.
    #[serde(rename = "totalItems")]
    pub total_item_count: usize,
}

/// Per-package item count, without nesting the items themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackageSummary {
    pub package_id: Option<Value>,
    pub package_name: Option<Value>,
    pub description: Option<Value>,
    pub item_count: usize,
}

impl PackageSummary {
    /// Package name as text; empty when missing or not a string.
    pub fn name(&self) -> &str {
        value_str(self.package_name.as_ref())
    }
}

fn value_str(value: Option<&Value>) -> &str {
    value.and_then(Value::as_str).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_lists_read_as_empty() {
        let payload = CatalogPayload::from_json(json!({})).unwrap();
        assert!(payload.catalog.packages().is_empty());
        assert!(payload.catalog.items().is_empty());

        let payload = CatalogPayload::from_json(json!({ "Packages": null, "Items": null })).unwrap();
        assert!(payload.catalog.packages().is_empty());
        assert!(payload.catalog.items().is_empty());
    }

    #[test]
    fn raw_payload_keeps_unknown_fields() {
        let body = json!({
            "Name": "Conference Room",
            "Packages": [{ "Id": "P1", "Name": "Core", "Description": null, "Extra": 7 }],
            "Items": []
        });
        let payload = CatalogPayload::from_json(body.clone()).unwrap();
        assert_eq!(payload.raw, body);
        assert_eq!(payload.catalog.packages()[0].id, Some(json!("P1")));
    }

    #[test]
    fn wrong_shape_is_malformed() {
        let err = CatalogPayload::from_json(json!({ "Packages": "nope" })).unwrap_err();
        assert!(matches!(err, CatalogSyncError::MalformedResponse(_)));
    }

    #[test]
    fn normalized_item_serializes_explicit_nulls_in_order() {
        let item = NormalizedItem {
            model: Some(json!("Y2")),
            quantity: Some(json!(0)),
            ..Default::default()
        };
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(
            json,
            r#"{"Manufacturer":null,"Model":"Y2","Description":null,"Quantity":0,"UnitCost":null,"UnitPrice":null}"#
        );
    }

    #[test]
    fn mistyped_nested_fields_are_accepted() {
        let body = json!({
            "Packages": [{ "Id": 42, "Name": ["not", "text"], "Description": false }],
            "Items": [{ "PackageId": 42, "Quantity": "3", "Model": 7 }]
        });
        let payload = CatalogPayload::from_json(body).unwrap();
        assert_eq!(payload.catalog.packages()[0].id, Some(json!(42)));
        assert_eq!(payload.catalog.items()[0].quantity, Some(json!("3")));
        assert_eq!(payload.catalog.items()[0].model, Some(json!(7)));
    }

    #[test]
    fn name_accessor_ignores_non_text() {
        let pkg = BuiltPackage {
            package_name: Some(json!(42)),
            ..Default::default()
        };
        assert_eq!(pkg.name(), "");

        let pkg = BuiltPackage {
            package_name: Some(json!("Core Rack")),
            ..Default::default()
        };
        assert_eq!(pkg.name(), "Core Rack");
    }

    #[test]
    fn stats_use_response_field_names() {
        let stats = SyncStats {
            package_count: 1,
            add_on_count: 2,
            total_item_count: 3,
        };
        assert_eq!(
            serde_json::to_value(stats).unwrap(),
            json!({ "packages": 1, "addons": 2, "totalItems": 3 })
        );
    }

    #[test]
    fn catalog_fixture_validates() {
        let fixture = std::fs::read_to_string("../../../fixtures/json/catalog.fixture.json")
            .expect("read fixture");
        let raw: Value = serde_json::from_str(&fixture).expect("parse fixture");
        let payload = CatalogPayload::from_json(raw).expect("typed fixture");
        assert_eq!(payload.catalog.packages().len(), 4);
        assert_eq!(payload.catalog.items().len(), 6);
    }
}
