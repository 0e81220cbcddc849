//! Raw item → canonical item.
//!
//! Text fields treat falsy values (`null`, `false`, `0`, `""`) as missing;
//! numeric fields only treat `null`/absent as missing, so a zero quantity
//! stays `0`. Values of an unexpected type pass through untouched.

use catalogsync_shared::{NormalizedItem, RawItem};
use serde_json::Value;

/// Normalize one catalog item, dropping its package reference.
pub fn normalize_item(item: &RawItem) -> NormalizedItem {
    NormalizedItem {
        manufacturer: truthy(item.manufacturer.as_ref()),
        model: truthy(item.model.as_ref()),
        description: truthy(item.description.as_ref()),
        quantity: present(item.quantity.as_ref()),
        unit_cost: present(item.unit_cost.as_ref()),
        unit_price: present(item.unit_price.as_ref()),
    }
}

/// `Some` unless the value is absent or falsy.
pub(crate) fn truthy(value: Option<&Value>) -> Option<Value> {
    present(value).filter(|v| match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        _ => true,
    })
}

/// `Some` unless the value is absent or `null`.
pub(crate) fn present(value: Option<&Value>) -> Option<Value> {
    value.filter(|v| !v.is_null()).cloned()
}
