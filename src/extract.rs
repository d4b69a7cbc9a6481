//! Lenient field extraction from backend payloads.
//!
//! The backend contract has gone through several shapes for the same
//! concepts (`orderNumber` vs `order_number` vs `orderNo`, envelope vs bare
//! body). All of that tolerance lives here, as one documented priority list
//! per concept, instead of ad hoc inline checks at every call site.

use serde_json::Value;

/// Accepts a JSON number or a numeric string; rejects everything else.
pub fn pick_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
        }
        _ => None,
    }
}

/// Accepts a non-blank JSON string.
pub fn pick_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Accepts a non-blank string or a finite number, stringified.
pub fn pick_string_or_number(value: &Value) -> Option<String> {
    pick_string(value).or_else(|| match value {
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn first_i64(payload: &Value, fields: &[&str]) -> Option<i64> {
    fields.iter().find_map(|f| payload.get(f).and_then(pick_i64))
}

/// Internal order id. Priority: `id`, `orderId`, `order_id`.
pub fn order_id(payload: &Value) -> Option<i64> {
    first_i64(payload, &["id", "orderId", "order_id"])
}

/// Order total in minor units. Priority: `totalPrice`, `total_price`,
/// `totalAmount`, `total_amount`, `amount`.
pub fn amount(payload: &Value) -> Option<i64> {
    first_i64(
        payload,
        &["totalPrice", "total_price", "totalAmount", "total_amount", "amount"],
    )
}

/// Provider-facing order token. Priority: `orderNumber`, `order_number`,
/// `orderNo`, `order_no`, `orderNum`, `order_num`, then the same pair one
/// level down under `order`.
pub fn order_token(payload: &Value) -> Option<String> {
    const FIELDS: [&str; 6] = [
        "orderNumber",
        "order_number",
        "orderNo",
        "order_no",
        "orderNum",
        "order_num",
    ];
    FIELDS
        .iter()
        .find_map(|f| payload.get(f).and_then(pick_string_or_number))
        .or_else(|| {
            let nested = payload.get("order")?;
            ["orderNumber", "order_number"]
                .iter()
                .find_map(|f| nested.get(f).and_then(pick_string_or_number))
        })
}
