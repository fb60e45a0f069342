//! Schema decoding with explicit invalid-row handling.
//!
//! Stored rows are decoded into a sum type instead of being validated in
//! place: one corrupt record must never fail an entire listing, so the
//! repository partitions decoded rows, keeps the valid ones, and logs the
//! rest.

use velo_store::Document;

use crate::product::Product;

/// The outcome of decoding one stored row.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// The row satisfies the product schema.
    Valid(Product),
    /// The row is malformed; `reason` names the first violation.
    Invalid { id: String, reason: String },
}

impl Decoded {
    pub fn is_valid(&self) -> bool {
        matches!(self, Decoded::Valid(_))
    }

    pub fn into_product(self) -> Option<Product> {
        match self {
            Decoded::Valid(product) => Some(product),
            Decoded::Invalid { .. } => None,
        }
    }
}

/// Decode a single stored row against the product schema.
pub fn decode_document(doc: &Document) -> Decoded {
    let product: Product = match doc.decode() {
        Ok(product) => product,
        Err(e) => {
            return Decoded::Invalid {
                id: doc.id.clone(),
                reason: e.to_string(),
            }
        }
    };
    match product.validate().into_iter().next() {
        None => Decoded::Valid(product),
        Some(error) => Decoded::Invalid {
            id: doc.id.clone(),
            reason: format!("{}: {}", error.field, error.message),
        },
    }
}

/// Decode a result set, dropping malformed rows.
///
/// Every dropped row is logged with its id and the violation; the returned
/// set never contains invalid products and decoding never fails the page.
pub fn decode_all(docs: &[Document]) -> Vec<Product> {
    let mut products = Vec::with_capacity(docs.len());
    for doc in docs {
        match decode_document(doc) {
            Decoded::Valid(product) => products.push(product),
            Decoded::Invalid { id, reason } => {
                tracing::warn!(%id, %reason, "dropping product that failed schema validation");
            }
        }
    }
    products
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};

    fn doc(id: &str, value: Value) -> Document {
        match value {
            Value::Object(map) => Document::new(id, map),
            _ => panic!("expected object"),
        }
    }

    fn valid_fields() -> Value {
        json!({
            "name": "Trail Hardtail",
            "category": "mountain",
            "subCategory": "hardtail",
            "brand": "Trek",
            "actualPrice": 1800.0,
            "rating": 4.8,
        })
    }

    #[test]
    fn test_decode_valid_row() {
        let decoded = decode_document(&doc("p1", valid_fields()));
        let product = decoded.into_product().unwrap();
        assert_eq!(product.id.as_str(), "p1");
        assert_eq!(product.inventory, 1); // default
        assert!(!product.is_recommended);
    }

    #[test]
    fn test_decode_missing_required_field() {
        let decoded = decode_document(&doc("p2", json!({"name": "No category"})));
        assert!(matches!(decoded, Decoded::Invalid { .. }));
    }

    #[test]
    fn test_decode_constraint_violation() {
        let mut fields = valid_fields();
        fields["rating"] = json!(9.5);
        match decode_document(&doc("p3", fields)) {
            Decoded::Invalid { id, reason } => {
                assert_eq!(id, "p3");
                assert!(reason.starts_with("rating"));
            }
            Decoded::Valid(_) => panic!("expected invalid"),
        }
    }

    #[test]
    fn test_decode_all_drops_only_bad_rows() {
        // Nine well-formed rows and one malformed row: exactly nine
        // products come back and nothing panics.
        let mut docs: Vec<Document> = (0..9)
            .map(|i| doc(&format!("p{i}"), valid_fields()))
            .collect();
        let mut bad = valid_fields();
        bad["actualPrice"] = json!("not a number");
        docs.push(doc("broken", bad));

        let products = decode_all(&docs);
        assert_eq!(products.len(), 9);
        assert!(products.iter().all(|p| p.id.as_str() != "broken"));
    }

    #[test]
    fn test_decode_all_empty() {
        assert!(decode_all(&[]).is_empty());
        let map: Map<String, Value> = Map::new();
        // An empty document is invalid, not a panic.
        let products = decode_all(&[Document::new("empty", map)]);
        assert!(products.is_empty());
    }
}
