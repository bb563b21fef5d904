//! Raw decode adapter.
//!
//! The builder layer never looks at transport syntax. It only asks a parsed
//! node for keyed children, ordered keys, sequence items and scalar
//! coercions through [`RawNode`].
use serde_json::Value;

/// Minimal structured-decode surface over a parsed document tree.
pub trait RawNode {
    /// Keyed child lookup. `None` when absent or when `self` is not a map.
    fn get(&self, key: &str) -> Option<&Self>;

    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn is_map(&self) -> bool;

    /// Keys of a map node, in source order.
    fn keys(&self) -> Option<Vec<&str>>;

    /// Entries of a map node, in source order.
    fn entries(&self) -> Option<Vec<(&str, &Self)>>;

    /// Items of a sequence node.
    fn items(&self) -> Option<Vec<&Self>>;

    fn as_str(&self) -> Option<&str>;
    fn as_bool(&self) -> Option<bool>;
    fn as_f64(&self) -> Option<f64>;
    fn as_i64(&self) -> Option<i64>;
    fn as_u64(&self) -> Option<u64>;

    /// Opaque copy used for `default`, `example` and `enum` values.
    fn to_json(&self) -> Value;

    /// Short name of the node's representation, for diagnostics.
    fn kind(&self) -> &'static str;

    /// Walk a JSON pointer (`/a/b`) from this node. `""` is the node itself;
    /// a non-empty path without a leading `/` is not a pointer and yields `None`.
    fn lookup(&self, path: &str) -> Option<&Self> {
        if path.is_empty() {
            return Some(self);
        }
        let mut node = self;
        for segment in path.strip_prefix('/')?.split('/') {
            node = node.get(&unescape_segment(segment))?;
        }
        Some(node)
    }
}

impl RawNode for Value {
    fn get(&self, key: &str) -> Option<&Self> {
        self.as_object()?.get(key)
    }

    fn is_map(&self) -> bool {
        self.is_object()
    }

    fn keys(&self) -> Option<Vec<&str>> {
        Some(self.as_object()?.keys().map(String::as_str).collect())
    }

    fn entries(&self) -> Option<Vec<(&str, &Self)>> {
        Some(self.as_object()?.iter().map(|(k, v)| (k.as_str(), v)).collect())
    }

    fn items(&self) -> Option<Vec<&Self>> {
        Some(self.as_array()?.iter().collect())
    }

    fn as_str(&self) -> Option<&str> {
        Value::as_str(self)
    }

    fn as_bool(&self) -> Option<bool> {
        Value::as_bool(self)
    }

    fn as_f64(&self) -> Option<f64> {
        Value::as_f64(self)
    }

    fn as_i64(&self) -> Option<i64> {
        if let Some(n) = Value::as_i64(self) {
            return Some(n);
        }
        // integral decimals such as `2.0`
        let f = Value::as_f64(self)?;
        if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
            Some(f as i64)
        } else {
            None
        }
    }

    fn as_u64(&self) -> Option<u64> {
        if let Some(n) = Value::as_u64(self) {
            return Some(n);
        }
        let f = Value::as_f64(self)?;
        if f.fract() == 0.0 && f >= 0.0 && f <= u64::MAX as f64 {
            Some(f as u64)
        } else {
            None
        }
    }

    fn to_json(&self) -> Value {
        self.clone()
    }

    fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

/// Decode a JSON-pointer reference token (`~1` → `/`, `~0` → `~`).
pub fn unescape_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// Encode a key as a JSON-pointer reference token.
pub fn escape_segment(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

/// Append `key` to a JSON-pointer location.
pub(crate) fn child_path(at: &str, key: &str) -> String {
    format!("{at}/{}", escape_segment(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_follow_source_order() {
        let v: Value = serde_json::from_str(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
        assert_eq!(RawNode::keys(&v).unwrap(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn integral_decimals_coerce_to_integers() {
        assert_eq!(RawNode::as_i64(&json!(2.0)), Some(2));
        assert_eq!(RawNode::as_i64(&json!(2.5)), None);
        assert_eq!(RawNode::as_u64(&json!(-1)), None);
    }

    #[test]
    fn lookup_walks_escaped_segments() {
        let v = json!({"components": {"a/b": {"x": true}}});
        let node = v.lookup("/components/a~1b/x").unwrap();
        assert_eq!(RawNode::as_bool(node), Some(true));
        assert!(v.lookup("/missing").is_none());
        assert!(std::ptr::eq(v.lookup("").unwrap(), &v));
    }

    #[test]
    fn lookup_treats_empty_segments_as_keys() {
        let v = json!({"a": {"": {"b": 1}, "b": 2}});
        assert_eq!(RawNode::as_u64(v.lookup("/a//b").unwrap()), Some(1));
        assert_eq!(RawNode::as_u64(v.lookup("/a/b").unwrap()), Some(2));
        assert!(v.lookup("/").is_none());
    }

    #[test]
    fn lookup_rejects_relative_paths() {
        let v = json!({"definitions": {"Foo": {}}});
        assert!(v.lookup("definitions").is_none());
        assert!(v.lookup("definitions/Foo").is_none());
    }

    #[test]
    fn escape_round_trips_special_characters() {
        assert_eq!(escape_segment("a/b~c"), "a~1b~0c");
        assert_eq!(unescape_segment("a~1b~0c"), "a/b~c");
    }
}
