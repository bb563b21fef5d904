use super::{opt_str, opt_u64};
use crate::error::Result;
use crate::model::StringMetadata;
use crate::raw::RawNode;

#[derive(Debug, Clone, Default)]
pub struct StringMetadataBuilder {
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
}

impl StringMetadataBuilder {
    pub(crate) fn decode<N: RawNode>(node: &N, at: &str) -> Result<Self> {
        Ok(Self {
            min_length: opt_u64(node, "minLength", at)?,
            max_length: opt_u64(node, "maxLength", at)?,
            pattern: opt_str(node, "pattern", at)?.map(str::to_string),
        })
    }

    pub fn build(&self) -> StringMetadata {
        StringMetadata {
            min_length: self.min_length,
            max_length: self.max_length,
            pattern: self.pattern.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;
    use serde_json::json;

    #[test]
    fn string_metadata() {
        let m = StringMetadataBuilder::decode(
            &json!({"type": "string", "minLength": 2, "maxLength": 8, "pattern": "^[a-z]+$"}),
            "",
        )
        .unwrap()
        .build();
        assert_eq!(m.min_length, Some(2));
        assert_eq!(m.max_length, Some(8));
        assert_eq!(m.pattern.as_deref(), Some("^[a-z]+$"));
    }

    #[test]
    fn negative_length_fails() {
        let err = StringMetadataBuilder::decode(&json!({"minLength": -1}), "/s").unwrap_err();
        assert!(matches!(err, SchemaError::TypeCoercionFailure { ref at, .. } if at == "/s/minLength"));
    }
}
