use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TensorType {
    Bool,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F16,
    F32,
    F64,
    BF16,
    Bytes,
    /// A tag the server reported that is not in the table above.
    /// It is sent back verbatim and its values are passed through as-is.
    Other(String),
}

/// How raw text is coerced for a given [`TensorType`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TensorCategory {
    Integer,
    Float,
    Bytes,
    Generic,
}

impl TensorType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bool => "BOOL",
            Self::U8 => "UINT8",
            Self::U16 => "UINT16",
            Self::U32 => "UINT32",
            Self::U64 => "UINT64",
            Self::I8 => "INT8",
            Self::I16 => "INT16",
            Self::I32 => "INT32",
            Self::I64 => "INT64",
            Self::F16 => "FP16",
            Self::F32 => "FP32",
            Self::F64 => "FP64",
            Self::BF16 => "BF16",
            Self::Bytes => "BYTES",
            Self::Other(tag) => tag,
        }
    }

    pub fn category(&self) -> TensorCategory {
        let tag = self.as_str();
        if tag == "BYTES" {
            TensorCategory::Bytes
        } else if tag.starts_with("INT") || tag.starts_with("UINT") {
            TensorCategory::Integer
        } else if tag.starts_with("FP") || tag == "BF16" {
            TensorCategory::Float
        } else {
            TensorCategory::Generic
        }
    }
}

impl FromStr for TensorType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "BOOL" => Self::Bool,
            "UINT8" => Self::U8,
            "UINT16" => Self::U16,
            "UINT32" => Self::U32,
            "UINT64" => Self::U64,
            "INT8" => Self::I8,
            "INT16" => Self::I16,
            "INT32" => Self::I32,
            "INT64" => Self::I64,
            "FP16" => Self::F16,
            "FP32" => Self::F32,
            "FP64" => Self::F64,
            "BF16" => Self::BF16,
            "BYTES" => Self::Bytes,
            _ => Self::Other(s.to_string()),
        })
    }
}

impl From<String> for TensorType {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(ty) => ty,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for TensorType {
    fn from(value: &str) -> Self {
        value.to_string().into()
    }
}

impl From<TensorType> for String {
    fn from(value: TensorType) -> Self {
        match value {
            TensorType::Other(tag) => tag,
            ty => ty.as_str().to_string(),
        }
    }
}

impl fmt::Display for TensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_round_trip_through_strings() {
        for tag in ["BOOL", "UINT8", "INT32", "FP16", "BF16", "BYTES"] {
            let ty: TensorType = tag.into();
            assert!(!matches!(ty, TensorType::Other(_)), "{tag}");
            assert_eq!(ty.to_string(), tag);
        }
    }

    #[test]
    fn unknown_tags_are_preserved() {
        let ty: TensorType = "COMPLEX64".into();
        assert_eq!(ty, TensorType::Other("COMPLEX64".into()));
        assert_eq!(ty.category(), TensorCategory::Generic);
        assert_eq!(
            serde_json::to_string(&ty).unwrap(),
            "\"COMPLEX64\"".to_string()
        );
    }

    #[test]
    fn categories_follow_tag_prefixes() {
        assert_eq!(TensorType::I8.category(), TensorCategory::Integer);
        assert_eq!(TensorType::U64.category(), TensorCategory::Integer);
        assert_eq!(TensorType::F64.category(), TensorCategory::Float);
        assert_eq!(TensorType::BF16.category(), TensorCategory::Float);
        assert_eq!(TensorType::Bytes.category(), TensorCategory::Bytes);
        assert_eq!(TensorType::Bool.category(), TensorCategory::Generic);
        assert_eq!(
            TensorType::from("INT4").category(),
            TensorCategory::Integer
        );
    }
}
