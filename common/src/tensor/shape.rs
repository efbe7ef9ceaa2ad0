use serde::{Deserialize, Serialize};

use super::{dimension::Dimensions, ty::TensorType};

/// The declared signature of one model input or output.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    pub name: String,
    #[serde(rename = "datatype")]
    pub(crate) ty: TensorType,
    #[serde(rename = "shape", default)]
    pub(crate) dimensions: Dimensions,
}

impl Shape {
    pub fn new(name: impl ToString, ty: impl Into<TensorType>, dimensions: Vec<Option<usize>>) -> Self {
        Self {
            name: name.to_string(),
            ty: ty.into(),
            dimensions: dimensions.into(),
        }
    }

    pub fn ty(&self) -> &TensorType {
        &self.ty
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    pub fn to_vec(&self) -> Vec<Option<usize>> {
        self.dimensions.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_server_metadata_entries() {
        let shape: Shape =
            serde_json::from_str(r#"{"name": "x", "datatype": "INT32", "shape": [-1, 3]}"#)
                .unwrap();
        assert_eq!(shape, Shape::new("x", TensorType::I32, vec![None, Some(3)]));
    }

    #[test]
    fn missing_shape_means_an_empty_template() {
        let shape: Shape = serde_json::from_str(r#"{"name": "x", "datatype": "FP32"}"#).unwrap();
        assert_eq!(shape.dimensions().rank(), 0);
    }
}
