use serde::{Deserialize, Serialize};

use crate::tensor::shape::Shape;

/// A model's declared signature, as reported by its metadata endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    #[serde(default)]
    pub versions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default)]
    pub inputs: Vec<Shape>,
    #[serde(default)]
    pub outputs: Vec<Shape>,
}

impl Model {
    pub fn input(&self, name: &str) -> Option<&Shape> {
        self.inputs.iter().find(|shape| shape.name == name)
    }
}
