pub mod dimension;
pub mod guided;
pub mod shape;
pub mod ty;
pub mod value;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, debug_span};

use self::{shape::Shape, ty::TensorType, value::RawValue};
use crate::error::{Error, ParseError};

pub type Result<T, E = Error> = ::core::result::Result<T, E>;

pub trait ToTensor {
    fn to_tensor(&self, shape: &Shape) -> Result<Tensor>;
}

impl ToTensor for Box<dyn ToTensor + Send + Sync> {
    fn to_tensor(&self, shape: &Shape) -> Result<Tensor> {
        (**self).to_tensor(shape)
    }
}

impl ToTensor for RawValue {
    fn to_tensor(&self, shape: &Shape) -> Result<Tensor> {
        let data = self.parse(&shape.ty).map_err(|e| match e {
            ParseError::EmptyInput => Error::MissingRequiredInput(shape.name.clone()),
        })?;
        let dimensions = shape.dimensions.resolve(data.len());
        debug!(shape = ?dimensions, len = data.len(), "resolved tensor");

        Ok(Tensor {
            name: shape.name.clone(),
            shape: dimensions,
            datatype: shape.ty.clone(),
            data,
        })
    }
}

/// One named tensor on the wire.
///
/// Fields serialize in declaration order, so a payload is byte-for-byte
/// reproducible.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tensor<Data = TensorData> {
    pub name: String,
    pub shape: Vec<usize>,
    pub datatype: TensorType,
    pub data: Data,
}

/// A flat sequence of coerced scalars.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TensorData {
    Int(Vec<i64>),
    Float(Vec<f64>),
    Bytes(Vec<String>),
    Generic(Vec<Value>),
}

impl TensorData {
    pub fn len(&self) -> usize {
        match self {
            Self::Int(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Bytes(v) => v.len(),
            Self::Generic(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InferenceRequest {
    pub inputs: Vec<Tensor>,
}

impl InferenceRequest {
    /// Builds one tensor per declared input, in declaration order.
    ///
    /// Every input is required; the first one without a usable value stops
    /// the assembly.
    pub fn assemble<T>(shapes: &[Shape], inputs: &HashMap<String, T>) -> Result<Self>
    where
        T: ToTensor,
    {
        let inputs = shapes
            .iter()
            .map(|shape| {
                let _span = debug_span!("input", name = %shape.name).entered();
                match inputs.get(&shape.name) {
                    Some(input) => input.to_tensor(shape),
                    None => Err(Error::MissingRequiredInput(shape.name.clone())),
                }
            })
            .collect::<Result<_>>()?;

        Ok(Self { inputs })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InferenceResponse {
    #[serde(default)]
    pub model_name: String,
    #[serde(default)]
    pub model_version: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub outputs: Vec<Tensor<Vec<Value>>>,
}
