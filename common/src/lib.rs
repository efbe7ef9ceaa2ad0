pub extern crate async_trait;
pub extern crate serde_json;

pub mod error;
pub mod model;
pub mod tensor;

use std::collections::HashMap;

use async_trait::async_trait;

pub use self::error::{Error, ParseError};
use self::{
    model::Model,
    tensor::{InferenceRequest, InferenceResponse, Result, ToTensor},
};

#[async_trait]
pub trait Tensorgate {
    async fn call<T>(
        &self,
        model: &Model,
        version: Option<&str>,
        inputs: &HashMap<String, T>,
    ) -> Result<InferenceResponse>
    where
        T: Send + Sync + ToTensor,
    {
        // collect inputs
        let request = InferenceRequest::assemble(&model.inputs, inputs)?;

        self.call_raw(&model.name, version, &request).await
    }

    /// Submits an assembled request as-is. Transport failures are returned
    /// as [`Error::Transport`] and never retried.
    async fn call_raw(
        &self,
        model: &str,
        version: Option<&str>,
        request: &InferenceRequest,
    ) -> Result<InferenceResponse>;
}
