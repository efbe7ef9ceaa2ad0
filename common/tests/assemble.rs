use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use tensorgate_common::{
    async_trait::async_trait,
    model::Model,
    tensor::{
        shape::Shape, ty::TensorType, value::RawValue, InferenceRequest, InferenceResponse,
        Result, Tensor, ToTensor,
    },
    Error, Tensorgate,
};

#[derive(Default)]
struct Recorder {
    calls: AtomicUsize,
    fail_with: Option<String>,
}

#[async_trait]
impl Tensorgate for Recorder {
    async fn call_raw(
        &self,
        model: &str,
        version: Option<&str>,
        request: &InferenceRequest,
    ) -> Result<InferenceResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.fail_with {
            return Err(Error::transport(message));
        }

        Ok(InferenceResponse {
            model_name: model.to_string(),
            model_version: version.map(ToString::to_string),
            id: None,
            outputs: request
                .inputs
                .iter()
                .map(|input| Tensor {
                    name: input.name.clone(),
                    shape: input.shape.clone(),
                    datatype: input.datatype.clone(),
                    data: vec![],
                })
                .collect(),
        })
    }
}

/// Counts how often each input is converted.
struct Counted<'a> {
    value: RawValue,
    parses: &'a AtomicUsize,
}

impl ToTensor for Counted<'_> {
    fn to_tensor(&self, shape: &Shape) -> Result<Tensor> {
        self.parses.fetch_add(1, Ordering::SeqCst);
        self.value.to_tensor(shape)
    }
}

fn model(inputs: Vec<Shape>) -> Model {
    Model {
        name: "simple".into(),
        inputs,
        ..Default::default()
    }
}

fn values(entries: &[(&str, RawValue)]) -> HashMap<String, RawValue> {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

#[test]
fn end_to_end_payload() {
    let shapes = vec![Shape::new("x", TensorType::I32, vec![None])];
    let inputs = values(&[("x", "1,2,3,4".into())]);

    let request = InferenceRequest::assemble(&shapes, &inputs).unwrap();
    assert_eq!(
        request.to_json().unwrap(),
        r#"{"inputs":[{"name":"x","shape":[4],"datatype":"INT32","data":[1,2,3,4]}]}"#
    );
}

#[test]
fn json_array_with_empty_template_infers_its_length() {
    for n in [1usize, 2, 7, 32] {
        let text = format!(
            "[{}]",
            (0..n).map(|i| format!("\"{i}\"")).collect::<Vec<_>>().join(",")
        );
        for ty in [TensorType::I32, TensorType::F64] {
            let shapes = vec![Shape::new("x", ty, vec![])];
            let inputs = values(&[("x", text.as_str().into())]);

            let request = InferenceRequest::assemble(&shapes, &inputs).unwrap();
            assert_eq!(request.inputs[0].shape, vec![n]);
            assert_eq!(request.inputs[0].data.len(), n);
        }
    }
}

#[test]
fn assembly_is_reproducible() {
    let shapes = vec![
        Shape::new("b", TensorType::F32, vec![None, Some(2)]),
        Shape::new("a", TensorType::Bytes, vec![Some(1)]),
        Shape::new("c", TensorType::Bool, vec![]),
    ];
    let inputs = values(&[
        ("a", "some text".into()),
        (
            "b",
            RawValue::Matrix(vec![
                vec!["0.1".into(), "0.2".into()],
                vec!["0.3".into(), "oops".into()],
            ]),
        ),
        ("c", "[true, false, true]".into()),
    ]);

    let first = InferenceRequest::assemble(&shapes, &inputs).unwrap().to_json().unwrap();
    let second = InferenceRequest::assemble(&shapes, &inputs).unwrap().to_json().unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first,
        r#"{"inputs":[{"name":"b","shape":[2,2],"datatype":"FP32","data":[0.1,0.2,0.3,0.0]},{"name":"a","shape":[1],"datatype":"BYTES","data":["c29tZSB0ZXh0"]},{"name":"c","shape":[3],"datatype":"BOOL","data":[true,false,true]}]}"#
    );
}

#[tokio::test]
async fn missing_input_stops_before_submission() {
    let parses = AtomicUsize::new(0);
    let model = model(vec![
        Shape::new("a", TensorType::I32, vec![None]),
        Shape::new("b", TensorType::I32, vec![None]),
    ]);
    let inputs: HashMap<String, Counted> = [(
        "a".to_string(),
        Counted {
            value: "1".into(),
            parses: &parses,
        },
    )]
    .into_iter()
    .collect();

    let client = Recorder::default();
    let error = client.call(&model, Some("1"), &inputs).await.unwrap_err();

    assert_eq!(error, Error::MissingRequiredInput("b".into()));
    assert_eq!(error.to_string(), "Input 'b' is required");
    assert_eq!(parses.load(Ordering::SeqCst), 1);
    assert_eq!(client.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn first_missing_input_wins() {
    let parses = AtomicUsize::new(0);
    let model = model(vec![
        Shape::new("a", TensorType::I32, vec![]),
        Shape::new("b", TensorType::I32, vec![]),
        Shape::new("c", TensorType::I32, vec![]),
    ]);
    let inputs: HashMap<String, Counted> = [("a", "   "), ("c", "3")]
        .into_iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                Counted {
                    value: value.into(),
                    parses: &parses,
                },
            )
        })
        .collect();

    let client = Recorder::default();
    let error = client.call(&model, None, &inputs).await.unwrap_err();

    assert_eq!(error, Error::MissingRequiredInput("a".into()));
    assert_eq!(parses.load(Ordering::SeqCst), 1);
    assert_eq!(client.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn submits_once_and_returns_the_response() {
    let model = model(vec![Shape::new("x", TensorType::F32, vec![None, Some(3)])]);
    let inputs = values(&[("x", "[[1, 2, 3], [4, 5, 6], [7, 8, 9]]".into())]);

    let client = Recorder::default();
    let response = client.call(&model, Some("2"), &inputs).await.unwrap();

    assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    assert_eq!(response.model_name, "simple");
    assert_eq!(response.model_version.as_deref(), Some("2"));
    assert_eq!(response.outputs[0].shape, vec![3, 3]);
}

#[tokio::test]
async fn transport_errors_are_surfaced_verbatim() {
    let model = model(vec![Shape::new("x", TensorType::I64, vec![])]);
    let inputs = values(&[("x", "1".into())]);

    let client = Recorder {
        fail_with: Some("HTTP 400 Bad Request: unexpected shape".into()),
        ..Default::default()
    };
    let error = client.call(&model, None, &inputs).await.unwrap_err();

    assert_eq!(
        error.to_string(),
        "HTTP 400 Bad Request: unexpected shape"
    );
    assert_eq!(client.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn degraded_shapes_still_submit() {
    let shapes = vec![Shape::new("x", TensorType::I8, vec![Some(2), None])];
    let inputs = values(&[("x", "1,2,3,4,5,6,7".into())]);

    let request = InferenceRequest::assemble(&shapes, &inputs).unwrap();
    assert_eq!(request.inputs[0].shape, vec![7, 1]);
}
