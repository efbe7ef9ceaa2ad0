use anyhow::{bail, Result};
use async_trait::async_trait;
use tensorgate_common::{
    model::Model,
    tensor::{InferenceRequest, InferenceResponse},
    Error, Tensorgate,
};
use tokio::task;
use tracing::{debug, info};

use crate::config::ClientConfig;

/// Talks to an inference server over the KServe v2 HTTP protocol.
pub struct TensorgateClient {
    agent: ureq::Agent,
    config: ClientConfig,
}

impl TensorgateClient {
    pub fn new(config: ClientConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(config.connect_timeout)
            .timeout(config.timeout)
            .build();

        Self { agent, config }
    }

    pub fn try_infer() -> Result<Self> {
        ClientConfig::try_infer().map(Self::new)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn model_url(&self, model: &str, version: Option<&str>) -> String {
        let url = &self.config.url;
        match version.filter(|version| !version.is_empty()) {
            Some(version) => format!("{url}/v2/models/{model}/versions/{version}"),
            None => format!("{url}/v2/models/{model}"),
        }
    }

    pub async fn is_live(&self) -> bool {
        self.check_health("live").await
    }

    /// Whether the server accepts inference requests right now.
    pub async fn is_ready(&self) -> bool {
        self.check_health("ready").await
    }

    async fn check_health(&self, probe: &'static str) -> bool {
        let agent = self.agent.clone();
        let url = format!("{}/v2/health/{probe}", &self.config.url);

        let status = task::spawn_blocking(move || agent.get(&url).call().map(|r| r.status())).await;
        matches!(status, Ok(Ok(200)))
    }

    /// Fetches the declared signature of a model.
    pub async fn metadata(&self, model: &str, version: Option<&str>) -> Result<Model> {
        let agent = self.agent.clone();
        let url = self.model_url(model, version);

        match task::spawn_blocking(move || agent.get(&url).call()).await? {
            Ok(response) => Ok(response.into_json()?),
            Err(error) => bail!(describe(error)),
        }
    }
}

#[async_trait]
impl Tensorgate for TensorgateClient {
    async fn call_raw(
        &self,
        model: &str,
        version: Option<&str>,
        request: &InferenceRequest,
    ) -> Result<InferenceResponse, Error> {
        let agent = self.agent.clone();
        let url = format!("{}/infer", self.model_url(model, version));
        let body = request.to_json().map_err(Error::transport)?;

        info!(%url, inputs = request.inputs.len(), "submitting inference request");
        let response = task::spawn_blocking(move || {
            agent
                .post(&url)
                .set("Content-Type", "application/json")
                .send_string(&body)
        })
        .await
        .map_err(Error::transport)?
        .map_err(|error| Error::Transport(describe(error)))?;

        debug!(status = response.status(), "received inference response");
        response.into_json().map_err(Error::transport)
    }
}

/// Formats a failed call the way it should be shown to the user.
fn describe(error: ureq::Error) -> String {
    match error {
        ureq::Error::Status(status, response) => {
            let status_text = response.status_text().to_string();
            match response.into_string() {
                Ok(body) if !body.trim().is_empty() => {
                    format!("HTTP {status} {status_text}: {}", body.trim())
                }
                _ => format!("HTTP {status} {status_text}"),
            }
        }
        ureq::Error::Transport(transport) => transport.to_string(),
    }
}
