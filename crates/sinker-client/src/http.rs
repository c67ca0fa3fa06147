use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use sinker_model::{
    CmdLine, ConfigDoc, DebugKind, Envelope, LogPage, ProcInfo, TaskList, TaskStatusSnapshot,
};
use tracing::debug;

use crate::{api::SinkerApi, config::ClientConfig, errors::ClientError};

/// reqwest-backed [`SinkerApi`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base: Url,
}

impl HttpClient {
    pub fn new(cfg: &ClientConfig) -> Result<Self, ClientError> {
        let base = Url::parse(&cfg.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", cfg.base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(cfg.base_url.clone()));
        }
        let http = reqwest::Client::builder().timeout(cfg.timeout()).build()?;
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Append path segments to the base URL; each segment is percent-encoded.
    fn url<'a, I>(&self, segments: I) -> Result<Url, ClientError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = self.base.clone();
        url.set_query(None);
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ClientError::InvalidUrl(self.base.to_string()))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn api_url(&self, tail: &[&str]) -> Result<Url, ClientError> {
        self.url(["api", "v1"].into_iter().chain(tail.iter().copied()))
    }

    async fn get_entity<T>(&self, url: Url, what: &'static str) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        let body = response.text().await?;
        decode_entity(&body, what)
    }

    async fn post_ack(&self, url: Url, what: &'static str) -> Result<(), ClientError> {
        debug!(%url, "POST");
        let response = self.http.post(url).send().await?;
        let body = response.text().await?;
        let envelope = parse_envelope(&body, what)?;
        envelope.into_ack().map_err(ClientError::from)
    }
}

fn parse_envelope(
    body: &str,
    what: &'static str,
) -> Result<Envelope<serde_json::Value>, ClientError> {
    serde_json::from_str(body).map_err(|e| ClientError::Decode {
        what,
        reason: format!("{}, body: {}", e, body),
    })
}

fn decode_entity<T>(body: &str, what: &'static str) -> Result<T, ClientError>
where
    T: DeserializeOwned,
{
    let entity = parse_envelope(body, what)?.into_entity()?;
    serde_json::from_value(entity).map_err(|e| ClientError::Decode {
        what,
        reason: e.to_string(),
    })
}

#[async_trait]
impl SinkerApi for HttpClient {
    async fn proc_info(&self) -> Result<ProcInfo, ClientError> {
        let url = self.api_url(&["metrics", "procinfo"])?;
        self.get_entity(url, "proc info").await
    }

    async fn tasks(&self) -> Result<TaskList, ClientError> {
        let url = self.api_url(&["tasks"])?;
        self.get_entity(url, "task list").await
    }

    async fn task_status(&self, name: &str) -> Result<TaskStatusSnapshot, ClientError> {
        let url = self.api_url(&["tasks", name, "status"])?;
        self.get_entity(url, "task status").await
    }

    async fn config(&self) -> Result<ConfigDoc, ClientError> {
        let url = self.api_url(&["config"])?;
        self.get_entity(url, "config").await
    }

    async fn cmdline(&self) -> Result<CmdLine, ClientError> {
        let url = self.api_url(&["cmdline"])?;
        self.get_entity(url, "cmdline").await
    }

    async fn refresh_tasks(&self) -> Result<(), ClientError> {
        let url = self.api_url(&["tasks", "refresh"])?;
        self.post_ack(url, "task refresh").await
    }

    async fn refresh_config(&self) -> Result<(), ClientError> {
        let url = self.api_url(&["config", "refresh"])?;
        self.post_ack(url, "config refresh").await
    }

    async fn debug_text(&self, kind: DebugKind) -> Result<String, ClientError> {
        let (path, query) = kind.path().split_once('?').unwrap_or((kind.path(), ""));
        let mut url = self.url(path.trim_start_matches('/').split('/'))?;
        if !query.is_empty() {
            url.set_query(Some(query));
        }

        debug!(%url, kind = %kind, "GET");
        let text = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(text)
    }

    async fn log(&self, from: usize, errors_only: bool) -> Result<LogPage, ClientError> {
        let mut url = self.api_url(&["log"])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("from", &from.to_string());
            if errors_only {
                query.append_pair("error", "true");
            }
        }
        self.get_entity(url, "log page").await
    }

    async fn task_config(&self, name: &str) -> Result<serde_json::Value, ClientError> {
        let url = self.api_url(&["task", name])?;
        self.get_entity(url, "task config").await
    }
}
