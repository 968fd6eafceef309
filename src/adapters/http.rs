use crate::domain::model::{Todo, User};
use crate::domain::ports::{ConfigProvider, TodoApi};
use crate::utils::error::{Result, WorkshopError};
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_required, validate_url,
};
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("reactor-workshop/", env!("CARGO_PKG_VERSION"));
pub const MAX_TIMEOUT_SECONDS: u64 = 300;

/// `TodoApi` 的 reqwest 實作。
///
/// 沒有重試、沒有快取：遠端回應什麼就回傳什麼。Clone 共用同一個連線池。
#[derive(Debug, Clone)]
pub struct TodoClient {
    client: Client,
    base_url: Url,
}

/// 檢查 client 設定，回傳解析後的 base URL
pub fn validate_client_settings<C: ConfigProvider + ?Sized>(config: &C) -> Result<Url> {
    validate_required("client.base_url", config.base_url())?;
    let base_url = validate_url("client.base_url", config.base_url())?;
    validate_range(
        "client.timeout_seconds",
        config.timeout_seconds(),
        1,
        MAX_TIMEOUT_SECONDS,
    )?;
    validate_non_empty_string("client.user_agent", config.user_agent())?;
    Ok(base_url)
}

/// 指向 JSONPlaceholder 的預設 client
pub fn create_client() -> Result<TodoClient> {
    TodoClient::new(DEFAULT_BASE_URL)
}

impl TodoClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = validate_url("base_url", base_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS))
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let base_url = validate_client_settings(config)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .user_agent(config.user_agent())
            .build()?;

        tracing::debug!(
            "Created client for {} (timeout {}s)",
            base_url,
            config.timeout_seconds()
        );

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| WorkshopError::ConfigError {
                message: format!("Base URL cannot carry a path: {}", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn fetch<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.endpoint(segments)?;

        tracing::debug!("Making API request to: {}", url);
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if status == StatusCode::NOT_FOUND {
            return Err(WorkshopError::NotFound {
                status,
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(WorkshopError::HttpStatus {
                status,
                url: url.to_string(),
            });
        }

        Ok(response.json::<T>().await?)
    }

    // 整個陣列收到後逐筆送出；錯誤時只送出一個 Err 然後結束
    fn fetch_all<T>(&self, segments: &'static [&'static str]) -> BoxStream<'_, Result<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        stream::once(self.fetch::<Vec<T>>(segments))
            .map_ok(|items| stream::iter(items.into_iter().map(Ok::<T, WorkshopError>)))
            .try_flatten()
            .boxed()
    }
}

#[async_trait]
impl TodoApi for TodoClient {
    async fn get_todo(&self, todo_id: &str) -> Result<Todo> {
        self.fetch(&["todos", todo_id]).await
    }

    fn get_todos(&self) -> BoxStream<'_, Result<Todo>> {
        self.fetch_all(&["todos"])
    }

    fn get_users(&self) -> BoxStream<'_, Result<User>> {
        self.fetch_all(&["users"])
    }
}
