//! 画廊 REST API 客户端
//!
//! 所有接口都返回 `{ success, data, error }` 外壳。失败时服务端可能同时
//! 返回非 2xx 状态码，因此无论状态码如何都先解析响应体。

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::models::{ApiEnvelope, ListQuery, Pagination, Stats, Webtoon, WebtoonPage, PER_PAGE};

/// 无法连接服务器时展示给用户的通用提示
pub const CONNECT_ERROR_MESSAGE: &str = "无法连接到服务器，请确认 API 服务正在运行";
/// 服务端返回失败但未附带原因时的提示
pub const FETCH_FAILED_MESSAGE: &str = "获取漫画列表失败";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("请求失败: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("响应不是合法的 JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("服务端返回错误: {}", .0.as_deref().unwrap_or("(无说明)"))]
    Server(Option<String>),
    #[error("响应缺少 data 字段")]
    MissingData,
    #[error("HTTP 客户端创建失败: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// 面向用户的错误文本
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) | Self::Decode(_) | Self::HttpClientBuild(_) => {
                CONNECT_ERROR_MESSAGE.to_string()
            }
            Self::Server(Some(msg)) if !msg.is_empty() => msg.clone(),
            Self::Server(_) | Self::MissingData => FETCH_FAILED_MESSAGE.to_string(),
        }
    }
}

pub struct GalleryClient {
    http: reqwest::Client,
    base_url: String,
}

impl GalleryClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /webtoons
    pub async fn list_webtoons(&self, query: &ListQuery) -> Result<WebtoonPage, ApiError> {
        let envelope: ApiEnvelope<Vec<Webtoon>> =
            self.get_envelope("/webtoons", &query.to_params()).await?;
        let pagination = envelope.pagination.clone();
        let items = Self::into_data(envelope)?;

        // 旧版服务端可能不返回分页信息，按单页处理
        let pagination = pagination.unwrap_or_else(|| Pagination {
            page: query.page.max(1),
            per_page: PER_PAGE,
            total: items.len() as u64,
            total_pages: u32::from(!items.is_empty()),
        });

        Ok(WebtoonPage { items, pagination })
    }

    /// GET /webtoons/{id}
    pub async fn webtoon(&self, id: i64) -> Result<Webtoon, ApiError> {
        let envelope = self.get_envelope(&format!("/webtoons/{id}"), &[]).await?;
        Self::into_data(envelope)
    }

    /// GET /genres
    pub async fn genres(&self) -> Result<Vec<String>, ApiError> {
        let envelope = self.get_envelope("/genres", &[]).await?;
        Self::into_data(envelope)
    }

    /// GET /stats
    pub async fn stats(&self) -> Result<Stats, ApiError> {
        let envelope = self.get_envelope("/stats", &[]).await?;
        Self::into_data(envelope)
    }

    async fn get_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<ApiEnvelope<T>, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, ?params, "GET");

        let response = self.http.get(&url).query(params).send().await?;
        let status = response.status();
        let text = response.text().await?;
        tracing::debug!(%url, status = status.as_u16(), bytes = text.len(), "response");

        let envelope: ApiEnvelope<T> = serde_json::from_str(&text)?;
        if !envelope.success {
            return Err(ApiError::Server(envelope.error));
        }
        Ok(envelope)
    }

    fn into_data<T>(envelope: ApiEnvelope<T>) -> Result<T, ApiError> {
        envelope.data.ok_or(ApiError::MissingData)
    }
}
