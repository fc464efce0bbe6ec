use serde::{Deserialize, Deserializer, Serialize};

/// 每页条数（固定）
pub const PER_PAGE: u32 = 12;

/// 漫画条目（服务端快照，客户端不修改）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Webtoon {
    pub id: i64,
    // 爬虫写入的标题可能为 NULL
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub num_episodes: Option<u32>,
    #[serde(default)]
    pub detail_url: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Webtoon {
    /// 简介，空值时返回占位文本
    pub fn description_or_default(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.trim().is_empty() => d,
            _ => "暂无简介",
        }
    }

    /// 类型标签（空字符串视为无）
    pub fn genre_label(&self) -> Option<&str> {
        self.genre.as_deref().filter(|g| !g.is_empty())
    }

    pub fn episodes(&self) -> u32 {
        self.num_episodes.unwrap_or(0)
    }

    pub fn detail_link(&self) -> Option<&str> {
        self.detail_url.as_deref().filter(|u| !u.is_empty())
    }
}

/// 类型分布中的一项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreCount {
    pub genre: String,
    pub count: u64,
}

/// 全库统计
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub total_webtoons: u64,
    #[serde(default)]
    pub total_episodes: u64,
    #[serde(default)]
    pub genre_distribution: Vec<GenreCount>,
}

impl Stats {
    /// 查询某类型的数量
    pub fn count_for(&self, genre: &str) -> Option<u64> {
        self.genre_distribution
            .iter()
            .find(|g| g.genre == genre)
            .map(|g| g.count)
    }
}

/// 分页描述
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub total_pages: u32,
}

/// 服务端统一响应外壳
///
/// 成功: `{ success: true, data, pagination? }`
/// 失败: `{ success: false, error }`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub error: Option<String>,
}

/// 一次列表请求的完整结果，列表与分页始终来自同一响应
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WebtoonPage {
    pub items: Vec<Webtoon>,
    pub pagination: Pagination,
}

/// 列表查询条件
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListQuery {
    pub page: u32,
    pub genre: Option<String>,
    pub search: Option<String>,
}

impl ListQuery {
    /// 生成 URL 查询参数，空的类型/关键词不会出现
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.max(1).to_string()),
            ("per_page", PER_PAGE.to_string()),
        ];
        if let Some(genre) = self.genre.as_deref().filter(|g| !g.is_empty()) {
            params.push(("genre", genre.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_list_envelope() {
        let body = r#"{
            "success": true,
            "data": [{
                "id": 7,
                "title": "Tower",
                "cover_url": null,
                "description": "",
                "genre": "Fantasy",
                "num_episodes": 120,
                "detail_url": "https://example.com/7"
            }],
            "pagination": {"page": 1, "per_page": 12, "total": 1, "total_pages": 1}
        }"#;

        let env: ApiEnvelope<Vec<Webtoon>> = serde_json::from_str(body).unwrap();
        assert!(env.success);
        let items = env.data.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].cover_url, None);
        assert_eq!(items[0].description_or_default(), "暂无简介");
        assert_eq!(items[0].genre_label(), Some("Fantasy"));
        assert_eq!(env.pagination.unwrap().total_pages, 1);
    }

    #[test]
    fn test_null_title_keeps_page() {
        let body = r#"{
            "success": true,
            "data": [
                {"id": 1, "title": null, "genre": "Drama", "num_episodes": null},
                {"id": 2, "title": "Kept"}
            ]
        }"#;

        let env: ApiEnvelope<Vec<Webtoon>> = serde_json::from_str(body).unwrap();
        let items = env.data.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "");
        assert_eq!(items[0].episodes(), 0);
        assert_eq!(items[1].title, "Kept");
    }

    #[test]
    fn test_decode_envelope_without_data() {
        let env: ApiEnvelope<Stats> = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(env.success);
        assert!(env.data.is_none());
    }

    #[test]
    fn test_decode_failure_envelope() {
        let env: ApiEnvelope<Vec<String>> =
            serde_json::from_str(r#"{"success": false, "error": "Invalid genre"}"#).unwrap();
        assert!(!env.success);
        assert!(env.data.is_none());
        assert_eq!(env.error.as_deref(), Some("Invalid genre"));
    }

    #[test]
    fn test_stats_count_for() {
        let stats: Stats = serde_json::from_str(
            r#"{"total_webtoons": 3, "total_episodes": 40,
                "genre_distribution": [{"genre": "Action", "count": 2}, {"genre": "Drama", "count": 1}]}"#,
        )
        .unwrap();
        assert_eq!(stats.count_for("Action"), Some(2));
        assert_eq!(stats.count_for("Romance"), None);
    }

    #[test]
    fn test_query_params_skip_empty_filters() {
        let query = ListQuery {
            page: 3,
            genre: Some(String::new()),
            search: Some("hero".to_string()),
        };
        let params = query.to_params();
        assert_eq!(
            params,
            vec![
                ("page", "3".to_string()),
                ("per_page", "12".to_string()),
                ("search", "hero".to_string()),
            ]
        );
    }
}
