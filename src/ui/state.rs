//! App 状态定义 (Model)
//!
//! 包含应用状态结构体及相关枚举

use chrono::{DateTime, Local};

use super::actions::Effect;
use crate::api::ApiError;
use crate::models::{Pagination, Stats, Webtoon, WebtoonPage};

/// 应用状态
pub struct App {
    // 最近一次完成的列表请求的快照，二者总是同时替换
    pub webtoons: Vec<Webtoon>,
    pub pagination: Option<Pagination>,

    pub genres: Vec<String>,
    pub stats: Option<Stats>,
    pub load_state: LoadState,

    // 筛选/视图状态，不持久化
    pub search_term: String,
    pub selected_genre: Option<String>,
    pub current_page: u32,
    pub view_mode: ViewMode,

    pub selected_index: usize,
    pub mode: AppMode,
    pub input_buffer: String,
    pub genre_cursor: usize,
    pub detail: Option<Webtoon>,
    pub message: Option<String>,
    pub grid_columns: u16,
    pub last_loaded_at: Option<DateTime<Local>>,

    pub(super) latest_seq: u64,
    pub(super) effects: Vec<Effect>,
}

/// 应用模式
#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Normal,
    Searching,
    PickingGenre,
    Detail,
}

/// 展示方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Grid => ViewMode::List,
            ViewMode::List => ViewMode::Grid,
        }
    }
}

/// 列表请求状态机
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading { seq: u64 },
    Loaded,
    Errored(String),
}

/// 副作用执行结果，回送给 App
#[derive(Debug)]
pub enum Outcome {
    Webtoons {
        seq: u64,
        result: Result<WebtoonPage, ApiError>,
    },
    Genres(Result<Vec<String>, ApiError>),
    Stats(Result<Stats, ApiError>),
    Detail {
        id: i64,
        result: Result<Webtoon, ApiError>,
    },
    OpenFailed {
        url: String,
        reason: String,
    },
}

impl App {
    /// 创建新的应用实例
    pub fn new(grid_columns: u16) -> Self {
        Self {
            webtoons: Vec::new(),
            pagination: None,
            genres: Vec::new(),
            stats: None,
            load_state: LoadState::Idle,
            search_term: String::new(),
            selected_genre: None,
            current_page: 1,
            view_mode: ViewMode::Grid,
            selected_index: 0,
            mode: AppMode::Normal,
            input_buffer: String::new(),
            genre_cursor: 0,
            detail: None,
            message: None,
            grid_columns: grid_columns.max(1),
            last_loaded_at: None,
            latest_seq: 0,
            effects: Vec::new(),
        }
    }

    /// 取出待执行的副作用
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load_state, LoadState::Loading { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match &self.load_state {
            LoadState::Errored(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.pagination.as_ref().map(|p| p.total_pages)
    }

    /// 分页控件仅在加载完成、结果非空且多于一页时显示
    pub fn pagination_visible(&self) -> bool {
        self.load_state == LoadState::Loaded
            && !self.webtoons.is_empty()
            && self.total_pages().is_some_and(|t| t > 1)
    }

    pub fn can_go_prev(&self) -> bool {
        self.pagination_visible() && self.current_page > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.pagination_visible() && self.total_pages().is_some_and(|t| self.current_page < t)
    }

    /// 获取当前选中的漫画
    pub fn selected_webtoon(&self) -> Option<&Webtoon> {
        if self.load_state != LoadState::Loaded {
            return None;
        }
        self.webtoons.get(self.selected_index)
    }

    /// 类型选择项，第一项 None 表示全部
    pub fn genre_options(&self) -> Vec<Option<&str>> {
        std::iter::once(None)
            .chain(self.genres.iter().map(|g| Some(g.as_str())))
            .collect()
    }

    /// 确保选中索引有效
    pub(super) fn clamp_selection(&mut self) {
        if self.webtoons.is_empty() {
            self.selected_index = 0;
        } else if self.selected_index >= self.webtoons.len() {
            self.selected_index = self.webtoons.len() - 1;
        }
    }
}
