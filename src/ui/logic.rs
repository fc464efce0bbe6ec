//! 业务逻辑处理 (Update/Dispatch)
//!
//! `dispatch` 处理用户操作，`apply` 处理副作用的执行结果。
//! 列表请求带有递增的 seq，只有最新一次请求的响应会被采用。

use chrono::Local;

use super::actions::{Action, Effect};
use super::state::{App, AppMode, LoadState, Outcome, ViewMode};
use crate::models::ListQuery;

impl App {
    /// 启动时的请求：类型与统计各一次，外加第一页列表
    pub fn mount(&mut self) {
        self.effects.push(Effect::FetchGenres);
        self.effects.push(Effect::FetchStats);
        self.request_webtoons();
    }

    /// 核心逻辑分发，返回 true 表示退出
    pub fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::MoveSelectionUp => self.move_vertical(false),
            Action::MoveSelectionDown => self.move_vertical(true),
            Action::MoveSelectionLeft => self.move_left(),
            Action::MoveSelectionRight => self.move_right(),

            Action::PrevPage => self.prev_page(),
            Action::NextPage => self.next_page(),
            Action::ToggleViewMode => self.toggle_view_mode(),
            Action::Reload => self.request_webtoons(),

            Action::StartSearch => self.start_search(),
            Action::StartPickGenre => self.start_pick_genre(),
            Action::OpenDetail => self.open_detail(),
            Action::OpenSelected => self.open_selected(),

            Action::Cancel => self.cancel(),

            Action::Submit => match self.mode {
                AppMode::Searching => self.submit_search(),
                AppMode::PickingGenre => self.confirm_genre(),
                AppMode::Detail => self.close_detail(),
                AppMode::Normal => self.open_detail(),
            },

            Action::Input(c) => {
                if self.mode == AppMode::Searching {
                    self.input_buffer.push(c);
                }
            }

            Action::DeleteChar => {
                if self.mode == AppMode::Searching {
                    self.input_buffer.pop();
                }
            }
        }
        false
    }

    /// 处理副作用结果
    pub fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Webtoons { seq, result } => {
                if seq != self.latest_seq {
                    tracing::debug!(seq, latest = self.latest_seq, "discarding stale list response");
                    return;
                }
                match result {
                    Ok(page) => {
                        tracing::debug!(
                            seq,
                            items = page.items.len(),
                            total_pages = page.pagination.total_pages,
                            "list loaded"
                        );
                        let last_page = page.pagination.total_pages.max(1);
                        self.webtoons = page.items;
                        self.pagination = Some(page.pagination);
                        self.load_state = LoadState::Loaded;
                        self.last_loaded_at = Some(Local::now());
                        self.clamp_selection();

                        // 数据变少后当前页可能越界
                        if self.current_page > last_page {
                            self.current_page = last_page;
                            self.request_webtoons();
                        }
                    }
                    Err(e) => {
                        tracing::warn!(seq, error = %e, "list fetch failed");
                        self.webtoons.clear();
                        self.pagination = None;
                        self.selected_index = 0;
                        self.load_state = LoadState::Errored(e.user_message());
                    }
                }
            }
            Outcome::Genres(result) => match result {
                Ok(genres) => {
                    self.genres = genres;
                    self.genre_cursor = self.genre_cursor.min(self.genres.len());
                }
                Err(e) => tracing::warn!(error = %e, "failed to fetch genres"),
            },
            Outcome::Stats(result) => match result {
                Ok(stats) => self.stats = Some(stats),
                Err(e) => tracing::warn!(error = %e, "failed to fetch stats"),
            },
            Outcome::Detail { id, result } => {
                let is_open = self.mode == AppMode::Detail
                    && self.detail.as_ref().is_some_and(|d| d.id == id);
                if !is_open {
                    return;
                }
                match result {
                    Ok(item) => self.detail = Some(item),
                    Err(e) => tracing::warn!(id, error = %e, "failed to refresh detail"),
                }
            }
            Outcome::OpenFailed { url, reason } => {
                tracing::warn!(%url, %reason, "failed to open link");
                self.message = Some(format!("无法打开链接: {reason}"));
            }
        }
    }

    // ============ 请求相关 ============

    /// 按当前筛选条件发起列表请求
    pub fn request_webtoons(&mut self) {
        self.latest_seq += 1;
        let seq = self.latest_seq;
        self.load_state = LoadState::Loading { seq };

        let search = self.search_term.trim();
        let query = ListQuery {
            page: self.current_page.max(1),
            genre: self.selected_genre.clone(),
            search: (!search.is_empty()).then(|| search.to_string()),
        };
        tracing::debug!(seq, ?query, "requesting list");
        self.effects.push(Effect::FetchWebtoons { seq, query });
    }

    // ============ 导航相关 ============

    fn move_vertical(&mut self, down: bool) {
        if self.mode == AppMode::PickingGenre {
            let last = self.genres.len();
            if down {
                self.genre_cursor = (self.genre_cursor + 1).min(last);
            } else {
                self.genre_cursor = self.genre_cursor.saturating_sub(1);
            }
            return;
        }
        if self.mode != AppMode::Normal || self.webtoons.is_empty() {
            return;
        }

        let step = match self.view_mode {
            ViewMode::Grid => usize::from(self.grid_columns),
            ViewMode::List => 1,
        };
        if down {
            if self.selected_index + step < self.webtoons.len() {
                self.selected_index += step;
            }
        } else if self.selected_index >= step {
            self.selected_index -= step;
        }
    }

    fn move_left(&mut self) {
        if self.mode == AppMode::Normal && self.view_mode == ViewMode::Grid {
            self.selected_index = self.selected_index.saturating_sub(1);
        }
    }

    fn move_right(&mut self) {
        if self.mode == AppMode::Normal
            && self.view_mode == ViewMode::Grid
            && self.selected_index + 1 < self.webtoons.len()
        {
            self.selected_index += 1;
        }
    }

    // ============ 分页相关 ============

    /// 上一页，第一页时无操作
    pub fn prev_page(&mut self) {
        if !self.can_go_prev() {
            return;
        }
        self.set_page(self.current_page.saturating_sub(1).max(1));
    }

    /// 下一页，最后一页时无操作
    pub fn next_page(&mut self) {
        if !self.can_go_next() {
            return;
        }
        let last = self.total_pages().unwrap_or(1);
        self.set_page((self.current_page + 1).min(last));
    }

    fn set_page(&mut self, page: u32) {
        if page == self.current_page {
            return;
        }
        self.current_page = page;
        self.selected_index = 0;
        self.request_webtoons();
    }

    /// 切换网格/列表，仅影响渲染
    pub fn toggle_view_mode(&mut self) {
        self.view_mode = self.view_mode.toggled();
    }

    // ============ 搜索相关 ============

    pub fn start_search(&mut self) {
        self.mode = AppMode::Searching;
        self.input_buffer = self.search_term.clone();
    }

    /// 提交搜索：回到第一页并重新请求
    pub fn submit_search(&mut self) {
        self.search_term = self.input_buffer.trim().to_string();
        self.input_buffer.clear();
        self.mode = AppMode::Normal;
        // 新关键词的结果页数可能更少，从第一页开始
        self.current_page = 1;
        self.selected_index = 0;
        self.request_webtoons();
    }

    // ============ 类型筛选相关 ============

    pub fn start_pick_genre(&mut self) {
        self.genre_cursor = self
            .selected_genre
            .as_ref()
            .and_then(|sel| self.genres.iter().position(|g| g == sel))
            .map_or(0, |i| i + 1);
        self.mode = AppMode::PickingGenre;
    }

    /// 确认类型，类型变化时回到第一页并重新请求
    pub fn confirm_genre(&mut self) {
        let chosen = self
            .genre_options()
            .get(self.genre_cursor)
            .copied()
            .flatten()
            .map(str::to_string);
        self.mode = AppMode::Normal;

        if chosen == self.selected_genre {
            return;
        }
        self.selected_genre = chosen;
        // 换类型后原页码可能越界，从第一页开始
        self.current_page = 1;
        self.selected_index = 0;
        self.request_webtoons();
    }

    // ============ 详情/外部链接相关 ============

    pub fn open_detail(&mut self) {
        if self.mode != AppMode::Normal {
            return;
        }
        if let Some(item) = self.selected_webtoon().cloned() {
            self.effects.push(Effect::FetchDetail { id: item.id });
            self.detail = Some(item);
            self.mode = AppMode::Detail;
        }
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
        self.mode = AppMode::Normal;
    }

    /// 用系统默认程序打开详情链接
    pub fn open_selected(&mut self) {
        let item = match self.mode {
            AppMode::Detail => self.detail.as_ref(),
            AppMode::Normal => self.selected_webtoon(),
            _ => None,
        };
        let Some(item) = item else {
            return;
        };

        match item.detail_link() {
            Some(url) => {
                let url = url.to_string();
                self.message = Some(format!("正在打开 {url}"));
                self.effects.push(Effect::OpenUrl(url));
            }
            None => self.message = Some("该作品没有详情链接".to_string()),
        }
    }

    // ============ 通用操作 ============

    /// 取消当前操作
    pub fn cancel(&mut self) {
        match self.mode {
            AppMode::Searching => self.input_buffer.clear(),
            AppMode::Detail => self.detail = None,
            AppMode::PickingGenre | AppMode::Normal => {}
        }
        self.mode = AppMode::Normal;
        self.message = None;
    }
}
