//! Action / Effect 枚举定义 (Intent)
//!
//! 用户交互转化为明确的语义化 Action；
//! 需要访问网络或系统的副作用由 Effect 描述，交给事件循环执行

use crate::models::ListQuery;

/// 用户操作枚举
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    MoveSelectionUp,
    MoveSelectionDown,
    MoveSelectionLeft,
    MoveSelectionRight,

    // 分页与视图
    PrevPage,
    NextPage,
    ToggleViewMode,
    Reload,

    // 触发特定功能
    StartSearch,
    StartPickGenre,
    OpenDetail,
    OpenSelected,

    // 表单/通用交互
    Cancel,      // Esc
    Submit,      // Enter
    Input(char), // 输入字符
    DeleteChar,  // Backspace
}

/// 副作用请求
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// 拉取列表，seq 用于丢弃过期响应
    FetchWebtoons { seq: u64, query: ListQuery },
    FetchGenres,
    FetchStats,
    FetchDetail { id: i64 },
    OpenUrl(String),
}
