//! 错误类别定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 错误类别
///
/// - `Validation`: 调用方输入错误（名称为空、endpoint 非法），本地产生，不可重试
/// - `Upstream`: 命名客户端返回的错误（网络、服务端拒绝），本层不重试
/// - `Watch`: watcher 生命周期相关
/// - `Configuration`: 配置加载与校验
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    Validation,
    Upstream,
    Watch,
    Configuration,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Validation => write!(f, "VALIDATION"),
            ErrorCategory::Upstream => write!(f, "UPSTREAM"),
            ErrorCategory::Watch => write!(f, "WATCH"),
            ErrorCategory::Configuration => write!(f, "CONFIGURATION"),
        }
    }
}
