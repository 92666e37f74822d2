//! 注册中心适配器统一错误类型

use std::num::ParseIntError;

use thiserror::Error;

use super::code::ErrorCategory;
use crate::naming::NamingError;

/// 注册中心适配器错误
#[derive(Error, Debug)]
pub enum RegistryError {
    /// 服务实例名称为空
    #[error("flare/nacos: missing name, ServiceInstance.name can not be empty")]
    MissingName,

    /// endpoint 不是合法的 URI
    #[error("invalid endpoint `{endpoint}`: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: http::uri::InvalidUri,
    },

    /// endpoint 缺少 scheme
    #[error("missing scheme in endpoint `{endpoint}`")]
    MissingScheme { endpoint: String },

    /// endpoint 缺少 host:port
    #[error("invalid host:port in endpoint `{endpoint}`: {reason}")]
    MissingHostPort { endpoint: String, reason: String },

    /// 端口不是合法整数
    #[error("invalid port `{port}` in endpoint `{endpoint}`: {source}")]
    InvalidPort {
        endpoint: String,
        port: String,
        #[source]
        source: ParseIntError,
    },

    /// 命名客户端注册失败，附带出错的 endpoint
    #[error("RegisterInstance err: {source}, {endpoint}")]
    Register {
        endpoint: String,
        #[source]
        source: NamingError,
    },

    /// 命名客户端原样返回的错误
    #[error(transparent)]
    Naming(NamingError),

    /// watcher 已被取消
    #[error("watcher cancelled")]
    Cancelled,

    /// 命名客户端已丢弃订阅通道
    #[error("watcher closed by naming client")]
    WatcherClosed,

    /// 配置校验失败
    #[error("invalid registry options: {0}")]
    InvalidOptions(String),

    #[error("failed to parse registry config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("failed to read registry config: {0}")]
    Io(#[from] std::io::Error),
}

impl RegistryError {
    /// 错误类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            RegistryError::MissingName
            | RegistryError::InvalidEndpoint { .. }
            | RegistryError::MissingScheme { .. }
            | RegistryError::MissingHostPort { .. }
            | RegistryError::InvalidPort { .. } => ErrorCategory::Validation,
            RegistryError::Register { .. } | RegistryError::Naming(_) => ErrorCategory::Upstream,
            RegistryError::Cancelled | RegistryError::WatcherClosed => ErrorCategory::Watch,
            RegistryError::InvalidOptions(_) | RegistryError::Config(_) | RegistryError::Io(_) => {
                ErrorCategory::Configuration
            }
        }
    }

    /// 是否值得由调用方重试
    ///
    /// 本层从不重试；只有上游错误值得调用方整体重试（按 endpoint 注册是幂等的）。
    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Upstream
    }

    /// 出错的 endpoint（如果有）
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            RegistryError::InvalidEndpoint { endpoint, .. }
            | RegistryError::MissingScheme { endpoint }
            | RegistryError::MissingHostPort { endpoint, .. }
            | RegistryError::InvalidPort { endpoint, .. }
            | RegistryError::Register { endpoint, .. } => Some(endpoint),
            _ => None,
        }
    }
}
