//! 错误处理模块
//!
//! 区分调用方输入错误与命名客户端返回的上游错误，所有错误都立即返回给调用方

pub mod code;
pub mod registry_error;

pub use code::ErrorCategory;
pub use registry_error::RegistryError;

/// 适配器默认使用的结果类型
pub type Result<T> = std::result::Result<T, RegistryError>;
