//! 服务注册发现 Trait 定义

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::instance::ServiceInstance;
use crate::error::Result;

/// 服务注册
///
/// 一个实例的多个 endpoint 逐个注册/注销，中途失败时已经处理的 endpoint 不会回滚，
/// 调用方需要整体重试（按 endpoint 注册是幂等的）。
///
/// 取消方式是丢弃返回的 future（或用 `tokio::time::timeout` 包装），已发出的客户端请求
/// 仍可能在服务端生效。
#[async_trait]
pub trait Registrar: Send + Sync {
    /// 注册服务实例
    async fn register(&self, instance: &ServiceInstance) -> Result<()>;

    /// 注销服务实例
    async fn deregister(&self, instance: &ServiceInstance) -> Result<()>;
}

/// 服务发现
#[async_trait]
pub trait Discovery: Send + Sync {
    /// 获取服务的健康实例，没有匹配时返回空列表
    async fn get_service(&self, service_name: &str) -> Result<Vec<ServiceInstance>>;

    /// 监听服务变化，`ctx` 取消后 watcher 释放订阅
    async fn watch(&self, ctx: &CancellationToken, service_name: &str)
        -> Result<Box<dyn Watcher>>;
}

/// 服务变化监听器
#[async_trait]
pub trait Watcher: Send + Sync {
    /// 阻塞直到实例列表变化或被取消
    async fn next(&mut self) -> Result<Vec<ServiceInstance>>;

    /// 停止监听并释放订阅
    async fn stop(&self) -> Result<()>;
}
