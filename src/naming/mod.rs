//! 命名服务客户端抽象
//!
//! 适配器只依赖下面这组操作：注册、注销、查询以及按 服务名 + 分组 + 集群 的订阅。
//! 连接管理、心跳、客户端缓存和推送都由具体客户端实现，对适配器不可见。

pub mod memory;
pub mod model;

use std::sync::Arc;

use async_trait::async_trait;

pub use memory::MemoryNamingClient;
pub use model::{
    DEFAULT_GROUP, DeregisterInstanceParam, Instance, NamingChangeEvent, RegisterInstanceParam,
    SelectInstancesParam, SubscribeParam, grouped_service_name,
};

/// 命名客户端返回的错误
pub type NamingError = Box<dyn std::error::Error + Send + Sync>;

/// 实例变化监听器
///
/// 由命名客户端在推送线程/任务中回调，客户端可能在持锁时调用，
/// 实现不能阻塞，也不能回调客户端。
pub trait NamingEventListener: Send + Sync {
    fn event(&self, event: NamingChangeEvent);
}

/// 命名服务客户端
///
/// 实现需要可以被多个任务并发使用。
#[async_trait]
pub trait NamingClient: Send + Sync {
    /// 注册实例（同一 ip:port + 集群 重复注册是幂等的）
    async fn register_instance(&self, param: RegisterInstanceParam) -> Result<(), NamingError>;

    /// 注销实例
    async fn deregister_instance(&self, param: DeregisterInstanceParam)
        -> Result<(), NamingError>;

    /// 查询实例
    async fn select_instances(
        &self,
        param: SelectInstancesParam,
    ) -> Result<Vec<Instance>, NamingError>;

    /// 订阅实例变化
    ///
    /// 同一个 listener 以 `Arc` 指针区分，`unsubscribe` 时需传入同一个 `Arc`。
    async fn subscribe(
        &self,
        param: SubscribeParam,
        listener: Arc<dyn NamingEventListener>,
    ) -> Result<(), NamingError>;

    /// 取消订阅
    async fn unsubscribe(
        &self,
        param: SubscribeParam,
        listener: Arc<dyn NamingEventListener>,
    ) -> Result<(), NamingError>;
}
