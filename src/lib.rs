//! Flare Registry Nacos
//!
//! 基于 Nacos 命名服务的服务注册发现适配器：注册、注销、查询健康实例以及监听实例变化。
//! 连接、心跳、缓存和推送都由注入的命名客户端（[`naming::NamingClient`]）负责。

pub mod config;
pub mod error;
pub mod naming;
pub mod registry;

pub use config::RegistryOptions;
pub use error::{ErrorCategory, RegistryError, Result};
pub use naming::{MemoryNamingClient, NamingClient, NamingError, NamingEventListener};
pub use registry::{
    Discovery, Endpoint, NacosRegistry, NacosWatcher, Registrar, ServiceInstance, Watcher,
};
