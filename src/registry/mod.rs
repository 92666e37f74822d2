//! 服务注册发现模块
//!
//! 把框架通用的服务实例（名称、版本、元数据、endpoint URL）映射到 Nacos 的实例模型
//! （IP、端口、权重、健康标记、集群/分组）。

pub mod endpoint;
pub mod instance;
pub mod nacos;
pub mod trait_def;
pub mod watcher;

pub use endpoint::Endpoint;
pub use instance::ServiceInstance;
pub use nacos::{METADATA_KIND, METADATA_VERSION, NacosRegistry};
pub use trait_def::{Discovery, Registrar, Watcher};
pub use watcher::{NacosWatcher, into_stream};
