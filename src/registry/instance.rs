//! 框架侧的服务实例定义

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// 服务实例
///
/// 一个实例可以同时暴露多种传输类型的 endpoint（如 `grpc://10.0.0.1:9000`、
/// `http://10.0.0.1:8000`），注册到命名服务时每个 endpoint 对应一条记录。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInstance {
    /// 实例 ID
    pub id: String,

    /// 服务名
    pub name: String,

    /// 版本
    pub version: String,

    /// 元数据
    pub metadata: HashMap<String, String>,

    /// endpoint 列表，格式为 `scheme://host:port`
    pub endpoints: Vec<String>,
}

impl ServiceInstance {
    /// 创建新的服务实例
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// 设置版本
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// 添加元数据
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// 添加 endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoints.push(endpoint.into());
        self
    }
}
