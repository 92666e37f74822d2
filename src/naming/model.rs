//! 命名服务侧的数据模型
//!
//! 字段与 Nacos 实例模型保持一致（序列化为 camelCase）

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Nacos 默认分组
pub const DEFAULT_GROUP: &str = "DEFAULT_GROUP";

/// 分组名与服务名之间的分隔符
pub const GROUP_SERVICE_SEPARATOR: &str = "@@";

/// 命名服务中的实例记录
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Instance {
    pub instance_id: String,
    pub ip: String,
    pub port: u64,
    pub weight: f64,
    pub healthy: bool,
    pub enabled: bool,
    pub ephemeral: bool,
    pub cluster_name: String,
    pub service_name: String,
    pub metadata: HashMap<String, String>,
}

impl Instance {
    /// 元数据中的某个键
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

/// 注册实例参数
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterInstanceParam {
    pub ip: String,
    pub port: u64,
    pub service_name: String,
    pub weight: f64,
    pub enabled: bool,
    pub healthy: bool,
    pub ephemeral: bool,
    pub metadata: HashMap<String, String>,
    pub cluster_name: String,
    pub group_name: String,
}

/// 注销实例参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeregisterInstanceParam {
    pub ip: String,
    pub port: u64,
    pub service_name: String,
    pub group_name: String,
    pub cluster: String,
    pub ephemeral: bool,
}

/// 查询实例参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectInstancesParam {
    pub service_name: String,
    pub group_name: String,
    /// 为空表示不按集群过滤
    pub clusters: Vec<String>,
    pub healthy_only: bool,
}

/// 订阅参数，订阅按 服务名 + 分组 + 集群 定位
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscribeParam {
    pub service_name: String,
    pub group_name: String,
    pub clusters: Vec<String>,
}

/// 实例列表变化事件，携带变化后的完整快照
#[derive(Debug, Clone, PartialEq)]
pub struct NamingChangeEvent {
    pub service_name: String,
    pub group_name: String,
    pub clusters: Vec<String>,
    pub instances: Vec<Instance>,
}

/// `group@@service` 形式的分组服务名
pub fn grouped_service_name(group_name: &str, service_name: &str) -> String {
    format!("{}{}{}", group_name, GROUP_SERVICE_SEPARATOR, service_name)
}
