//! 注册中心适配器配置

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};
use crate::naming::DEFAULT_GROUP;

/// 命名服务允许的最大权重
pub const MAX_WEIGHT: f64 = 10000.0;

/// 适配器配置
///
/// 在创建 [`NacosRegistry`](crate::registry::NacosRegistry) 时确定，之后不再修改。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryOptions {
    /// 命名空间前缀（目前只保存，不参与任何调用）
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// 实例权重
    #[serde(default = "default_weight")]
    pub weight: f64,

    /// 集群名
    #[serde(default = "default_cluster")]
    pub cluster: String,

    /// 分组名
    #[serde(default = "default_group")]
    pub group: String,

    /// 实例元数据缺少 `kind` 时使用的默认传输类型
    #[serde(default = "default_kind")]
    pub kind: String,
}

fn default_prefix() -> String {
    "/microservices".to_string()
}

fn default_weight() -> f64 {
    100.0
}

fn default_cluster() -> String {
    "DEFAULT".to_string()
}

fn default_group() -> String {
    DEFAULT_GROUP.to_string()
}

fn default_kind() -> String {
    "grpc".to_string()
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            weight: default_weight(),
            cluster: default_cluster(),
            group: default_group(),
            kind: default_kind(),
        }
    }
}

impl RegistryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    #[must_use]
    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = cluster.into();
        self
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    #[must_use]
    pub fn with_default_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if !self.weight.is_finite() || !(0.0..=MAX_WEIGHT).contains(&self.weight) {
            return Err(RegistryError::InvalidOptions(format!(
                "weight must be within 0..={}, got {}",
                MAX_WEIGHT, self.weight
            )));
        }
        if self.cluster.is_empty() || self.cluster.contains(',') {
            return Err(RegistryError::InvalidOptions(format!(
                "cluster must be a single non-empty name, got `{}`",
                self.cluster
            )));
        }
        if self.group.is_empty() {
            return Err(RegistryError::InvalidOptions("group can not be empty".into()));
        }
        if self.kind.is_empty() {
            return Err(RegistryError::InvalidOptions("default kind can not be empty".into()));
        }
        Ok(())
    }

    /// 从 TOML 文本解析，缺省字段使用默认值，未知字段报错
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let options: RegistryOptions = toml::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
