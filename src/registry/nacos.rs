//! Nacos 服务注册发现实现

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::endpoint::{Endpoint, format_endpoint};
use super::instance::ServiceInstance;
use super::trait_def::{Discovery, Registrar, Watcher};
use super::watcher::NacosWatcher;
use crate::config::RegistryOptions;
use crate::error::{RegistryError, Result};
use crate::naming::{
    DeregisterInstanceParam, Instance, NamingClient, RegisterInstanceParam, SelectInstancesParam,
};

/// 元数据中的传输类型键
pub const METADATA_KIND: &str = "kind";
/// 元数据中的版本键
pub const METADATA_VERSION: &str = "version";

/// Nacos 服务注册发现
///
/// 一个 [`ServiceInstance`] 的每个 endpoint 注册为一条命名服务记录，
/// 服务名为 `<name>.<scheme>`，用来区分同一服务下的不同传输类型。
pub struct NacosRegistry {
    options: RegistryOptions,
    client: Arc<dyn NamingClient>,
}

impl NacosRegistry {
    /// 使用校验后的配置创建
    pub fn new(client: Arc<dyn NamingClient>, options: RegistryOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options, client })
    }

    /// 使用默认配置创建
    pub fn with_defaults(client: Arc<dyn NamingClient>) -> Self {
        Self {
            options: RegistryOptions::default(),
            client,
        }
    }

    pub fn options(&self) -> &RegistryOptions {
        &self.options
    }

    /// 命名空间前缀
    pub fn prefix(&self) -> &str {
        &self.options.prefix
    }
}

/// 合并元数据：`kind`/`version` 打底，实例自己的元数据覆盖
fn merged_metadata(
    scheme: &str,
    version: &str,
    metadata: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut merged = HashMap::with_capacity(metadata.len() + 2);
    merged.insert(METADATA_KIND.to_string(), scheme.to_string());
    merged.insert(METADATA_VERSION.to_string(), version.to_string());
    merged.extend(metadata.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

/// 命名服务记录转换为服务实例，`kind` 缺省时使用 `default_kind`
pub(crate) fn to_service_instance(instance: Instance, default_kind: &str) -> ServiceInstance {
    let kind = instance.metadata_value(METADATA_KIND).unwrap_or(default_kind);
    let endpoint = format_endpoint(kind, &instance.ip, instance.port);
    let version = instance
        .metadata_value(METADATA_VERSION)
        .unwrap_or_default()
        .to_string();

    ServiceInstance {
        id: instance.instance_id,
        name: instance.service_name,
        version,
        metadata: instance.metadata,
        endpoints: vec![endpoint],
    }
}

#[async_trait]
impl Registrar for NacosRegistry {
    async fn register(&self, instance: &ServiceInstance) -> Result<()> {
        if instance.name.is_empty() {
            return Err(RegistryError::MissingName);
        }

        for raw in &instance.endpoints {
            let endpoint = Endpoint::parse(raw)?;
            let service_name = endpoint.service_name(&instance.name);
            let param = RegisterInstanceParam {
                ip: endpoint.host.clone(),
                port: u64::from(endpoint.port),
                service_name: service_name.clone(),
                weight: self.options.weight,
                enabled: true,
                healthy: true,
                ephemeral: true,
                metadata: merged_metadata(&endpoint.scheme, &instance.version, &instance.metadata),
                cluster_name: self.options.cluster.clone(),
                group_name: self.options.group.clone(),
            };

            if let Err(source) = self.client.register_instance(param).await {
                warn!(service = %service_name, endpoint = %raw, error = %source, "RegisterInstance failed");
                return Err(RegistryError::Register {
                    endpoint: raw.clone(),
                    source,
                });
            }

            info!(
                service = %service_name,
                group = %self.options.group,
                cluster = %self.options.cluster,
                endpoint = %raw,
                "instance registered"
            );
        }

        Ok(())
    }

    async fn deregister(&self, instance: &ServiceInstance) -> Result<()> {
        if instance.name.is_empty() {
            return Err(RegistryError::MissingName);
        }

        for raw in &instance.endpoints {
            let endpoint = Endpoint::parse(raw)?;
            let service_name = endpoint.service_name(&instance.name);
            let param = DeregisterInstanceParam {
                ip: endpoint.host.clone(),
                port: u64::from(endpoint.port),
                service_name: service_name.clone(),
                group_name: self.options.group.clone(),
                cluster: self.options.cluster.clone(),
                ephemeral: true,
            };

            if let Err(e) = self.client.deregister_instance(param).await {
                warn!(service = %service_name, endpoint = %raw, error = %e, "DeregisterInstance failed");
                return Err(RegistryError::Naming(e));
            }

            info!(service = %service_name, endpoint = %raw, "instance deregistered");
        }

        Ok(())
    }
}

#[async_trait]
impl Discovery for NacosRegistry {
    async fn get_service(&self, service_name: &str) -> Result<Vec<ServiceInstance>> {
        let param = SelectInstancesParam {
            service_name: service_name.to_string(),
            group_name: self.options.group.clone(),
            clusters: Vec::new(),
            healthy_only: true,
        };

        let instances = self
            .client
            .select_instances(param)
            .await
            .map_err(RegistryError::Naming)?;

        debug!(service = %service_name, count = instances.len(), "selected healthy instances");

        Ok(instances
            .into_iter()
            .map(|instance| to_service_instance(instance, &self.options.kind))
            .collect())
    }

    async fn watch(
        &self,
        ctx: &CancellationToken,
        service_name: &str,
    ) -> Result<Box<dyn Watcher>> {
        let watcher = NacosWatcher::subscribe(
            ctx,
            self.client.clone(),
            service_name,
            &self.options.group,
            &self.options.kind,
            vec![self.options.cluster.clone()],
        )
        .await?;
        Ok(Box::new(watcher))
    }
}
