//! 进程内命名客户端
//!
//! 在内存中保存实例记录并向订阅者推送快照，用于本地开发和测试。
//! 不做心跳和健康探测，健康状态只能通过 [`MemoryNamingClient::set_healthy`] 修改。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::model::{
    DeregisterInstanceParam, Instance, NamingChangeEvent, RegisterInstanceParam,
    SelectInstancesParam, SubscribeParam, grouped_service_name,
};
use super::{NamingClient, NamingError, NamingEventListener};

struct Subscriber {
    param: SubscribeParam,
    listener: Arc<dyn NamingEventListener>,
}

#[derive(Default)]
struct State {
    /// group@@service -> 实例列表
    services: HashMap<String, Vec<Instance>>,
    subscribers: Vec<Subscriber>,
}

impl State {
    /// 向匹配的订阅者推送最新快照
    ///
    /// 调用方持有写锁，保证并发修改时订阅者最后收到的就是最新快照。
    fn notify(&self, service_name: &str, group_name: &str) {
        let key = grouped_service_name(group_name, service_name);
        let instances = self.services.get(&key).map(Vec::as_slice).unwrap_or_default();
        for subscriber in self
            .subscribers
            .iter()
            .filter(|s| s.param.service_name == service_name && s.param.group_name == group_name)
        {
            let event = NamingChangeEvent {
                service_name: service_name.to_string(),
                group_name: group_name.to_string(),
                clusters: subscriber.param.clusters.clone(),
                instances: filter_clusters(instances, &subscriber.param.clusters),
            };
            debug!(
                service = %event.service_name,
                group = %event.group_name,
                instances = event.instances.len(),
                "push naming change event"
            );
            subscriber.listener.event(event);
        }
    }
}

/// 内存命名客户端
#[derive(Clone, Default)]
pub struct MemoryNamingClient {
    state: Arc<RwLock<State>>,
}

impl MemoryNamingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// 修改实例健康状态，返回是否找到该实例
    pub async fn set_healthy(
        &self,
        service_name: &str,
        group_name: &str,
        ip: &str,
        port: u64,
        healthy: bool,
    ) -> bool {
        let key = grouped_service_name(group_name, service_name);
        let mut state = self.state.write().await;
        let Some(instances) = state.services.get_mut(&key) else {
            return false;
        };
        let mut found = false;
        for instance in instances.iter_mut().filter(|i| i.ip == ip && i.port == port) {
            instance.healthy = healthy;
            found = true;
        }
        if found {
            state.notify(service_name, group_name);
        }
        found
    }

    /// 当前所有实例（含不健康实例）
    pub async fn all_instances(&self, service_name: &str, group_name: &str) -> Vec<Instance> {
        let key = grouped_service_name(group_name, service_name);
        self.state
            .read()
            .await
            .services
            .get(&key)
            .cloned()
            .unwrap_or_default()
    }

    /// 当前订阅数
    pub async fn subscriber_count(&self) -> usize {
        self.state.read().await.subscribers.len()
    }
}

fn filter_clusters(instances: &[Instance], clusters: &[String]) -> Vec<Instance> {
    instances
        .iter()
        .filter(|i| clusters.is_empty() || clusters.contains(&i.cluster_name))
        .cloned()
        .collect()
}

fn same_listener(a: &Arc<dyn NamingEventListener>, b: &Arc<dyn NamingEventListener>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

#[async_trait]
impl NamingClient for MemoryNamingClient {
    async fn register_instance(&self, param: RegisterInstanceParam) -> Result<(), NamingError> {
        if param.service_name.is_empty() {
            return Err("serviceName can not be empty".into());
        }
        if param.ip.is_empty() {
            return Err("ip can not be empty".into());
        }

        let key = grouped_service_name(&param.group_name, &param.service_name);
        let instance = Instance {
            instance_id: format!(
                "{}#{}#{}#{}",
                param.ip, param.port, param.cluster_name, key
            ),
            ip: param.ip,
            port: param.port,
            weight: param.weight,
            healthy: param.healthy,
            enabled: param.enabled,
            ephemeral: param.ephemeral,
            cluster_name: param.cluster_name,
            service_name: param.service_name.clone(),
            metadata: param.metadata,
        };

        let mut state = self.state.write().await;
        let instances = state.services.entry(key).or_default();
        match instances.iter_mut().find(|i| i.instance_id == instance.instance_id) {
            Some(existing) => *existing = instance,
            None => instances.push(instance),
        }
        state.notify(&param.service_name, &param.group_name);
        Ok(())
    }

    async fn deregister_instance(
        &self,
        param: DeregisterInstanceParam,
    ) -> Result<(), NamingError> {
        let key = grouped_service_name(&param.group_name, &param.service_name);
        let mut state = self.state.write().await;
        let (removed, now_empty) = match state.services.get_mut(&key) {
            Some(instances) => {
                let before = instances.len();
                instances.retain(|i| {
                    !(i.ip == param.ip && i.port == param.port && i.cluster_name == param.cluster)
                });
                (before != instances.len(), instances.is_empty())
            }
            None => (false, false),
        };
        if now_empty {
            state.services.remove(&key);
        }
        if removed {
            state.notify(&param.service_name, &param.group_name);
        }
        Ok(())
    }

    async fn select_instances(
        &self,
        param: SelectInstancesParam,
    ) -> Result<Vec<Instance>, NamingError> {
        let key = grouped_service_name(&param.group_name, &param.service_name);
        let state = self.state.read().await;
        let Some(instances) = state.services.get(&key) else {
            return Ok(Vec::new());
        };
        Ok(filter_clusters(instances, &param.clusters)
            .into_iter()
            .filter(|i| !param.healthy_only || (i.healthy && i.enabled && i.weight > 0.0))
            .collect())
    }

    async fn subscribe(
        &self,
        param: SubscribeParam,
        listener: Arc<dyn NamingEventListener>,
    ) -> Result<(), NamingError> {
        if param.service_name.is_empty() {
            return Err("serviceName can not be empty".into());
        }

        let mut state = self.state.write().await;
        let key = grouped_service_name(&param.group_name, &param.service_name);
        let instances = state
            .services
            .get(&key)
            .map(|list| filter_clusters(list, &param.clusters))
            .unwrap_or_default();
        // 首个快照同样在锁内推送，之后的变化不会被它覆盖
        listener.event(NamingChangeEvent {
            service_name: param.service_name.clone(),
            group_name: param.group_name.clone(),
            clusters: param.clusters.clone(),
            instances,
        });
        state.subscribers.push(Subscriber { param, listener });
        Ok(())
    }

    async fn unsubscribe(
        &self,
        param: SubscribeParam,
        listener: Arc<dyn NamingEventListener>,
    ) -> Result<(), NamingError> {
        let mut state = self.state.write().await;
        state
            .subscribers
            .retain(|s| !(s.param == param && same_listener(&s.listener, &listener)));
        Ok(())
    }
}
