//! 基于命名客户端订阅的 watcher
//!
//! 命名客户端推送的快照写入 `tokio::sync::watch` 通道，只保留最新一份；
//! `next` 以拉取方式读取。`ctx` 取消、`stop` 或 watcher 被丢弃时释放订阅。

use std::sync::{Arc, Weak};

use async_trait::async_trait;
use futures::Stream;
use tokio::sync::{Mutex, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::instance::ServiceInstance;
use super::nacos::to_service_instance;
use super::trait_def::Watcher;
use crate::error::{RegistryError, Result};
use crate::naming::{Instance, NamingChangeEvent, NamingClient, NamingEventListener, SubscribeParam};

struct SnapshotListener {
    tx: watch::Sender<Vec<Instance>>,
}

impl NamingEventListener for SnapshotListener {
    fn event(&self, event: NamingChangeEvent) {
        self.tx.send_replace(event.instances);
    }
}

/// 一次订阅
///
/// 只弱引用 listener：命名客户端持有强引用，客户端丢弃后通道随之关闭。
struct Subscription {
    client: Arc<dyn NamingClient>,
    param: SubscribeParam,
    listener: Mutex<Option<Weak<SnapshotListener>>>,
}

impl Subscription {
    /// 取消订阅，只会真正执行一次
    async fn release(&self) -> Result<()> {
        let mut guard = self.listener.lock().await;
        let Some(weak) = guard.take() else {
            return Ok(());
        };
        let Some(listener) = weak.upgrade() else {
            return Ok(());
        };

        let dyn_listener: Arc<dyn NamingEventListener> = listener;
        if let Err(e) = self.client.unsubscribe(self.param.clone(), dyn_listener).await {
            *guard = Some(weak);
            return Err(RegistryError::Naming(e));
        }

        debug!(
            service = %self.param.service_name,
            group = %self.param.group_name,
            "naming subscription released"
        );
        Ok(())
    }
}

/// Nacos watcher
pub struct NacosWatcher {
    service_name: String,
    kind: String,
    token: CancellationToken,
    rx: watch::Receiver<Vec<Instance>>,
    subscription: Arc<Subscription>,
}

impl NacosWatcher {
    /// 订阅服务变化
    ///
    /// watcher 使用 `ctx` 的子 token，`ctx` 取消时后台任务负责释放订阅。
    pub async fn subscribe(
        ctx: &CancellationToken,
        client: Arc<dyn NamingClient>,
        service_name: &str,
        group_name: &str,
        kind: &str,
        clusters: Vec<String>,
    ) -> Result<Self> {
        let (tx, rx) = watch::channel(Vec::new());
        let listener = Arc::new(SnapshotListener { tx });
        let param = SubscribeParam {
            service_name: service_name.to_string(),
            group_name: group_name.to_string(),
            clusters,
        };

        let subscription = Arc::new(Subscription {
            client: client.clone(),
            param: param.clone(),
            listener: Mutex::new(Some(Arc::downgrade(&listener))),
        });

        client
            .subscribe(param, listener)
            .await
            .map_err(RegistryError::Naming)?;

        let token = ctx.child_token();
        let guard_token = token.clone();
        let guard = subscription.clone();
        tokio::spawn(async move {
            guard_token.cancelled().await;
            if let Err(e) = guard.release().await {
                warn!(
                    service = %guard.param.service_name,
                    error = %e,
                    "failed to release naming subscription"
                );
            }
        });

        debug!(service = %service_name, group = %group_name, "watcher subscribed");

        Ok(Self {
            service_name: service_name.to_string(),
            kind: kind.to_string(),
            token,
            rx,
            subscription,
        })
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    fn convert(&self, snapshot: Vec<Instance>) -> Vec<ServiceInstance> {
        snapshot
            .into_iter()
            .filter(|i| i.healthy && i.enabled)
            .map(|i| to_service_instance(i, &self.kind))
            .collect()
    }
}

#[async_trait]
impl Watcher for NacosWatcher {
    async fn next(&mut self) -> Result<Vec<ServiceInstance>> {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => {
                self.subscription.release().await?;
                Err(RegistryError::Cancelled)
            }
            changed = self.rx.changed() => {
                if changed.is_err() {
                    return Err(RegistryError::WatcherClosed);
                }
                let snapshot = self.rx.borrow_and_update().clone();
                debug!(service = %self.service_name, instances = snapshot.len(), "watcher snapshot");
                Ok(self.convert(snapshot))
            }
        }
    }

    async fn stop(&self) -> Result<()> {
        self.token.cancel();
        self.subscription.release().await
    }
}

impl Drop for NacosWatcher {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// 把 watcher 转换为快照流，取消或关闭后流结束
pub fn into_stream(watcher: Box<dyn Watcher>) -> impl Stream<Item = Result<Vec<ServiceInstance>>> {
    futures::stream::unfold(Some(watcher), |state| async move {
        let mut watcher = state?;
        match watcher.next().await {
            Ok(instances) => Some((Ok(instances), Some(watcher))),
            Err(RegistryError::Cancelled | RegistryError::WatcherClosed) => None,
            Err(e) => Some((Err(e), Some(watcher))),
        }
    })
}
