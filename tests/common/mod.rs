//! 集成测试共用工具
//!
//! `RecordingClient` 包装内存命名客户端，记录每一次调用参数，并可以按端口注入失败。

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use flare_registry_nacos::naming::{
    DeregisterInstanceParam, Instance, MemoryNamingClient, NamingClient, NamingError,
    NamingEventListener, RegisterInstanceParam, SelectInstancesParam, SubscribeParam,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Register(RegisterInstanceParam),
    Deregister(DeregisterInstanceParam),
    Select(SelectInstancesParam),
    Subscribe(SubscribeParam),
    Unsubscribe(SubscribeParam),
}

#[derive(Clone, Default)]
pub struct RecordingClient {
    pub inner: MemoryNamingClient,
    calls: Arc<Mutex<Vec<Call>>>,
    fail_register_port: Arc<Mutex<Option<u64>>>,
    fail_deregister_port: Arc<Mutex<Option<u64>>>,
    fail_select: Arc<Mutex<bool>>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn registrations(&self) -> Vec<RegisterInstanceParam> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Register(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    pub fn deregistrations(&self) -> Vec<DeregisterInstanceParam> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Deregister(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    pub fn selects(&self) -> Vec<SelectInstancesParam> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Select(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    pub fn unsubscribe_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Unsubscribe(_)))
            .count()
    }

    pub fn fail_register_on_port(&self, port: u64) {
        *self.fail_register_port.lock().unwrap() = Some(port);
    }

    pub fn fail_deregister_on_port(&self, port: u64) {
        *self.fail_deregister_port.lock().unwrap() = Some(port);
    }

    pub fn fail_select(&self) {
        *self.fail_select.lock().unwrap() = true;
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl NamingClient for RecordingClient {
    async fn register_instance(&self, param: RegisterInstanceParam) -> Result<(), NamingError> {
        self.record(Call::Register(param.clone()));
        if *self.fail_register_port.lock().unwrap() == Some(param.port) {
            return Err(format!("naming server rejected port {}", param.port).into());
        }
        self.inner.register_instance(param).await
    }

    async fn deregister_instance(
        &self,
        param: DeregisterInstanceParam,
    ) -> Result<(), NamingError> {
        self.record(Call::Deregister(param.clone()));
        if *self.fail_deregister_port.lock().unwrap() == Some(param.port) {
            return Err(format!("naming server unreachable for port {}", param.port).into());
        }
        self.inner.deregister_instance(param).await
    }

    async fn select_instances(
        &self,
        param: SelectInstancesParam,
    ) -> Result<Vec<Instance>, NamingError> {
        self.record(Call::Select(param.clone()));
        if *self.fail_select.lock().unwrap() {
            return Err("naming server unavailable".into());
        }
        self.inner.select_instances(param).await
    }

    async fn subscribe(
        &self,
        param: SubscribeParam,
        listener: Arc<dyn NamingEventListener>,
    ) -> Result<(), NamingError> {
        self.record(Call::Subscribe(param.clone()));
        self.inner.subscribe(param, listener).await
    }

    async fn unsubscribe(
        &self,
        param: SubscribeParam,
        listener: Arc<dyn NamingEventListener>,
    ) -> Result<(), NamingError> {
        self.record(Call::Unsubscribe(param.clone()));
        self.inner.unsubscribe(param, listener).await
    }
}

/// 初始化测试日志（重复调用无副作用）
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
