//! 使用内存命名客户端演示注册、发现和监听
//!
//! ```bash
//! RUST_LOG=debug cargo run --example memory_registry
//! ```

use std::sync::Arc;
use std::time::Duration;

use flare_registry_nacos::{
    Discovery, MemoryNamingClient, NacosRegistry, Registrar, RegistryOptions, ServiceInstance,
    Watcher,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let client = Arc::new(MemoryNamingClient::new());
    let registry = Arc::new(NacosRegistry::new(
        client,
        RegistryOptions::new().with_cluster("SH").with_weight(50.0),
    )?);

    let ctx = CancellationToken::new();
    let mut watcher = registry.watch(&ctx, "pay.grpc").await?;

    let watch_task = tokio::spawn(async move {
        loop {
            match watcher.next().await {
                Ok(instances) => {
                    let endpoints: Vec<_> =
                        instances.iter().flat_map(|i| i.endpoints.iter()).collect();
                    info!(?endpoints, "pay.grpc changed");
                }
                Err(e) => {
                    info!(error = %e, "watcher finished");
                    break;
                }
            }
        }
    });

    let instance = ServiceInstance::new("pay-1", "pay")
        .with_version("v1")
        .with_metadata("zone", "sh-a")
        .with_endpoint("grpc://10.0.0.1:9000")
        .with_endpoint("http://10.0.0.1:8000");
    registry.register(&instance).await?;

    for service in ["pay.grpc", "pay.http"] {
        for found in registry.get_service(service).await? {
            info!(service, id = %found.id, version = %found.version, endpoints = ?found.endpoints, "discovered");
        }
    }

    tokio::time::sleep(Duration::from_millis(100)).await;
    registry.deregister(&instance).await?;
    tokio::time::sleep(Duration::from_millis(100)).await;

    ctx.cancel();
    watch_task.await?;
    Ok(())
}
