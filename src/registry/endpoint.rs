//! endpoint 解析

use http::Uri;

use crate::error::{RegistryError, Result};

/// 解析后的 endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// 传输类型（小写），如 `grpc`、`http`
    pub scheme: String,
    /// 不带方括号的主机（IPv6 字面量也不带）
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    /// 解析 `scheme://host:port`
    pub fn parse(endpoint: &str) -> Result<Self> {
        let uri: Uri = endpoint
            .parse()
            .map_err(|source| RegistryError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let scheme = uri
            .scheme_str()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| RegistryError::MissingScheme {
                endpoint: endpoint.to_string(),
            })?
            .to_ascii_lowercase();

        let authority = uri.authority().map(|a| a.as_str()).unwrap_or_default();
        let (host, port) =
            split_host_port(authority).map_err(|reason| RegistryError::MissingHostPort {
                endpoint: endpoint.to_string(),
                reason: reason.to_string(),
            })?;

        let port = port.parse::<u16>().map_err(|source| RegistryError::InvalidPort {
            endpoint: endpoint.to_string(),
            port: port.to_string(),
            source,
        })?;

        Ok(Self {
            scheme,
            host: host.to_string(),
            port,
        })
    }

    /// 命名服务中的服务名：`<name>.<scheme>`
    pub fn service_name(&self, name: &str) -> String {
        format!("{}.{}", name, self.scheme)
    }
}

/// 按 `host:port` / `[v6]:port` 拆分 authority，忽略 userinfo
fn split_host_port(authority: &str) -> std::result::Result<(&str, &str), &'static str> {
    let hostport = authority
        .rsplit_once('@')
        .map_or(authority, |(_, hostport)| hostport);
    if hostport.is_empty() {
        return Err("missing host and port in address");
    }

    if let Some(rest) = hostport.strip_prefix('[') {
        let (host, after) = rest.split_once(']').ok_or("missing ']' in address")?;
        let port = after.strip_prefix(':').ok_or("missing port in address")?;
        if host.is_empty() {
            return Err("missing host in address");
        }
        return Ok((host, port));
    }

    let (host, port) = hostport.rsplit_once(':').ok_or("missing port in address")?;
    if host.contains(':') {
        return Err("too many colons in address");
    }
    if host.is_empty() {
        return Err("missing host in address");
    }
    Ok((host, port))
}

/// 由传输类型和地址拼出 endpoint，IPv6 地址加方括号
pub fn format_endpoint(kind: &str, ip: &str, port: u64) -> String {
    if ip.contains(':') {
        format!("{}://[{}]:{}", kind, ip, port)
    } else {
        format!("{}://{}:{}", kind, ip, port)
    }
}
