//! endpoint 解析测试

use flare_registry_nacos::registry::endpoint::format_endpoint;
use flare_registry_nacos::{Endpoint, RegistryError};

#[test]
fn test_parse_endpoint() {
    let endpoint = Endpoint::parse("grpc://10.0.0.1:9000").unwrap();
    assert_eq!(endpoint.scheme, "grpc");
    assert_eq!(endpoint.host, "10.0.0.1");
    assert_eq!(endpoint.port, 9000);
    assert_eq!(endpoint.service_name("pay"), "pay.grpc");
}

#[test]
fn test_parse_endpoint_with_path_and_query() {
    let endpoint = Endpoint::parse("http://example.com:8080/api?isSecure=false").unwrap();
    assert_eq!(endpoint.scheme, "http");
    assert_eq!(endpoint.host, "example.com");
    assert_eq!(endpoint.port, 8080);
}

#[test]
fn test_parse_ipv6_endpoint() {
    let endpoint = Endpoint::parse("grpc://[2001:db8::1]:50051").unwrap();
    assert_eq!(endpoint.host, "2001:db8::1");
    assert_eq!(endpoint.port, 50051);
}

#[test]
fn test_parse_endpoint_missing_port() {
    let err = Endpoint::parse("grpc://hostonly").unwrap_err();
    match err {
        RegistryError::MissingHostPort { endpoint, reason } => {
            assert_eq!(endpoint, "grpc://hostonly");
            assert!(reason.contains("missing port"));
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(matches!(
        Endpoint::parse("grpc://[::1]"),
        Err(RegistryError::MissingHostPort { .. })
    ));
}

#[test]
fn test_parse_endpoint_missing_host() {
    let err = Endpoint::parse("grpc://:9000").unwrap_err();
    match err {
        RegistryError::MissingHostPort { endpoint, reason } => {
            assert_eq!(endpoint, "grpc://:9000");
            assert!(reason.contains("missing host"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_parse_endpoint_lowercases_scheme() {
    let grpc = Endpoint::parse("GRPC://10.0.0.1:9000").unwrap();
    assert_eq!(grpc.scheme, "grpc");
    assert_eq!(grpc.service_name("pay"), "pay.grpc");

    let http = Endpoint::parse("HTTP://10.0.0.1:9000").unwrap();
    assert_eq!(http.scheme, "http");
}

#[test]
fn test_parse_endpoint_rejects_garbage() {
    assert!(matches!(
        Endpoint::parse("grpc://bad host:1"),
        Err(RegistryError::InvalidEndpoint { .. })
    ));
    assert!(matches!(
        Endpoint::parse("/no/scheme"),
        Err(RegistryError::MissingScheme { .. })
    ));
    assert!(Endpoint::parse("grpc://h:70000").is_err());
}

#[test]
fn test_format_endpoint() {
    assert_eq!(format_endpoint("grpc", "10.0.0.1", 9000), "grpc://10.0.0.1:9000");
    assert_eq!(format_endpoint("http", "::1", 80), "http://[::1]:80");
}
