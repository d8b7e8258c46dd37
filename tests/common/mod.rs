//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::fmt;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use optic::{Client, ClientConfig, RequestContext, Service, ServiceConfig, Shutdown, WireError};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const BASE_PATH: &str = "/api/optic/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    #[serde(rename = "Answer")]
    pub answer: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subtraction {
    #[serde(rename = "First")]
    pub first: i64,
    #[serde(rename = "Second")]
    pub second: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Division {
    #[serde(rename = "Top")]
    pub top: i64,
    #[serde(rename = "Bottom")]
    pub bottom: i64,
}

/// Caller-defined error shape: a message and a status code.
#[derive(Debug, Clone, PartialEq)]
pub struct ArithmeticError {
    pub message: String,
    pub code: u16,
}

impl fmt::Display for ArithmeticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl optic::HttpError for ArithmeticError {
    fn code(&self) -> u16 {
        self.code
    }
}

impl From<WireError> for ArithmeticError {
    fn from(wire: WireError) -> Self {
        Self {
            message: wire.message,
            code: wire.code,
        }
    }
}

pub async fn divide(req: Division, _ctx: RequestContext) -> Result<Solution, ArithmeticError> {
    if req.bottom == 0 {
        return Err(ArithmeticError {
            code: 422,
            message: "Impossible to divide by Zero".to_string(),
        });
    }
    Ok(Solution { answer: req.top / req.bottom })
}

pub async fn subtract(req: Subtraction, ctx: RequestContext) -> Result<Solution, ArithmeticError> {
    if let Some(token) = ctx.authorization() {
        if token != "letmein" {
            return Err(ArithmeticError {
                code: 401,
                message: "Bad token".to_string(),
            });
        }
    }
    Ok(Solution { answer: req.first - req.second })
}

pub fn service_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.host = "127.0.0.1".into();
    config.port = 0;
    config.base_path = BASE_PATH.into();
    config
}

/// The divide/subtract service with its health route.
pub fn arithmetic_service(config: ServiceConfig) -> Service {
    let mut service = Service::new(config).unwrap();
    optic::mirror!(service, subtract, "/RunSubtraction/").unwrap();
    optic::mirror!(service, divide).unwrap();
    service.route_unmanaged(
        "/health-check/",
        axum::routing::get(|| async { axum::http::StatusCode::OK }),
    );
    service
}

/// Serve `service` on an ephemeral port. Returns its address and the shutdown handle.
pub async fn start_service(service: Service) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = service.serve(listener, receiver).await;
    });

    (addr, shutdown)
}

pub fn client_for(addr: SocketAddr, base_path: &str) -> Client {
    Client::new(ClientConfig::from_parts("127.0.0.1", Some(addr.port()), base_path, false)).unwrap()
}

/// Start a programmable backend that answers every request with a fixed status and raw body.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = std::sync::Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;

                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            201 => "201 Created",
                            202 => "202 Accepted",
                            404 => "404 Not Found",
                            418 => "418 I'm a teapot",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}
