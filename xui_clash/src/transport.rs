use crate::settings::{Network, StreamSettings};
use serde::Serialize;
use std::collections::BTreeMap;

/// `ws-opts`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WsOpts {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

/// `h2-opts`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct H2Opts {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub host: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,
}

/// `grpc-opts`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GrpcOpts {
    #[serde(rename = "grpc-service-name", skip_serializing_if = "String::is_empty")]
    pub service_name: String,
}

/// 传输方式对应的客户端参数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TransportOpts {
    #[default]
    Absent,
    Ws(WsOpts),
    H2(H2Opts),
    Grpc(GrpcOpts),
}

impl TransportOpts {
    pub fn from_stream(network: &Network, stream: &StreamSettings) -> Self {
        match network {
            Network::Ws => stream
                .ws_settings
                .as_ref()
                .map_or(TransportOpts::Absent, |ws| {
                    TransportOpts::Ws(WsOpts {
                        path: ws.path.clone(),
                        headers: ws
                            .headers
                            .clone()
                            .map(normalize_host_header)
                            .unwrap_or_default(),
                    })
                }),
            Network::Http => stream
                .http_settings
                .as_ref()
                .map_or(TransportOpts::Absent, |http| {
                    TransportOpts::H2(H2Opts {
                        host: http
                            .host
                            .iter()
                            .filter(|host| !host.is_empty())
                            .cloned()
                            .collect(),
                        path: http.path.clone(),
                    })
                }),
            Network::Grpc => stream
                .grpc_settings
                .as_ref()
                .map_or(TransportOpts::Absent, |grpc| {
                    TransportOpts::Grpc(GrpcOpts {
                        service_name: grpc.service_name.clone(),
                    })
                }),
            Network::None | Network::Unrecognized(_) => TransportOpts::Absent,
        }
    }

    /// 没有任何可输出的字段
    pub fn is_empty(&self) -> bool {
        match self {
            TransportOpts::Absent => true,
            TransportOpts::Ws(ws) => ws.path.is_empty() && ws.headers.is_empty(),
            TransportOpts::H2(h2) => h2.path.is_empty() && h2.host.is_empty(),
            TransportOpts::Grpc(grpc) => grpc.service_name.is_empty(),
        }
    }
}

/// clash 只认 `Host`, 任意大小写的 host 都改写成它
fn normalize_host_header(mut headers: BTreeMap<String, String>) -> BTreeMap<String, String> {
    let variants: Vec<String> = headers
        .keys()
        .filter(|key| key.as_str() != "Host" && key.eq_ignore_ascii_case("host"))
        .cloned()
        .collect();
    for key in variants {
        if let Some(value) = headers.remove(&key) {
            headers.insert("Host".to_owned(), value);
        }
    }
    headers
}
