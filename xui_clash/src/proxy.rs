use crate::error::SubError;
use crate::inbound::{InboundRecord, Protocol};
use crate::settings::{Credentials, Security, StreamSettings};
use crate::transport::{GrpcOpts, H2Opts, TransportOpts, WsOpts};
use serde::Serialize;

/// 通配监听地址不能下发给客户端
const WILDCARD_ADDRESS: &str = "0.0.0.0";

/// clash 订阅中的一个 vmess 节点
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClashProxy {
    pub name: String,
    #[serde(rename = "type")]
    pub proxy_type: String,
    pub server: String,
    pub port: i32,
    pub uuid: String,
    #[serde(rename = "alterId")]
    pub alter_id: i64,
    pub cipher: String,
    pub tls: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub network: String,
    #[serde(rename = "servername", skip_serializing_if = "String::is_empty")]
    pub server_name: String,
    #[serde(rename = "skip-cert-verify")]
    pub skip_cert_verify: bool,
    #[serde(rename = "ws-opts", skip_serializing_if = "Option::is_none")]
    pub ws_opts: Option<WsOpts>,
    #[serde(rename = "h2-opts", skip_serializing_if = "Option::is_none")]
    pub h2_opts: Option<H2Opts>,
    #[serde(rename = "grpc-opts", skip_serializing_if = "Option::is_none")]
    pub grpc_opts: Option<GrpcOpts>,
}

impl ClashProxy {
    /// 由入站记录生成节点, 设置文档里缺失或错误的字段取默认值
    pub fn from_inbound(inbound: &InboundRecord) -> Result<Self, SubError> {
        if inbound.protocol != Protocol::Vmess {
            return Err(SubError::UnsupportedProtocol);
        }
        if inbound.speed_ip.is_empty() || inbound.speed_ip == WILDCARD_ADDRESS {
            return Err(SubError::MissingAddress);
        }

        let credentials = Credentials::extract(&inbound.settings);
        let stream = StreamSettings::parse(&inbound.stream_settings);
        let transport = TransportOpts::from_stream(&stream.network, &stream);
        Ok(Self::assemble(inbound, credentials, &stream, transport))
    }

    fn assemble(
        inbound: &InboundRecord,
        credentials: Credentials,
        stream: &StreamSettings,
        transport: TransportOpts,
    ) -> Self {
        let mut proxy = Self {
            name: inbound.remark.clone(),
            proxy_type: Protocol::Vmess.to_string(),
            server: inbound.speed_ip.clone(),
            port: if inbound.speed_port > 0 {
                inbound.speed_port
            } else {
                inbound.port
            },
            uuid: credentials.id,
            alter_id: credentials.alter_id,
            cipher: "auto".to_owned(),
            tls: stream.security.is_tls(),
            network: stream.network.label().to_owned(),
            server_name: resolve_server_name(stream),
            skip_cert_verify: false,
            ws_opts: None,
            h2_opts: None,
            grpc_opts: None,
        };

        if !transport.is_empty() {
            match transport {
                TransportOpts::Ws(ws) => proxy.ws_opts = Some(ws),
                TransportOpts::H2(h2) => proxy.h2_opts = Some(h2),
                TransportOpts::Grpc(grpc) => proxy.grpc_opts = Some(grpc),
                TransportOpts::Absent => {}
            }
        }
        proxy
    }
}

/// 只从与安全类型对应的子文档读取 serverName
fn resolve_server_name(stream: &StreamSettings) -> String {
    let settings = match &stream.security {
        Security::Tls => stream.tls_settings.as_ref(),
        Security::Xtls => stream.xtls_settings.as_ref(),
        Security::None | Security::Unrecognized(_) => None,
    };
    settings
        .map(|settings| settings.server_name.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(stream_settings: &str) -> InboundRecord {
        InboundRecord {
            id: 1,
            protocol: Protocol::Vmess,
            remark: "srv1".into(),
            port: 443,
            speed_ip: "1.2.3.4".into(),
            speed_port: 0,
            settings: r#"{"clients":[{"id":"abc-123","alterId":0}]}"#.into(),
            stream_settings: stream_settings.into(),
        }
    }

    #[test]
    fn websocket_tls_inbound() {
        let proxy = ClashProxy::from_inbound(&record(
            r#"{"network":"ws","security":"tls","wsSettings":{"path":"/ws","headers":{"Host":"example.com"}},"tlsSettings":{"serverName":"example.com"}}"#,
        ))
        .unwrap();

        assert_eq!(proxy.name, "srv1");
        assert_eq!(proxy.proxy_type, "vmess");
        assert_eq!(proxy.server, "1.2.3.4");
        assert_eq!(proxy.port, 443);
        assert_eq!(proxy.uuid, "abc-123");
        assert_eq!(proxy.alter_id, 0);
        assert_eq!(proxy.cipher, "auto");
        assert!(proxy.tls);
        assert_eq!(proxy.network, "ws");
        assert_eq!(proxy.server_name, "example.com");
        assert!(!proxy.skip_cert_verify);
        let ws = proxy.ws_opts.unwrap();
        assert_eq!(ws.path, "/ws");
        assert_eq!(ws.headers.len(), 1);
        assert_eq!(ws.headers["Host"], "example.com");
        assert!(proxy.h2_opts.is_none());
        assert!(proxy.grpc_opts.is_none());
    }

    #[test]
    fn grpc_inbound() {
        let proxy = ClashProxy::from_inbound(&record(
            r#"{"network":"grpc","grpcSettings":{"serviceName":"svc"}}"#,
        ))
        .unwrap();
        assert_eq!(proxy.grpc_opts.unwrap().service_name, "svc");
        assert!(proxy.ws_opts.is_none());
        assert!(proxy.h2_opts.is_none());
        assert!(!proxy.tls);
    }

    #[test]
    fn only_vmess_is_supported() {
        for protocol in ["vless", "trojan", "shadowsocks", "socks", "http", "unknown"] {
            let mut inbound = record("{}");
            inbound.protocol = Protocol::from(protocol);
            assert!(matches!(
                ClashProxy::from_inbound(&inbound),
                Err(SubError::UnsupportedProtocol)
            ));

            inbound.speed_ip = String::new();
            assert!(matches!(
                ClashProxy::from_inbound(&inbound),
                Err(SubError::UnsupportedProtocol)
            ));
        }
    }

    #[test]
    fn wildcard_or_empty_address_is_rejected() {
        for speed_ip in ["", "0.0.0.0"] {
            let mut inbound = record("{}");
            inbound.speed_ip = speed_ip.into();
            assert!(matches!(
                ClashProxy::from_inbound(&inbound),
                Err(SubError::MissingAddress)
            ));
        }
    }

    #[test]
    fn port_resolution() {
        for (speed_port, expected) in [(0, 443), (-1, 443), (-8080, 443), (8443, 8443), (1, 1)] {
            let mut inbound = record("{}");
            inbound.speed_port = speed_port;
            assert_eq!(ClashProxy::from_inbound(&inbound).unwrap().port, expected);
        }
    }

    #[test]
    fn server_name_follows_security_kind() {
        let both = r#""tlsSettings":{"serverName":"tls.com"},"xtlsSettings":{"serverName":"xtls.com"}"#;

        let none = ClashProxy::from_inbound(&record(&format!(
            r#"{{"network":"tcp","security":"none",{both}}}"#
        )))
        .unwrap();
        assert_eq!(none.server_name, "");
        assert!(!none.tls);

        let missing = ClashProxy::from_inbound(&record(&format!(r#"{{{both}}}"#))).unwrap();
        assert_eq!(missing.server_name, "");

        let tls = ClashProxy::from_inbound(&record(&format!(r#"{{"security":"tls",{both}}}"#)))
            .unwrap();
        assert_eq!(tls.server_name, "tls.com");
        assert!(tls.tls);

        let xtls = ClashProxy::from_inbound(&record(&format!(r#"{{"security":"xtls",{both}}}"#)))
            .unwrap();
        assert_eq!(xtls.server_name, "xtls.com");
        assert!(xtls.tls);

        let reality = ClashProxy::from_inbound(&record(&format!(
            r#"{{"security":"reality",{both}}}"#
        )))
        .unwrap();
        assert_eq!(reality.server_name, "");
        assert!(!reality.tls);
    }

    #[test]
    fn tls_without_sub_document_has_no_server_name() {
        let proxy = ClashProxy::from_inbound(&record(r#"{"security":"tls"}"#)).unwrap();
        assert!(proxy.tls);
        assert_eq!(proxy.server_name, "");
    }

    #[test]
    fn malformed_documents_fall_back_to_defaults() {
        let mut inbound = record("{not json");
        inbound.settings = "[".into();
        let proxy = ClashProxy::from_inbound(&inbound).unwrap();
        assert_eq!(proxy.uuid, "");
        assert_eq!(proxy.alter_id, 0);
        assert_eq!(proxy.network, "");
        assert!(!proxy.tls);
        assert!(proxy.ws_opts.is_none());
    }

    #[test]
    fn empty_option_block_is_dropped() {
        let proxy =
            ClashProxy::from_inbound(&record(r#"{"network":"ws","wsSettings":{}}"#)).unwrap();
        assert_eq!(proxy.network, "ws");
        assert!(proxy.ws_opts.is_none());
    }
}
