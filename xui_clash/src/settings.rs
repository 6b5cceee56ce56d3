//! 入站的协议设置和传输设置解析
//!
//! 两份 json 都来自面板用户的输入, 没有固定结构。解析是尽力而为的:
//! 文本损坏时整体按空结构处理, 单个字段类型不符时只有该字段取默认值。

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// 字段类型不符时取默认值
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// 只接受 json 对象作为子文档
fn object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_object() {
        Ok(serde_json::from_value(value).ok())
    } else {
        Ok(None)
    }
}

/// 数值截断为整数, 其它类型为0
fn truncated_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64().map_or(0, |number| number.trunc() as i64))
}

/// 只保留字符串值
fn string_map<'de, D>(deserializer: D) -> Result<Option<BTreeMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Object(map) => Some(
            map.into_iter()
                .filter_map(|(key, value)| match value {
                    Value::String(value) => Some((key, value)),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}

/// 只保留字符串元素
fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(item) => Some(item),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// 传输方式
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum Network {
    #[default]
    None,
    Ws,
    Http,
    Grpc,
    /// tcp, kcp, quic 等不生成传输参数的方式
    Unrecognized(String),
}

impl Network {
    /// 订阅里 `network` 字段的值
    pub fn label(&self) -> &str {
        match self {
            Network::None => "",
            Network::Ws => "ws",
            Network::Http => "http",
            Network::Grpc => "grpc",
            Network::Unrecognized(value) => value,
        }
    }
}

impl From<String> for Network {
    fn from(value: String) -> Self {
        match value.as_str() {
            "" => Network::None,
            "ws" => Network::Ws,
            "http" => Network::Http,
            "grpc" => Network::Grpc,
            _ => Network::Unrecognized(value),
        }
    }
}

/// 传输层安全
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum Security {
    #[default]
    None,
    Tls,
    Xtls,
    /// 客户端不支持的类型, 按无加密处理
    Unrecognized(String),
}

impl Security {
    pub fn is_tls(&self) -> bool {
        matches!(self, Security::Tls | Security::Xtls)
    }
}

impl From<String> for Security {
    fn from(value: String) -> Self {
        match value.as_str() {
            "" | "none" => Security::None,
            "tls" => Security::Tls,
            "xtls" => Security::Xtls,
            _ => Security::Unrecognized(value),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TlsSettings {
    #[serde(deserialize_with = "lenient")]
    pub server_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WsSettings {
    #[serde(deserialize_with = "lenient")]
    pub path: String,
    #[serde(deserialize_with = "string_map")]
    pub headers: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    #[serde(deserialize_with = "lenient")]
    pub path: String,
    #[serde(deserialize_with = "string_list")]
    pub host: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GrpcSettings {
    #[serde(deserialize_with = "lenient")]
    pub service_name: String,
}

/// 传输设置 `streamSettings`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StreamSettings {
    #[serde(deserialize_with = "lenient")]
    pub network: Network,
    #[serde(deserialize_with = "lenient")]
    pub security: Security,
    #[serde(deserialize_with = "object")]
    pub tls_settings: Option<TlsSettings>,
    #[serde(deserialize_with = "object")]
    pub xtls_settings: Option<TlsSettings>,
    #[serde(deserialize_with = "object")]
    pub ws_settings: Option<WsSettings>,
    #[serde(deserialize_with = "object")]
    pub http_settings: Option<HttpSettings>,
    #[serde(deserialize_with = "object")]
    pub grpc_settings: Option<GrpcSettings>,
}

/// 先解析成 `Value`, 重复的键保留最后一个
fn document<T: DeserializeOwned + Default>(text: &str) -> T {
    let value: Value = serde_json::from_str(text).unwrap_or_default();
    serde_json::from_value(value).unwrap_or_default()
}

impl StreamSettings {
    pub fn parse(text: &str) -> Self {
        document(text)
    }
}

/// 协议设置 `settings`, 只关心客户端列表
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProtocolSettings {
    #[serde(deserialize_with = "lenient")]
    clients: Vec<Value>,
}

/// 第一个客户端的凭据
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Credentials {
    #[serde(deserialize_with = "lenient")]
    pub id: String,
    #[serde(rename = "alterId", deserialize_with = "truncated_int")]
    pub alter_id: i64,
}

impl Credentials {
    pub fn extract(settings: &str) -> Self {
        let settings: ProtocolSettings = document(settings);
        settings
            .clients
            .into_iter()
            .next()
            .filter(Value::is_object)
            .and_then(|client| serde_json::from_value(client).ok())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_from_first_client() {
        let credentials = Credentials::extract(
            r#"{"clients":[{"id":"abc-123","alterId":64},{"id":"other","alterId":1}]}"#,
        );
        assert_eq!(credentials.id, "abc-123");
        assert_eq!(credentials.alter_id, 64);
    }

    #[test]
    fn credentials_alter_id_is_truncated() {
        assert_eq!(
            Credentials::extract(r#"{"clients":[{"id":"a","alterId":3.9}]}"#).alter_id,
            3
        );
        assert_eq!(
            Credentials::extract(r#"{"clients":[{"id":"a","alterId":-2.5}]}"#).alter_id,
            -2
        );
    }

    #[test]
    fn credentials_partial_extraction() {
        let credentials = Credentials::extract(r#"{"clients":[{"id":7,"alterId":"16"}]}"#);
        assert_eq!(credentials, Credentials::default());

        let credentials = Credentials::extract(r#"{"clients":[{"id":"only-id","alterId":null}]}"#);
        assert_eq!(credentials.id, "only-id");
        assert_eq!(credentials.alter_id, 0);
    }

    #[test]
    fn credentials_tolerate_bad_documents() {
        for settings in [
            "",
            "not json",
            "[]",
            "null",
            r#"{"clients":[]}"#,
            r#"{"clients":"abc"}"#,
            r#"{"clients":["abc"]}"#,
            r#"{"other":1}"#,
        ] {
            assert_eq!(Credentials::extract(settings), Credentials::default());
        }
    }

    #[test]
    fn stream_settings_defaults() {
        for text in ["", "{", "42", "{}"] {
            let stream = StreamSettings::parse(text);
            assert_eq!(stream.network, Network::None);
            assert_eq!(stream.security, Security::None);
            assert!(stream.tls_settings.is_none());
            assert!(stream.ws_settings.is_none());
        }
    }

    #[test]
    fn stream_settings_kinds() {
        let stream = StreamSettings::parse(r#"{"network":"grpc","security":"xtls"}"#);
        assert_eq!(stream.network, Network::Grpc);
        assert_eq!(stream.security, Security::Xtls);

        let stream = StreamSettings::parse(r#"{"network":"kcp","security":"reality"}"#);
        assert_eq!(stream.network, Network::Unrecognized("kcp".into()));
        assert_eq!(stream.network.label(), "kcp");
        assert_eq!(stream.security, Security::Unrecognized("reality".into()));
        assert!(!stream.security.is_tls());

        let stream = StreamSettings::parse(r#"{"security":"none"}"#);
        assert_eq!(stream.security, Security::None);

        let stream = StreamSettings::parse(r#"{"network":1,"security":["tls"]}"#);
        assert_eq!(stream.network, Network::None);
        assert_eq!(stream.security, Security::None);
    }

    #[test]
    fn duplicate_keys_keep_the_last_value() {
        let stream = StreamSettings::parse(
            r#"{"network":"ws","security":"none","tlsSettings":{"serverName":"a.com"},"security":"tls"}"#,
        );
        assert_eq!(stream.network, Network::Ws);
        assert_eq!(stream.security, Security::Tls);
        assert_eq!(stream.tls_settings.unwrap().server_name, "a.com");

        let credentials = Credentials::extract(
            r#"{"clients":[{"id":"first","alterId":1,"id":"last"}],"clients":[{"id":"kept","alterId":4}]}"#,
        );
        assert_eq!(credentials.id, "kept");
        assert_eq!(credentials.alter_id, 4);

        let credentials =
            Credentials::extract(r#"{"clients":[{"id":"first","alterId":1,"id":"last"}]}"#);
        assert_eq!(credentials.id, "last");
        assert_eq!(credentials.alter_id, 1);
    }

    #[test]
    fn stream_settings_sub_documents_must_be_objects() {
        let stream = StreamSettings::parse(
            r#"{"network":"ws","wsSettings":"x","tlsSettings":[],"grpcSettings":{}}"#,
        );
        assert!(stream.ws_settings.is_none());
        assert!(stream.tls_settings.is_none());
        assert_eq!(stream.grpc_settings.unwrap().service_name, "");
    }

    #[test]
    fn ws_settings_keep_string_headers() {
        let stream = StreamSettings::parse(
            r#"{"wsSettings":{"path":"/ws","headers":{"Host":"a.com","X-Num":1,"X-Str":"v"}}}"#,
        );
        let ws = stream.ws_settings.unwrap();
        assert_eq!(ws.path, "/ws");
        let headers = ws.headers.unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers["Host"], "a.com");
        assert_eq!(headers["X-Str"], "v");
    }

    #[test]
    fn http_settings_keep_string_hosts() {
        let stream = StreamSettings::parse(
            r#"{"httpSettings":{"path":5,"host":["a.com",1,"","b.com"]}}"#,
        );
        let http = stream.http_settings.unwrap();
        assert_eq!(http.path, "");
        assert_eq!(http.host, vec!["a.com", "", "b.com"]);
    }
}
