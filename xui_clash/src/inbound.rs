use std::fmt;

/// 入站协议
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Protocol {
    Vmess,
    Vless,
    Trojan,
    Shadowsocks,
    DokodemoDoor,
    Socks,
    Http,
    Other(String),
}

impl Protocol {
    pub fn as_str(&self) -> &str {
        match self {
            Protocol::Vmess => "vmess",
            Protocol::Vless => "vless",
            Protocol::Trojan => "trojan",
            Protocol::Shadowsocks => "shadowsocks",
            Protocol::DokodemoDoor => "dokodemo-door",
            Protocol::Socks => "socks",
            Protocol::Http => "http",
            Protocol::Other(value) => value,
        }
    }
}

impl From<&str> for Protocol {
    fn from(value: &str) -> Self {
        match value {
            "vmess" => Protocol::Vmess,
            "vless" => Protocol::Vless,
            "trojan" => Protocol::Trojan,
            "shadowsocks" => Protocol::Shadowsocks,
            "dokodemo-door" => Protocol::DokodemoDoor,
            "socks" => Protocol::Socks,
            "http" => Protocol::Http,
            other => Protocol::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 入站记录快照, 由存储层提供, 转换过程只读
#[derive(Debug, Clone)]
pub struct InboundRecord {
    pub id: i32,
    pub protocol: Protocol,
    /// 备注, 同时作为订阅里的节点名
    pub remark: String,
    /// 监听端口
    pub port: i32,
    /// 面向客户端的地址
    pub speed_ip: String,
    /// 面向客户端的端口, 不大于0时使用监听端口
    pub speed_port: i32,
    /// 协议设置(json)
    pub settings: String,
    /// 传输设置(json)
    pub stream_settings: String,
}
