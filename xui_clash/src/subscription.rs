use crate::error::SubError;
use crate::inbound::InboundRecord;
use crate::proxy::ClashProxy;
use log::debug;
use serde::Serialize;

/// clash 配置文件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClashConfig {
    pub proxies: Vec<ClashProxy>,
}

impl ClashConfig {
    pub fn to_yaml(&self) -> Result<String, SubError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// 可下载的订阅文件
#[derive(Debug, Clone)]
pub struct Subscription {
    pub filename: String,
    pub body: String,
}

pub fn subscription_filename(inbound: &InboundRecord) -> String {
    if inbound.remark.is_empty() {
        format!("clash_{}.yaml", inbound.id)
    } else {
        format!("clash_{}.yaml", inbound.remark)
    }
}

/// 生成单个入站的 clash 订阅
pub fn render(inbound: &InboundRecord) -> Result<Subscription, SubError> {
    let config = ClashConfig {
        proxies: vec![ClashProxy::from_inbound(inbound)?],
    };
    let body = config.to_yaml()?;
    debug!("clash subscription built for inbound {}", inbound.id);
    Ok(Subscription {
        filename: subscription_filename(inbound),
        body,
    })
}
