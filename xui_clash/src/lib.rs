//! 入站记录到 clash 订阅文件的转换

pub mod error;
pub mod inbound;
pub mod proxy;
pub mod settings;
pub mod subscription;
pub mod transport;

pub use error::SubError;
pub use inbound::{InboundRecord, Protocol};
pub use subscription::{render, ClashConfig, Subscription};

/// 校验路径参数中的入站id. 合法整数但超出id范围的, 视为找不到入站
pub fn parse_inbound_id(param: &str) -> Result<i32, SubError> {
    let id = param
        .parse::<i64>()
        .map_err(|_| SubError::InvalidIdentifier)?;
    i32::try_from(id).map_err(|_| SubError::RecordNotFound)
}
