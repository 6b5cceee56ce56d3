use crate::global::manager::inbound::InboundManager;
use crate::global::manager::GlobalManager;
use actix_web::http::header::{ContentDisposition, ContentType};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use log::{error, warn};
use xui_clash::{parse_inbound_id, render, InboundRecord, SubError, Subscription};

/// 读取入站并生成订阅
pub(crate) async fn clash_subscription(
    id: &str,
    inbound_manager: &InboundManager,
) -> Result<Subscription, SubError> {
    let id = parse_inbound_id(id)?;
    let inbound = match inbound_manager.get_inbound(id).await {
        Ok(Some(inbound)) => inbound,
        Ok(None) => return Err(SubError::RecordNotFound),
        Err(err) => {
            error!("load inbound {id} error: {err}");
            return Err(SubError::RecordNotFound);
        }
    };
    render(&InboundRecord::from(&inbound))
}

/// `/clash/{id}` 与 `/xui/inbound/clash/{id}` 共用
pub(crate) async fn get_clash_sub(
    id: web::Path<String>,
    manager: web::Data<GlobalManager>,
) -> HttpResponse {
    match clash_subscription(&id, &manager.inbound_manager).await {
        Ok(subscription) => HttpResponse::Ok()
            .content_type("application/x-yaml")
            .insert_header(ContentDisposition::attachment(subscription.filename))
            .body(subscription.body),
        Err(err) => {
            warn!("clash subscription for \"{id}\" rejected: {err}");
            let status =
                StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            HttpResponse::build(status)
                .content_type(ContentType::plaintext())
                .body(err.to_string())
        }
    }
}
