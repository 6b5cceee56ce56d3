use super::proto::{json_msg, json_obj, InboundForm, InboundReq};
use crate::global::manager::GlobalManager;
use actix_identity::Identity;
use actix_web::{web, HttpResponse};
use anyhow::anyhow;

/// 当前登录的用户id
fn login_user_id(identity: &Identity) -> anyhow::Result<i32> {
    let id = identity.id().map_err(|err| anyhow!("{err}"))?;
    Ok(id.parse::<i32>()?)
}

fn parse_id(id: &str) -> anyhow::Result<i32> {
    id.parse::<i32>()
        .map_err(|_| anyhow!("invalid inbound id: {id}"))
}

pub(crate) async fn get_inbounds(
    identity: Identity,
    manager: web::Data<GlobalManager>,
) -> HttpResponse {
    let result = match login_user_id(&identity) {
        Ok(user_id) => manager.inbound_manager.get_inbounds(user_id).await,
        Err(err) => Err(err),
    };
    json_obj("list", result)
}

pub(crate) async fn add_inbound(
    identity: Identity,
    form: InboundForm,
    manager: web::Data<GlobalManager>,
) -> HttpResponse {
    let (user_id, form) = match (login_user_id(&identity), InboundReq::from_form(form)) {
        (Ok(user_id), Ok(form)) => (user_id, form),
        (Err(err), _) | (_, Err(err)) => return json_msg("add", Err(err)),
    };

    let mut inbound = form.into_model(0, user_id);
    inbound.enable = true;
    let result = manager.inbound_manager.add_inbound(inbound).await;
    if result.is_ok() {
        manager.xray_manager.set_to_need_restart();
    }
    json_obj("add", result)
}

pub(crate) async fn del_inbound(
    id: web::Path<String>,
    manager: web::Data<GlobalManager>,
) -> HttpResponse {
    let result = match parse_id(&id) {
        Ok(id) => manager.inbound_manager.del_inbound(id).await,
        Err(err) => Err(err),
    };
    if result.is_ok() {
        manager.xray_manager.set_to_need_restart();
    }
    json_msg("delete", result)
}

pub(crate) async fn update_inbound(
    identity: Identity,
    id: web::Path<String>,
    form: InboundForm,
    manager: web::Data<GlobalManager>,
) -> HttpResponse {
    let form = InboundReq::from_form(form);
    let result = match (parse_id(&id), login_user_id(&identity), form) {
        (Ok(id), Ok(user_id), Ok(form)) => {
            manager
                .inbound_manager
                .update_inbound(form.into_model(id, user_id))
                .await
        }
        (Err(err), _, _) | (_, Err(err), _) | (_, _, Err(err)) => Err(err),
    };
    if result.is_ok() {
        manager.xray_manager.set_to_need_restart();
    }
    json_msg("update", result)
}
