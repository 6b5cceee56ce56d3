use super::proto::{json_msg, pure_json_msg, LoginReq};
use crate::global::manager::GlobalManager;
use actix_identity::Identity;
use actix_web::http::header;
use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};
use anyhow::anyhow;
use log::{error, info};

pub(crate) async fn login(
    req: HttpRequest,
    form: web::Either<web::Json<LoginReq>, web::Form<LoginReq>>,
    manager: web::Data<GlobalManager>,
) -> HttpResponse {
    let form = form.into_inner();
    if form.username.is_empty() {
        return pure_json_msg(false, "please enter a username");
    }
    if form.password.is_empty() {
        return pure_json_msg(false, "please enter a password");
    }

    let user = match manager
        .user_manager
        .check_user(&form.username, &form.password)
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            info!("wrong username or password: \"{}\"", form.username);
            return pure_json_msg(false, "wrong username or password");
        }
        Err(err) => {
            error!("check user error: {err}");
            return pure_json_msg(false, "wrong username or password");
        }
    };

    let result = Identity::login(&req.extensions(), user.id.to_string())
        .map(|_| info!("user {} login success", user.id))
        .map_err(|err| anyhow!("{err}"));
    json_msg("login", result)
}

pub(crate) async fn logout(req: HttpRequest, identity: Option<Identity>) -> HttpResponse {
    if let Some(identity) = identity {
        if let Ok(id) = identity.id() {
            info!("user {} logout", id);
        }
        identity.logout();
    }

    let base_path = req.path().strip_suffix("logout").unwrap_or("/");
    HttpResponse::TemporaryRedirect()
        .insert_header((header::LOCATION, base_path))
        .finish()
}
