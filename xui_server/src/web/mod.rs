use crate::global::manager::GlobalManager;
use actix_files::Files;
use actix_identity::{IdentityExt, IdentityMiddleware};
use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::body::{EitherBody, MessageBody};
use actix_web::cookie::Key;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::{from_fn, Next};
use actix_web::{web, App, Error, HttpResponse, HttpServer};
use log::{info, warn};
use std::net::SocketAddr;

mod clash;
mod inbound;
mod index;
pub mod proto;

/// 面板路由, 挂在根路径之下
pub(crate) fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::post().to(index::login))
        .route("/logout", web::get().to(index::logout))
        .route("/clash/{id}", web::get().to(clash::get_clash_sub))
        .service(
            web::scope("/xui")
                .wrap(from_fn(check_login))
                .route("/inbound/list", web::post().to(inbound::get_inbounds))
                .route("/inbound/add", web::post().to(inbound::add_inbound))
                .route("/inbound/del/{id}", web::post().to(inbound::del_inbound))
                .route("/inbound/update/{id}", web::post().to(inbound::update_inbound))
                .route("/inbound/clash/{id}", web::get().to(clash::get_clash_sub)),
        );
}

/// 未登录返回401
async fn check_login<B: MessageBody>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, Error> {
    if req.get_identity().is_err() {
        return Ok(req
            .into_response(HttpResponse::Unauthorized().body("not logged in"))
            .map_into_right_body());
    }
    Ok(next.call(req).await?.map_into_left_body())
}

fn session_key(secret: &str) -> Key {
    if secret.len() >= 32 {
        Key::derive_from(secret.as_bytes())
    } else {
        warn!("session_secret shorter than 32 bytes, using a random key");
        Key::generate()
    }
}

pub async fn run_http_server(
    addr: &SocketAddr,
    base_path: String,
    web_base_dir: Option<String>,
    session_secret: &str,
    manager: web::Data<GlobalManager>,
) -> anyhow::Result<()> {
    info!("HttpServer listening: {}, base path: {}", addr, base_path);
    let key = session_key(session_secret);
    let prefix = if base_path == "/" {
        String::new()
    } else {
        base_path
    };

    HttpServer::new(move || {
        let mut scope = web::scope(&prefix).configure(routes);
        if let Some(dir) = &web_base_dir {
            scope = scope.service(Files::new("/", dir).index_file("index.html"));
        }

        App::new()
            .app_data(manager.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .service(scope)
    })
    .bind(addr)?
    .run()
    .await?;
    Ok(())
}
