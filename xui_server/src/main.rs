mod global;
mod orm_entity;
mod web;

use crate::global::config::GLOBAL_CONFIG;
use crate::global::init_global;
use crate::global::manager::GlobalManager;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    let db = init_global(&GLOBAL_CONFIG.database_url).await?;

    let manager = Arc::new(GlobalManager::new(
        db,
        GLOBAL_CONFIG.xray_restart_command.clone(),
    ));
    manager
        .user_manager
        .ensure_default_user(
            &GLOBAL_CONFIG.default_username,
            &GLOBAL_CONFIG.default_password,
        )
        .await?;

    // 入站变更后由定时任务统一重启xray
    let restart_task = manager
        .xray_manager
        .start_task(Duration::from_secs(GLOBAL_CONFIG.restart_check_interval.max(1)));

    let addr = GLOBAL_CONFIG.web_addr.parse::<SocketAddr>()?;
    let result = web::run_http_server(
        &addr,
        GLOBAL_CONFIG.base_path(),
        GLOBAL_CONFIG.web_base_dir.clone(),
        &GLOBAL_CONFIG.session_secret,
        actix_web::web::Data::from(manager),
    )
    .await;

    restart_task.abort();
    result
}
