use self::inbound::InboundManager;
use self::user::UserManager;
use self::xray::XrayManager;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

pub mod inbound;
pub mod user;
pub mod xray;

pub struct GlobalManager {
    pub inbound_manager: InboundManager,
    pub user_manager: UserManager,
    pub xray_manager: Arc<XrayManager>,
}

impl GlobalManager {
    pub fn new(db: DatabaseConnection, xray_restart_command: Option<String>) -> Self {
        Self {
            inbound_manager: InboundManager::new(db.clone()),
            user_manager: UserManager::new(db),
            xray_manager: Arc::new(XrayManager::new(xray_restart_command)),
        }
    }
}
