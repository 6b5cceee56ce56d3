use crate::orm_entity::inbound;
use crate::orm_entity::prelude::Inbound;
use anyhow::anyhow;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use xui_clash::{InboundRecord, Protocol};

pub struct InboundManager {
    db: DatabaseConnection,
}

impl InboundManager {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// 用户的全部入站
    pub async fn get_inbounds(&self, user_id: i32) -> anyhow::Result<Vec<inbound::Model>> {
        Ok(Inbound::find()
            .filter(inbound::Column::UserId.eq(user_id))
            .order_by_asc(inbound::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn get_inbound(&self, id: i32) -> anyhow::Result<Option<inbound::Model>> {
        Ok(Inbound::find_by_id(id).one(&self.db).await?)
    }

    /// 增加入站
    pub async fn add_inbound(&self, inbound: inbound::Model) -> anyhow::Result<inbound::Model> {
        if self.port_conflict_detection(inbound.port, None).await? {
            return Err(anyhow!("port {} already in use", inbound.port));
        }

        let new_inbound = inbound::ActiveModel {
            id: Default::default(),
            user_id: Set(inbound.user_id),
            up: Set(inbound.up),
            down: Set(inbound.down),
            total: Set(inbound.total),
            remark: Set(inbound.remark),
            enable: Set(inbound.enable),
            expiry_time: Set(inbound.expiry_time),
            listen: Set(inbound.listen),
            port: Set(inbound.port),
            protocol: Set(inbound.protocol),
            settings: Set(inbound.settings),
            stream_settings: Set(inbound.stream_settings),
            tag: Set(inbound.tag),
            sniffing: Set(inbound.sniffing),
            speed_ip: Set(inbound.speed_ip),
            speed_port: Set(inbound.speed_port),
        };
        Ok(new_inbound.insert(&self.db).await?)
    }

    /// 删除入站
    pub async fn del_inbound(&self, id: i32) -> anyhow::Result<()> {
        let rows_affected = Inbound::delete_by_id(id)
            .exec(&self.db)
            .await?
            .rows_affected;

        anyhow::ensure!(
            rows_affected == 1,
            "del_inbound: rows_affected = {}",
            rows_affected
        );
        Ok(())
    }

    /// 更新入站, 流量统计和所属用户保持不变
    pub async fn update_inbound(&self, inbound: inbound::Model) -> anyhow::Result<()> {
        let db_inbound = Inbound::find_by_id(inbound.id)
            .one(&self.db)
            .await?
            .ok_or_else(|| anyhow!("Can't find inbound: {}", inbound.id))?;

        if self
            .port_conflict_detection(inbound.port, Some(inbound.id))
            .await?
        {
            return Err(anyhow!("port {} already in use", inbound.port));
        }

        let mut db_inbound: inbound::ActiveModel = db_inbound.into();
        db_inbound.remark = Set(inbound.remark);
        db_inbound.enable = Set(inbound.enable);
        db_inbound.total = Set(inbound.total);
        db_inbound.expiry_time = Set(inbound.expiry_time);
        db_inbound.listen = Set(inbound.listen);
        db_inbound.port = Set(inbound.port);
        db_inbound.protocol = Set(inbound.protocol);
        db_inbound.settings = Set(inbound.settings);
        db_inbound.stream_settings = Set(inbound.stream_settings);
        db_inbound.tag = Set(inbound.tag);
        db_inbound.sniffing = Set(inbound.sniffing);
        db_inbound.speed_ip = Set(inbound.speed_ip);
        db_inbound.speed_port = Set(inbound.speed_port);
        db_inbound.update(&self.db).await?;
        Ok(())
    }

    /// 检测端口是否被其它入站占用
    async fn port_conflict_detection(
        &self,
        port: i32,
        inbound_id: Option<i32>,
    ) -> anyhow::Result<bool> {
        let mut query = Inbound::find().filter(inbound::Column::Port.eq(port));
        if let Some(inbound_id) = inbound_id {
            query = query.filter(inbound::Column::Id.ne(inbound_id));
        }
        Ok(query.count(&self.db).await? > 0)
    }
}

impl inbound::Model {
    pub fn default_tag(port: i32) -> String {
        format!("inbound-{}", port)
    }
}

impl From<&inbound::Model> for InboundRecord {
    fn from(inbound: &inbound::Model) -> Self {
        Self {
            id: inbound.id,
            protocol: Protocol::from(inbound.protocol.as_str()),
            remark: inbound.remark.clone(),
            port: inbound.port,
            speed_ip: inbound.speed_ip.clone(),
            speed_port: inbound.speed_port,
            settings: inbound.settings.clone(),
            stream_settings: inbound.stream_settings.clone(),
        }
    }
}
