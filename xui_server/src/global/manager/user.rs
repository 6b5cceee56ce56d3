use crate::orm_entity::prelude::User;
use crate::orm_entity::user;
use log::info;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};

pub struct UserManager {
    db: DatabaseConnection,
}

impl UserManager {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// 校验账号密码
    pub async fn check_user(
        &self,
        username: &str,
        password: &str,
    ) -> anyhow::Result<Option<user::Model>> {
        Ok(User::find()
            .filter(user::Column::Username.eq(username))
            .filter(user::Column::Password.eq(password))
            .one(&self.db)
            .await?)
    }

    /// 用户表为空时创建默认账号
    pub async fn ensure_default_user(&self, username: &str, password: &str) -> anyhow::Result<()> {
        if User::find().count(&self.db).await? > 0 {
            return Ok(());
        }

        user::ActiveModel {
            id: Default::default(),
            username: Set(username.to_owned()),
            password: Set(password.to_owned()),
        }
        .insert(&self.db)
        .await?;
        info!("default user \"{}\" created", username);
        Ok(())
    }
}
