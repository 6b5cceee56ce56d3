use crate::orm_entity::inbound;
use actix_web::{web, HttpResponse};
use anyhow::anyhow;
use log::warn;
use serde::{Deserialize, Serialize};

/// 登录请求
#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoginReq {
    pub username: String,
    pub password: String,
}

/// 通用回复
#[derive(Serialize, Deserialize)]
pub struct GeneralResponse<T> {
    pub success: bool,
    pub msg: String,
    pub obj: Option<T>,
}

/// 新增/修改入站请求
#[derive(Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct InboundReq {
    pub up: i64,
    pub down: i64,
    pub total: i64,
    pub remark: String,
    pub enable: bool,
    pub expiry_time: i64,
    pub listen: String,
    pub port: i32,
    pub protocol: String,
    pub settings: String,
    pub stream_settings: String,
    pub sniffing: String,
    pub speed_ip: String,
    pub speed_port: i32,
}

/// 入站表单, json 和 urlencoded 都接受. 解析失败也走通用回复
pub type InboundForm =
    Result<web::Either<web::Json<InboundReq>, web::Form<InboundReq>>, actix_web::Error>;

impl InboundReq {
    pub fn from_form(form: InboundForm) -> anyhow::Result<Self> {
        form.map(|either| either.into_inner())
            .map_err(|err| anyhow!("bad inbound form: {err}"))
    }

    pub fn into_model(self, id: i32, user_id: i32) -> inbound::Model {
        inbound::Model {
            id,
            user_id,
            up: self.up,
            down: self.down,
            total: self.total,
            remark: self.remark,
            enable: self.enable,
            expiry_time: self.expiry_time,
            listen: self.listen,
            port: self.port,
            protocol: self.protocol,
            settings: self.settings,
            stream_settings: self.stream_settings,
            tag: inbound::Model::default_tag(self.port),
            sniffing: self.sniffing,
            speed_ip: self.speed_ip,
            speed_port: self.speed_port,
        }
    }
}

/// 操作结果
pub fn json_msg(action: &str, result: anyhow::Result<()>) -> HttpResponse {
    let response: GeneralResponse<()> = match result {
        Ok(()) => GeneralResponse {
            success: true,
            msg: format!("{action} succeeded"),
            obj: None,
        },
        Err(err) => {
            warn!("{action} failed: {err}");
            GeneralResponse {
                success: false,
                msg: format!("{action} failed: {err}"),
                obj: None,
            }
        }
    };
    HttpResponse::Ok().json(response)
}

/// 查询结果
pub fn json_obj<T: Serialize>(action: &str, result: anyhow::Result<T>) -> HttpResponse {
    match result {
        Ok(obj) => HttpResponse::Ok().json(GeneralResponse {
            success: true,
            msg: String::new(),
            obj: Some(obj),
        }),
        Err(err) => json_msg(action, Err(err)),
    }
}

/// 只有提示信息的失败回复
pub fn pure_json_msg(success: bool, msg: &str) -> HttpResponse {
    HttpResponse::Ok().json(GeneralResponse::<()> {
        success,
        msg: msg.to_owned(),
        obj: None,
    })
}
