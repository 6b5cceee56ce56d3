use crate::global::opts::GLOBAL_OPTS;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;

#[derive(Serialize, Deserialize, Debug)]
pub struct Config {
    /// 数据库地址
    pub database_url: String,
    /// web监听地址
    pub web_addr: String,
    /// web根路径
    #[serde(default = "default_web_base_path")]
    pub web_base_path: String,
    /// 静态资源目录
    #[serde(default)]
    pub web_base_dir: Option<String>,
    /// cookie 密钥, 不足32字节时随机生成
    #[serde(default)]
    pub session_secret: String,
    /// 检查xray是否需要重启的间隔(秒)
    #[serde(default = "default_restart_check_interval")]
    pub restart_check_interval: u64,
    /// 重启xray的命令
    #[serde(default)]
    pub xray_restart_command: Option<String>,
    /// 用户表为空时创建的默认账号
    #[serde(default = "default_account")]
    pub default_username: String,
    #[serde(default = "default_account")]
    pub default_password: String,
}

fn default_web_base_path() -> String {
    "/".into()
}

fn default_restart_check_interval() -> u64 {
    10
}

fn default_account() -> String {
    "admin".into()
}

impl Config {
    /// 规范化后的根路径, 形如 `/` 或 `/panel`
    pub fn base_path(&self) -> String {
        let path = self.web_base_path.trim_matches('/');
        if path.is_empty() {
            "/".into()
        } else {
            format!("/{path}")
        }
    }
}

pub static GLOBAL_CONFIG: Lazy<Config> = Lazy::new(|| {
    let file = match File::open(&GLOBAL_OPTS.config_file) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open config file: {}", e);
            std::process::exit(1);
        }
    };
    let reader = BufReader::new(file);
    match serde_json::from_reader(reader) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to parse config file: {}", e);
            std::process::exit(1);
        }
    }
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config: Config = serde_json::from_str(
            r#"{"database_url":"sqlite://x-ui.db?mode=rwc","web_addr":"0.0.0.0:54321"}"#,
        )
        .unwrap();
        assert_eq!(config.base_path(), "/");
        assert_eq!(config.restart_check_interval, 10);
        assert_eq!(config.default_username, "admin");
        assert_eq!(config.default_password, "admin");
        assert!(config.web_base_dir.is_none());
        assert!(config.xray_restart_command.is_none());
    }

    #[test]
    fn base_path_is_normalized() {
        let mut config: Config =
            serde_json::from_str(r#"{"database_url":"","web_addr":""}"#).unwrap();
        for (raw, expected) in [("panel", "/panel"), ("/panel/", "/panel"), ("//", "/")] {
            config.web_base_path = raw.into();
            assert_eq!(config.base_path(), expected);
        }
    }
}
