use anyhow::anyhow;
use log::{error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// 入站变更后延迟重启xray
pub struct XrayManager {
    need_restart: AtomicBool,
    restart_command: Option<String>,
}

impl XrayManager {
    pub fn new(restart_command: Option<String>) -> Self {
        Self {
            need_restart: AtomicBool::new(false),
            restart_command,
        }
    }

    pub fn set_to_need_restart(&self) {
        self.need_restart.store(true, Ordering::SeqCst);
    }

    pub fn is_need_restart_and_set_false(&self) -> bool {
        self.need_restart.swap(false, Ordering::SeqCst)
    }

    pub async fn restart_xray(&self) -> anyhow::Result<()> {
        let Some(command) = self.restart_command.as_deref() else {
            info!("xray restart requested, no restart command configured");
            return Ok(());
        };

        let status = Command::new("sh").arg("-c").arg(command).status().await?;
        if !status.success() {
            return Err(anyhow!("restart command exited with {}", status));
        }
        info!("xray restarted");
        Ok(())
    }

    /// 定时检查重启标记
    pub fn start_task(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if this.is_need_restart_and_set_false() {
                    if let Err(err) = this.restart_xray().await {
                        error!("restart xray failed: {err}");
                    }
                }
            }
        })
    }
}
