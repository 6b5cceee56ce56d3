use clap::Parser;
use once_cell::sync::Lazy;

pub static GLOBAL_OPTS: Lazy<Opts> = Lazy::new(Opts::parse);

/// x-ui 面板命令行参数
#[derive(Parser, Debug)]
#[command(
    name = "x-ui",
    version,
    about = "x-ui panel: manage xray inbounds and serve clash subscriptions"
)]
pub struct Opts {
    /// Panel config file (json)
    #[arg(short, long, default_value = "config.json")]
    pub config_file: String,

    /// Directory holding x-ui.log and its rotated copies
    #[arg(long, default_value = "logs")]
    pub log_dir: String,

    /// Level echoed to stdout: off, error, warn, info, debug, trace.
    /// The log file always records debug
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Export RUST_BACKTRACE=1 before starting
    #[arg(short, long, default_value_t = false, action = clap::ArgAction::Set)]
    pub backtrace: bool,
}
