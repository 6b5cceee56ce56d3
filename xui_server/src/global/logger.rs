use super::opts::GLOBAL_OPTS;
use flexi_logger::{
    Age, Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming, WriteMode,
};
use log::LevelFilter;
use std::env;

/// 文件日志级别, 数据库和 actix 内部只记录告警
const LOG_SPEC: &str =
    "debug, sea_orm=warn, sqlx=error, actix_server=warn, actix_http=warn, mio=error";

/// 单个日志文件上限 10MB
const LOG_FILE_SIZE: u64 = 10 * 1024 * 1024;

const LOG_FILES_KEPT: usize = 14;

static LOGGER_HANDLE: tokio::sync::OnceCell<LoggerHandle> = tokio::sync::OnceCell::const_new();

/// 终端输出级别, 无法识别时全部输出
fn stdout_level(level: &str) -> Duplicate {
    match level.parse::<LevelFilter>() {
        Ok(LevelFilter::Off) => Duplicate::None,
        Ok(LevelFilter::Error) => Duplicate::Error,
        Ok(LevelFilter::Warn) => Duplicate::Warn,
        Ok(LevelFilter::Info) => Duplicate::Info,
        Ok(LevelFilter::Debug) => Duplicate::Debug,
        Ok(LevelFilter::Trace) => Duplicate::Trace,
        Err(_) if level.eq_ignore_ascii_case("none") => Duplicate::None,
        Err(_) => Duplicate::All,
    }
}

/// 日志写入 `<log_dir>/x-ui.log`, 环境变量 RUST_LOG 可覆盖文件级别
pub(crate) fn init_logger() -> anyhow::Result<()> {
    let opts = &*GLOBAL_OPTS;
    if opts.backtrace {
        env::set_var("RUST_BACKTRACE", "1");
    }

    let handle = Logger::try_with_env_or_str(LOG_SPEC)?
        .log_to_file(
            FileSpec::default()
                .directory(&opts.log_dir)
                .basename("x-ui")
                .suppress_timestamp()
                .suffix("log"),
        )
        .duplicate_to_stdout(stdout_level(&opts.log_level))
        .format_for_files(flexi_logger::detailed_format)
        .format_for_stdout(flexi_logger::colored_default_format)
        .rotate(
            Criterion::AgeOrSize(Age::Day, LOG_FILE_SIZE),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(LOG_FILES_KEPT),
        )
        .write_mode(WriteMode::Async)
        .start()?;

    LOGGER_HANDLE
        .set(handle)
        .map_err(|err| anyhow::anyhow!("logger already initialized: {err}"))
}
