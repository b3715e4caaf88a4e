use anyhow::Context;
use clap::Parser;
use cli::{Cli, Request};
use std::io;
use tracing::{info, warn};

mod cli;
mod config;
mod core;
mod error;
mod input;
mod pipeline;
mod sampling;

fn main() -> anyhow::Result<()> {
    // 参数错误时 clap 打印用法并以非零状态退出
    let cli = Cli::parse();

    // 加载配置
    let config = config::Config::from_env()?;

    // 初始化日志，stdout 只输出样本
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(config.max_level()?)
        .init();

    info!(config = %pipeline::to_json(&config), "Configuration loaded");

    // 在任何 I/O 之前校验参数
    let request = Request::from_cli(&cli, &config)?;

    match pipeline::run(&request, &config, io::stdin().lock(), io::stdout().lock()) {
        Ok(_) => Ok(()),
        Err(e) if e.is_broken_pipe() => {
            warn!("Output closed early");
            Ok(())
        }
        Err(e) => Err(e).context("Sampling failed"),
    }
}
