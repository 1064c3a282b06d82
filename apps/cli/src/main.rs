//! # Servo CLI
//!
//! 在仿真场景中运行腕部相机对中，并管理默认参数。
//!
//! ```bash
//! # 保存默认参数
//! servo-cli config set --target banana --tolerance 25
//!
//! # 目标初始位于 (520, 90)，记录每个周期
//! servo-cli run --start-u 520 --start-v 90 --record session.json
//! ```
//!
//! 退出码：`0` 对中成功，`2` 迭代次数耗尽，`130` 被 Ctrl+C 取消，其他错误为 `1`。

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;

mod commands;
mod settings;

use commands::{ConfigCommand, RunCommand};

/// Servo CLI - 腕部相机对中工具
#[derive(Parser, Debug)]
#[command(name = "servo-cli")]
#[command(about = "Center a detected object in the wrist camera by moving the base", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),

    /// 在仿真场景中运行一次对中
    Run {
        #[command(flatten)]
        args: RunCommand,
    },
}

fn main() -> Result<ExitCode> {
    // 初始化日志
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("servo_cli=info".parse()?)
        .add_directive("servo_control=info".parse()?);
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config(cmd) => {
            cmd.execute()?;
            Ok(ExitCode::SUCCESS)
        },

        Commands::Run { args } => args.execute(),
    }
}
