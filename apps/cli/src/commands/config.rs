//! 配置管理命令
//!
//! 管理 CLI 默认参数（目标、相机、容差、增益）

use anyhow::Result;
use clap::Subcommand;
use servo_control::ControllerConfig;

use crate::settings::{CliSettings, config_file};

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 设置配置项
    Set {
        /// 目标标签
        #[arg(short, long)]
        target: Option<String>,

        /// 相机序列号
        #[arg(short, long)]
        camera_id: Option<String>,

        /// 像素容差
        #[arg(long)]
        tolerance: Option<f64>,

        /// 增益（米/像素）
        #[arg(long)]
        gain: Option<f64>,
    },

    /// 获取配置项
    Get {
        /// 配置项名称
        #[arg(default_value = "all")]
        key: String,
    },

    /// 检查配置
    Check,
}

impl ConfigCommand {
    pub fn execute(self) -> Result<()> {
        match self {
            ConfigCommand::Set {
                target,
                camera_id,
                tolerance,
                gain,
            } => Self::set_(CliSettings {
                target,
                camera_id,
                tolerance,
                gain,
            }),

            ConfigCommand::Get { key } => Self::get_(&key),

            ConfigCommand::Check => Self::check_(),
        }
    }

    fn set_(update: CliSettings) -> Result<()> {
        let path = config_file()?;
        let mut settings = CliSettings::load(&path)?;

        if let Some(target) = update.target {
            println!("✅ 设置目标标签: {}", target);
            settings.target = Some(target);
        }
        if let Some(camera_id) = update.camera_id {
            println!("✅ 设置相机序列号: {}", camera_id);
            settings.camera_id = Some(camera_id);
        }
        if let Some(tolerance) = update.tolerance {
            println!("✅ 设置像素容差: {}", tolerance);
            settings.tolerance = Some(tolerance);
        }
        if let Some(gain) = update.gain {
            println!("✅ 设置增益: {}", gain);
            settings.gain = Some(gain);
        }

        // 拒绝保存无效组合
        settings.apply(ControllerConfig::default()).validate()?;
        settings.save(&path)?;
        Ok(())
    }

    fn get_(key: &str) -> Result<()> {
        let settings = CliSettings::load(&config_file()?)?;
        let unset = || "(未设置)".to_string();

        match key {
            "target" => println!("{}", settings.target.unwrap_or_else(unset)),
            "camera_id" => println!("{}", settings.camera_id.unwrap_or_else(unset)),
            "tolerance" => println!(
                "{}",
                settings.tolerance.map(|t| t.to_string()).unwrap_or_else(unset)
            ),
            "gain" => println!(
                "{}",
                settings.gain.map(|g| g.to_string()).unwrap_or_else(unset)
            ),
            "all" => {
                println!("Servo CLI 配置:");
                println!("  目标: {:?}", settings.target);
                println!("  相机: {:?}", settings.camera_id);
                println!("  容差: {:?}", settings.tolerance);
                println!("  增益: {:?}", settings.gain);
            },
            other => anyhow::bail!(
                "unknown config key '{}' (expected target, camera_id, tolerance, gain or all)",
                other
            ),
        }

        Ok(())
    }

    fn check_() -> Result<()> {
        let path = config_file()?;
        let settings = CliSettings::load(&path)?;
        let config = settings.apply(ControllerConfig::default());

        println!("配置文件: {}", path.display());
        println!("  目标: {}", config.target_label);
        println!("  相机: {}", config.camera_id);
        println!("  容差: {} px", config.tolerance_px);
        println!("  增益: {} m/px", config.gain);

        config.validate()?;
        println!("✅ 配置有效");
        Ok(())
    }
}
