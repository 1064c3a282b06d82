//! 持久化的 CLI 默认参数
//!
//! 保存在 `<config_dir>/center-servo/config.toml`，环境变量 `CENTER_SERVO_CONFIG`
//! 可以指定其他文件。命令行参数总是覆盖这里的值。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use servo_control::ControllerConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// 指定配置文件路径的环境变量
pub const CONFIG_ENV: &str = "CENTER_SERVO_CONFIG";

/// 配置文件路径
pub fn config_file() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    let mut path = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法确定配置目录"))?;
    path.push("center-servo");
    path.push("config.toml");
    Ok(path)
}

/// CLI 默认参数
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliSettings {
    /// 目标标签
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// 相机序列号
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_id: Option<String>,

    /// 像素容差
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,

    /// 增益（米/像素）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gain: Option<f64>,
}

impl CliSettings {
    /// 加载配置（文件不存在时返回空配置）
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("读取配置文件失败")?;
        toml::from_str(&content).with_context(|| format!("解析配置文件失败: {}", path.display()))
    }

    /// 保存配置
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir).context("创建配置目录失败")?;
        }

        let content = toml::to_string_pretty(self).context("序列化配置失败")?;
        fs::write(path, content).context("写入配置文件失败")?;
        Ok(())
    }

    /// 覆盖控制器配置中对应的字段
    pub fn apply(&self, mut config: ControllerConfig) -> ControllerConfig {
        if let Some(target) = &self.target {
            config.target_label = target.clone();
        }
        if let Some(camera_id) = &self.camera_id {
            config.camera_id = camera_id.clone();
        }
        if let Some(tolerance) = self.tolerance {
            config.tolerance_px = tolerance;
        }
        if let Some(gain) = self.gain {
            config.gain = gain;
        }
        config
    }
}
