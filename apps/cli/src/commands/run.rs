//! run 命令
//!
//! 在仿真场景中执行一次对中。参数优先级：命令行 > `--config` 文件 > 持久化默认参数 > 内置默认值。

use anyhow::{Context, Result};
use clap::Args;
use servo_control::{
    AxisSign, CameraMount, CancelToken, CenteringController, CenteringRecording, ControllerConfig,
    ControllerResult, FrameFailurePolicy,
};
use servo_sim::{SceneConfig, SimScene};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::settings::{CliSettings, config_file};

/// 迭代次数耗尽时的退出码
const EXIT_NOT_CENTERED: u8 = 2;
/// 被取消时的退出码
const EXIT_CANCELLED: u8 = 130;

/// 对中运行参数
#[derive(Args, Debug)]
pub struct RunCommand {
    /// 控制器配置文件（TOML）
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// 目标标签
    #[arg(short, long)]
    pub target: Option<String>,

    /// 像素容差
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// 最大迭代次数
    #[arg(short = 'n', long)]
    pub max_iterations: Option<usize>,

    /// 增益（米/像素）
    #[arg(long)]
    pub gain: Option<f64>,

    /// 相机序列号
    #[arg(short, long)]
    pub camera_id: Option<String>,

    /// 周期间等待时间（毫秒）
    #[arg(long)]
    pub settle_ms: Option<u64>,

    /// 只输出汇总
    #[arg(short, long)]
    pub quiet: bool,

    /// 取帧失败立即终止（默认按未检测到处理）
    #[arg(long)]
    pub abort_on_frame_failure: bool,

    /// `dv` → `forward_back` 的符号
    #[arg(long)]
    pub forward_sign: Option<AxisSign>,

    /// `du` → `left_right` 的符号
    #[arg(long)]
    pub lateral_sign: Option<AxisSign>,

    /// 命令阻尼 `(0, 1]`
    #[arg(long)]
    pub damping: Option<f64>,

    /// 单轴单步上限（米）
    #[arg(long)]
    pub max_step: Option<f64>,

    /// 保存逐周期记录（JSON）
    #[arg(long)]
    pub record: Option<PathBuf>,

    /// 目标初始像素列
    #[arg(long, requires = "start_v")]
    pub start_u: Option<f64>,

    /// 目标初始像素行
    #[arg(long, requires = "start_u")]
    pub start_v: Option<f64>,

    /// 场景中实际物体的标签（默认与目标相同）
    #[arg(long)]
    pub object: Option<String>,

    /// 仿真相机序列号（默认与请求的相机相同）
    #[arg(long)]
    pub sim_camera: Option<String>,

    /// 漏检概率
    #[arg(long, default_value_t = 0.0)]
    pub dropout: f64,

    /// 检测噪声幅度（像素）
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// 底盘执行比例
    #[arg(long, default_value_t = 1.0)]
    pub base_response: f64,

    /// 随机数种子
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// 掉线的取帧序号（可重复）
    #[arg(long = "outage")]
    pub outages: Vec<u64>,
}

impl RunCommand {
    /// 合并各层配置
    pub fn controller_config(&self, settings: &CliSettings) -> Result<ControllerConfig> {
        let mut config = match &self.config {
            Some(path) => ControllerConfig::load_from_file(path)?,
            None => settings.apply(ControllerConfig::default()),
        };

        if let Some(target) = &self.target {
            config.target_label = target.clone();
        }
        if let Some(tolerance) = self.tolerance {
            config.tolerance_px = tolerance;
        }
        if let Some(n) = self.max_iterations {
            config.max_iterations = n;
        }
        if let Some(gain) = self.gain {
            config.gain = gain;
        }
        if let Some(camera_id) = &self.camera_id {
            config.camera_id = camera_id.clone();
        }
        if let Some(ms) = self.settle_ms {
            config.settle_delay_ms = ms;
        }
        if self.quiet {
            config.verbose = false;
        }
        if self.abort_on_frame_failure {
            config.frame_failure_policy = FrameFailurePolicy::Abort;
        }
        if self.forward_sign.is_some() || self.lateral_sign.is_some() {
            config.mount = CameraMount::new(
                self.forward_sign.unwrap_or(config.mount.forward_sign),
                self.lateral_sign.unwrap_or(config.mount.lateral_sign),
            );
        }
        if self.damping.is_some() || self.max_step.is_some() {
            let mut limits = config.limits.unwrap_or_default();
            if let Some(damping) = self.damping {
                limits.damping = damping;
            }
            if self.max_step.is_some() {
                limits.max_step = self.max_step;
            }
            config.limits = Some(limits);
        }

        config.validate()?;
        Ok(config)
    }

    /// 仿真场景：相机序列号和物体标签默认跟随控制器配置
    pub fn scene_config(&self, config: &ControllerConfig) -> SceneConfig {
        let mut scene = SceneConfig::default()
            .with_mount(config.mount)
            .with_label(self.object.clone().unwrap_or_else(|| config.target_label.clone()))
            .with_camera_serial(
                self.sim_camera
                    .clone()
                    .unwrap_or_else(|| config.camera_id.clone()),
            )
            .with_dropout(self.dropout)
            .with_noise(self.noise)
            .with_base_response(self.base_response)
            .with_seed(self.seed)
            .with_outages(self.outages.iter().copied());

        if let (Some(u), Some(v)) = (self.start_u, self.start_v) {
            scene = scene.with_start_pixel(u, v);
        }
        scene
    }

    /// 执行对中
    pub fn execute(&self) -> Result<ExitCode> {
        let settings = CliSettings::load(&config_file()?)?;
        let config = self.controller_config(&settings)?;
        let scene = SimScene::new(self.scene_config(&config)).context("创建仿真场景失败")?;
        tracing::debug!(scene = ?scene.config(), "Simulated scene ready");

        let token = CancelToken::new();
        let handler_token = token.clone();
        ctrlc::set_handler(move || {
            eprintln!("\nReceived interrupt signal. Stopping after the current iteration...");
            handler_token.cancel();
        })
        .context("设置信号处理失败")?;

        let start = scene.object_pixel();
        println!(
            "🎯 对中 '{}'：相机 {}，初始位置 ({:.0}, {:.0})，容差 {} px，最多 {} 次",
            config.target_label,
            config.camera_id,
            start.u,
            start.v,
            config.tolerance_px,
            config.max_iterations
        );

        let mut controller = CenteringController::new(config)?.with_cancel_token(token);
        let outcome = controller.run(&mut scene.camera(), &mut scene.detector(), &mut scene.base());

        let result = match outcome {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => {
                eprintln!("⚠️  {}", e);
                if let Some(recording) = e.partial_recording() {
                    self.save_recording(recording)?;
                }
                return Ok(ExitCode::from(EXIT_CANCELLED));
            },
            Err(e) => return Err(e).context("对中失败"),
        };

        self.save_recording(&result.recording)?;
        Ok(report(&result))
    }

    /// 指定了 `--record` 时保存记录
    fn save_recording(&self, recording: &CenteringRecording) -> Result<()> {
        if let Some(path) = &self.record {
            recording
                .save(path)
                .with_context(|| format!("保存记录失败: {}", path.display()))?;
            println!("💾 记录已保存: {}", path.display());
        }
        Ok(())
    }
}

fn report(result: &ControllerResult) -> ExitCode {
    println!();
    println!("📊 对中结果:");
    println!("  迭代次数: {}", result.iterations);
    println!("  下发命令: {}", result.commands_issued);
    println!("  未检测到: {}", result.recording.miss_count());

    match result.final_pixel_position {
        Some(position) if result.success => {
            let (u, v) = position.rounded();
            println!("✅ 对中成功: ({}, {})", u, v);
            ExitCode::SUCCESS
        },
        _ => {
            println!("❌ 未能对中（状态 {}）", result.state);
            ExitCode::from(EXIT_NOT_CENTERED)
        },
    }
}
