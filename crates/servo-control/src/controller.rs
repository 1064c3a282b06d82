//! 对中控制器
//!
//! 闭环视觉伺服：反复取帧、检测目标、计算像素误差、按增益下发底盘速度命令，
//! 直到目标进入容差或迭代次数耗尽。
//!
//! # 单个周期
//!
//! 1. 从帧源获取 `camera_id` 的当前帧（瞬时失败按未检测到处理）
//! 2. 检测，按标签过滤，选取置信度最高的目标（无目标：本周期不下发命令）
//! 3. 计算像素误差 `(du, dv)`
//! 4. 两轴都在容差内：成功终止，不再下发命令
//! 5. 否则按相机安装标定映射为速度命令，下发一次
//!
//! # 线程模型
//!
//! 单线程、同步阻塞。控制器在整个调用期间持有三个协作者的 `&mut` 借用，
//! 因此同一个底盘不可能被两个控制器同时驱动。
//!
//! 单次帧获取或检测没有超时：协作者卡住会让整个循环卡住。
//! 需要提前结束时使用 [`CancelToken`]，它在每个周期开始前检查。
//!
//! # 示例
//!
//! ```rust,ignore
//! use servo_control::{ControllerConfig, center_object};
//!
//! let config = ControllerConfig::new("banana");
//! let result = center_object(&config, &mut camera, &mut detector, &mut base)?;
//! if result.success {
//!     println!("centered at {:?}", result.final_pixel_position);
//! }
//! ```

use crate::cancel::CancelToken;
use crate::collaborator::{BaseActuator, CollaboratorFault, Detector, FrameSource};
use crate::config::{ControllerConfig, FrameFailurePolicy};
use crate::error::{CenterError, Result};
use crate::result::ControllerResult;
use crate::state::CenteringState;
use servo_tools::{CenteringRecording, IterationOutcome, IterationRecord, RecordingMetadata};
use servo_types::{Detection, PixelError, VelocityCommand};
use spin_sleep::SpinSleeper;

/// 逐周期进度日志：`verbose` 时为 info，否则为 debug
macro_rules! progress {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            tracing::info!($($arg)+);
        } else {
            tracing::debug!($($arg)+);
        }
    };
}

/// 选取标签匹配且置信度最高的检测
///
/// 置信度或中心坐标不是有限值的检测会被忽略；置信度相同时取第一个。
pub fn select_target<'a>(detections: &'a [Detection], label: &str) -> Option<&'a Detection> {
    detections
        .iter()
        .filter(|d| d.matches(label) && d.confidence.is_finite() && d.center.is_finite())
        .reduce(|best, d| if d.confidence > best.confidence { d } else { best })
}

/// 对中控制器
#[derive(Debug)]
pub struct CenteringController {
    config: ControllerConfig,
    cancel: Option<CancelToken>,
    state: CenteringState,
    sleeper: SpinSleeper,
}

impl CenteringController {
    /// 创建控制器
    ///
    /// # 错误
    ///
    /// 配置无效时返回 [`CenterError::InvalidParameter`]。
    pub fn new(config: ControllerConfig) -> Result<Self> {
        config.validate()?;

        if config.gain <= 0.0 {
            tracing::warn!(
                gain = config.gain,
                "Non-positive gain: commands will not move the target toward the image center"
            );
        }

        Ok(Self {
            config,
            cancel: None,
            state: CenteringState::Searching,
            sleeper: SpinSleeper::default(),
        })
    }

    /// 设置取消令牌
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// 当前状态
    pub fn state(&self) -> CenteringState {
        self.state
    }

    /// 像素误差 → 速度命令（安装标定 + 可选安全限制）
    pub fn command_for(&self, error: PixelError) -> VelocityCommand {
        let raw = self.config.mount.command(error, self.config.gain);
        match &self.config.limits {
            Some(limits) => limits.apply(raw),
            None => raw,
        }
    }

    /// 执行一个周期
    ///
    /// 返回本周期的记录；只有需要向调用方传播的错误才返回 `Err`。
    /// 终止状态下不访问任何协作者，返回 [`CenterError::AlreadyFinished`]。
    pub fn tick<F, D, B>(
        &mut self,
        iteration: usize,
        frames: &mut F,
        detector: &mut D,
        base: &mut B,
    ) -> Result<IterationRecord>
    where
        F: FrameSource,
        D: Detector,
        B: BaseActuator,
    {
        if self.state.is_terminal() {
            return Err(CenterError::AlreadyFinished { state: self.state });
        }

        let verbose = self.config.verbose;
        let target = self.config.target_label.as_str();

        // 1. 取帧
        let frame = match frames.get_frame(&self.config.camera_id) {
            Ok(frame) => frame,
            Err(e)
                if e.is_transient()
                    && self.config.frame_failure_policy == FrameFailurePolicy::TreatAsMiss =>
            {
                tracing::warn!(
                    iteration,
                    camera_id = %self.config.camera_id,
                    error = %e,
                    "Frame unavailable, counting as miss"
                );
                self.state = self.state.on_miss();
                return Ok(IterationRecord {
                    iteration,
                    frame_sequence: None,
                    outcome: IterationOutcome::FrameUnavailable {
                        reason: e.to_string(),
                    },
                });
            },
            Err(e) => return Err(CenterError::frame_source(self.config.camera_id.clone(), e)),
        };
        let frame_sequence = Some(frame.sequence());

        // 2. 检测 + 选取目标
        let detections = match detector.detect(&frame) {
            Ok(detections) => detections,
            Err(e) if e.is_transient() => {
                tracing::warn!(iteration, error = %e, "Detector unavailable, counting as miss");
                self.state = self.state.on_miss();
                return Ok(IterationRecord {
                    iteration,
                    frame_sequence,
                    outcome: IterationOutcome::DetectorUnavailable {
                        reason: e.to_string(),
                    },
                });
            },
            Err(e) => return Err(CenterError::detector(e)),
        };

        let Some(detection) = select_target(&detections, target) else {
            progress!(
                verbose,
                iteration,
                candidates = detections.len(),
                "No '{}' detected",
                target
            );
            self.state = self.state.on_miss();
            return Ok(IterationRecord {
                iteration,
                frame_sequence,
                outcome: IterationOutcome::Missed,
            });
        };

        // 3. 像素误差
        let position = detection.center;
        let error = PixelError::between(position, frame.center());
        progress!(
            verbose,
            iteration,
            u = position.u,
            v = position.v,
            du = error.du,
            dv = error.dv,
            confidence = detection.confidence,
            "pos={} err={} conf={:.2}",
            position,
            error,
            detection.confidence
        );

        // 4. 容差内：终止，不下发命令
        let centered = error.within(self.config.tolerance_px);
        self.state = self.state.on_detection(centered);
        if centered {
            return Ok(IterationRecord {
                iteration,
                frame_sequence,
                outcome: IterationOutcome::Centered {
                    position,
                    error,
                    confidence: detection.confidence,
                },
            });
        }

        // 5. 下发命令
        let command = self.command_for(error);
        progress!(
            verbose,
            iteration,
            forward_back = command.forward_back,
            left_right = command.left_right,
            "Moving base: {}",
            command
        );
        base.move_base(command).map_err(|e| CenterError::actuator(command, e))?;

        Ok(IterationRecord {
            iteration,
            frame_sequence,
            outcome: IterationOutcome::Corrected {
                position,
                error,
                confidence: detection.confidence,
                command,
            },
        })
    }

    /// 运行对中循环直到成功、耗尽或出错
    ///
    /// 迭代次数耗尽返回 `Ok`，`success == false`。
    pub fn run<F, D, B>(
        &mut self,
        frames: &mut F,
        detector: &mut D,
        base: &mut B,
    ) -> Result<ControllerResult>
    where
        F: FrameSource,
        D: Detector,
        B: BaseActuator,
    {
        let config = &self.config;
        let verbose = config.verbose;
        let max_iterations = config.max_iterations;
        let settle_delay = config.settle_delay();

        progress!(
            verbose,
            label = %config.target_label,
            tolerance_px = config.tolerance_px,
            max_iterations,
            "Starting centering for '{}'",
            config.target_label
        );

        let mut recording = CenteringRecording::new(RecordingMetadata::new(
            config.target_label.clone(),
            config.camera_id.clone(),
            config.tolerance_px,
            config.gain,
            max_iterations,
        ));
        let mut commands_issued = 0;
        self.state = CenteringState::Searching;

        for iteration in 0..max_iterations {
            if let Some(token) = &self.cancel
                && token.is_cancelled()
            {
                tracing::warn!(iteration, "Centering cancelled");
                recording.finish(false, None);
                return Err(CenterError::Cancelled {
                    iterations: iteration,
                    recording: Box::new(recording),
                });
            }

            let record = self.tick(iteration, frames, detector, base)?;
            if record.outcome.command().is_some() {
                commands_issued += 1;
            }

            if let IterationOutcome::Centered { position, .. } = record.outcome {
                recording.push(record);
                recording.finish(true, Some(position));
                progress!(
                    self.config.verbose,
                    iteration,
                    "SUCCESS - object centered at {}",
                    position
                );

                return Ok(ControllerResult {
                    success: true,
                    final_pixel_position: Some(position),
                    state: self.state,
                    iterations: iteration + 1,
                    commands_issued,
                    recording,
                });
            }
            recording.push(record);

            if !settle_delay.is_zero() && iteration + 1 < max_iterations {
                self.sleeper.sleep(settle_delay);
            }
        }

        self.state = self.state.on_exhausted();
        recording.finish(false, None);
        progress!(
            self.config.verbose,
            max_iterations,
            commands_issued,
            "FAILED - max iterations ({}) reached",
            max_iterations
        );

        Ok(ControllerResult {
            success: false,
            final_pixel_position: None,
            state: self.state,
            iterations: max_iterations,
            commands_issued,
            recording,
        })
    }
}

/// 对中入口
///
/// 等价于 `CenteringController::new(config.clone())?.run(frames, detector, base)`。
pub fn center_object<F, D, B>(
    config: &ControllerConfig,
    frames: &mut F,
    detector: &mut D,
    base: &mut B,
) -> Result<ControllerResult>
where
    F: FrameSource,
    D: Detector,
    B: BaseActuator,
{
    CenteringController::new(config.clone())?.run(frames, detector, base)
}
