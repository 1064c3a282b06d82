//! # 对中过程记录
//!
//! 每个控制周期产生一条 [`IterationRecord`]，整次对中过程汇总为 [`CenteringRecording`]。
//! 文件格式为带版本号的 JSON，便于人工查看和离线分析。

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use servo_types::{PixelError, PixelPoint, VelocityCommand};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// 当前格式版本
pub const RECORDING_VERSION: u8 = 1;

/// 单个周期的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IterationOutcome {
    /// 帧源暂时不可用（按未检测到处理）
    FrameUnavailable { reason: String },

    /// 检测器暂时失败（按未检测到处理）
    DetectorUnavailable { reason: String },

    /// 没有匹配的目标
    Missed,

    /// 目标已在容差内（终止）
    Centered {
        position: PixelPoint,
        error: PixelError,
        confidence: f64,
    },

    /// 目标超出容差，已下发命令
    Corrected {
        position: PixelPoint,
        error: PixelError,
        confidence: f64,
        command: VelocityCommand,
    },
}

impl IterationOutcome {
    /// 本周期是否检测到目标
    pub fn has_detection(&self) -> bool {
        matches!(self, Self::Centered { .. } | Self::Corrected { .. })
    }

    /// 本周期下发的命令
    pub fn command(&self) -> Option<VelocityCommand> {
        match self {
            Self::Corrected { command, .. } => Some(*command),
            _ => None,
        }
    }

    /// 本周期的像素误差
    pub fn error(&self) -> Option<PixelError> {
        match self {
            Self::Centered { error, .. } | Self::Corrected { error, .. } => Some(*error),
            _ => None,
        }
    }
}

/// 单个周期的记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    /// 周期序号（从 0 开始）
    pub iteration: usize,

    /// 帧序号（帧源失败时为空）
    pub frame_sequence: Option<u64>,

    /// 结果
    pub outcome: IterationOutcome,
}

/// 录制元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingMetadata {
    pub target_label: String,
    pub camera_id: String,
    pub tolerance_px: f64,
    pub gain: f64,
    pub max_iterations: usize,

    /// 开始时间（Unix 毫秒）
    pub started_at_ms: u64,

    /// 最终结果（录制结束前为空）
    pub success: Option<bool>,
    pub final_position: Option<PixelPoint>,
}

impl RecordingMetadata {
    pub fn new(
        target_label: impl Into<String>,
        camera_id: impl Into<String>,
        tolerance_px: f64,
        gain: f64,
        max_iterations: usize,
    ) -> Self {
        let started_at_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        Self {
            target_label: target_label.into(),
            camera_id: camera_id.into(),
            tolerance_px,
            gain,
            max_iterations,
            started_at_ms,
            success: None,
            final_position: None,
        }
    }
}

/// 一次完整对中过程的记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CenteringRecording {
    pub version: u8,
    pub metadata: RecordingMetadata,
    pub iterations: Vec<IterationRecord>,
}

impl CenteringRecording {
    pub fn new(metadata: RecordingMetadata) -> Self {
        Self {
            version: RECORDING_VERSION,
            metadata,
            iterations: Vec::new(),
        }
    }

    pub fn push(&mut self, record: IterationRecord) {
        self.iterations.push(record);
    }

    /// 写入最终结果
    pub fn finish(&mut self, success: bool, final_position: Option<PixelPoint>) {
        self.metadata.success = Some(success);
        self.metadata.final_position = final_position;
    }

    /// 下发的命令总数
    pub fn command_count(&self) -> usize {
        self.iterations
            .iter()
            .filter(|r| r.outcome.command().is_some())
            .count()
    }

    /// 未检测到目标的周期数（含帧源/检测器失败）
    pub fn miss_count(&self) -> usize {
        self.iterations
            .iter()
            .filter(|r| !r.outcome.has_detection())
            .count()
    }

    /// 像素误差序列（欧氏范数），用于观察收敛
    pub fn error_trace(&self) -> Vec<f64> {
        self.iterations
            .iter()
            .filter_map(|r| r.outcome.error())
            .map(PixelError::norm)
            .collect()
    }

    /// 保存为 JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref()).context("创建录制文件失败")?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, self).context("序列化录制失败")?;
        writer.flush().context("刷新缓冲区失败")?;

        Ok(())
    }

    /// 从 JSON 加载
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).context("打开录制文件失败")?;
        let reader = BufReader::new(file);

        let recording: Self = serde_json::from_reader(reader).context("解析录制文件失败")?;
        if recording.version != RECORDING_VERSION {
            bail!(
                "unsupported recording version: {} (expected {})",
                recording.version,
                RECORDING_VERSION
            );
        }

        Ok(recording)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn sample() -> CenteringRecording {
        let mut rec = CenteringRecording::new(RecordingMetadata::new(
            "banana",
            "309622300814",
            30.0,
            0.0015,
            20,
        ));
        rec.push(IterationRecord {
            iteration: 0,
            frame_sequence: None,
            outcome: IterationOutcome::FrameUnavailable {
                reason: "device busy".to_string(),
            },
        });
        rec.push(IterationRecord {
            iteration: 1,
            frame_sequence: Some(1),
            outcome: IterationOutcome::Missed,
        });
        rec.push(IterationRecord {
            iteration: 2,
            frame_sequence: Some(2),
            outcome: IterationOutcome::Corrected {
                position: PixelPoint::new(400.0, 240.0),
                error: PixelError::new(80.0, 0.0),
                confidence: 0.9,
                command: VelocityCommand::new(0.0, 0.12),
            },
        });
        rec.push(IterationRecord {
            iteration: 3,
            frame_sequence: Some(3),
            outcome: IterationOutcome::Centered {
                position: PixelPoint::new(330.0, 240.0),
                error: PixelError::new(10.0, 0.0),
                confidence: 0.92,
            },
        });
        rec.finish(true, Some(PixelPoint::new(330.0, 240.0)));
        rec
    }

    #[test]
    fn test_counts() {
        let rec = sample();
        assert_eq!(rec.command_count(), 1);
        assert_eq!(rec.miss_count(), 2);
        assert_eq!(rec.error_trace(), vec![80.0, 10.0]);
    }

    #[test]
    fn test_save_and_load() {
        let rec = sample();
        let file = NamedTempFile::new().unwrap();

        rec.save(file.path()).unwrap();
        let loaded = CenteringRecording::load(file.path()).unwrap();

        assert_eq!(loaded, rec);
        assert_eq!(loaded.metadata.success, Some(true));
    }

    #[test]
    fn test_load_rejects_unknown_version() {
        let mut rec = sample();
        rec.version = 99;
        let file = NamedTempFile::new().unwrap();
        rec.save(file.path()).unwrap();

        let err = CenteringRecording::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("unsupported recording version"));
    }

    #[test]
    fn test_outcome_tagging() {
        let json = serde_json::to_string(&IterationOutcome::Missed).unwrap();
        assert_eq!(json, r#"{"kind":"missed"}"#);
    }
}
