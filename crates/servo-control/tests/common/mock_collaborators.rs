//! Mock 协作者
//!
//! 可编程的帧源、检测器和底盘，用于在没有硬件的情况下驱动对中循环。

use servo_control::{BaseActuator, CollaboratorError, Detector, FrameSource};
use servo_types::{Detection, Frame, PixelFormat, PixelPoint, VelocityCommand};
use std::collections::VecDeque;

/// 模拟相机
///
/// 每次调用返回同一张空白帧（序号递增），或按脚本返回错误。
pub struct MockCamera {
    template: Frame,
    /// 按调用顺序弹出；`None` 表示本次正常出帧
    failures: VecDeque<Option<CollaboratorError>>,
    pub calls: usize,
    pub requested_ids: Vec<String>,
}

impl MockCamera {
    pub fn new(width: u32, height: u32) -> Self {
        let data = vec![0u8; width as usize * height as usize];
        Self {
            template: Frame::new("mock", width, height, PixelFormat::Gray8, data)
                .expect("valid mock frame"),
            failures: VecDeque::new(),
            calls: 0,
            requested_ids: Vec::new(),
        }
    }

    /// 640x480 相机
    pub fn vga() -> Self {
        Self::new(640, 480)
    }

    /// 设置失败脚本
    pub fn with_failures(mut self, failures: Vec<Option<CollaboratorError>>) -> Self {
        self.failures = failures.into();
        self
    }
}

impl FrameSource for MockCamera {
    type Error = CollaboratorError;

    fn get_frame(&mut self, camera_id: &str) -> Result<Frame, Self::Error> {
        self.calls += 1;
        self.requested_ids.push(camera_id.to_string());

        if let Some(Some(err)) = self.failures.pop_front() {
            return Err(err);
        }
        Ok(self.template.clone().with_sequence(self.calls as u64))
    }
}

/// 闭包检测器：参数为调用序号（从 0 开始）
pub struct FnDetector<F> {
    f: F,
    pub calls: usize,
}

impl<F> FnDetector<F>
where
    F: FnMut(usize) -> Result<Vec<Detection>, CollaboratorError>,
{
    pub fn new(f: F) -> Self {
        Self { f, calls: 0 }
    }
}

impl<F> Detector for FnDetector<F>
where
    F: FnMut(usize) -> Result<Vec<Detection>, CollaboratorError>,
{
    type Error = CollaboratorError;

    fn detect(&mut self, _frame: &Frame) -> Result<Vec<Detection>, Self::Error> {
        let call = self.calls;
        self.calls += 1;
        (self.f)(call)
    }
}

/// 每次返回同一个检测结果
pub fn fixed_detector(
    label: &'static str,
    u: f64,
    v: f64,
) -> FnDetector<impl FnMut(usize) -> Result<Vec<Detection>, CollaboratorError>> {
    FnDetector::new(move |_| Ok(vec![Detection::new(label, 0.9, PixelPoint::new(u, v))]))
}

/// 从不返回任何检测结果
pub fn empty_detector() -> FnDetector<impl FnMut(usize) -> Result<Vec<Detection>, CollaboratorError>> {
    FnDetector::new(|_| Ok(Vec::new()))
}

/// 记录命令的底盘
#[derive(Default)]
pub struct MockBase {
    pub commands: Vec<VelocityCommand>,
    /// 第 N 次命令（从 0 开始）返回错误
    pub fail_on: Option<usize>,
}

impl BaseActuator for MockBase {
    type Error = CollaboratorError;

    fn move_base(&mut self, command: VelocityCommand) -> Result<(), Self::Error> {
        if self.fail_on == Some(self.commands.len()) {
            return Err(CollaboratorError::misconfigured("base driver not initialized"));
        }
        self.commands.push(command);
        Ok(())
    }
}

pub fn det(label: &str, confidence: f64, u: f64, v: f64) -> Detection {
    Detection::new(label, confidence, PixelPoint::new(u, v))
}
