//! 仿真相机
//!
//! 渲染一张深色背景的灰度图，目标是一个亮色正方形。正方形超出画面的部分被裁掉，
//! 完全移出画面时图像中没有目标。

use crate::error::SimError;
use crate::scene::SimScene;
use servo_control::FrameSource;
use servo_types::{Frame, PixelFormat};

/// 背景灰度
pub const BACKGROUND: u8 = 16;
/// 目标灰度
pub const FOREGROUND: u8 = 240;

/// 仿真相机
#[derive(Debug, Clone)]
pub struct SimCamera {
    scene: SimScene,
}

impl SimCamera {
    pub fn new(scene: SimScene) -> Self {
        Self { scene }
    }

    fn render(&self, sequence: u64) -> Result<Frame, SimError> {
        let config = self.scene.config();
        let (width, height) = (config.width as usize, config.height as usize);
        let center = self.scene.object_pixel();
        let half = f64::from(config.box_size_px) / 2.0;

        let mut data = vec![BACKGROUND; width * height];
        // 像素 x 的中心为 x + 0.5，落在 [center - half, center + half) 内时点亮
        let span = |c: f64, len: usize| {
            let lo = (c - half - 0.5).ceil().clamp(0.0, len as f64);
            let hi = (c + half - 0.5).ceil().min(len as f64);
            (lo as usize, hi.max(lo) as usize)
        };
        let (x0, x1) = span(center.u, width);
        let (y0, y1) = span(center.v, height);
        for y in y0..y1 {
            data[y * width + x0..y * width + x1].fill(FOREGROUND);
        }

        Ok(Frame::new(
            config.camera_serial.clone(),
            config.width,
            config.height,
            PixelFormat::Gray8,
            data,
        )?
        .with_sequence(sequence))
    }
}

impl FrameSource for SimCamera {
    type Error = SimError;

    fn get_frame(&mut self, camera_id: &str) -> Result<Frame, Self::Error> {
        let config = self.scene.config();
        if camera_id != config.camera_serial {
            return Err(SimError::UnknownCamera {
                requested: camera_id.to_string(),
                available: config.camera_serial.clone(),
            });
        }

        let capture = self.scene.with_state(|state| {
            let capture = state.captures;
            state.captures += 1;
            capture
        });
        if config.outage_captures.contains(&capture) {
            tracing::debug!(capture, "Simulated camera outage");
            return Err(SimError::CameraOutage { capture });
        }

        self.render(capture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneConfig;

    fn lit_columns(frame: &Frame, y: u32) -> Vec<usize> {
        frame
            .row(y)
            .unwrap()
            .iter()
            .enumerate()
            .filter(|(_, p)| **p == FOREGROUND)
            .map(|(x, _)| x)
            .collect()
    }

    #[test]
    fn test_renders_box_at_object_pixel() {
        let scene = SimScene::new(SceneConfig::default().with_start_pixel(400.0, 240.0)).unwrap();
        let frame = scene.camera().get_frame("309622300814").unwrap();

        assert_eq!(frame.width(), 640);
        assert_eq!(frame.format(), PixelFormat::Gray8);
        let cols = lit_columns(&frame, 240);
        assert_eq!(cols.first(), Some(&380));
        assert_eq!(cols.last(), Some(&419));
        assert!(lit_columns(&frame, 219).is_empty());
        assert_eq!(lit_columns(&frame, 220).len(), 40);
    }

    #[test]
    fn test_box_is_clipped_at_border() {
        let scene = SimScene::new(SceneConfig::default().with_start_pixel(5.0, 240.0)).unwrap();
        let frame = scene.camera().get_frame("309622300814").unwrap();
        let cols = lit_columns(&frame, 240);
        assert_eq!(cols.first(), Some(&0));
        assert_eq!(cols.last(), Some(&24));
    }

    #[test]
    fn test_object_out_of_view_renders_background() {
        let scene = SimScene::new(SceneConfig::default().with_start_pixel(-200.0, 240.0)).unwrap();
        let frame = scene.camera().get_frame("309622300814").unwrap();
        assert!(frame.data().iter().all(|p| *p == BACKGROUND));
    }

    #[test]
    fn test_unknown_camera_is_not_transient() {
        use servo_control::CollaboratorFault;

        let scene = SimScene::new(SceneConfig::default()).unwrap();
        let err = scene.camera().get_frame("front-cam").unwrap_err();
        assert!(matches!(err, SimError::UnknownCamera { .. }));
        assert!(!err.is_transient());
        assert_eq!(scene.captures(), 0);
    }

    #[test]
    fn test_scripted_outages() {
        let scene = SimScene::new(SceneConfig::default().with_outages([1])).unwrap();
        let mut camera = scene.camera();

        assert_eq!(camera.get_frame("309622300814").unwrap().sequence(), 0);
        assert_eq!(
            camera.get_frame("309622300814").unwrap_err(),
            SimError::CameraOutage { capture: 1 }
        );
        assert_eq!(camera.get_frame("309622300814").unwrap().sequence(), 2);
        assert_eq!(scene.captures(), 3);
    }
}
