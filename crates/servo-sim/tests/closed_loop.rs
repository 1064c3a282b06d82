//! 闭环仿真测试
//!
//! 控制器驱动仿真底盘，验证真实像素误差收敛。

use servo_control::{
    CameraMount, CenterError, ControllerConfig, FrameFailurePolicy, IterationOutcome,
    VelocityLimits, center_object,
};
use servo_sim::{SceneConfig, SimError, SimScene};
use servo_types::AxisSign;
use std::time::Duration;

fn config() -> ControllerConfig {
    ControllerConfig::default()
        .with_verbose(false)
        .with_settle_delay(Duration::ZERO)
}

fn run(scene: &SimScene, config: &ControllerConfig) -> servo_control::Result<servo_control::ControllerResult> {
    center_object(
        config,
        &mut scene.camera(),
        &mut scene.detector(),
        &mut scene.base(),
    )
}

fn assert_truly_centered(scene: &SimScene, tolerance: f64) {
    let pixel = scene.object_pixel();
    let center = scene.config().image_center();
    // 检测中心与真实中心最多差半个像素
    assert!((pixel.u - center.u).abs() <= tolerance + 0.5, "u = {}", pixel.u);
    assert!((pixel.v - center.v).abs() <= tolerance + 0.5, "v = {}", pixel.v);
}

#[test]
fn test_converges_from_each_quadrant() {
    for (u, v) in [(560.0, 80.0), (80.0, 80.0), (80.0, 400.0), (560.0, 400.0)] {
        let scene = SimScene::new(SceneConfig::default().with_start_pixel(u, v)).unwrap();
        let result = run(&scene, &config()).unwrap();

        assert!(result.success, "start ({u}, {v}) did not converge");
        assert!(result.iterations <= 5, "start ({u}, {v}) took {}", result.iterations);
        assert_eq!(scene.commands().len(), result.commands_issued);
        assert_truly_centered(&scene, 30.0);
    }
}

#[test]
fn test_converges_with_non_default_mount() {
    let mount = CameraMount::new(AxisSign::Positive, AxisSign::Negative);
    let scene = SimScene::new(
        SceneConfig::default()
            .with_mount(mount)
            .with_start_pixel(150.0, 420.0),
    )
    .unwrap();

    let result = run(&scene, &config().with_mount(mount)).unwrap();

    assert!(result.success);
    assert_truly_centered(&scene, 30.0);
}

#[test]
fn test_mismatched_mount_diverges() {
    // 控制器的安装标定与实际相反：每次命令都让目标更远
    let scene = SimScene::new(SceneConfig::default().with_start_pixel(360.0, 240.0)).unwrap();
    let wrong = CameraMount::new(AxisSign::Positive, AxisSign::Negative);

    let result = run(&scene, &config().with_mount(wrong).with_max_iterations(5)).unwrap();

    assert!(!result.success);
    assert!(scene.object_pixel().u > 360.0);
}

#[test]
fn test_error_shrinks_every_commanded_tick() {
    let scene = SimScene::new(SceneConfig::default().with_start_pixel(600.0, 60.0)).unwrap();
    let result = run(&scene, &config().with_tolerance(2.0)).unwrap();

    assert!(result.success);
    let trace = result.recording.error_trace();
    assert!(trace.len() >= 3);
    assert!(trace.windows(2).all(|w| w[1] < w[0]), "trace = {trace:?}");
}

#[test]
fn test_limits_slow_down_but_still_converge() {
    let start = SceneConfig::default().with_start_pixel(500.0, 400.0);

    let fast = SimScene::new(start.clone()).unwrap();
    let fast_result = run(&fast, &config()).unwrap();

    let slow = SimScene::new(start).unwrap();
    let slow_result = run(&slow, &config().with_limits(VelocityLimits::conservative())).unwrap();

    assert!(fast_result.success && slow_result.success);
    assert!(slow_result.iterations > fast_result.iterations);
    for cmd in slow.commands() {
        assert!(cmd.max_abs() <= 0.04 + 1e-12, "command {cmd} exceeds max step");
    }
}

#[test]
fn test_sluggish_base_needs_more_iterations() {
    let start = SceneConfig::default().with_start_pixel(560.0, 60.0);
    let crisp = run(&SimScene::new(start.clone()).unwrap(), &config()).unwrap();

    let sluggish_scene = SimScene::new(start.with_base_response(0.3)).unwrap();
    let sluggish = run(&sluggish_scene, &config()).unwrap();

    assert!(crisp.success && sluggish.success);
    assert!(sluggish.iterations > crisp.iterations);
}

#[test]
fn test_object_out_of_view_is_never_found() {
    let scene = SimScene::new(SceneConfig::default().with_start_pixel(-300.0, 240.0)).unwrap();
    let result = run(&scene, &config().with_max_iterations(6)).unwrap();

    assert_eq!(result.into_tuple(), (false, None));
    assert!(scene.commands().is_empty());
    assert_eq!(scene.captures(), 6);
}

#[test]
fn test_dropout_and_noise_still_converge() {
    let scene = SimScene::new(
        SceneConfig::default()
            .with_start_pixel(560.0, 400.0)
            .with_dropout(0.3)
            .with_noise(3.0)
            .with_seed(42),
    )
    .unwrap();

    let result = run(&scene, &config()).unwrap();

    assert!(result.success);
    assert_truly_centered(&scene, 30.0 + 3.0);
}

#[test]
fn test_camera_outage_counts_as_miss() {
    let scene = SimScene::new(
        SceneConfig::default()
            .with_start_pixel(500.0, 240.0)
            .with_outages([0, 1]),
    )
    .unwrap();

    let result = run(&scene, &config()).unwrap();

    assert!(result.success);
    assert!(matches!(
        result.recording.iterations[0].outcome,
        IterationOutcome::FrameUnavailable { .. }
    ));
    assert!(matches!(
        result.recording.iterations[1].outcome,
        IterationOutcome::FrameUnavailable { .. }
    ));
    assert_eq!(result.recording.miss_count(), 2);
}

#[test]
fn test_camera_outage_aborts_under_abort_policy() {
    let scene = SimScene::new(SceneConfig::default().with_outages([0])).unwrap();
    let err = run(
        &scene,
        &config().with_frame_failure_policy(FrameFailurePolicy::Abort),
    )
    .unwrap_err();

    assert!(matches!(err, CenterError::FrameSource { .. }));
}

#[test]
fn test_wrong_camera_id_propagates() {
    let scene = SimScene::new(SceneConfig::default()).unwrap();
    let err = run(&scene, &config().with_camera_id("front-cam")).unwrap_err();

    match err {
        CenterError::FrameSource { camera_id, source } => {
            assert_eq!(camera_id, "front-cam");
            assert!(source.downcast_ref::<SimError>().is_some());
        },
        other => panic!("expected FrameSource error, got {other:?}"),
    }
    assert_eq!(scene.captures(), 0);
}

#[test]
fn test_base_fault_propagates() {
    let scene = SimScene::new(SceneConfig::default().with_start_pixel(600.0, 240.0)).unwrap();
    let err = center_object(
        &config(),
        &mut scene.camera(),
        &mut scene.detector(),
        &mut scene.base().with_fault_after(1),
    )
    .unwrap_err();

    assert!(matches!(err, CenterError::Actuator { .. }));
    assert_eq!(scene.commands().len(), 1);
}

#[test]
fn test_wrong_label_exhausts() {
    let scene = SimScene::new(SceneConfig::default().with_label("apple")).unwrap();
    let result = run(&scene, &config().with_max_iterations(4)).unwrap();

    assert!(!result.success);
    assert!(scene.commands().is_empty());
}
