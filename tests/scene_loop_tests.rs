//! Scene Loop Tests
//!
//! Runs the whole scene protocol against the simulated coordinator:
//! - complete runs write one annotation per scene
//! - a failed capture stops the run with a remote capture failure
//! - unanswered status queries end in a timeout
//! - capacity and cancellation errors surface before any scene is written

use std::env;
use std::fs;
use std::path::PathBuf;
use scene_utils::annotations::annotation_serializer::{AnnotationFormat, AnnotationSerializer};
use scene_utils::scene_layout::grid::GridSpec;
use scene_utils::scene_loop::scene_loop_config::SceneLoopConfig;
use scene_utils::scene_loop::scene_loop_driver::run_simulated_scene_loop;
use scene_utils::scene_loop::scene_loop_state::SceneLoopState;
use scene_utils::scene_sync::run_context::RunContext;
use scene_utils::utils::utils_errors::SceneError;
use scene_utils::utils::utils_files::FileUtils;

fn scratch_dir(test_name: &str) -> PathBuf {
    let mut dir = env::temp_dir();
    dir.push(format!("scene_utils_{}_{}", test_name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn small_config(dir: &PathBuf) -> SceneLoopConfig {
    let media_dir = dir.join("media");
    for texture in ["Checker_1", "Gradient_2", "Perlin_3"] {
        let script = media_dir.join("materials").join("scripts").join(format!("{}.material", texture));
        FileUtils::write_string_to_file("", &script).unwrap();
    }

    let mut config = SceneLoopConfig::default();
    config.media_dir = Some(media_dir);
    config.image_dir = dir.join("imgs");
    config.dataset_dir = dir.join("dataset");
    config.num_scenes = 3;
    config.first_scene_idx = 5;
    config.min_objects = 2;
    config.max_objects = 4;
    config.seed = Some(3);
    config.grid = GridSpec { x_cells: 4, y_cells: 4, cell_size_x: 0.5, cell_size_y: 0.5 };
    config.barriers.timeout_ms = 5_000;
    config.barriers.poll_interval_ms = 2;
    config.simulator.spawn_settle_queries = 2;
    config
}

// ============================================================================
// Complete Runs
// ============================================================================

#[test]
fn full_run_writes_one_annotation_per_scene() {
    let dir = scratch_dir("full_run");
    let config = small_config(&dir);

    let summary = run_simulated_scene_loop(&config, RunContext::new()).unwrap();
    assert_eq!(summary.scenes_completed, 3);
    assert_eq!(summary.annotation_paths.len(), 3);
    assert!(config.image_dir.is_dir());

    let serializer = AnnotationSerializer::new(&config.dataset_dir, AnnotationFormat::PascalVoc);
    for (i, scene_idx) in (5..8).enumerate() {
        let stem = SceneLoopConfig::scene_stem(scene_idx);
        assert_eq!(summary.annotation_paths[i], serializer.annotation_path(&stem));

        let annotation = serializer.read_scene(&stem).unwrap();
        assert_eq!(annotation.filename, format!("{:06}.png", scene_idx));
        assert_eq!(annotation.folder, "imgs");
        assert_eq!(annotation.size.width, 640);
        assert_eq!(annotation.size.height, 480);
        assert_eq!(annotation.objects.len(), summary.objects_per_scene[i]);
        for object in &annotation.objects {
            assert!(["box", "cylinder", "sphere"].contains(&object.name.as_str()));
            assert!(object.bndbox.xmax > object.bndbox.xmin);
            assert!(object.bndbox.ymax > object.bndbox.ymin);
        }
    }
    for n in &summary.objects_per_scene {
        assert!(*n >= 2 && *n <= 4);
    }
}

#[test]
fn state_history_follows_the_scene_protocol() {
    let dir = scratch_dir("state_history");
    let mut config = small_config(&dir);
    config.num_scenes = 2;

    let summary = run_simulated_scene_loop(&config, RunContext::new()).unwrap();
    let history = &summary.state_history;
    assert_eq!(&history[..4], &[SceneLoopState::Init, SceneLoopState::SpawnStatics, SceneLoopState::ClearPrevious, SceneLoopState::SpawnObjects]);
    assert_eq!(history.last(), Some(&SceneLoopState::Terminal));
    assert_eq!(history.iter().filter(|s| **s == SceneLoopState::SpawnObjects).count(), 2);

    let capture = history.iter().position(|s| *s == SceneLoopState::AwaitCaptureBarrier).unwrap();
    let boxes = history.iter().position(|s| *s == SceneLoopState::Query3DBoxes).unwrap();
    let projections = history.iter().position(|s| *s == SceneLoopState::Query2DProjections).unwrap();
    let rectangles = history.iter().position(|s| *s == SceneLoopState::ComputeRectangles).unwrap();
    assert!(capture < boxes && boxes < projections && projections < rectangles);
}

#[test]
fn json_annotations_and_delayed_responses() {
    let dir = scratch_dir("json_run");
    let mut config = small_config(&dir);
    config.num_scenes = 1;
    config.annotation_format = AnnotationFormat::Json;
    config.clear_previous = false;
    config.simulator.response_delay_ms = 1;

    let summary = run_simulated_scene_loop(&config, RunContext::new()).unwrap();
    assert_eq!(summary.scenes_completed, 1);
    assert!(!summary.state_history.contains(&SceneLoopState::ClearPrevious));
    assert_eq!(FileUtils::get_file_extension_string(&summary.annotation_paths[0]).unwrap(), "json");

    let serializer = AnnotationSerializer::new(&config.dataset_dir, AnnotationFormat::Json);
    let annotation = serializer.read_scene("000005").unwrap();
    assert_eq!(annotation.objects.len(), summary.objects_per_scene[0]);
}

#[test]
fn ground_material_randomization_runs_alongside_the_scenes() {
    let dir = scratch_dir("ground_materials");
    let mut config = small_config(&dir);
    config.num_scenes = 2;
    config.randomize_ground_material = true;
    config.simulator.material_patterns = vec!["Plugin/Checker_".to_string(), "Plugin/Gradient_".to_string()];
    config.simulator.material_variants = 4;

    let summary = run_simulated_scene_loop(&config, RunContext::new()).unwrap();
    assert_eq!(summary.scenes_completed, 2);
    assert_eq!(summary.annotation_paths.len(), 2);
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn failed_capture_stops_the_run() {
    let dir = scratch_dir("failed_capture");
    let mut config = small_config(&dir);
    config.simulator.fail_captures = true;

    let e = run_simulated_scene_loop(&config, RunContext::new()).unwrap_err();
    assert!(e.is_fatal_capture_failure());
    match &e {
        SceneError::StageFailure { stage, scene_idx, .. } => {
            assert_eq!(stage, "AwaitCaptureBarrier");
            assert_eq!(*scene_idx, 5);
        }
        e => { panic!("expected a stage failure, got {:?}", e); }
    }
    assert!(e.to_string().contains("000005"));
    assert!(!config.dataset_dir.join("000005.xml").exists());
}

#[test]
fn unanswered_status_queries_time_out() {
    let dir = scratch_dir("status_timeout");
    let mut config = small_config(&dir);
    config.barriers.timeout_ms = 100;
    config.simulator.answer_status_queries = false;

    let e = run_simulated_scene_loop(&config, RunContext::new()).unwrap_err();
    match e.root_cause() {
        SceneError::Timeout(s) => { assert!(s.contains("object_count")); }
        r => { panic!("expected a timeout, got {:?}", r); }
    }
}

#[test]
fn too_many_objects_fail_before_anything_is_written() {
    let dir = scratch_dir("capacity");
    let mut config = small_config(&dir);
    config.max_objects = 17;

    match run_simulated_scene_loop(&config, RunContext::new()) {
        Err(SceneError::CapacityExceeded(_)) => { }
        r => { panic!("expected a capacity error, got {:?}", r.map(|s| s.scenes_completed)); }
    }
    assert!(!config.image_dir.exists());
    assert!(!config.dataset_dir.exists());
}

#[test]
fn scene_index_overflow_is_an_argument_error() {
    let dir = scratch_dir("index_overflow");
    let mut config = small_config(&dir);
    config.first_scene_idx = usize::MAX;
    config.num_scenes = 1;

    match run_simulated_scene_loop(&config, RunContext::new()) {
        Err(SceneError::InvalidArguments(_)) => { }
        r => { panic!("expected invalid arguments, got {:?}", r.map(|s| s.scenes_completed)); }
    }
    assert!(!config.dataset_dir.exists());
}

#[test]
fn cancelled_run_reports_cancellation() {
    let dir = scratch_dir("cancelled");
    let config = small_config(&dir);
    let ctx = RunContext::new();
    ctx.cancel();

    let e = run_simulated_scene_loop(&config, ctx).unwrap_err();
    match e.root_cause() {
        SceneError::Cancelled(_) => { }
        r => { panic!("expected cancellation, got {:?}", r); }
    }
}
