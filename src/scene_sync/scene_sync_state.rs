use std::collections::HashMap;
use nalgebra::Vector2;
use crate::bounding_boxes::bounding_box_3d::{BoundingBox3D, CORNERS_PER_BOX};
use crate::coordinators::coordinator_responses::{CameraInfo, CameraResponse, WorldResponse};
use crate::coordinators::{ResponseHandler, WorldCoordinator};
use crate::scene_requests::scene_request_builder::SceneRequestBuilder;
use crate::scene_sync::run_context::RunContext;
use crate::scene_sync::sync_barrier::{BarrierCheck, BarrierWaitSettings, SyncBarrier};
use crate::utils::utils_console::scene_debug_print;
use crate::utils::utils_errors::SceneError;

/// Everything the response handler shares with the driver, one barrier per concern so that
/// unrelated responses never contend on the same lock.
pub struct SceneSyncState {
    settings: BarrierWaitSettings,
    object_count: SyncBarrier<Option<usize>>,
    capture: SyncBarrier<Option<bool>>,
    camera_info: SyncBarrier<Option<CameraInfo>>,
    bounding_boxes: SyncBarrier<HashMap<String, Vec<BoundingBox3D>>>,
    projections: SyncBarrier<HashMap<String, Vec<Vector2<f64>>>>
}
impl SceneSyncState {
    pub fn new(settings: BarrierWaitSettings) -> Self {
        Self {
            settings,
            object_count: SyncBarrier::new("object_count", None),
            capture: SyncBarrier::new("capture", None),
            camera_info: SyncBarrier::new("camera_info", None),
            bounding_boxes: SyncBarrier::new("bounding_boxes", HashMap::new()),
            projections: SyncBarrier::new("projections", HashMap::new())
        }
    }
    pub fn settings(&self) -> &BarrierWaitSettings {
        &self.settings
    }

    pub fn record_object_count(&self, object_count: usize) {
        self.object_count.update(|c| *c = Some(object_count));
    }
    pub fn record_capture_result(&self, success: bool) {
        self.capture.update(|c| *c = Some(success));
    }
    pub fn record_camera_info(&self, info: CameraInfo) {
        self.camera_info.update(|c| *c = Some(info));
    }
    pub fn record_bounding_box(&self, name: &str, bounding_box: BoundingBox3D) {
        self.bounding_boxes.update(|m| m.entry(name.to_string()).or_insert(vec![]).push(bounding_box));
    }
    pub fn record_projection(&self, name: &str, point: Vector2<f64>) {
        self.projections.update(|m| m.entry(name.to_string()).or_insert(vec![]).push(point));
    }

    pub fn last_object_count(&self) -> Option<usize> {
        self.object_count.read(|c| *c)
    }
    /// Forgets the last reported count so the next count wait has to hear from the world again.
    pub fn invalidate_object_count(&self) {
        self.object_count.rearm(|c| *c = None);
    }
    /// True if the last reported count already equals `expected`.  Never sends anything.
    pub fn count_barrier_satisfied(&self, expected: usize) -> bool {
        self.object_count.read(|c| *c == Some(expected))
    }
    /// Waits until the world reports exactly `expected` live models, re-issuing a status query
    /// on each unsatisfied poll.  Returns at once, without querying, if the count is already
    /// known to match.
    pub fn wait_for_count<W: WorldCoordinator + ?Sized>(&self, expected: usize, world: &W, ctx: &RunContext) -> Result<(), SceneError> {
        self.object_count.wait(&self.settings, ctx, |c| {
            if *c == Some(expected) { BarrierCheck::Satisfied(()) } else { BarrierCheck::Pending }
        }, || {
            scene_debug_print(&format!("[SceneSyncState] waiting for {} models, last count {:?}.", expected, self.last_object_count()));
            world.send_world_request(SceneRequestBuilder::status())
        })
    }

    /// Consumes a capture result if one has arrived.  `Ok(true)` on success, `Ok(false)` while
    /// nothing has arrived yet, `RemoteCaptureFailure` if the camera reported a failed save.
    pub fn poll_capture(&self, scene_idx: usize, file_name: &str) -> Result<bool, SceneError> {
        let r = self.capture.poll(|c| Self::consume_capture(c, scene_idx, file_name))?;
        Ok(r.is_some())
    }
    pub fn wait_for_capture(&self, scene_idx: usize, file_name: &str, ctx: &RunContext) -> Result<(), SceneError> {
        self.capture.wait(&self.settings, ctx, |c| Self::consume_capture(c, scene_idx, file_name), || Ok(()))
    }
    fn consume_capture(c: &mut Option<bool>, scene_idx: usize, file_name: &str) -> BarrierCheck<()> {
        return match c.take() {
            None => { BarrierCheck::Pending }
            Some(true) => { BarrierCheck::Satisfied(()) }
            Some(false) => { BarrierCheck::Failed(SceneError::new_remote_capture_failure_error(scene_idx, file_name, file!(), line!())) }
        }
    }

    pub fn camera_info(&self) -> Option<CameraInfo> {
        self.camera_info.read(|c| *c)
    }
    pub fn wait_for_camera_info(&self, ctx: &RunContext) -> Result<CameraInfo, SceneError> {
        self.camera_info.wait(&self.settings, ctx, |c| {
            match c { Some(info) => BarrierCheck::Satisfied(*info), None => BarrierCheck::Pending }
        }, || Ok(()))
    }

    pub fn num_bounding_boxes(&self) -> usize {
        self.bounding_boxes.read(|m| m.values().map(|v| v.len()).sum())
    }
    /// Waits for `expected` accumulated 3D boxes and returns a copy of them keyed by name.
    pub fn wait_for_bounding_boxes(&self, expected: usize, ctx: &RunContext) -> Result<HashMap<String, Vec<BoundingBox3D>>, SceneError> {
        self.bounding_boxes.wait(&self.settings, ctx, |m| {
            let total: usize = m.values().map(|v| v.len()).sum();
            if total >= expected { BarrierCheck::Satisfied(m.clone()) } else { BarrierCheck::Pending }
        }, || Ok(()))
    }

    pub fn num_projections(&self) -> usize {
        self.projections.read(|m| m.values().map(|v| v.len()).sum())
    }
    pub fn projections_barrier_satisfied(&self, num_objects: usize) -> bool {
        self.num_projections() >= CORNERS_PER_BOX * num_objects
    }
    /// Waits for eight projected corners per object.
    pub fn wait_for_projections(&self, num_objects: usize, ctx: &RunContext) -> Result<HashMap<String, Vec<Vector2<f64>>>, SceneError> {
        let expected = CORNERS_PER_BOX * num_objects;
        self.projections.wait(&self.settings, ctx, |m| {
            let total: usize = m.values().map(|v| v.len()).sum();
            if total >= expected { BarrierCheck::Satisfied(m.clone()) } else { BarrierCheck::Pending }
        }, || Ok(()))
    }

    /// Clears everything accumulated for the previous scene.  Camera info survives, since the
    /// sensor does not change between scenes.
    pub fn rearm_for_new_scene(&self) {
        self.object_count.rearm(|c| *c = None);
        self.capture.rearm(|c| *c = None);
        self.bounding_boxes.rearm(|m| m.clear());
        self.projections.rearm(|m| m.clear());
    }
}
impl ResponseHandler for SceneSyncState {
    fn on_world_response(&self, response: WorldResponse) {
        match response {
            WorldResponse::Info { object_count } => { self.record_object_count(object_count); }
            WorldResponse::Properties { boxes } => {
                for b in boxes {
                    self.record_bounding_box(&b.name, b.bounding_box);
                }
            }
            WorldResponse::MoveAck => { scene_debug_print("[SceneSyncState] move acknowledged."); }
        }
    }
    fn on_camera_response(&self, response: CameraResponse) {
        match response {
            CameraResponse::Capture { success } => { self.record_capture_result(success); }
            CameraResponse::CameraInfo(info) => { self.record_camera_info(info); }
            CameraResponse::Projection { name, point } => { self.record_projection(&name, point); }
            CameraResponse::OutputDirSet { path } => { scene_debug_print(&format!("[SceneSyncState] camera output directory set to {:?}.", path)); }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;
    use parking_lot::Mutex;
    use crate::scene_requests::world_request::WorldRequest;
    use super::*;

    struct CountingWorld {
        sent: Mutex<Vec<WorldRequest>>
    }
    impl WorldCoordinator for CountingWorld {
        fn send_world_request(&self, request: WorldRequest) -> Result<(), SceneError> {
            self.sent.lock().push(request);
            Ok(())
        }
    }

    fn state(timeout_ms: u64) -> SceneSyncState {
        SceneSyncState::new(BarrierWaitSettings::new_from_millis(timeout_ms, 5))
    }

    #[test]
    fn satisfied_count_barrier_does_not_query_again() {
        let s = state(1_000);
        let world = CountingWorld { sent: Mutex::new(vec![]) };
        s.record_object_count(9);
        assert!(s.count_barrier_satisfied(9));
        s.wait_for_count(9, &world, &RunContext::new()).unwrap();
        s.wait_for_count(9, &world, &RunContext::new()).unwrap();
        assert!(world.sent.lock().is_empty());
    }

    #[test]
    fn unsatisfied_count_barrier_requeries_and_times_out() {
        let s = state(60);
        let world = CountingWorld { sent: Mutex::new(vec![]) };
        s.record_object_count(3);
        match s.wait_for_count(4, &world, &RunContext::new()) {
            Err(SceneError::Timeout(_)) => { }
            r => { panic!("expected timeout, got {:?}", r); }
        }
        let sent = world.sent.lock();
        assert!(!sent.is_empty());
        assert!(sent.iter().all(|r| *r == WorldRequest::Status));
    }

    #[test]
    fn capture_flag_is_consumed_exactly_once() {
        let s = state(1_000);
        for _ in 0..3 {
            assert_eq!(s.poll_capture(0, "000000").unwrap(), false);
        }
        s.on_camera_response(CameraResponse::Capture { success: true });
        assert_eq!(s.poll_capture(0, "000000").unwrap(), true);
        assert_eq!(s.poll_capture(0, "000000").unwrap(), false);
    }

    #[test]
    fn capture_wait_sees_success_from_delivery_thread() {
        let s = Arc::new(state(5_000));
        let writer = s.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            writer.on_camera_response(CameraResponse::Capture { success: true });
        });
        s.wait_for_capture(1, "000001", &RunContext::new()).unwrap();
        handle.join().unwrap();
        assert_eq!(s.poll_capture(1, "000001").unwrap(), false);
    }

    #[test]
    fn failed_capture_is_a_remote_capture_failure() {
        let s = state(1_000);
        s.record_capture_result(false);
        match s.wait_for_capture(4, "000004", &RunContext::new()) {
            Err(e) => {
                assert!(e.is_fatal_capture_failure());
                assert!(e.to_string().contains("000004"));
            }
            Ok(_) => { panic!("capture failure was not reported"); }
        }
    }

    #[test]
    fn projections_need_eight_points_per_object() {
        let s = state(30);
        for i in 0..15 {
            let name = if i < 8 { "box_0" } else { "sphere_0" };
            s.on_camera_response(CameraResponse::Projection { name: name.to_string(), point: Vector2::new(i as f64, 0.0) });
            assert!(!s.projections_barrier_satisfied(2));
        }
        assert!(s.wait_for_projections(2, &RunContext::new()).is_err());

        s.on_camera_response(CameraResponse::Projection { name: "sphere_0".to_string(), point: Vector2::new(15.0, 0.0) });
        assert!(s.projections_barrier_satisfied(2));
        let projections = s.wait_for_projections(2, &RunContext::new()).unwrap();
        assert_eq!(projections["box_0"].len(), 8);
        assert_eq!(projections["sphere_0"].len(), 8);

        s.rearm_for_new_scene();
        assert_eq!(s.num_projections(), 0);
    }

    #[test]
    fn bounding_boxes_accumulate_by_name() {
        let s = state(1_000);
        s.record_bounding_box("box_0", BoundingBox3D::new(nalgebra::Vector3::zeros(), nalgebra::Vector3::repeat(1.0)));
        s.record_bounding_box("box_1", BoundingBox3D::new(nalgebra::Vector3::zeros(), nalgebra::Vector3::repeat(2.0)));
        let boxes = s.wait_for_bounding_boxes(2, &RunContext::new()).unwrap();
        assert_eq!(boxes.len(), 2);
        assert_eq!(s.num_bounding_boxes(), 2);
    }
}
