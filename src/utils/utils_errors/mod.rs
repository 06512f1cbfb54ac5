use std::fmt::{Display, Formatter};
use std::time::Duration;

/// A common error type returned by functions throughout the crate.
#[derive(Clone, Debug)]
pub enum SceneError {
    GenericError(String),
    IdxOutOfBoundError(String),
    InvalidArguments(String),
    RemoteCaptureFailure(String),
    Timeout(String),
    CapacityExceeded(String),
    SerializationFailure(String),
    TransportError(String),
    Cancelled(String),
    StageFailure { stage: String, scene_idx: usize, cause: Box<SceneError> }
}
impl SceneError {
    pub fn new_generic_error_str(s: &str, file: &str, line: u32) -> Self {
        let s = format!("ERROR: {} -- File: {}, Line: {}", s, file, line);
        return Self::GenericError(s);
    }
    pub fn new_idx_out_of_bound_error(given_idx: usize, length_of_array: usize, file: &str, line: u32) -> Self {
        let s = format!("ERROR: Index {:?} is too large for the array of length {:?} -- File: {}, Line: {}", given_idx, length_of_array, file, line);
        return Self::IdxOutOfBoundError(s)
    }
    pub fn new_check_for_idx_out_of_bound_error(given_idx: usize, length_of_array: usize, file: &str, line: u32) -> Result<(), Self> {
        return if given_idx >= length_of_array {
            Err(Self::new_idx_out_of_bound_error(given_idx, length_of_array, file, line))
        } else {
            Ok(())
        }
    }
    pub fn new_invalid_arguments_error(message: &str, file: &str, line: u32) -> Self {
        let s = format!("ERROR: Invalid arguments.  {} -- File: {}, Line: {}", message, file, line);
        return Self::InvalidArguments(s);
    }
    pub fn new_remote_capture_failure_error(scene_idx: usize, file_name: &str, file: &str, line: u32) -> Self {
        let s = format!("ERROR: Camera coordinator reported a failed capture for scene {} (target {:?}) -- File: {}, Line: {}", scene_idx, file_name, file, line);
        return Self::RemoteCaptureFailure(s);
    }
    pub fn new_timeout_error(barrier_name: &str, timeout: Duration, file: &str, line: u32) -> Self {
        let s = format!("ERROR: Barrier {:?} was not satisfied within {:?} -- File: {}, Line: {}", barrier_name, timeout, file, line);
        return Self::Timeout(s);
    }
    pub fn new_capacity_exceeded_error(num_objects: usize, num_cells: usize, file: &str, line: u32) -> Self {
        let s = format!("ERROR: Requested {} objects but the grid only has {} cells -- File: {}, Line: {}", num_objects, num_cells, file, line);
        return Self::CapacityExceeded(s);
    }
    pub fn new_serialization_failure_error(message: &str, file: &str, line: u32) -> Self {
        let s = format!("ERROR: Serialization failure.  {} -- File: {}, Line: {}", message, file, line);
        return Self::SerializationFailure(s);
    }
    pub fn new_transport_error(coordinator_name: &str, message: &str, file: &str, line: u32) -> Self {
        let s = format!("ERROR: Could not deliver request to {}.  {} -- File: {}, Line: {}", coordinator_name, message, file, line);
        return Self::TransportError(s);
    }
    pub fn new_cancelled_error(barrier_name: &str, file: &str, line: u32) -> Self {
        let s = format!("ERROR: Run was cancelled while waiting on barrier {:?} -- File: {}, Line: {}", barrier_name, file, line);
        return Self::Cancelled(s);
    }
    pub fn new_stage_failure(stage: &str, scene_idx: usize, cause: SceneError) -> Self {
        return Self::StageFailure { stage: stage.to_string(), scene_idx, cause: Box::new(cause) };
    }
    /// Unwraps any `StageFailure` layers and returns the error that started the failure.
    pub fn root_cause(&self) -> &SceneError {
        return match self {
            SceneError::StageFailure { cause, .. } => { cause.root_cause() }
            _ => { self }
        }
    }
    pub fn is_fatal_capture_failure(&self) -> bool {
        return match self.root_cause() {
            SceneError::RemoteCaptureFailure(_) => { true }
            _ => { false }
        }
    }
}
impl Display for SceneError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        return match self {
            SceneError::GenericError(s) |
            SceneError::IdxOutOfBoundError(s) |
            SceneError::InvalidArguments(s) |
            SceneError::RemoteCaptureFailure(s) |
            SceneError::Timeout(s) |
            SceneError::CapacityExceeded(s) |
            SceneError::SerializationFailure(s) |
            SceneError::TransportError(s) |
            SceneError::Cancelled(s) => { write!(f, "{}", s) }
            SceneError::StageFailure { stage, scene_idx, cause } => {
                write!(f, "Scene {} failed in stage {}: {}", scene_idx, stage, cause)
            }
        }
    }
}
impl std::error::Error for SceneError { }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_cause_unwraps_nested_stage_failures() {
        let inner = SceneError::new_remote_capture_failure_error(3, "000003", file!(), line!());
        let outer = SceneError::new_stage_failure("AwaitCaptureBarrier", 3, inner);
        let outer = SceneError::new_stage_failure("SceneLoop", 3, outer);

        assert!(outer.is_fatal_capture_failure());
        match outer.root_cause() {
            SceneError::RemoteCaptureFailure(s) => { assert!(s.contains("000003")); }
            e => { panic!("unexpected root cause {:?}", e); }
        }
    }

    #[test]
    fn stage_failure_display_names_stage_and_scene() {
        let e = SceneError::new_stage_failure("Capture", 7, SceneError::new_generic_error_str("boom", file!(), line!()));
        let s = e.to_string();
        assert!(s.contains("Scene 7"));
        assert!(s.contains("Capture"));
        assert!(s.contains("boom"));
    }

    #[test]
    fn idx_check_rejects_out_of_range() {
        assert!(SceneError::new_check_for_idx_out_of_bound_error(2, 3, file!(), line!()).is_ok());
        assert!(SceneError::new_check_for_idx_out_of_bound_error(3, 3, file!(), line!()).is_err());
    }
}
