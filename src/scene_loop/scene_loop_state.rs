use serde::{Serialize, Deserialize};
use strum_macros::{Display, EnumIter};

/// Stages of the scene loop.  Stages between `SpawnObjects` and `MoveCamera` repeat once per
/// scene; `Await*` stages block on a barrier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, Display)]
pub enum SceneLoopState {
    Init,
    SpawnStatics,
    ClearPrevious,
    SpawnObjects,
    AwaitSpawnBarrier,
    DisablePhysics,
    Capture,
    AwaitCaptureBarrier,
    Query3DBoxes,
    AwaitBBoxBarrier,
    Query2DProjections,
    AwaitProjectionBarrier,
    ComputeRectangles,
    WriteAnnotations,
    ClearObjects,
    AwaitClearBarrier,
    MoveCamera,
    Terminal
}
impl SceneLoopState {
    pub fn is_barrier(&self) -> bool {
        return match self {
            SceneLoopState::AwaitSpawnBarrier |
            SceneLoopState::AwaitCaptureBarrier |
            SceneLoopState::AwaitBBoxBarrier |
            SceneLoopState::AwaitProjectionBarrier |
            SceneLoopState::AwaitClearBarrier => { true }
            _ => { false }
        }
    }
    /// The fixed successor within one scene.  `MoveCamera` leads back to `SpawnObjects` until
    /// the last scene, which the driver decides.
    pub fn next_in_scene(&self) -> SceneLoopState {
        return match self {
            SceneLoopState::Init => { SceneLoopState::SpawnStatics }
            SceneLoopState::SpawnStatics => { SceneLoopState::ClearPrevious }
            SceneLoopState::ClearPrevious => { SceneLoopState::SpawnObjects }
            SceneLoopState::SpawnObjects => { SceneLoopState::AwaitSpawnBarrier }
            SceneLoopState::AwaitSpawnBarrier => { SceneLoopState::DisablePhysics }
            SceneLoopState::DisablePhysics => { SceneLoopState::Capture }
            SceneLoopState::Capture => { SceneLoopState::AwaitCaptureBarrier }
            SceneLoopState::AwaitCaptureBarrier => { SceneLoopState::Query3DBoxes }
            SceneLoopState::Query3DBoxes => { SceneLoopState::AwaitBBoxBarrier }
            SceneLoopState::AwaitBBoxBarrier => { SceneLoopState::Query2DProjections }
            SceneLoopState::Query2DProjections => { SceneLoopState::AwaitProjectionBarrier }
            SceneLoopState::AwaitProjectionBarrier => { SceneLoopState::ComputeRectangles }
            SceneLoopState::ComputeRectangles => { SceneLoopState::WriteAnnotations }
            SceneLoopState::WriteAnnotations => { SceneLoopState::ClearObjects }
            SceneLoopState::ClearObjects => { SceneLoopState::AwaitClearBarrier }
            SceneLoopState::AwaitClearBarrier => { SceneLoopState::MoveCamera }
            SceneLoopState::MoveCamera => { SceneLoopState::SpawnObjects }
            SceneLoopState::Terminal => { SceneLoopState::Terminal }
        }
    }
}
