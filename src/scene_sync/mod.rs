pub mod run_context;
pub mod scene_sync_state;
pub mod sync_barrier;
