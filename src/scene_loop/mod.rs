pub mod cli_arguments;
pub mod scene_loop_config;
pub mod scene_loop_driver;
pub mod scene_loop_state;
