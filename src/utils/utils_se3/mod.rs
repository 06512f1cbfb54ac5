pub mod scene_pose;
