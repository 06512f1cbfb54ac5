extern crate scene_utils;

use std::env;
use scene_utils::scene_loop::cli_arguments::{DriverCommand, flagged_usage, parse_flagged};
use scene_utils::scene_loop::scene_loop_driver::run_simulated_scene_loop;
use scene_utils::scene_sync::run_context::RunContext;
use scene_utils::utils::utils_console::{PrintColor, PrintMode, scene_print, set_debug_printing};

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(|s| s.as_str()).unwrap_or("scene_example");

    let config = match parse_flagged(&args[1.min(args.len())..]) {
        Ok(DriverCommand::Run(config)) => { config }
        Ok(DriverCommand::ShowUsage) => {
            print!("{}", flagged_usage(program));
            return;
        }
        Err(e) => {
            scene_print(&e.to_string(), PrintMode::Println, PrintColor::Red, true);
            print!("{}", flagged_usage(program));
            std::process::exit(1);
        }
    };
    set_debug_printing(config.debug);

    scene_print(&format!("Generating {} scenes starting at index {}.", config.num_scenes, config.first_scene_idx), PrintMode::Println, PrintColor::Blue, false);
    scene_print(&format!("Images go to {:?}, annotations to {:?}.", config.image_dir, config.dataset_dir), PrintMode::Println, PrintColor::None, false);

    let code = match run_simulated_scene_loop(&config, RunContext::new()) {
        Ok(summary) => {
            scene_print(&format!("Generated {} scenes with {} objects in total.", summary.scenes_completed, summary.objects_per_scene.iter().sum::<usize>()), PrintMode::Println, PrintColor::Green, true);
            0
        }
        Err(e) => {
            scene_print(&e.to_string(), PrintMode::Println, PrintColor::Red, true);
            1
        }
    };
    std::process::exit(code);
}
