extern crate scene_utils;

use std::env;
use scene_utils::scene_loop::cli_arguments::{DriverCommand, parse_positional, positional_usage};
use scene_utils::scene_loop::scene_loop_driver::run_simulated_scene_loop;
use scene_utils::scene_sync::run_context::RunContext;
use scene_utils::utils::utils_console::{PrintColor, PrintMode, scene_print, set_debug_printing};

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(|s| s.as_str()).unwrap_or("capture_example");

    let config = match parse_positional(&args[1.min(args.len())..]) {
        Ok(DriverCommand::Run(config)) => { config }
        Ok(DriverCommand::ShowUsage) => {
            print!("{}", positional_usage(program));
            return;
        }
        Err(e) => {
            scene_print(&e.to_string(), PrintMode::Println, PrintColor::Red, true);
            print!("{}", positional_usage(program));
            std::process::exit(1);
        }
    };
    set_debug_printing(config.debug);

    let code = match run_simulated_scene_loop(&config, RunContext::new()) {
        Ok(summary) => {
            scene_print(&format!("Generated {} scenes.", summary.scenes_completed), PrintMode::Println, PrintColor::Green, true);
            0
        }
        Err(e) => {
            scene_print(&e.to_string(), PrintMode::Println, PrintColor::Red, true);
            1
        }
    };
    std::process::exit(code);
}
