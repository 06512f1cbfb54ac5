use std::path::PathBuf;
use crate::scene_loop::scene_loop_config::SceneLoopConfig;
use crate::utils::utils_errors::SceneError;
use crate::utils::utils_traits::LoadableFromConfigFile;

/// What a driver binary should do after reading its command line.
#[derive(Clone, Debug, PartialEq)]
pub enum DriverCommand {
    Run(SceneLoopConfig),
    ShowUsage
}

pub fn positional_usage(program: &str) -> String {
    format!("usage:   {} <media directory> <number of scenes> [dataset output directory]\n", program)
}

pub fn flagged_usage(program: &str) -> String {
    format!("usage:   {} [options]\n\
             options: -s <number of scenes to generate>\n\
             \x20        -n <index of the first scene>\n\
             \x20        -i <image output directory>\n\
             \x20        -d <dataset output directory>\n\
             \x20        -m <media directory>\n\
             \x20        -c <config file (.toml, .ron or .json)>\n\
             \x20        -D debug mode\n\
             \x20        -h print this message\n", program)
}

/// `<media_dir> <scenes> [dataset_dir]`, where `args` excludes the program name.
pub fn parse_positional(args: &[String]) -> Result<DriverCommand, SceneError> {
    if args.len() < 2 || args.len() > 3 {
        return Err(SceneError::new_invalid_arguments_error(&format!("Expected 2 or 3 arguments, got {}.", args.len()), file!(), line!()));
    }

    let mut config = SceneLoopConfig::default();
    config.media_dir = Some(PathBuf::from(&args[0]));
    config.num_scenes = parse_count(&args[1], "number of scenes")?;
    if let Some(dataset_dir) = args.get(2) {
        config.dataset_dir = PathBuf::from(dataset_dir);
    }
    Ok(DriverCommand::Run(config))
}

/// Flag style arguments.  A config file given with `-c` is loaded first and the other flags
/// override its values regardless of their order on the command line.
pub fn parse_flagged(args: &[String]) -> Result<DriverCommand, SceneError> {
    let mut overrides: Vec<(char, String)> = vec![];
    let mut config_path: Option<PathBuf> = None;
    let mut debug = false;

    let mut i = 0;
    while i < args.len() {
        let flag = match args[i].strip_prefix('-') {
            Some(f) if f.chars().count() == 1 => { f.chars().next().unwrap_or('?') }
            _ => { return Err(SceneError::new_invalid_arguments_error(&format!("Unexpected argument {:?}.", args[i]), file!(), line!())); }
        };
        match flag {
            'h' => { return Ok(DriverCommand::ShowUsage); }
            'D' => { debug = true; }
            's' | 'n' | 'i' | 'd' | 'm' | 'c' => {
                let value = match args.get(i + 1) {
                    None => { return Err(SceneError::new_invalid_arguments_error(&format!("Option -{} needs a value.", flag), file!(), line!())); }
                    Some(v) => { v.clone() }
                };
                if flag == 'c' {
                    config_path = Some(PathBuf::from(value));
                } else {
                    overrides.push((flag, value));
                }
                i += 1;
            }
            _ => { return Err(SceneError::new_invalid_arguments_error(&format!("Unknown option -{}.", flag), file!(), line!())); }
        }
        i += 1;
    }

    let mut config = match &config_path {
        None => { SceneLoopConfig::default() }
        Some(p) => { SceneLoopConfig::load_from_config_file(p)? }
    };
    for (flag, value) in overrides {
        match flag {
            's' => { config.num_scenes = parse_count(&value, "number of scenes")?; }
            'n' => { config.first_scene_idx = parse_count(&value, "index of the first scene")?; }
            'i' => { config.image_dir = PathBuf::from(value); }
            'd' => { config.dataset_dir = PathBuf::from(value); }
            'm' => { config.media_dir = Some(PathBuf::from(value)); }
            _ => { }
        }
    }
    if debug { config.debug = true; }

    Ok(DriverCommand::Run(config))
}

fn parse_count(s: &str, what: &str) -> Result<usize, SceneError> {
    return match s.parse::<usize>() {
        Ok(v) => { Ok(v) }
        Err(_) => { Err(SceneError::new_invalid_arguments_error(&format!("{:?} is not a valid {}.", s, what), file!(), line!())) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &[&str]) -> Vec<String> {
        s.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn positional_arguments() {
        match parse_positional(&args(&["media", "4", "out"])).unwrap() {
            DriverCommand::Run(c) => {
                assert_eq!(c.media_dir, Some(PathBuf::from("media")));
                assert_eq!(c.num_scenes, 4);
                assert_eq!(c.dataset_dir, PathBuf::from("out"));
            }
            c => { panic!("unexpected command {:?}", c); }
        }
        assert!(parse_positional(&args(&["media"])).is_err());
        assert!(parse_positional(&args(&["media", "many"])).is_err());
    }

    #[test]
    fn flagged_arguments() {
        match parse_flagged(&args(&["-s", "3", "-n", "12", "-i", "pics", "-D"])).unwrap() {
            DriverCommand::Run(c) => {
                assert_eq!(c.num_scenes, 3);
                assert_eq!(c.first_scene_idx, 12);
                assert_eq!(c.image_dir, PathBuf::from("pics"));
                assert_eq!(c.dataset_dir, PathBuf::from("dataset"));
                assert!(c.debug);
            }
            c => { panic!("unexpected command {:?}", c); }
        }
        assert_eq!(parse_flagged(&args(&["-s", "3", "-h"])).unwrap(), DriverCommand::ShowUsage);
        assert!(parse_flagged(&args(&["-x"])).is_err());
        assert!(parse_flagged(&args(&["-s"])).is_err());
        assert!(parse_flagged(&args(&["scenes"])).is_err());
        assert!(flagged_usage("scene_example").contains("-n <index of the first scene>"));
    }
}
