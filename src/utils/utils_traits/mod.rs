use std::path::Path;
use serde::de::DeserializeOwned;
use serde::Serialize;
use crate::utils::utils_errors::SceneError;
use crate::utils::utils_files::FileUtils;

pub trait ToAndFromRonString: Serialize + DeserializeOwned {
    fn convert_to_ron_string(&self) -> Result<String, SceneError> {
        return match ron::to_string(self) {
            Ok(s) => { Ok(s) }
            Err(e) => { Err(SceneError::new_serialization_failure_error(&e.to_string(), file!(), line!())) }
        }
    }
    fn load_from_ron_string(ron_string: &str) -> Result<Self, SceneError> where Self: Sized {
        let load: Result<Self, _> = ron::from_str(ron_string);
        return match load {
            Ok(load) => { Ok(load) }
            Err(e) => {
                Err(SceneError::new_serialization_failure_error(&format!("Could not load ron string into correct type: {}", e), file!(), line!()))
            }
        }
    }
}
impl <T> ToAndFromRonString for T where T: Serialize + DeserializeOwned {  }

pub trait ToAndFromTomlString: Serialize + DeserializeOwned {
    fn convert_to_toml_string(&self) -> Result<String, SceneError> {
        return match toml::to_string(self) {
            Ok(s) => { Ok(s) }
            Err(e) => { Err(SceneError::new_serialization_failure_error(&e.to_string(), file!(), line!())) }
        }
    }
    fn load_from_toml_string(toml_string: &str) -> Result<Self, SceneError> where Self: Sized {
        let load: Result<Self, _> = toml::from_str(toml_string);
        return match load {
            Ok(load) => { Ok(load) }
            Err(e) => {
                Err(SceneError::new_serialization_failure_error(&format!("Could not load toml string into correct type: {}", e), file!(), line!()))
            }
        }
    }
}
impl <T> ToAndFromTomlString for T where T: Serialize + DeserializeOwned {  }

/// Loads a serde type from a `.toml`, `.ron` or `.json` file, picking the format from the
/// extension.
pub trait LoadableFromConfigFile: ToAndFromRonString + ToAndFromTomlString {
    fn load_from_config_file(path: &Path) -> Result<Self, SceneError> where Self: Sized {
        let contents = FileUtils::read_file_contents_to_string(path)?;
        let extension = FileUtils::get_file_extension_string(path).unwrap_or_default().to_lowercase();
        return match extension.as_str() {
            "toml" => { Self::load_from_toml_string(&contents) }
            "ron" => { Self::load_from_ron_string(&contents) }
            "json" => { FileUtils::load_object_from_json_string(&contents) }
            _ => {
                Err(SceneError::new_invalid_arguments_error(&format!("Unsupported config file extension {:?} (expected toml, ron or json).", extension), file!(), line!()))
            }
        }
    }
}
impl <T> LoadableFromConfigFile for T where T: Serialize + DeserializeOwned { }
