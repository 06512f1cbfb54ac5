use std::path::{Path, PathBuf};
use rand::Rng;
use serde::{Serialize, Deserialize};
use crate::utils::utils_errors::SceneError;
use crate::utils::utils_files::FileUtils;
use crate::utils::utils_sampling::SimpleSamplers;

/// Material reference attached to a spawned model.  Mirrors how material scripts are laid out
/// under a media directory: `materials/scripts/<name>.material` plus the shared
/// `materials/textures/` folder, addressed as `Plugin/<name>`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureReference {
    texture: String,
    script_uri: String,
    textures_uri: String,
    material_name: String
}
impl TextureReference {
    pub fn new(texture: &str) -> Self {
        Self {
            texture: texture.to_string(),
            script_uri: format!("file://materials/scripts/{}.material", texture),
            textures_uri: "file://materials/textures/".to_string(),
            material_name: format!("Plugin/{}", texture)
        }
    }
    pub fn texture(&self) -> &str {
        &self.texture
    }
    pub fn script_uri(&self) -> &str {
        &self.script_uri
    }
    pub fn textures_uri(&self) -> &str {
        &self.textures_uri
    }
    pub fn material_name(&self) -> &str {
        &self.material_name
    }
    /// The `<script>` element that replaces a model's material script.
    pub fn to_sdf_script_string(&self) -> String {
        format!("<script><uri>{}</uri><uri>{}</uri><name>{}</name></script>", self.script_uri, self.textures_uri, self.material_name)
    }
}

/// The set of material names usable for randomized appearance.  Read-only once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextureCatalog {
    textures: Vec<String>
}
impl TextureCatalog {
    pub fn new(textures: Vec<String>) -> Self {
        Self { textures }
    }
    /// One texture per file in `scripts_dir`, named after the file without its extension.
    pub fn new_from_scripts_directory(scripts_dir: &Path) -> Result<Self, SceneError> {
        let files = FileUtils::get_all_files_in_directory(scripts_dir)?;
        let textures: Vec<String> = files.iter().filter_map(|f| FileUtils::get_file_stem_string(f)).collect();
        if textures.is_empty() {
            return Err(SceneError::new_generic_error_str(&format!("No material scripts were found in {:?}.", scripts_dir), file!(), line!()));
        }
        Ok(Self::new(textures))
    }
    /// Looks in `<media_dir>/materials/scripts`.
    pub fn new_from_media_directory(media_dir: &Path) -> Result<Self, SceneError> {
        Self::new_from_scripts_directory(&Self::scripts_directory(media_dir))
    }
    pub fn scripts_directory(media_dir: &Path) -> PathBuf {
        media_dir.join("materials").join("scripts")
    }
    pub fn textures(&self) -> &Vec<String> {
        &self.textures
    }
    pub fn len(&self) -> usize {
        self.textures.len()
    }
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
    /// Uniform draw with replacement.
    pub fn sample_texture_reference<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<TextureReference, SceneError> {
        let idx = SimpleSamplers::uniform_index(self.textures.len(), rng)?;
        Ok(TextureReference::new(&self.textures[idx]))
    }
}
