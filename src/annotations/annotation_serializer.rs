use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};
use strum_macros::{Display, EnumIter};
use crate::annotations::annotation_record::SceneAnnotation;
use crate::utils::utils_errors::SceneError;
use crate::utils::utils_files::FileUtils;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, EnumIter, Display)]
pub enum AnnotationFormat {
    PascalVoc,
    Json
}
impl AnnotationFormat {
    pub fn file_extension(&self) -> &'static str {
        return match self {
            AnnotationFormat::PascalVoc => { "xml" }
            AnnotationFormat::Json => { "json" }
        }
    }
}
impl Default for AnnotationFormat {
    fn default() -> Self { AnnotationFormat::PascalVoc }
}

/// Writes one annotation file per scene into the dataset directory.
#[derive(Clone, Debug)]
pub struct AnnotationSerializer {
    dataset_dir: PathBuf,
    format: AnnotationFormat
}
impl AnnotationSerializer {
    pub fn new(dataset_dir: &Path, format: AnnotationFormat) -> Self {
        Self {
            dataset_dir: dataset_dir.to_path_buf(),
            format
        }
    }
    pub fn format(&self) -> AnnotationFormat {
        self.format
    }
    /// `<dataset_dir>/<stem>.<xml|json>`
    pub fn annotation_path(&self, stem: &str) -> PathBuf {
        self.dataset_dir.join(format!("{}.{}", stem, self.format.file_extension()))
    }
    /// Truncates any previous file of the same name.  The file is flushed and closed on return.
    pub fn write_scene(&self, stem: &str, annotation: &SceneAnnotation) -> Result<PathBuf, SceneError> {
        let path = self.annotation_path(stem);
        match self.format {
            AnnotationFormat::PascalVoc => { FileUtils::write_string_to_file(&annotation.to_voc_string(), &path)?; }
            AnnotationFormat::Json => { FileUtils::save_object_to_file_as_json(annotation, &path)?; }
        }
        Ok(path)
    }
    pub fn read_scene(&self, stem: &str) -> Result<SceneAnnotation, SceneError> {
        let path = self.annotation_path(stem);
        return match self.format {
            AnnotationFormat::PascalVoc => { SceneAnnotation::parse_voc_string(&FileUtils::read_file_contents_to_string(&path)?) }
            AnnotationFormat::Json => { FileUtils::load_object_from_json_file(&path) }
        }
    }
}
