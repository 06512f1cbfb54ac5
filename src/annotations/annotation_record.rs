use serde::{Serialize, Deserialize};
use crate::bounding_boxes::bounding_box_projector::BoundingRect2D;
use crate::coordinators::coordinator_responses::CameraInfo;
use crate::scene_layout::primitive_object::PrimitiveObject;
use crate::utils::utils_errors::SceneError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationSource {
    pub database: String,
    pub annotation: String,
    pub image: String
}
impl Default for AnnotationSource {
    fn default() -> Self {
        Self {
            database: "Synthetic primitives".to_string(),
            annotation: "PASCAL VOC".to_string(),
            image: "simulation".to_string()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
    pub depth: u32
}

/// Pixel box in corner form, `xmax = x + width` and `ymax = y + height`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelBox {
    pub xmin: i64,
    pub ymin: i64,
    pub xmax: i64,
    pub ymax: i64
}
impl PixelBox {
    pub fn new_from_rect(rect: &BoundingRect2D) -> Self {
        Self { xmin: rect.x(), ymin: rect.y(), xmax: rect.x_max(), ymax: rect.y_max() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectAnnotation {
    pub name: String,
    pub pose: String,
    pub truncated: bool,
    pub difficult: bool,
    pub bndbox: PixelBox
}

/// Everything written for one captured scene.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneAnnotation {
    pub folder: String,
    pub filename: String,
    pub source: AnnotationSource,
    pub size: ImageSize,
    pub segmented: bool,
    pub objects: Vec<ObjectAnnotation>
}
impl SceneAnnotation {
    /// Every object must already carry its 2D rectangle.
    pub fn new_from_scene(folder: &str, filename: &str, camera_info: &CameraInfo, objects: &[PrimitiveObject]) -> Result<Self, SceneError> {
        let mut annotations = vec![];
        for object in objects {
            let rect = match object.bounding_box_2d() {
                None => {
                    return Err(SceneError::new_generic_error_str(&format!("Object {:?} has no 2D bounding box to annotate.", object.name()), file!(), line!()));
                }
                Some(rect) => { rect }
            };
            annotations.push(ObjectAnnotation {
                name: object.primitive_type().class_label().to_string(),
                pose: "Unspecified".to_string(),
                truncated: rect.exceeds_image(camera_info.width, camera_info.height),
                difficult: false,
                bndbox: PixelBox::new_from_rect(rect)
            });
        }

        Ok(Self {
            folder: folder.to_string(),
            filename: filename.to_string(),
            source: AnnotationSource::default(),
            size: ImageSize { width: camera_info.width, height: camera_info.height, depth: camera_info.depth },
            segmented: false,
            objects: annotations
        })
    }
    /// `(class label, box)` pairs in file order.
    pub fn object_boxes(&self) -> Vec<(String, PixelBox)> {
        self.objects.iter().map(|o| (o.name.clone(), o.bndbox)).collect()
    }
    pub fn to_voc_string(&self) -> String {
        let mut out = String::new();
        out += "<annotation>\n";
        out += &format!("\t<folder>{}</folder>\n", escape_text(&self.folder));
        out += &format!("\t<filename>{}</filename>\n", escape_text(&self.filename));
        out += "\t<source>\n";
        out += &format!("\t\t<database>{}</database>\n", escape_text(&self.source.database));
        out += &format!("\t\t<annotation>{}</annotation>\n", escape_text(&self.source.annotation));
        out += &format!("\t\t<image>{}</image>\n", escape_text(&self.source.image));
        out += "\t</source>\n";
        out += "\t<size>\n";
        out += &format!("\t\t<width>{}</width>\n", self.size.width);
        out += &format!("\t\t<height>{}</height>\n", self.size.height);
        out += &format!("\t\t<depth>{}</depth>\n", self.size.depth);
        out += "\t</size>\n";
        out += &format!("\t<segmented>{}</segmented>\n", self.segmented as u8);
        for o in &self.objects {
            out += "\t<object>\n";
            out += &format!("\t\t<name>{}</name>\n", escape_text(&o.name));
            out += &format!("\t\t<pose>{}</pose>\n", escape_text(&o.pose));
            out += &format!("\t\t<truncated>{}</truncated>\n", o.truncated as u8);
            out += &format!("\t\t<difficult>{}</difficult>\n", o.difficult as u8);
            out += "\t\t<bndbox>\n";
            out += &format!("\t\t\t<xmin>{}</xmin>\n", o.bndbox.xmin);
            out += &format!("\t\t\t<ymin>{}</ymin>\n", o.bndbox.ymin);
            out += &format!("\t\t\t<xmax>{}</xmax>\n", o.bndbox.xmax);
            out += &format!("\t\t\t<ymax>{}</ymax>\n", o.bndbox.ymax);
            out += "\t\t</bndbox>\n";
            out += "\t</object>\n";
        }
        out += "</annotation>\n";
        out
    }
    /// Reads back what `to_voc_string` writes.  Only the tags written above are understood.
    pub fn parse_voc_string(s: &str) -> Result<Self, SceneError> {
        let start = s.find("<annotation>");
        let end = s.rfind("</annotation>");
        let body = match (start, end) {
            (Some(start), Some(end)) if start + "<annotation>".len() <= end => { &s[start + "<annotation>".len()..end] }
            _ => { return Err(SceneError::new_serialization_failure_error("Missing <annotation> root element.", file!(), line!())); }
        };

        let source_block = extract_tag(body, "source")?;
        let size_block = extract_tag(body, "size")?;
        let mut objects = vec![];
        for object_block in extract_all_tags(body, "object") {
            let bndbox = extract_tag(object_block, "bndbox")?;
            objects.push(ObjectAnnotation {
                name: unescape_text(extract_tag(object_block, "name")?),
                pose: unescape_text(extract_tag(object_block, "pose")?),
                truncated: parse_number::<u8>(object_block, "truncated")? != 0,
                difficult: parse_number::<u8>(object_block, "difficult")? != 0,
                bndbox: PixelBox {
                    xmin: parse_number(bndbox, "xmin")?,
                    ymin: parse_number(bndbox, "ymin")?,
                    xmax: parse_number(bndbox, "xmax")?,
                    ymax: parse_number(bndbox, "ymax")?
                }
            });
        }

        Ok(Self {
            folder: unescape_text(extract_tag(body, "folder")?),
            filename: unescape_text(extract_tag(body, "filename")?),
            source: AnnotationSource {
                database: unescape_text(extract_tag(source_block, "database")?),
                annotation: unescape_text(extract_tag(source_block, "annotation")?),
                image: unescape_text(extract_tag(source_block, "image")?)
            },
            size: ImageSize {
                width: parse_number(size_block, "width")?,
                height: parse_number(size_block, "height")?,
                depth: parse_number(size_block, "depth")?
            },
            segmented: parse_number::<u8>(body, "segmented")? != 0,
            objects
        })
    }
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn unescape_text(s: &str) -> String {
    s.replace("&lt;", "<").replace("&gt;", ">").replace("&amp;", "&")
}

/// Contents of the first `<tag>...</tag>` in `s`.
fn extract_tag<'a>(s: &'a str, tag: &str) -> Result<&'a str, SceneError> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let start = match s.find(&open) {
        None => { return Err(SceneError::new_serialization_failure_error(&format!("Missing <{}> element.", tag), file!(), line!())); }
        Some(i) => { i + open.len() }
    };
    return match s[start..].find(&close) {
        None => { Err(SceneError::new_serialization_failure_error(&format!("Unterminated <{}> element.", tag), file!(), line!())) }
        Some(len) => { Ok(s[start..start + len].trim()) }
    }
}

fn extract_all_tags<'a>(s: &'a str, tag: &str) -> Vec<&'a str> {
    let mut out_vec = vec![];
    let mut rest = s;
    while let Ok(inner) = extract_tag(rest, tag) {
        out_vec.push(inner);
        let close = format!("</{}>", tag);
        let consumed = match rest.find(&close) {
            None => { break; }
            Some(i) => { i + close.len() }
        };
        rest = &rest[consumed..];
    }
    out_vec
}

fn parse_number<T: std::str::FromStr>(s: &str, tag: &str) -> Result<T, SceneError> {
    let text = extract_tag(s, tag)?;
    return match text.parse::<T>() {
        Ok(v) => { Ok(v) }
        Err(_) => { Err(SceneError::new_serialization_failure_error(&format!("Element <{}> holds {:?}, which is not a number.", tag, text), file!(), line!())) }
    }
}
