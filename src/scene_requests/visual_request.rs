use serde::{Serialize, Deserialize};

/// Requests accepted by the visual coordinator, which owns the appearance of spawned models.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum VisualRequest {
    /// Gives each named visual a fresh random material.  There is no answer.
    RandomizeMaterial { visuals: Vec<String> }
}
impl VisualRequest {
    pub fn kind_str(&self) -> &'static str {
        return match self {
            VisualRequest::RandomizeMaterial { .. } => { "RandomizeMaterial" }
        }
    }
}
