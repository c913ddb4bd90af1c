//! Exercise catalog
//!
//! Read-only lookup over the static exercise data that ships with the app.
//! Loaded once from JSON and never mutated at runtime, so no invalidation
//! logic exists.

use crate::error::EngineError;
use crate::types::FocusArea;
use serde::{Deserialize, Serialize};

/// One catalog exercise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub focus_areas: Vec<FocusArea>,
    pub duration_seconds: u32,
    #[serde(default)]
    pub description: String,
}

/// Immutable, load-once exercise lookup
#[derive(Debug, Clone, Default)]
pub struct ExerciseCatalog {
    exercises: Vec<Exercise>,
}

impl ExerciseCatalog {
    /// Parse a catalog from its JSON array form
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let exercises: Vec<Exercise> = serde_json::from_str(json)?;
        for exercise in &exercises {
            if exercise.id.is_empty() {
                return Err(EngineError::CatalogError(
                    "exercise with empty id".to_string(),
                ));
            }
        }
        Ok(Self { exercises })
    }

    pub fn get(&self, id: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == id)
    }

    /// All exercises touching the given focus area, catalog order
    pub fn for_focus_area(&self, area: FocusArea) -> Vec<&Exercise> {
        self.exercises
            .iter()
            .filter(|e| e.focus_areas.contains(&area))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"[
            {
                "id": "chin_tuck",
                "name": "Chin Tucks",
                "focus_areas": ["neck"],
                "duration_seconds": 60,
                "description": "Draw the chin straight back, hold, release."
            },
            {
                "id": "hip_flexor_stretch",
                "name": "Kneeling Hip Flexor Stretch",
                "focus_areas": ["hips", "lower_back"],
                "duration_seconds": 90
            }
        ]"#
    }

    #[test]
    fn test_load_and_lookup() {
        let catalog = ExerciseCatalog::from_json(sample_json()).unwrap();
        assert_eq!(catalog.len(), 2);

        let exercise = catalog.get("chin_tuck").unwrap();
        assert_eq!(exercise.name, "Chin Tucks");
        assert_eq!(exercise.focus_areas, vec![FocusArea::Neck]);
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn test_focus_area_filter() {
        let catalog = ExerciseCatalog::from_json(sample_json()).unwrap();
        let hips = catalog.for_focus_area(FocusArea::Hips);
        assert_eq!(hips.len(), 1);
        assert_eq!(hips[0].id, "hip_flexor_stretch");

        assert!(catalog.for_focus_area(FocusArea::Wrists).is_empty());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(ExerciseCatalog::from_json("{ nope").is_err());
        assert!(ExerciseCatalog::from_json(r#"[{"id": "", "name": "x", "duration_seconds": 5}]"#).is_err());
    }
}
