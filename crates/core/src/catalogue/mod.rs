use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CoachError, Result};

/// How an exercise is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseKind {
    /// Counted in repetitions.
    Reps,
    /// Isometric, measured in seconds held with good form.
    Hold,
}

/// Camera orientation the exercise is best filmed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Static catalogue entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub kind: ExerciseKind,
    /// Rep count or hold seconds needed to complete the exercise.
    pub target: u32,
    pub orientation: Orientation,
}

impl Exercise {
    pub fn reps(name: impl Into<String>, target: u32, orientation: Orientation) -> Self {
        Self {
            name: name.into(),
            kind: ExerciseKind::Reps,
            target,
            orientation,
        }
    }

    pub fn hold(name: impl Into<String>, seconds: u32, orientation: Orientation) -> Self {
        Self {
            name: name.into(),
            kind: ExerciseKind::Hold,
            target: seconds,
            orientation,
        }
    }

    /// Whether `achieved` reps or seconds satisfy the target.
    pub fn is_met_by(&self, achieved: f64) -> bool {
        achieved >= f64::from(self.target)
    }
}

/// Record of a finished (or skipped) exercise. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedExercise {
    pub name: String,
    pub kind: ExerciseKind,
    /// Reps counted or seconds held when the exercise ended.
    pub achieved: f64,
}

/// The set of exercises a plan can be built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalogue {
    exercises: Vec<Exercise>,
}

impl Catalogue {
    /// Builds a catalogue, rejecting duplicate names.
    pub fn new(exercises: Vec<Exercise>) -> Result<Self> {
        for (index, exercise) in exercises.iter().enumerate() {
            if exercises[..index].iter().any(|e| e.name == exercise.name) {
                return Err(CoachError::msg(format!(
                    "duplicate exercise `{}` in catalogue",
                    exercise.name
                )));
            }
        }
        Ok(Self { exercises })
    }

    /// The exercises the coach ships with.
    pub fn standard() -> Self {
        Self {
            exercises: vec![
                Exercise::reps("Squats", 12, Orientation::Portrait),
                Exercise::reps("Push-ups", 10, Orientation::Landscape),
                Exercise::reps("Bicep Curls", 12, Orientation::Portrait),
                Exercise::reps("Jumping Jacks", 20, Orientation::Portrait),
                Exercise::reps("Lunges", 12, Orientation::Portrait),
                Exercise::hold("Plank", 30, Orientation::Landscape),
            ],
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let exercises: Vec<Exercise> = serde_json::from_str(json)?;
        Self::new(exercises)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn get(&self, name: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|exercise| exercise.name == name)
    }

    /// Resolves an ordered plan from exercise names.
    pub fn plan<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Exercise>> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref().trim();
                self.get(name)
                    .cloned()
                    .ok_or_else(|| CoachError::UnknownExercise(name.to_string()))
            })
            .collect()
    }
}

impl Default for Catalogue {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalogue_has_one_hold() {
        let catalogue = Catalogue::standard();
        assert_eq!(catalogue.exercises().len(), 6);

        let holds: Vec<_> = catalogue
            .exercises()
            .iter()
            .filter(|e| e.kind == ExerciseKind::Hold)
            .collect();
        assert_eq!(holds.len(), 1);
        assert_eq!(holds[0].name, "Plank");
        assert_eq!(holds[0].target, 30);
    }

    #[test]
    fn builds_plan_in_requested_order() {
        let plan = Catalogue::standard().plan(&["Plank", " Squats "]).unwrap();
        let names: Vec<_> = plan.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Plank", "Squats"]);
    }

    #[test]
    fn unknown_plan_entry_is_an_error() {
        let err = Catalogue::standard().plan(&["Burpees"]).unwrap_err();
        assert!(matches!(err, CoachError::UnknownExercise(ref name) if name == "Burpees"));
    }

    #[test]
    fn loads_custom_catalogue_from_json() {
        let catalogue = Catalogue::from_json_str(
            r#"[{ "name": "Wall Sit", "kind": "hold", "target": 45, "orientation": "landscape" }]"#,
        )
        .unwrap();
        let wall_sit = catalogue.get("Wall Sit").unwrap();
        assert_eq!(wall_sit.kind, ExerciseKind::Hold);
        assert_eq!(wall_sit.target, 45);
    }

    #[test]
    fn rejects_duplicate_names() {
        let result = Catalogue::new(vec![
            Exercise::reps("Squats", 10, Orientation::Portrait),
            Exercise::reps("Squats", 12, Orientation::Portrait),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn target_is_inclusive() {
        let squats = Exercise::reps("Squats", 12, Orientation::Portrait);
        assert!(!squats.is_met_by(11.0));
        assert!(squats.is_met_by(12.0));
    }
}
