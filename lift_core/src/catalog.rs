//! Exercise catalog and the query contract used by plan generation.
//!
//! This module provides the built-in exercise dataset, a JSON loader for
//! replacement catalogs, and the filtered/paginated search that the split
//! planner consumes.

use crate::{Equipment, Error, ExerciseRef, MuscleGroup, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use std::path::Path;

static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// The built-in catalog, built on first use and shared afterwards
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

// ============================================================================
// Query Contract
// ============================================================================

/// Filters and pagination for a catalog search.
///
/// Filter categories combine with AND; entries within one category combine
/// with OR. A `None` or empty list disables that filter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExerciseQuery {
    pub target_muscles: Option<Vec<MuscleGroup>>,
    pub equipments: Option<Vec<Equipment>>,
    pub exclude_equipments: Option<Vec<Equipment>>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl ExerciseQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target_muscle(mut self, muscle: MuscleGroup) -> Self {
        self.target_muscles.get_or_insert_with(Vec::new).push(muscle);
        self
    }

    pub fn equipments(mut self, equipments: &[Equipment]) -> Self {
        self.equipments = Some(equipments.to_vec());
        self
    }

    pub fn exclude_equipments(mut self, equipments: &[Equipment]) -> Self {
        self.exclude_equipments = Some(equipments.to_vec());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Check the inclusion and exclusion filters against one exercise
    pub fn matches(&self, exercise: &ExerciseRef) -> bool {
        let muscle_ok = match self.target_muscles.as_deref() {
            Some(muscles) if !muscles.is_empty() => {
                muscles.iter().any(|m| exercise.target_muscles.contains(m))
            }
            _ => true,
        };

        let equipment_ok = match self.equipments.as_deref() {
            Some(equipments) if !equipments.is_empty() => {
                equipments.iter().any(|e| exercise.equipment.contains(e))
            }
            _ => true,
        };

        if !(muscle_ok && equipment_ok) {
            return false;
        }

        match self.exclude_equipments.as_deref() {
            Some(excluded) => !exercise.equipment.iter().any(|e| excluded.contains(e)),
            None => true,
        }
    }
}

/// One page of search results
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExerciseSearch {
    pub exercises: Vec<ExerciseRef>,
    /// Number of matches before pagination
    pub total: usize,
    pub has_more: bool,
}

/// Source of exercises for plan generation.
///
/// Implementations must return results in a stable order: the same query
/// always yields the same exercises in the same sequence. Plan generation is
/// deterministic only as long as this holds, so a database-backed catalog
/// needs an explicit sort key rather than insertion or hash order.
pub trait ExerciseCatalogQuery {
    fn search(&self, query: &ExerciseQuery) -> Result<ExerciseSearch>;
}

// ============================================================================
// Catalog
// ============================================================================

/// An ordered collection of exercises. Order is the search order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub exercises: Vec<ExerciseRef>,
}

impl Catalog {
    pub fn from_exercises(exercises: Vec<ExerciseRef>) -> Self {
        Self { exercises }
    }

    /// Load a catalog from a JSON file of the form `{"exercises": [...]}`
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let catalog: Catalog = serde_json::from_str(&contents)?;
        tracing::info!(
            "Loaded catalog with {} exercises from {:?}",
            catalog.exercises.len(),
            path
        );
        Ok(catalog)
    }

    /// Load the catalog at `path`, or borrow the built-in one when no path is given.
    ///
    /// Fails if the catalog does not validate.
    pub fn load_or_default(path: Option<&Path>) -> Result<Cow<'static, Catalog>> {
        let catalog = match path {
            Some(path) => Cow::Owned(Self::load_from(path)?),
            None => Cow::Borrowed(get_default_catalog()),
        };

        let errors = catalog.validate();
        if !errors.is_empty() {
            return Err(Error::CatalogValidation(errors.join("; ")));
        }
        Ok(catalog)
    }

    pub fn get(&self, id: &str) -> Option<&ExerciseRef> {
        self.exercises.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Validate the catalog for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for exercise in &self.exercises {
            if exercise.id.is_empty() {
                errors.push(format!("Exercise '{}' has empty ID", exercise.name));
            } else if !seen.insert(exercise.id.as_str()) {
                errors.push(format!("Duplicate exercise ID '{}'", exercise.id));
            }
            if exercise.name.is_empty() {
                errors.push(format!("Exercise '{}' has empty name", exercise.id));
            }
            if exercise.target_muscles.is_empty() {
                errors.push(format!("Exercise '{}' targets no muscles", exercise.id));
            }
            if exercise.equipment.is_empty() {
                errors.push(format!("Exercise '{}' lists no equipment", exercise.id));
            }
        }

        errors
    }

    /// Muscle groups that no exercise in the catalog targets
    pub fn uncovered_muscles(&self) -> Vec<MuscleGroup> {
        MuscleGroup::ALL
            .iter()
            .copied()
            .filter(|m| !self.exercises.iter().any(|e| e.targets(*m)))
            .collect()
    }
}

impl ExerciseCatalogQuery for Catalog {
    fn search(&self, query: &ExerciseQuery) -> Result<ExerciseSearch> {
        let matching: Vec<&ExerciseRef> =
            self.exercises.iter().filter(|e| query.matches(e)).collect();

        let total = matching.len();
        let offset = query.offset.unwrap_or(0).min(total);
        let limit = query.limit.unwrap_or(total);

        let exercises: Vec<ExerciseRef> = matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        let has_more = offset + exercises.len() < total;

        Ok(ExerciseSearch {
            exercises,
            total,
            has_more,
        })
    }
}

// ============================================================================
// Built-in Dataset
// ============================================================================

fn exercise(
    id: &str,
    name: &str,
    muscles: &[MuscleGroup],
    equipment: &[Equipment],
) -> ExerciseRef {
    ExerciseRef {
        id: id.into(),
        name: name.into(),
        target_muscles: muscles.to_vec(),
        equipment: equipment.to_vec(),
    }
}

/// Build the built-in catalog from scratch
///
/// Prefer [`get_default_catalog`], which builds it once.
pub fn build_default_catalog() -> Catalog {
    use Equipment::*;
    use MuscleGroup::*;

    let exercises = vec![
        // Chest
        exercise(
            "barbell_bench_press",
            "Barbell Bench Press",
            &[Pectorals, Triceps, Delts],
            &[Barbell],
        ),
        exercise(
            "dumbbell_bench_press",
            "Dumbbell Bench Press",
            &[Pectorals, Triceps],
            &[Dumbbell],
        ),
        exercise("push_up", "Push-up", &[Pectorals, Triceps, Abs], &[BodyWeight]),
        exercise(
            "incline_dumbbell_press",
            "Incline Dumbbell Press",
            &[Pectorals, Delts],
            &[Dumbbell],
        ),
        exercise("cable_fly", "Cable Fly", &[Pectorals], &[Cable]),
        exercise("dip", "Parallel Bar Dip", &[Triceps, Pectorals], &[BodyWeight]),
        // Shoulders
        exercise("overhead_press", "Overhead Press", &[Delts, Triceps], &[Barbell]),
        exercise(
            "dumbbell_shoulder_press",
            "Dumbbell Shoulder Press",
            &[Delts, Triceps],
            &[Dumbbell],
        ),
        exercise("lateral_raise", "Dumbbell Lateral Raise", &[Delts], &[Dumbbell]),
        exercise("band_pull_apart", "Band Pull Apart", &[Delts, UpperBack], &[Band]),
        exercise("pike_push_up", "Pike Push-up", &[Delts, Triceps], &[BodyWeight]),
        // Arms
        exercise(
            "close_grip_bench_press",
            "Close-Grip Bench Press",
            &[Triceps, Pectorals],
            &[Barbell],
        ),
        exercise("triceps_pushdown", "Triceps Pushdown", &[Triceps], &[Cable]),
        exercise("skull_crusher", "Skull Crusher", &[Triceps], &[EzBar]),
        exercise("barbell_curl", "Barbell Curl", &[Biceps, Forearms], &[Barbell]),
        exercise("dumbbell_curl", "Dumbbell Curl", &[Biceps], &[Dumbbell]),
        exercise("hammer_curl", "Hammer Curl", &[Biceps, Forearms], &[Dumbbell]),
        exercise("chin_up", "Chin-up", &[Biceps, Lats], &[BodyWeight]),
        exercise("wrist_curl", "Dumbbell Wrist Curl", &[Forearms], &[Dumbbell]),
        // Back
        exercise("pull_up", "Pull-up", &[Lats, Biceps, UpperBack], &[BodyWeight]),
        exercise("lat_pulldown", "Lat Pulldown", &[Lats, Biceps], &[Cable]),
        exercise("straight_arm_pulldown", "Straight-Arm Pulldown", &[Lats], &[Cable]),
        exercise("barbell_row", "Barbell Row", &[UpperBack, Lats, Biceps], &[Barbell]),
        exercise("dumbbell_row", "One-Arm Dumbbell Row", &[UpperBack, Lats], &[Dumbbell]),
        exercise("seated_cable_row", "Seated Cable Row", &[UpperBack, Lats], &[Cable]),
        exercise("face_pull", "Face Pull", &[UpperBack, Delts], &[Cable]),
        exercise("inverted_row", "Inverted Row", &[UpperBack, Biceps], &[BodyWeight]),
        exercise("barbell_shrug", "Barbell Shrug", &[Traps], &[Barbell]),
        exercise("dumbbell_shrug", "Dumbbell Shrug", &[Traps], &[Dumbbell]),
        exercise("farmers_walk", "Farmer's Walk", &[Traps, Forearms], &[Dumbbell, Kettlebell]),
        // Core
        exercise("plank", "Plank", &[Abs], &[BodyWeight]),
        exercise("hanging_leg_raise", "Hanging Leg Raise", &[Abs], &[BodyWeight]),
        exercise("cable_crunch", "Cable Crunch", &[Abs], &[Cable]),
        // Legs
        exercise(
            "barbell_back_squat",
            "Barbell Back Squat",
            &[Quads, Glutes, Hamstrings],
            &[Barbell],
        ),
        exercise("goblet_squat", "Goblet Squat", &[Quads, Glutes], &[Kettlebell, Dumbbell]),
        exercise("leg_press", "Leg Press", &[Quads, Glutes], &[Machine]),
        exercise("bulgarian_split_squat", "Bulgarian Split Squat", &[Quads, Glutes], &[Dumbbell]),
        exercise("bodyweight_squat", "Bodyweight Squat", &[Quads, Glutes], &[BodyWeight]),
        exercise("leg_extension", "Leg Extension", &[Quads], &[Machine]),
        exercise("romanian_deadlift", "Romanian Deadlift", &[Hamstrings, Glutes], &[Barbell]),
        exercise("lying_leg_curl", "Lying Leg Curl", &[Hamstrings], &[Machine]),
        exercise("kettlebell_swing", "Kettlebell Swing", &[Hamstrings, Glutes], &[Kettlebell]),
        exercise("nordic_curl", "Nordic Hamstring Curl", &[Hamstrings], &[BodyWeight]),
        exercise(
            "dumbbell_romanian_deadlift",
            "Dumbbell Romanian Deadlift",
            &[Hamstrings, Glutes],
            &[Dumbbell],
        ),
        exercise("hip_thrust", "Barbell Hip Thrust", &[Glutes, Hamstrings], &[Barbell]),
        exercise("glute_bridge", "Glute Bridge", &[Glutes, Hamstrings], &[BodyWeight]),
        exercise("walking_lunge", "Dumbbell Walking Lunge", &[Glutes, Quads], &[Dumbbell]),
        exercise("cable_pull_through", "Cable Pull-Through", &[Glutes, Hamstrings], &[Cable]),
        exercise("standing_calf_raise", "Standing Calf Raise", &[Calves], &[Machine]),
        exercise("bodyweight_calf_raise", "Single-Leg Calf Raise", &[Calves], &[BodyWeight]),
        exercise("seated_calf_raise", "Seated Calf Raise", &[Calves], &[Machine]),
        exercise("dumbbell_calf_raise", "Dumbbell Calf Raise", &[Calves], &[Dumbbell]),
        exercise("copenhagen_plank", "Copenhagen Plank", &[Adductors, Abs], &[BodyWeight]),
        exercise("cable_hip_adduction", "Cable Hip Adduction", &[Adductors], &[Cable]),
        exercise(
            "sumo_deadlift",
            "Sumo Deadlift",
            &[Adductors, Glutes, Hamstrings, Quads],
            &[Barbell],
        ),
    ];

    Catalog { exercises }
}
