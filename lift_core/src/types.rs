//! Core domain types for the Lift system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Catalog taxonomy (muscle groups, equipment, exercises)
//! - Experience levels and split archetypes
//! - Generated workout plans
//! - Routine days and completion records used for scheduling

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Catalog Taxonomy
// ============================================================================

/// Muscle group targeted by an exercise
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Pectorals,
    Delts,
    Triceps,
    Biceps,
    Forearms,
    Lats,
    UpperBack,
    Traps,
    Abs,
    Quads,
    Hamstrings,
    Glutes,
    Calves,
    Adductors,
}

impl MuscleGroup {
    pub const ALL: [MuscleGroup; 14] = [
        MuscleGroup::Pectorals,
        MuscleGroup::Delts,
        MuscleGroup::Triceps,
        MuscleGroup::Biceps,
        MuscleGroup::Forearms,
        MuscleGroup::Lats,
        MuscleGroup::UpperBack,
        MuscleGroup::Traps,
        MuscleGroup::Abs,
        MuscleGroup::Quads,
        MuscleGroup::Hamstrings,
        MuscleGroup::Glutes,
        MuscleGroup::Calves,
        MuscleGroup::Adductors,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pectorals => "pectorals",
            Self::Delts => "delts",
            Self::Triceps => "triceps",
            Self::Biceps => "biceps",
            Self::Forearms => "forearms",
            Self::Lats => "lats",
            Self::UpperBack => "upper_back",
            Self::Traps => "traps",
            Self::Abs => "abs",
            Self::Quads => "quads",
            Self::Hamstrings => "hamstrings",
            Self::Glutes => "glutes",
            Self::Calves => "calves",
            Self::Adductors => "adductors",
        }
    }
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MuscleGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "chest" => return Ok(Self::Pectorals),
            "shoulders" => return Ok(Self::Delts),
            "back" => return Ok(Self::Lats),
            _ => {}
        }
        Self::ALL
            .iter()
            .find(|m| m.as_str() == normalized)
            .copied()
            .ok_or_else(|| format!("Unknown muscle group: {}", s))
    }
}

/// Equipment an exercise requires
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    BodyWeight,
    Barbell,
    Dumbbell,
    Kettlebell,
    Cable,
    Machine,
    Band,
    EzBar,
}

impl Equipment {
    pub const ALL: [Equipment; 8] = [
        Equipment::BodyWeight,
        Equipment::Barbell,
        Equipment::Dumbbell,
        Equipment::Kettlebell,
        Equipment::Cable,
        Equipment::Machine,
        Equipment::Band,
        Equipment::EzBar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BodyWeight => "body_weight",
            Self::Barbell => "barbell",
            Self::Dumbbell => "dumbbell",
            Self::Kettlebell => "kettlebell",
            Self::Cable => "cable",
            Self::Machine => "machine",
            Self::Band => "band",
            Self::EzBar => "ez_bar",
        }
    }
}

impl fmt::Display for Equipment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Equipment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "bodyweight" => return Ok(Self::BodyWeight),
            "bands" | "resistance_band" => return Ok(Self::Band),
            "ez_barbell" | "ezbar" => return Ok(Self::EzBar),
            _ => {}
        }
        Self::ALL
            .iter()
            .find(|e| e.as_str() == normalized)
            .copied()
            .ok_or_else(|| format!("Unknown equipment: {}", s))
    }
}

/// An exercise as supplied by the catalog (e.g., "Barbell Bench Press")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExerciseRef {
    pub id: String,
    pub name: String,
    pub target_muscles: Vec<MuscleGroup>,
    pub equipment: Vec<Equipment>,
}

impl ExerciseRef {
    pub fn targets(&self, muscle: MuscleGroup) -> bool {
        self.target_muscles.contains(&muscle)
    }
}

// ============================================================================
// Planning Types
// ============================================================================

/// Training experience of the user
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    /// Number of catalog picks per focus muscle group
    pub fn exercises_per_muscle_group(&self) -> usize {
        match self {
            Self::Beginner => 1,
            Self::Intermediate => 2,
            Self::Advanced => 3,
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Beginner => write!(f, "beginner"),
            Self::Intermediate => write!(f, "intermediate"),
            Self::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(format!("Unknown experience level: {}", s)),
        }
    }
}

/// Weekly split layout
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SplitArchetype {
    FullBody,
    UpperLower,
    PushPullLegs,
    PushPullLegsUpperLower,
}

impl SplitArchetype {
    /// Select the archetype for a training frequency.
    ///
    /// Total over all values: anything up to 3 is full body and anything
    /// from 6 upwards is push/pull/legs.
    pub fn for_days_per_week(days_per_week: u32) -> Self {
        match days_per_week {
            0..=3 => Self::FullBody,
            4 => Self::UpperLower,
            5 => Self::PushPullLegsUpperLower,
            _ => Self::PushPullLegs,
        }
    }
}

impl fmt::Display for SplitArchetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FullBody => write!(f, "full-body"),
            Self::UpperLower => write!(f, "upper-lower"),
            Self::PushPullLegs => write!(f, "push-pull-legs"),
            Self::PushPullLegsUpperLower => write!(f, "push-pull-legs-upper-lower"),
        }
    }
}

/// One day of a generated plan
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkoutDayPlan {
    pub name: String,
    pub focus: Vec<MuscleGroup>,
    pub exercises: Vec<ExerciseRef>,
}

/// A generated weekly plan. Transient: the caller decides whether to keep it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkoutPlan {
    pub archetype: SplitArchetype,
    pub days_per_week: u32,
    pub experience_level: ExperienceLevel,
    pub workout_days: Vec<WorkoutDayPlan>,
}

// ============================================================================
// Scheduling Types
// ============================================================================

/// A day of a persisted routine
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoutineDay {
    pub id: Uuid,
    /// 1-based position in the routine
    pub day_order: u32,
    pub name: String,
    pub exercises: Vec<ExerciseRef>,
}

/// A completed workout.
///
/// `day_order` is `None` for ad-hoc workouts that were not tied to a
/// routine day.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletionRecord {
    pub id: Uuid,
    pub routine_id: Uuid,
    pub day_order: Option<u32>,
    pub completed_at: DateTime<Utc>,
}

impl CompletionRecord {
    /// Create a record for a workout finished at `completed_at`
    pub fn new(routine_id: Uuid, day_order: Option<u32>, completed_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            routine_id,
            day_order,
            completed_at,
        }
    }

    pub fn is_ad_hoc(&self) -> bool {
        self.day_order.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archetype_table() {
        assert_eq!(SplitArchetype::for_days_per_week(1), SplitArchetype::FullBody);
        assert_eq!(SplitArchetype::for_days_per_week(3), SplitArchetype::FullBody);
        assert_eq!(SplitArchetype::for_days_per_week(4), SplitArchetype::UpperLower);
        assert_eq!(
            SplitArchetype::for_days_per_week(5),
            SplitArchetype::PushPullLegsUpperLower
        );
        assert_eq!(SplitArchetype::for_days_per_week(6), SplitArchetype::PushPullLegs);
        assert_eq!(SplitArchetype::for_days_per_week(9), SplitArchetype::PushPullLegs);
    }

    #[test]
    fn test_density_per_level() {
        assert_eq!(ExperienceLevel::Beginner.exercises_per_muscle_group(), 1);
        assert_eq!(ExperienceLevel::Intermediate.exercises_per_muscle_group(), 2);
        assert_eq!(ExperienceLevel::Advanced.exercises_per_muscle_group(), 3);
    }

    #[test]
    fn test_parse_muscle_groups() {
        assert_eq!("pectorals".parse::<MuscleGroup>(), Ok(MuscleGroup::Pectorals));
        assert_eq!("Upper Back".parse::<MuscleGroup>(), Ok(MuscleGroup::UpperBack));
        assert_eq!("chest".parse::<MuscleGroup>(), Ok(MuscleGroup::Pectorals));
        assert!("wings".parse::<MuscleGroup>().is_err());
    }

    #[test]
    fn test_parse_equipment() {
        assert_eq!("barbell".parse::<Equipment>(), Ok(Equipment::Barbell));
        assert_eq!("bodyweight".parse::<Equipment>(), Ok(Equipment::BodyWeight));
        assert_eq!("EZ-Bar".parse::<Equipment>(), Ok(Equipment::EzBar));
        assert!("treadmill".parse::<Equipment>().is_err());
    }

    #[test]
    fn test_experience_level_roundtrips_display() {
        for level in [
            ExperienceLevel::Beginner,
            ExperienceLevel::Intermediate,
            ExperienceLevel::Advanced,
        ] {
            assert_eq!(level.to_string().parse::<ExperienceLevel>(), Ok(level));
        }
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&MuscleGroup::UpperBack).unwrap();
        assert_eq!(json, "\"upper_back\"");
        let json = serde_json::to_string(&SplitArchetype::PushPullLegsUpperLower).unwrap();
        assert_eq!(json, "\"push_pull_legs_upper_lower\"");
    }
}
