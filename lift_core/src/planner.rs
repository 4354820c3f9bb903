//! Split planner for generating weekly workout plans.
//!
//! Plan generation is a pure function of its inputs and the catalog:
//! - Pick a split archetype from the training frequency
//! - Lay out the archetype's days from a fixed table
//! - Fill each day with the first N catalog matches per focus muscle group

use crate::{
    Equipment, Error, ExerciseCatalogQuery, ExerciseQuery, ExerciseRef, ExperienceLevel,
    MuscleGroup, Result, SplitArchetype, WorkoutDayPlan, WorkoutPlan,
};
use MuscleGroup::*;

const FULL_BODY_FOCUS: &[MuscleGroup] = &[Pectorals, Lats, Delts, Quads, Hamstrings, Glutes];
const UPPER_FOCUS: &[MuscleGroup] = &[Pectorals, Lats, Delts, Biceps, Triceps];
const LOWER_FOCUS: &[MuscleGroup] = &[Quads, Hamstrings, Glutes, Calves];
const PUSH_FOCUS: &[MuscleGroup] = &[Pectorals, Delts, Triceps];
const PULL_FOCUS: &[MuscleGroup] = &[Lats, UpperBack, Biceps];
const LEGS_FOCUS: &[MuscleGroup] = &[Quads, Hamstrings, Glutes, Calves];

/// Day template: display name and ordered focus groups
type DayTemplate = (&'static str, &'static [MuscleGroup]);

const UPPER_LOWER_DAYS: &[DayTemplate] = &[
    ("Upper", UPPER_FOCUS),
    ("Lower", LOWER_FOCUS),
    ("Upper", UPPER_FOCUS),
    ("Lower", LOWER_FOCUS),
];

const PUSH_PULL_LEGS_DAYS: &[DayTemplate] = &[
    ("Push", PUSH_FOCUS),
    ("Pull", PULL_FOCUS),
    ("Legs", LEGS_FOCUS),
];

const PUSH_PULL_LEGS_UPPER_LOWER_DAYS: &[DayTemplate] = &[
    ("Push", PUSH_FOCUS),
    ("Pull", PULL_FOCUS),
    ("Legs", LEGS_FOCUS),
    ("Upper", UPPER_FOCUS),
    ("Lower", LOWER_FOCUS),
];

/// Generate a weekly plan
///
/// ## Archetype selection
///
/// | days per week | archetype                    |
/// |---------------|------------------------------|
/// | ≤3            | full body                    |
/// | 4             | upper/lower                  |
/// | 5             | push/pull/legs + upper/lower |
/// | ≥6            | push/pull/legs               |
///
/// ## Exercise selection
///
/// Each focus group is queried separately and contributes its first
/// `exercises_per_muscle_group` matches in catalog order. Picks are
/// concatenated in focus order without de-duplication, so an exercise that
/// targets two focus groups may appear twice in one day. A group with no
/// matches contributes nothing.
///
/// `available_equipment` restricts picks to exercises using at least one of
/// the listed items; `None` or an empty slice means unrestricted.
pub fn generate_plan<C>(
    catalog: &C,
    days_per_week: u32,
    experience_level: ExperienceLevel,
    available_equipment: Option<&[Equipment]>,
) -> Result<WorkoutPlan>
where
    C: ExerciseCatalogQuery + ?Sized,
{
    if days_per_week == 0 {
        return Err(Error::InvalidInput("days per week must be at least 1".into()));
    }

    let archetype = SplitArchetype::for_days_per_week(days_per_week);
    let per_group = experience_level.exercises_per_muscle_group();

    tracing::info!(
        "Generating {} plan for {} days/week ({} level, {} per muscle group)",
        archetype,
        days_per_week,
        experience_level,
        per_group
    );

    let layout = day_layout(archetype, days_per_week);
    if layout.len() != days_per_week as usize {
        tracing::warn!(
            "{} split has {} days for {} requested days/week",
            archetype,
            layout.len(),
            days_per_week
        );
    }

    let mut workout_days = Vec::with_capacity(layout.len());
    for (name, focus) in layout {
        let exercises = select_exercises(catalog, focus, per_group, available_equipment)?;
        tracing::debug!("{}: {} exercises", name, exercises.len());
        workout_days.push(WorkoutDayPlan {
            name,
            focus: focus.to_vec(),
            exercises,
        });
    }

    Ok(WorkoutPlan {
        archetype,
        days_per_week,
        experience_level,
        workout_days,
    })
}

/// Ordered (name, focus) pairs for an archetype
fn day_layout(
    archetype: SplitArchetype,
    days_per_week: u32,
) -> Vec<(String, &'static [MuscleGroup])> {
    match archetype {
        SplitArchetype::FullBody => (1..=days_per_week)
            .map(|i| (format!("Full Body {}", i), FULL_BODY_FOCUS))
            .collect(),
        SplitArchetype::UpperLower => named(UPPER_LOWER_DAYS),
        SplitArchetype::PushPullLegsUpperLower => named(PUSH_PULL_LEGS_UPPER_LOWER_DAYS),
        SplitArchetype::PushPullLegs => {
            let cycles = if days_per_week == 6 { 2 } else { 1 };
            (1..=cycles)
                .flat_map(|cycle| {
                    PUSH_PULL_LEGS_DAYS
                        .iter()
                        .map(move |(name, focus)| (format!("{} {}", name, cycle), *focus))
                })
                .collect()
        }
    }
}

fn named(days: &[DayTemplate]) -> Vec<(String, &'static [MuscleGroup])> {
    days.iter()
        .map(|(name, focus)| (name.to_string(), *focus))
        .collect()
}

/// Concatenate the first `per_group` matches for each focus group
fn select_exercises<C>(
    catalog: &C,
    focus: &[MuscleGroup],
    per_group: usize,
    available_equipment: Option<&[Equipment]>,
) -> Result<Vec<ExerciseRef>>
where
    C: ExerciseCatalogQuery + ?Sized,
{
    let mut exercises = Vec::with_capacity(focus.len() * per_group);

    for muscle in focus {
        let mut query = ExerciseQuery::new().target_muscle(*muscle).limit(per_group);
        if let Some(equipment) = available_equipment {
            query = query.equipments(equipment);
        }

        let result = catalog.search(&query)?;
        if result.exercises.is_empty() {
            tracing::debug!("No catalog matches for {}", muscle);
        }
        exercises.extend(result.exercises);
    }

    Ok(exercises)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_default_catalog, Catalog, ExerciseSearch};

    fn day_names(plan: &WorkoutPlan) -> Vec<&str> {
        plan.workout_days.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn test_full_body_for_low_frequency() {
        let catalog = build_default_catalog();
        for days in 1..=3 {
            let plan = generate_plan(&catalog, days, ExperienceLevel::Beginner, None).unwrap();
            assert_eq!(plan.archetype, SplitArchetype::FullBody);
            assert_eq!(plan.workout_days.len(), days as usize);
            for (i, day) in plan.workout_days.iter().enumerate() {
                assert_eq!(day.name, format!("Full Body {}", i + 1));
                assert_eq!(day.focus, FULL_BODY_FOCUS);
            }
        }
    }

    #[test]
    fn test_four_days_is_upper_lower() {
        let catalog = build_default_catalog();
        let plan = generate_plan(&catalog, 4, ExperienceLevel::Intermediate, None).unwrap();

        assert_eq!(plan.archetype, SplitArchetype::UpperLower);
        assert_eq!(day_names(&plan), vec!["Upper", "Lower", "Upper", "Lower"]);
    }

    #[test]
    fn test_five_days_is_hybrid() {
        let catalog = build_default_catalog();
        let plan = generate_plan(&catalog, 5, ExperienceLevel::Beginner, None).unwrap();

        assert_eq!(plan.archetype, SplitArchetype::PushPullLegsUpperLower);
        assert_eq!(
            day_names(&plan),
            vec!["Push", "Pull", "Legs", "Upper", "Lower"]
        );
    }

    #[test]
    fn test_six_days_is_two_ppl_cycles() {
        let catalog = build_default_catalog();
        let plan = generate_plan(&catalog, 6, ExperienceLevel::Beginner, None).unwrap();

        assert_eq!(plan.archetype, SplitArchetype::PushPullLegs);
        assert_eq!(
            day_names(&plan),
            vec!["Push 1", "Pull 1", "Legs 1", "Push 2", "Pull 2", "Legs 2"]
        );
    }

    #[test]
    fn test_seven_days_is_single_ppl_cycle() {
        let catalog = build_default_catalog();
        let plan = generate_plan(&catalog, 7, ExperienceLevel::Beginner, None).unwrap();

        assert_eq!(plan.archetype, SplitArchetype::PushPullLegs);
        assert_eq!(plan.days_per_week, 7);
        assert_eq!(day_names(&plan), vec!["Push 1", "Pull 1", "Legs 1"]);
    }

    #[test]
    fn test_zero_days_rejected() {
        let catalog = build_default_catalog();
        let result = generate_plan(&catalog, 0, ExperienceLevel::Beginner, None);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_advanced_push_day_has_three_per_group() {
        let catalog = build_default_catalog();
        let plan = generate_plan(&catalog, 5, ExperienceLevel::Advanced, None).unwrap();
        let push = &plan.workout_days[0];

        assert_eq!(push.focus, vec![Pectorals, Delts, Triceps]);
        assert_eq!(push.exercises.len(), 9);

        let ids: Vec<&str> = push.exercises.iter().map(|e| e.id.as_str()).collect();
        // Bench press targets all three groups, so it is picked for each
        assert_eq!(
            ids,
            vec![
                "barbell_bench_press",
                "dumbbell_bench_press",
                "push_up",
                "barbell_bench_press",
                "incline_dumbbell_press",
                "overhead_press",
                "barbell_bench_press",
                "dumbbell_bench_press",
                "push_up",
            ]
        );
    }

    #[test]
    fn test_exercises_come_from_focus_groups() {
        let catalog = build_default_catalog();
        for days in 1..=7 {
            let plan = generate_plan(&catalog, days, ExperienceLevel::Advanced, None).unwrap();
            for day in &plan.workout_days {
                assert!(!day.focus.is_empty());
                for exercise in &day.exercises {
                    assert!(
                        day.focus.iter().any(|m| exercise.targets(*m)),
                        "{} is not in the focus of {}",
                        exercise.id,
                        day.name
                    );
                    assert_eq!(catalog.get(&exercise.id), Some(exercise));
                }
            }
        }
    }

    #[test]
    fn test_respects_available_equipment() {
        let catalog = build_default_catalog();
        let equipment = [Equipment::BodyWeight, Equipment::Kettlebell];
        let plan =
            generate_plan(&catalog, 4, ExperienceLevel::Advanced, Some(&equipment)).unwrap();

        for day in &plan.workout_days {
            for exercise in &day.exercises {
                assert!(
                    exercise.equipment.iter().any(|e| equipment.contains(e)),
                    "{} needs equipment outside the filter",
                    exercise.id
                );
            }
        }
    }

    #[test]
    fn test_missing_muscle_group_yields_thin_day() {
        // Only chest work available: lower days end up empty
        let catalog = Catalog::from_exercises(vec![ExerciseRef {
            id: "push_up".into(),
            name: "Push-up".into(),
            target_muscles: vec![Pectorals],
            equipment: vec![Equipment::BodyWeight],
        }]);

        let plan = generate_plan(&catalog, 4, ExperienceLevel::Intermediate, None).unwrap();
        assert_eq!(plan.workout_days.len(), 4);
        assert_eq!(plan.workout_days[0].exercises.len(), 1);
        assert!(plan.workout_days[1].exercises.is_empty());
        assert!(!plan.workout_days[1].focus.is_empty());
    }

    #[test]
    fn test_generation_is_deterministic() {
        let catalog = build_default_catalog();
        let first = generate_plan(&catalog, 6, ExperienceLevel::Intermediate, None).unwrap();
        let second = generate_plan(&catalog, 6, ExperienceLevel::Intermediate, None).unwrap();
        assert_eq!(first, second);
    }

    struct FailingCatalog;

    impl ExerciseCatalogQuery for FailingCatalog {
        fn search(&self, _query: &ExerciseQuery) -> Result<ExerciseSearch> {
            Err(Error::Other("catalog offline".into()))
        }
    }

    #[test]
    fn test_catalog_failure_propagates() {
        let result = generate_plan(&FailingCatalog, 3, ExperienceLevel::Beginner, None);
        assert!(matches!(result, Err(Error::Other(msg)) if msg == "catalog offline"));
    }
}
