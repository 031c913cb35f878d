use crate::domain::models::{Goal, PlanEntry, ScheduleRow, WeeklySchedule};

const BASE_CALORIES: i32 = 2000;

const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

const REST_DAY: ScheduleRow = ScheduleRow {
    day: "Sun",
    diet: "Rest",
    exercise: "Yoga",
};

struct GoalTable {
    goal: Goal,
    calorie_offset: i32,
    diet: [PlanEntry; 3],
    exercise: [PlanEntry; 3],
}

static PLAN_TABLES: [GoalTable; 3] = [
    GoalTable {
        goal: Goal::LoseWeight,
        calorie_offset: -300,
        diet: [
            PlanEntry::new("Breakfast", "Oatmeal & Fruits"),
            PlanEntry::new("Lunch", "Grilled Chicken Salad"),
            PlanEntry::new("Dinner", "Steamed Veggies & Fish"),
        ],
        exercise: [
            PlanEntry::new("Running", "30 min"),
            PlanEntry::new("Squats", "15 min"),
            PlanEntry::new("Pushups", "15 min"),
        ],
    },
    GoalTable {
        goal: Goal::GainWeight,
        calorie_offset: 500,
        diet: [
            PlanEntry::new("Breakfast", "Eggs & Toast"),
            PlanEntry::new("Lunch", "Chicken & Rice"),
            PlanEntry::new("Dinner", "Salmon & Quinoa"),
        ],
        exercise: [
            PlanEntry::new("Bench Press", "40 min"),
            PlanEntry::new("Deadlift", "40 min"),
            PlanEntry::new("Pullups", "15 min"),
        ],
    },
    GoalTable {
        goal: Goal::MaintainWeight,
        calorie_offset: 0,
        diet: [
            PlanEntry::new("Breakfast", "Yogurt & Fruits"),
            PlanEntry::new("Lunch", "Balanced Plate"),
            PlanEntry::new("Dinner", "Chicken Stir-Fry"),
        ],
        exercise: [
            PlanEntry::new("Circuit Training", "30 min"),
            PlanEntry::new("Jump Rope", "15 min"),
            PlanEntry::new("Yoga", "20 min"),
        ],
    },
];

fn table(goal: Goal) -> &'static GoalTable {
    // Tables are laid out in enum declaration order.
    let entry = &PLAN_TABLES[goal as usize];
    debug_assert_eq!(entry.goal, goal);
    entry
}

pub fn calories(goal: Goal) -> i32 {
    BASE_CALORIES + table(goal).calorie_offset
}

pub fn diet_plan(goal: Goal) -> &'static [PlanEntry; 3] {
    &table(goal).diet
}

pub fn exercise_plan(goal: Goal) -> &'static [PlanEntry; 3] {
    &table(goal).exercise
}

/// Mon..Sat cycle through the three diet descriptions and exercise labels
/// twice; Sunday is always the rest placeholder.
pub fn weekly_schedule(goal: Goal) -> WeeklySchedule {
    let GoalTable { diet, exercise, .. } = table(goal);
    let mut rows = [REST_DAY; 7];
    for (idx, row) in rows.iter_mut().take(6).enumerate() {
        *row = ScheduleRow {
            day: DAY_NAMES[idx],
            diet: diet[idx % 3].description,
            exercise: exercise[idx % 3].label,
        };
    }
    rows
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlan {
    pub goal: Goal,
    pub goal_label: &'static str,
    pub calories: i32,
    pub diet: &'static [PlanEntry; 3],
    pub exercise: &'static [PlanEntry; 3],
    pub schedule: WeeklySchedule,
}

pub fn resolve(goal: Goal) -> ResolvedPlan {
    ResolvedPlan {
        goal,
        goal_label: goal.label(),
        calories: calories(goal),
        diet: diet_plan(goal),
        exercise: exercise_plan(goal),
        schedule: weekly_schedule(goal),
    }
}

pub fn height_cm(feet: u32, inches: u32) -> f64 {
    f64::from(feet) * 30.48 + f64::from(inches) * 2.54
}

pub fn format_height_cm(cm: f64) -> String {
    format!("{cm:.1} cm")
}
