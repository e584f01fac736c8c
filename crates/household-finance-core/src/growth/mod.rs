pub mod goal;
pub mod projection;

pub use goal::{
    solve_contribution_for_goal, solve_time_to_goal, GoalContributionInput,
    GoalContributionOutput, GoalHorizon, TimeToGoalInput, TimeToGoalOutput,
};
pub use crate::types::MAX_HORIZON_YEARS;
pub use projection::{
    future_value, inflation_adjust, project_growth, GrowthInput, GrowthProjection, GrowthRow,
};
