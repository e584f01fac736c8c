pub mod employer_plan;
pub mod ira;

pub use employer_plan::{
    employer_match, project_employer_plan, EmployerPlanInput, EmployerPlanOutput, PlanYear,
};
pub use ira::{contribution_limit, ira_eligibility, FilingStatus, IraEligibility, IraInput};
