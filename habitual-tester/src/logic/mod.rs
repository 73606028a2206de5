pub mod career_tester;
pub mod reports;
pub mod scenarios;
pub mod seeds;
pub mod tester;

pub use career_tester::CareerTester;
pub use scenarios::{all_scenario_names, get_scenario, list_scenarios};
pub use seeds::resolve_seed_inputs;
pub use tester::*;
