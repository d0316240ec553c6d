pub mod dashboard;
pub mod final_intro;
pub mod final_quiz;
pub mod final_results;
pub mod quiz;
pub mod quiz_intro;
pub mod results;
pub mod welcome;
