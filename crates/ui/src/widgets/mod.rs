pub mod answer;
pub mod status;
