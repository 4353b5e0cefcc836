//! certscore-report: Persistence and rendering of assessment scores.

pub mod html;
pub mod json;
