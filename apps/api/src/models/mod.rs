pub mod candidate;
pub mod hr_user;
pub mod job;
pub mod report;
