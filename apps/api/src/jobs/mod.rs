// Job postings: CRUD over the `jobs` table for authenticated HR users.

pub mod handlers;
pub mod queries;
