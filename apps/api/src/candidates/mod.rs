// Candidates: public CV intake plus HR-side listing, editing, tagging and deletion.

pub mod handlers;
pub mod intake;
pub mod queries;
