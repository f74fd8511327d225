pub(crate) mod accounts;
pub(crate) mod allocations;
pub(crate) mod exams;
pub(crate) mod generated_exams;
pub(crate) mod health;
pub(crate) mod question_bank;
pub(crate) mod responses;
