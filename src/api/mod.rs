pub(crate) mod accounts;
pub(crate) mod admin;
pub(crate) mod allocations;
pub(crate) mod errors;
pub(crate) mod exams;
pub(crate) mod extract;
pub(crate) mod generated_exams;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod question_bank;
pub(crate) mod response;
pub(crate) mod responses;
pub(crate) mod reviews;
pub(crate) mod router;
pub(crate) mod session;
pub(crate) mod student;
pub(crate) mod teacher;
pub(crate) mod validation;
