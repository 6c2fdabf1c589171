pub mod compare;
pub mod init;
pub mod list_exams;
pub mod stats;
pub mod take;
pub mod validate;
