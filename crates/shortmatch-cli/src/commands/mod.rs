pub mod batch;
pub mod grade;
pub mod init;
pub mod validate;
