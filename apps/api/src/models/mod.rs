pub mod alert;
pub mod award;
pub mod billing;
pub mod community;
pub mod profile;
pub mod tender;
