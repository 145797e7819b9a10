pub mod article;
pub mod student;
pub mod user;

pub use article::*;
pub use student::*;
pub use user::*;
