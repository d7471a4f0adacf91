//! Data models

mod account;
mod division;
mod employee;
mod grade;

pub use account::*;
pub use division::*;
pub use employee::*;
pub use grade::*;
