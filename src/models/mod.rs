pub mod article;
pub mod report;

pub use article::*;
pub use report::*;
