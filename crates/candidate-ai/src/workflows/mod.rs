pub mod assessment;
pub mod screening;
