pub mod history;
pub mod interview;
