pub mod extract;
pub mod inspect;
pub mod summarize;
pub mod tier;
pub mod validate;
