pub mod budget;
pub mod split;
