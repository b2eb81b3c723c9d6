pub mod capabilities;
pub mod visitor;
