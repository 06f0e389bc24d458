pub mod dates;
pub mod markup;
pub mod unicode;
