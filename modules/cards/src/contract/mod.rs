pub mod model;

pub use model::{CardFields, Color, Rank, Suit};
