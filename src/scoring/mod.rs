//! Points awarded for areas and powers, and the log recording them.

pub mod message;
pub mod points;

pub use message::{animal_counts, AnimalCounts, Message, MessageBoard, PlainTextMaker, TextMaker};
pub use points::PointsError;
