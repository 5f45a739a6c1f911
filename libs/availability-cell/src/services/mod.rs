pub mod schedule;
pub mod editor;
pub mod codec;
pub mod sync;
