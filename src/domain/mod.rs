pub mod audio;
pub mod batch;
pub mod card;
pub mod text;
