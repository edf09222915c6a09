pub mod generate;
pub mod optimize;
