pub mod app;

mod builder;
pub use builder::Builder;

pub mod db;

mod verify;
