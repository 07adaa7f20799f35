pub mod catalog;
pub mod notice;
pub mod volunteers;

pub use notice::{Notice, NoticeTone};
