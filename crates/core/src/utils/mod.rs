pub mod pagination;
pub mod time_utils;

pub use pagination::{Page, PageInfo, Paginator};
