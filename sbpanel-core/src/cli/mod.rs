pub mod conf;
pub mod replay;
