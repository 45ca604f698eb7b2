pub mod logger;

pub mod timing;
