pub mod dispatch;
pub mod entity;
pub mod schema;
pub mod seed;
pub mod serve;
pub mod shared;
