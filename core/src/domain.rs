pub mod common;
pub mod food_log;
pub mod food_recognition;
pub mod portion;
pub mod review;
