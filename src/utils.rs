pub mod console;
pub mod logs;
