pub mod debug;
pub mod init;
pub mod pack;
pub mod tree;
