pub mod archive;
pub mod bootstrap;
pub mod compare;
