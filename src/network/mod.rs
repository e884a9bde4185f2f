pub mod clock;
pub mod decoder;
pub mod lamp;
pub mod layout;
pub mod linker;
pub mod storage;
