pub mod login;
pub mod nlst;
pub mod retr;
pub mod size;
pub mod stor;
