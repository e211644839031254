// Community Hub - server core
//
// Server-rendered site for a community organization: programs and participant
// registration, admin-published learning content, member document uploads,
// vendor submissions, donations and the fund distributions paid out of them.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
