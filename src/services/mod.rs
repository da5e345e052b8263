pub mod accounts;
pub mod inventory;
pub mod password;
pub mod stats;
