pub mod credential_store;
pub mod password;
