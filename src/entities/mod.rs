
pub mod activation_token;
pub mod bill;
pub mod board_seat;
pub mod member_profile;
pub mod system_config;
pub mod user_account;
pub mod user_group;
pub mod vote;
