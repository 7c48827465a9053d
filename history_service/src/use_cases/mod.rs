pub mod get_user_activity;
pub mod get_wallet_history;
pub mod project_event;
