pub mod create_wallet;
pub mod fund_wallet;
pub mod get_user_wallets;
pub mod get_wallet;
pub mod transfer_funds;
