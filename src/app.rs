// Shared application state threaded through axum handlers

use std::sync::Arc;

use crate::db::DieselPool;
use crate::services::{AccountService, TokenService};

#[derive(Clone)]
pub struct AppState {
    pub diesel_pool: DieselPool,
    pub token_service: Arc<TokenService>,
    pub account_service: Arc<AccountService>,
}

impl AppState {
    pub fn new(diesel_pool: DieselPool, token_service: TokenService) -> Self {
        let token_service = Arc::new(token_service);
        let account_service = Arc::new(AccountService::new(
            diesel_pool.clone(),
            token_service.clone(),
        ));

        Self {
            diesel_pool,
            token_service,
            account_service,
        }
    }
}
