use std::sync::Arc;

use crate::{gateway::RoutineGateway, middleware::account::AccountContext};

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn RoutineGateway>,
    pub default_account: AccountContext,
}

impl AppState {
    pub fn new(gateway: Arc<dyn RoutineGateway>, default_account: AccountContext) -> Self {
        Self {
            gateway,
            default_account,
        }
    }
}
