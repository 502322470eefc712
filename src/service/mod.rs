use std::sync::Arc;

use crate::notifier::Notifier;
use crate::repository::Repository;
use crate::service::fraud_service::FraudService;
use crate::service::menu_service::MenuService;

pub mod error;
pub mod fraud_service;
pub mod menu_service;

pub struct Services {
    pub menu: Arc<MenuService>,
    pub fraud: Arc<FraudService>,
}

impl Services {
    pub fn new(db: Arc<Repository>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            menu: Arc::new(MenuService::new(db.clone(), notifier.clone())),
            fraud: Arc::new(FraudService::new(db, notifier)),
        }
    }
}
