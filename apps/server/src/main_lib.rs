use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use debtfolio_core::{
    credentials::{CredentialRecord, CredentialService, CredentialServiceTrait, TokenKeys},
    payments::{PaymentService, PaymentServiceTrait, PaymentStatusEntry},
    plans::{Plan, PlanService, PlanServiceTrait},
};
use debtfolio_storage::build_store;

use crate::config::Config;

pub struct AppState {
    pub plan_service: Arc<dyn PlanServiceTrait>,
    pub payment_service: Arc<dyn PaymentServiceTrait>,
    pub credential_service: Arc<dyn CredentialServiceTrait>,
}

pub fn init_tracing() {
    let fmt_layer = fmt::layer();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let plan_store = build_store::<Plan>(&config.storage)?;
    let payment_store = build_store::<PaymentStatusEntry>(&config.storage)?;
    let credential_store = build_store::<CredentialRecord>(&config.storage)?;
    let token_keys = Arc::new(TokenKeys::new(&config.jwt_secret, config.token_ttl));

    tracing::info!(
        "Storage backend ready (data dir: {})",
        config.storage.data_dir.display()
    );

    Ok(Arc::new(AppState {
        plan_service: Arc::new(PlanService::new(plan_store.clone(), payment_store.clone())),
        payment_service: Arc::new(PaymentService::new(plan_store, payment_store)),
        credential_service: Arc::new(CredentialService::new(credential_store, token_keys)),
    }))
}
