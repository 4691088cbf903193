//! Holiday Hours API Library
//!
//! This module exports the core types and functions for testing and reuse.

pub mod config;
pub mod constants;
pub mod db;
pub mod email;
pub mod error;
pub mod models;
pub mod paystack;
pub mod routes;
pub mod security;
pub mod services;

pub use config::Config;
pub use db::{open_database, Db};
pub use error::{AppError, Result};
pub use routes::router;

use std::sync::Arc;

use email::{Mailer, ResendMailer};
use paystack::{PaymentGateway, PaystackClient};
use security::MagicLinkSigner;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: Config,
    pub signer: MagicLinkSigner,
    pub mailer: Arc<dyn Mailer>,
    pub gateway: Arc<dyn PaymentGateway>,
}

impl AppState {
    /// Create a new AppState from explicit collaborators
    pub fn new(
        db: Db,
        config: Config,
        mailer: Arc<dyn Mailer>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> anyhow::Result<Self> {
        let signer = MagicLinkSigner::new(&config.secret_key, config.magic_link_ttl_secs)
            .map_err(|e| anyhow::anyhow!("Invalid SECRET_KEY: {e}"))?;

        Ok(Self {
            db,
            config,
            signer,
            mailer,
            gateway,
        })
    }

    /// Wire the production Resend and Paystack clients
    pub fn from_config(db: Db, config: Config) -> anyhow::Result<Self> {
        let timeout = config.gateway_timeout();
        let mailer = ResendMailer::new(&config.resend_api_key, &config.from_email, timeout)?;
        let gateway = PaystackClient::new(&config.paystack_secret_key, timeout)?;

        Self::new(db, config, Arc::new(mailer), Arc::new(gateway))
    }
}
