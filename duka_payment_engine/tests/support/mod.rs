use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
    Mutex,
};

use duka_payment_engine::{
    db_types::{GatewayStatusReport, Payment},
    traits::{GatewayError, InitiateReceipt, PaymentGateway},
    SqliteDatabase,
};
use log::*;
use sqlx::{migrate, migrate::MigrateDatabase, Sqlite};

pub fn random_db_url() -> String {
    format!("sqlite://{}/duka_test_{}.db", std::env::temp_dir().display(), rand::random::<u64>())
}

pub async fn prepare_test_env(url: &str) {
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
    create_database(url).await;
    run_migrations(url).await;
}

pub async fn run_migrations(url: &str) {
    let db = SqliteDatabase::new_with_url(url, 5).await.expect("Error creating connection to database");
    migrate!("./src/sqlite/migrations").run(db.pool()).await.expect("Error running DB migrations");
    info!("🚀️ Migrations complete");
}

pub async fn create_database(url: &str) {
    if let Err(e) = Sqlite::drop_database(url).await {
        warn!("Error dropping database {url}: {e:?}");
    }
    Sqlite::create_database(url).await.expect("Error creating database");
    info!("Created Sqlite database {url}");
}

/// A scripted stand-in for the SwiftPesa gateway. Tests set the report it should return; it assigns predictable
/// tracking ids and can be told to fail every call.
#[derive(Clone, Default)]
pub struct ScriptedGateway {
    report: Arc<Mutex<GatewayStatusReport>>,
    unreachable: Arc<AtomicBool>,
    queries: Arc<AtomicU64>,
}

impl ScriptedGateway {
    pub fn set_report(&self, report: GatewayStatusReport) {
        *self.report.lock().unwrap() = report;
    }

    pub fn set_unreachable(&self, value: bool) {
        self.unreachable.store(value, Ordering::SeqCst);
    }

    pub fn query_count(&self) -> u64 {
        self.queries.load(Ordering::SeqCst)
    }
}

impl PaymentGateway for ScriptedGateway {
    async fn initiate(&self, payment: &Payment) -> Result<InitiateReceipt, GatewayError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(GatewayError::Transport("scripted outage".to_string()));
        }
        Ok(InitiateReceipt { tracking_id: format!("SPT-{}", payment.reference_number) })
    }

    async fn query_status(&self, _tracking_id: &str) -> Result<GatewayStatusReport, GatewayError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(GatewayError::Transport("scripted outage".to_string()));
        }
        Ok(self.report.lock().unwrap().clone())
    }
}

pub fn completed_report() -> GatewayStatusReport {
    GatewayStatusReport {
        status_code: "1".to_string(),
        status_description: "COMPLETED".to_string(),
        confirmation_code: Some("CEB52HQ8XN".to_string()),
        transaction_id: Some("TX-44210".to_string()),
        channel: Some("VODACOM-TZ".to_string()),
        account: Some("255700000001".to_string()),
    }
}

pub fn failed_report() -> GatewayStatusReport {
    GatewayStatusReport {
        status_code: "0".to_string(),
        status_description: "CANCELLED".to_string(),
        ..Default::default()
    }
}

pub fn pending_report() -> GatewayStatusReport {
    GatewayStatusReport {
        status_code: "0".to_string(),
        status_description: "PENDING".to_string(),
        ..Default::default()
    }
}
