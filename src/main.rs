use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use edutack_payroll::api::{AppState, create_router};
use edutack_payroll::config::ConfigLoader;
use edutack_payroll::delivery::{DeliveryCoordinator, DisabledMailer, Mailer, SmtpMailer};
use edutack_payroll::render::{PayslipRenderer, PdfEngine};
use edutack_payroll::storage::{MemoryPayslipStore, SeedData};
use edutack_payroll::workflow::PayslipWorkflow;

const DEFAULT_CONFIG_DIR: &str = "./config/edutack";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_dir = std::env::var("EDUTACK_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR));
    let config = ConfigLoader::load(&config_dir)
        .with_context(|| format!("loading configuration from {}", config_dir.display()))?;
    let service = config.service().clone();
    let policy = config.policy().clone();

    let seed = match config.seed_path() {
        Some(path) => {
            info!(path = %path.display(), "Loading staff and attendance seed");
            SeedData::load(&path).with_context(|| format!("loading seed file {}", path.display()))?
        }
        None => SeedData::default(),
    };
    info!(staff = seed.staff.len(), attendance = seed.attendance.len(), "Seed loaded");
    let (staff, attendance) = seed.into_backends();

    let mailer: Arc<dyn Mailer> = if service.email.enabled {
        let password = std::env::var("EDUTACK_SMTP_PASSWORD").unwrap_or_default();
        Arc::new(SmtpMailer::new(&service.email, password).context("configuring SMTP mailer")?)
    } else {
        warn!("Email delivery is disabled; payslips will stay in the generated state");
        Arc::new(DisabledMailer)
    };

    let renderer = PayslipRenderer::new(
        Arc::new(PdfEngine),
        &service.storage,
        service.institution.clone(),
        &policy,
    );
    let delivery = DeliveryCoordinator::new(
        mailer,
        service.institution.name.clone(),
        policy.currency_prefix.clone(),
    );
    let workflow = PayslipWorkflow::new(
        Arc::new(staff),
        Arc::new(MemoryPayslipStore::new()),
        Arc::new(attendance),
        renderer,
        delivery,
        policy,
    );

    let app = create_router(AppState::new(workflow));

    let listener = tokio::net::TcpListener::bind(&service.server.bind_address)
        .await
        .with_context(|| format!("binding {}", service.server.bind_address))?;
    info!(address = %service.server.bind_address, "Payroll service listening");

    axum::serve(listener, app).await?;
    Ok(())
}
