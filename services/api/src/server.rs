use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_storefront_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use storefront::config::AppConfig;
use storefront::error::AppError;
use storefront::shop::{
    CredentialCheck, HttpLoginNotifier, InMemorySessionStore, MenuCatalog, SharedCatalog,
    StorefrontService,
};
use storefront::telemetry;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.catalog.take() {
        config.catalog.path = path;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = Arc::new(SharedCatalog::new(
        config.catalog.path.clone(),
        config.catalog.seed,
    ));
    let snapshot = catalog.snapshot();
    if let Some(err) = &snapshot.error {
        warn!(error = %err, "serving with an empty catalog until reload");
    }

    let mut service = StorefrontService::new(
        catalog,
        Arc::new(MenuCatalog::default()),
        Arc::new(InMemorySessionStore::default()),
        CredentialCheck::new(config.auth.clone()),
    );
    if let Some(notifier) = HttpLoginNotifier::from_config(&config.notification)? {
        info!(endpoint = notifier.endpoint(), "login webhook enabled");
        service = service.with_notifier(Arc::new(notifier));
    }

    let app = with_storefront_routes(Arc::new(service))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        restaurants = snapshot.catalog.len(),
        "storefront ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
