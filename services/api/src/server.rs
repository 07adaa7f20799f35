use crate::cli::ServeArgs;
use crate::infra::{development_store, AppState, DevIdentityProvider};
use crate::routes::with_service_routes;
use axum::{Extension, Router};
use axum_prometheus::PrometheusMetricLayer;
use lar_margaridas::config::AppConfig;
use lar_margaridas::error::AppError;
use lar_margaridas::session::{IdentityProvider, SupabaseIdentity};
use lar_margaridas::store::{PostgrestStore, RecordStore};
use lar_margaridas::telemetry;
use lar_margaridas::workflows::catalog::{
    catalog_router, CatalogRoutes, CatalogService, CourseEnrollmentWorkflow,
};
use lar_margaridas::workflows::volunteers::{
    volunteer_router, VolunteerApplicationWorkflow, VolunteerRoutes,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let api = match &config.supabase {
        Some(supabase) => {
            let client = supabase.http_client()?;
            let store = Arc::new(PostgrestStore::new(client.clone(), supabase));
            let identity = Arc::new(SupabaseIdentity::new(client, supabase));
            info!(url = %supabase.url, "using hosted record store");
            api_router(store, identity)
        }
        None => {
            warn!("SUPABASE_URL not set; serving the in-memory store with development identities");
            api_router(Arc::new(development_store()), Arc::new(DevIdentityProvider))
        }
    };

    let app = with_service_routes(api)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "volunteer intake service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

pub(crate) fn api_router<S, I>(store: Arc<S>, identity: Arc<I>) -> Router
where
    S: RecordStore + 'static,
    I: IdentityProvider + 'static,
{
    let volunteers = Arc::new(VolunteerRoutes {
        workflow: VolunteerApplicationWorkflow::new(store.clone()),
        identity: identity.clone(),
    });
    let catalog = Arc::new(CatalogRoutes {
        catalog: CatalogService::new(store.clone()),
        enrollment: CourseEnrollmentWorkflow::new(store),
        identity,
    });

    volunteer_router(volunteers).merge(catalog_router(catalog))
}
