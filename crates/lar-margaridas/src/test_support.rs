use std::time::Duration;

use axum::Router;

use crate::config::SupabaseConfig;

/// Serve `router` on an ephemeral local port and return its base URL.
pub(crate) async fn serve_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("stub binds");
    let addr = listener.local_addr().expect("stub has an address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub serves");
    });
    format!("http://{addr}")
}

pub(crate) fn supabase_config(url: &str, service_role_key: Option<&str>) -> SupabaseConfig {
    SupabaseConfig {
        url: url.to_string(),
        anon_key: "anon-key".to_string(),
        service_role_key: service_role_key.map(str::to_string),
        timeout: Duration::from_secs(5),
    }
}
