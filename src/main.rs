use actix_web::middleware::{Compress, DefaultHeaders};
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use human_panic::setup_panic;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use schooldesk::config::AppConfig;
use schooldesk::middlewares::{
    RequestAudit, SecurityGuard, SecurityHeaders, SlidingWindowLimiter,
};
use schooldesk::models::AppStartTime;
use schooldesk::routes;
use schooldesk::runtime::lifetime::{cors, logging, shutdown, startup};
use schooldesk::services::{leaves::monitor, system};
use schooldesk::utils::{json_error_handler, query_error_handler};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    setup_panic!();

    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    if let Err(e) = AppConfig::init() {
        eprintln!("Failed to initialize configuration: {e}");
        return Err(std::io::Error::other(e.to_string()));
    }
    let config = AppConfig::get();
    let _log_guard = logging::init_tracing(config);

    info!(
        "{} v{} starting ({} environment)",
        config.app.system_name,
        env!("CARGO_PKG_VERSION"),
        config.app.environment
    );

    let startup::StartupContext { storage, cache } = match startup::prepare_server_startup().await {
        Ok(context) => context,
        Err(e) => {
            error!("Startup failed: {}", e);
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    // 全局限流器，由安全中间件、健康检查与清理任务共用
    let limiter = Arc::new(SlidingWindowLimiter::from_thresholds(
        config.rate_limit_thresholds(),
    ));
    if !limiter.is_enabled() {
        warn!("Global rate limiting is disabled");
    }

    let background = [
        monitor::spawn_auto_approval_monitor(storage.clone(), &config.leave_approval),
        system::spawn_limiter_purge(limiter.clone(), config.security.purge_interval),
    ];

    info!(
        "Startup finished in {} ms, {} worker(s)",
        (chrono::Utc::now() - app_start_time.start_datetime).num_milliseconds(),
        config.server.workers
    );

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Connection", "keep-alive"))
                    .add((
                        "Keep-Alive",
                        format!("timeout={}, max=1000", config.server.timeouts.keep_alive),
                    )),
            )
            // 后注册的在外层：审计 -> 安全头 -> CORS -> 拦截与限流
            // 预检请求由 CORS 直接应答，拦截响应也带上 CORS 头
            .wrap(SecurityGuard::new(limiter.clone(), config.security.clone()))
            .wrap(cors::build_cors(&config.cors))
            .wrap(SecurityHeaders::from_config(&config.security))
            .wrap(RequestAudit)
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PayloadConfig::new(config.server.limits.max_payload_size))
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(cache.clone()))
            .app_data(web::Data::new(limiter.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .configure(routes::configure)
    })
    .keep_alive(Duration::from_secs(config.server.timeouts.keep_alive))
    .client_request_timeout(Duration::from_millis(config.server.timeouts.client_request))
    .client_disconnect_timeout(Duration::from_millis(
        config.server.timeouts.client_disconnect,
    ))
    .workers(config.server.workers);

    #[cfg(unix)]
    let server = match config.unix_socket_path() {
        Some(socket_path) => {
            info!("Listening on unix:{}", socket_path);
            if std::path::Path::new(socket_path).exists() {
                std::fs::remove_file(socket_path)?;
            }
            server.bind_uds(socket_path)?
        }
        None => {
            info!("Listening on http://{}", config.server_bind_address());
            server.bind(config.server_bind_address())?
        }
    };
    #[cfg(not(unix))]
    let server = {
        info!("Listening on http://{}", config.server_bind_address());
        server.bind(config.server_bind_address())?
    };

    tokio::select! {
        res = server.run() => res?,
        _ = shutdown::listen_for_shutdown() => {}
    }

    for task in background.into_iter().flatten() {
        task.abort();
    }
    warn!("Server stopped");
    Ok(())
}
