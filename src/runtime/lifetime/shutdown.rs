use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::ServerHandle;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::storage::LinkStore;

/// 等待在途请求完成的最长时间（秒）
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// 关闭连接池超时时间（秒）
const CLOSE_TIMEOUT_SECS: u64 = 10;

/// 等待 Ctrl+C / SIGTERM
async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Ctrl+C received"),
        _ = terminate => info!("SIGTERM received"),
    }
}

/// 收到信号后停止接收新连接，并等待在途请求处理完毕
pub async fn listen_for_shutdown(handle: ServerHandle) {
    wait_for_signal().await;
    info!("Shutdown signal received, draining in-flight requests...");

    // stop(true) 会等待 worker 处理完当前请求
    match timeout(Duration::from_secs(SHUTDOWN_TIMEOUT_SECS), handle.stop(true)).await {
        Ok(()) => info!("HTTP server stopped"),
        Err(_) => {
            error!(
                "Graceful stop timed out after {} seconds, forcing stop",
                SHUTDOWN_TIMEOUT_SECS
            );
            handle.stop(false).await;
        }
    }
}

/// 释放连接池
pub async fn close_storage(storage: &Arc<dyn LinkStore>) {
    match timeout(Duration::from_secs(CLOSE_TIMEOUT_SECS), storage.close()).await {
        Ok(Ok(())) => info!("Storage closed"),
        Ok(Err(e)) => error!("Failed to close storage: {}", e),
        Err(_) => error!(
            "Closing storage timed out after {} seconds",
            CLOSE_TIMEOUT_SECS
        ),
    }
}
