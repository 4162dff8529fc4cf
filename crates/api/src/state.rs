use std::sync::Arc;

use lms_db::DbPool;
use lms_mail::Mailer;
use lms_media::MediaStorage;

use crate::auth::otp::OtpService;
use crate::config::ServerConfig;

/// Shared application state injected into all handlers.
///
/// The mailer and media storage are optional: when their configuration is
/// absent the server still runs, and the features that need them degrade
/// (mail is skipped with a warning, avatar/thumbnail uploads return 502).
#[derive(Clone)]
pub struct AppState {
    /// Postgres connection pool.
    pub pool: DbPool,
    /// Server configuration (JWT secret, timeouts, CORS).
    pub config: Arc<ServerConfig>,
    /// One-time verification code service.
    pub otp: Arc<OtpService>,
    /// Outbound mail transport, if SMTP is configured.
    pub mailer: Option<Arc<Mailer>>,
    /// Remote media store client, if configured.
    pub storage: Option<Arc<MediaStorage>>,
}

impl AppState {
    pub fn new(
        pool: DbPool,
        config: ServerConfig,
        otp: OtpService,
        mailer: Option<Mailer>,
        storage: Option<MediaStorage>,
    ) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            otp: Arc::new(otp),
            mailer: mailer.map(Arc::new),
            storage: storage.map(Arc::new),
        }
    }
}
