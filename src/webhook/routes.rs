use crate::consts;
use ntex::web;

/// Configures webhook routes for external integrations.
///
/// These routes are public endpoints: the GET handshake is guarded by the
/// verify token and the POST receiver by the payload signature.
///
/// # Routes
/// - `GET /webhook` - WhatsApp webhook verification
/// - `POST /webhook` - WhatsApp webhook receiver
pub fn whatsapp(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(consts::WEBHOOK_PATH)
            .service((super::whatsapp::verify, super::whatsapp::receive)),
    );
}
