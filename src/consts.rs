pub const WHATSAPP_OBJECT: &str = "whatsapp_business_account";
pub const MESSAGES_FIELD: &str = "messages";
pub const SUBSCRIBE_MODE: &str = "subscribe";

pub const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";
pub const SIGNATURE_PREFIX: &str = "sha256=";

pub const MESSAGING_PRODUCT: &str = "whatsapp";
pub const RECIPIENT_TYPE_INDIVIDUAL: &str = "individual";
pub const TEXT_MESSAGE_TYPE: &str = "text";

pub const WEBHOOK_PATH: &str = "/webhook";
