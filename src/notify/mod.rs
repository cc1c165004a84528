//! Outbound order notification
//!
//! Builds the WhatsApp deep link for the shopkeeper and relays a formatted
//! order message to the chat-bot messaging API over HTTPS. The notification
//! is best-effort: the order is already persisted before it is sent, and a
//! failure is surfaced to the caller without rollback or retry.

use crate::config::NotifyConfig;
use crate::store::Order;

/// Notification delivery error
#[derive(Debug)]
pub enum NotifyError {
    /// Transport-level failure (connect, TLS, timeout)
    Http(reqwest::Error),
    /// The messaging API answered with a non-success status
    Status(reqwest::StatusCode),
}

impl std::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(e) => write!(f, "notification request failed: {e}"),
            Self::Status(status) => write!(f, "messaging API returned {status}"),
        }
    }
}

impl std::error::Error for NotifyError {}

impl From<reqwest::Error> for NotifyError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

/// Chat-bot API client
pub struct Notifier {
    client: reqwest::Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

impl Notifier {
    pub fn new(config: &NotifyConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
        }
    }

    /// Send a text message to the configured chat
    pub async fn send_message(&self, text: &str) -> Result<(), NotifyError> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);
        let payload = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
        });

        let response = self.client.post(&url).json(&payload).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(NotifyError::Status(response.status()))
        }
    }
}

/// Normalize a customer phone number to the country-code-prefixed form
///
/// Separators and a leading `+` are stripped first. `07xxxxxxxxx` becomes
/// `9647xxxxxxxxx`, numbers already starting with `964` pass through, and any
/// other prefix gets `964` prepended.
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    if digits.starts_with("964") {
        digits
    } else if let Some(national) = digits.strip_prefix('0') {
        format!("964{national}")
    } else {
        format!("964{digits}")
    }
}

/// Build a `wa.me` deep link carrying the order message
pub fn whatsapp_link(phone: &str, text: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(text.as_bytes()).collect();
    format!("https://wa.me/{phone}?text={encoded}")
}

/// Format the order message sent to the shopkeeper
pub fn format_order_message(order: &Order) -> String {
    format!(
        "New order #{id}\n\
         Name: {name}\n\
         Phone: {phone}\n\
         Governorate: {governorate}\n\
         Area: {area}\n\
         Items: {items}\n\
         Total: {total} IQD\n\
         Date: {date}",
        id = order.id,
        name = order.customer_name,
        phone = order.phone,
        governorate = order.governorate,
        area = order.area,
        items = order.items,
        total = order.total,
        date = order.date,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_local_prefix() {
        assert_eq!(normalize_phone("07701234567"), "9647701234567");
    }

    #[test]
    fn test_normalize_already_prefixed() {
        assert_eq!(normalize_phone("9647701234567"), "9647701234567");
    }

    #[test]
    fn test_normalize_bare_national_number() {
        assert_eq!(normalize_phone("7701234567"), "9647701234567");
    }

    #[test]
    fn test_normalize_strips_separators() {
        assert_eq!(normalize_phone("+964 770-123-4567"), "9647701234567");
        assert_eq!(normalize_phone("0770 123 4567"), "9647701234567");
    }

    #[test]
    fn test_whatsapp_link_encodes_text() {
        let link = whatsapp_link("9647701234567", "New order #1\nTotal: 5");
        assert!(link.starts_with("https://wa.me/9647701234567?text="));
        assert!(link.contains("New+order+%231%0ATotal%3A+5"));
    }

    #[test]
    fn test_order_message_contains_fields() {
        let order = Order {
            id: 1700000000000,
            customer_name: "Zainab".to_string(),
            phone: "9647701234567".to_string(),
            governorate: "Baghdad".to_string(),
            area: "Karrada".to_string(),
            items: "2x Sneakers".to_string(),
            total: 45000.0,
            date: "2024-11-14 20:13:20".to_string(),
        };

        let message = format_order_message(&order);
        assert!(message.contains("#1700000000000"));
        assert!(message.contains("Zainab"));
        assert!(message.contains("Baghdad"));
        assert!(message.contains("Karrada"));
        assert!(message.contains("2x Sneakers"));
        assert!(message.contains("45000 IQD"));
    }
}
