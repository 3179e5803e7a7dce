use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use roots_core::{NotifierConfig, NotifyError, NotifyResult};
use serde::Serialize;
use url::Url;

use crate::plan::Channel;

/// Characters left alone by a browser's `encodeURIComponent`
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Strip everything but digits: `+91 98456 51468` becomes `919845651468`
pub fn normalize_destination(raw: &str) -> NotifyResult<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(NotifyError::InvalidDestination(raw.to_string()));
    }
    Ok(digits)
}

pub fn encode_component(text: &str) -> String {
    utf8_percent_encode(text, QUERY_COMPONENT).to_string()
}

/// The three URLs a message can be delivered through. They differ only in
/// scheme and host; phone and text are identical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryLinks {
    pub native: String,
    pub primary: String,
    pub fallback: String,
}

impl DeliveryLinks {
    /// `phone` must already be normalized
    pub fn build(config: &NotifierConfig, phone: &str, message: &str) -> NotifyResult<Self> {
        let text = encode_component(message);

        let links = Self {
            native: format!("{}://send?phone={}&text={}", config.native_scheme, phone, text),
            primary: format!("https://{}/send?phone={}&text={}", config.primary_host, phone, text),
            fallback: format!("https://{}/{}?text={}", config.fallback_host, phone, text),
        };

        for link in [&links.native, &links.primary, &links.fallback] {
            Url::parse(link).map_err(|e| NotifyError::InvalidLink(format!("{}: {}", e, link)))?;
        }

        Ok(links)
    }

    pub fn get(&self, channel: Channel) -> &str {
        match channel {
            Channel::Native => &self.native,
            Channel::Primary => &self.primary,
            Channel::Fallback => &self.fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoded_param(link: &str, key: &str) -> Option<String> {
        Url::parse(link)
            .unwrap()
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn test_normalize_strips_formatting() {
        assert_eq!(normalize_destination("+91 98456 51468").unwrap(), "919845651468");
        assert_eq!(normalize_destination("(080) 2345-6789").unwrap(), "08023456789");
    }

    #[test]
    fn test_normalize_rejects_digitless_input() {
        assert_eq!(
            normalize_destination("call me"),
            Err(NotifyError::InvalidDestination("call me".to_string()))
        );
    }

    #[test]
    fn test_encode_matches_browser_component_encoding() {
        assert_eq!(encode_component("a b&c=d"), "a%20b%26c%3Dd");
        assert_eq!(encode_component("*Total*!~'()-_."), "*Total*!~'()-_.");
        assert_eq!(encode_component("₹"), "%E2%82%B9");
        assert_eq!(encode_component("1+1\n"), "1%2B1%0A");
    }

    #[test]
    fn test_links_share_phone_and_text() {
        let phone = normalize_destination("+91 98456 51468").unwrap();
        let message = "🛍️ *NEW ORDER RECEIVED*\n\nQty: 2 x ₹450.00 = ₹900.00";
        let links = DeliveryLinks::build(&NotifierConfig::default(), &phone, message).unwrap();

        assert!(links.native.starts_with("whatsapp://send?phone=919845651468&text="));
        assert!(links.primary.starts_with("https://api.whatsapp.com/send?phone=919845651468&text="));
        assert!(links.fallback.starts_with("https://wa.me/919845651468?text="));

        for link in [&links.native, &links.primary, &links.fallback] {
            assert_eq!(decoded_param(link, "text").as_deref(), Some(message));
        }
        assert_eq!(decoded_param(&links.primary, "phone").as_deref(), Some("919845651468"));
    }

    #[test]
    fn test_channel_lookup() {
        let links = DeliveryLinks::build(&NotifierConfig::default(), "1", "hi").unwrap();
        assert_eq!(links.get(Channel::Native), "whatsapp://send?phone=1&text=hi");
        assert_eq!(links.get(Channel::Fallback), "https://wa.me/1?text=hi");
    }

    #[test]
    fn test_bad_host_is_reported() {
        let config = NotifierConfig {
            primary_host: "bad host".to_string(),
            ..NotifierConfig::default()
        };
        let result = DeliveryLinks::build(&config, "1", "hi");
        assert!(matches!(result, Err(NotifyError::InvalidLink(_))));
    }
}
