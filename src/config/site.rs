//! Booking site endpoints.

use serde::Deserialize;

/// URLs of the booking site under watch.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Accommodation page that accepts stay query parameters.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// JSONP endpoint serving the booking widget configuration.
    #[serde(default = "default_widget_config_url")]
    pub widget_config_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            widget_config_url: default_widget_config_url(),
        }
    }
}

fn default_base_url() -> String {
    "https://reservations.ahlsmsworld.com/Yosemite/Plan-Your-Trip/Accommodations/Yosemite-Valley-Lodge/"
        .to_string()
}

fn default_widget_config_url() -> String {
    "https://reservations.ahlsmsworld.com/Yosemite/Search/GetWidgetConfigData".to_string()
}
