use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the commerce backend, e.g. `http://localhost:8080/api`.
    pub backend_base_url: String,
    /// Publishable client key handed to the payment provider.
    pub provider_client_key: String,
    /// Hosted checkout page of the payment provider.
    pub provider_checkout_url: String,
    /// Public origin of this gateway; the provider redirects back to
    /// success/fail URLs built from it.
    pub public_base_url: String,
    /// Directory holding the persistent store file (cart, order history).
    pub storage_dir: PathBuf,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let backend_base_url = env::var("BACKEND_BASE_URL")?;
        let provider_client_key = env::var("PROVIDER_CLIENT_KEY")?;
        let provider_checkout_url = env::var("PROVIDER_CHECKOUT_URL")
            .unwrap_or_else(|_| "https://pay.example.com/checkout".to_string());
        let public_base_url =
            env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let storage_dir = env::var("STORAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        Ok(Self {
            backend_base_url,
            provider_client_key,
            provider_checkout_url,
            public_base_url,
            storage_dir,
            host,
            port,
        })
    }

    pub fn success_callback_url(&self) -> String {
        format!("{}/payments/success", self.public_base_url)
    }

    pub fn fail_callback_url(&self) -> String {
        format!("{}/payments/fail", self.public_base_url)
    }
}
