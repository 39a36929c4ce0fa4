use crate::api;
use crate::config::Settings;
use crate::content::ContentService;
use crate::Result;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Main application struct that coordinates all components
pub struct Application {
    settings: Arc<Settings>,
    router: axum::Router,
}

impl Application {
    pub fn new() -> Result<Self> {
        Self::with_settings(Settings::new()?)
    }

    pub fn with_settings(settings: Settings) -> Result<Self> {
        let settings = Arc::new(settings);
        let service = Arc::new(ContentService::new(&settings)?);
        let router = api::router(Arc::clone(&settings), service);

        Ok(Self { settings, router })
    }

    pub async fn run(self) -> Result<()> {
        let addr = format!(
            "{}:{}",
            self.settings.application.host, self.settings.application.port
        );
        info!("Starting clubgate server on {addr}");

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, self.router).await?;

        Ok(())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_can_be_created() {
        let app = Application::new().expect("Failed to create application");
        assert!(app.settings().application.port > 0);
    }
}
