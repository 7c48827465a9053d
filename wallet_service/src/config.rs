use std::env;

/// Configuración del Wallet Service, construida una sola vez en `main` a partir de
/// variables de entorno (cargadas vía `dotenvy::dotenv()`) y pasada por referencia
/// compartida al resto del proceso — reemplaza las lecturas directas de `env::var`
/// dispersas en el `main.rs` original.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub kafka_broker: String,
    pub kafka_topic: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, env::VarError> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);
        let kafka_broker = env::var("KAFKA_BROKER").unwrap_or_else(|_| "localhost:9092".to_string());
        let kafka_topic = env::var("KAFKA_TOPIC").unwrap_or_else(|_| "wallet_events".to_string());

        Ok(Self {
            database_url,
            host,
            port,
            kafka_broker,
            kafka_topic,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
