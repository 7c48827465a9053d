use async_trait::async_trait;
use common::WalletEvent;
use thiserror::Error;

/// Error de publicación — nunca aborta la operación de usuario que lo originó (§4.1:
/// los eventos se emiten solo después del commit local; un fallo de publicación se
/// registra y se descarta, ver DESIGN.md para la decisión de la Open Question).
#[derive(Error, Debug)]
pub enum PublicationError {
    #[error("broker unreachable: {0}")]
    BrokerUnreachable(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Puerto (Port) de publicación de eventos hacia el Event Log (§4.2).
///
/// La implementación decide cuántos mensajes emitir por llamada — eventos de
/// transferencia se publican dos veces, una por cada `partition_keys()` — el llamador
/// solo ve un único evento lógico.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &WalletEvent) -> Result<(), PublicationError>;
}
