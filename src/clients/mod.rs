//! Clients - integraciones salientes
//!
//! Este módulo contiene los clientes HTTP hacia servicios externos:
//! el sender de avisos de vencimiento y el bus de eventos realtime.

pub mod notifier;

pub use notifier::{
    EventBus, ExpiryWarning, ExpiryWarningSender, LogWarningSender, NoopEventBus,
    WebhookEventBus, WebhookWarningSender,
};
