//! REST-Handler, nach Ressourcen gruppiert

pub mod nachrichten;
pub mod raeume;
pub mod system;
