//! View controllers: call a client, update local state, report the outcome
//! as notifications. Client errors stop here and are never re-raised.

pub mod auth;
pub mod catalog;

pub use auth::AuthView;
pub use catalog::CatalogView;

use vitrine_client::ClientError;

/// Text shown to the user for a failed call.
pub fn user_message(err: &ClientError) -> String {
    match err {
        ClientError::Validation(msg) | ClientError::Config(msg) => msg.clone(),
        ClientError::Unauthorized { message, .. } | ClientError::Api { message, .. } => {
            message.clone()
        }
        ClientError::Network(_) => "Server unreachable, try again later".to_string(),
        ClientError::Parse(_) => "Unexpected response from server".to_string(),
    }
}
