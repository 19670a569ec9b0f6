pub mod forms;
pub mod memory;
pub mod session_store;
pub mod supabase;
pub mod traits;

pub use forms::{
    Credentials, PasswordResetForm, SignInForm, SignUpForm, SignUpRequest,
    DEFAULT_MIN_PASSWORD_LENGTH,
};
pub use memory::MemoryAuthProvider;
pub use session_store::{KeyringSessionStore, MemorySessionStore, SessionStore};
pub use supabase::SupabaseAuth;
pub use traits::{AuthProvider, AuthSession, AuthSignal, AuthState, SignUpOutcome, User};

use std::sync::Arc;

use crate::error::AuthError;
use crate::storage::AuthConfig;

/// Build the provider the configuration asks for.
///
/// An empty `auth.url` selects local in-memory accounts; otherwise the
/// hosted backend is used with the session kept in `store`.
///
/// # Errors
/// Returns an error if the configured URL is invalid.
pub fn provider_from_config(
    config: &AuthConfig,
    store: Box<dyn SessionStore>,
) -> Result<Arc<dyn AuthProvider>, AuthError> {
    if config.is_local() {
        return Ok(Arc::new(MemoryAuthProvider::new()));
    }
    let redirect = Some(config.redirect_url.clone());
    Ok(Arc::new(SupabaseAuth::new(
        &config.url,
        &config.anon_key,
        redirect,
        store,
    )?))
}
