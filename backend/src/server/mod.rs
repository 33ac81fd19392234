//! Server construction and middleware wiring.

mod config;

pub use config::{AppSettings, ServerConfig};

use std::sync::Arc;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
use tracing::{info, warn};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::health::healthz;
use crate::inbound::http::short_links::resolve_short_link;
use crate::inbound::http::state::{HttpState, Repositories};
use crate::inbound::http::{ingredients, recipes, users};
use crate::middleware::Trace;
use crate::outbound::memory::MemoryStore;
use crate::outbound::persistence::{
    DbPool, DieselIngredientRepository, DieselRecipeRepository, DieselRelationRepository,
    DieselShoppingListQuery, DieselUserRepository, PoolConfig,
};

/// Register every `/api/v1` handler.
///
/// Literal segments register before their parameterised siblings: `/users/me`
/// and `/users/subscriptions` precede `/users/{id}`, and
/// `/recipes/download_shopping_cart` precedes `/recipes/{id}`.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(users::register)
        .service(users::login)
        .service(users::me)
        .service(users::subscriptions)
        .service(users::set_avatar)
        .service(users::delete_avatar)
        .service(users::get_user)
        .service(users::subscribe)
        .service(users::unsubscribe)
        .service(ingredients::search_ingredients)
        .service(ingredients::get_ingredient)
        .service(recipes::list_recipes)
        .service(recipes::create_recipe)
        .service(recipes::download_shopping_cart)
        .service(recipes::get_recipe)
        .service(recipes::update_recipe)
        .service(recipes::delete_recipe)
        .service(recipes::add_favorite)
        .service(recipes::remove_favorite)
        .service(recipes::add_to_cart)
        .service(recipes::remove_from_cart)
        .service(recipes::get_short_link);
}

/// Build the session middleware shared by the API scope.
pub fn build_session_middleware(
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build()
}

#[derive(Clone)]
struct AppDependencies {
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = build_session_middleware(key, cookie_secure, same_site);

    let api = web::scope("/api/v1")
        .wrap(session)
        .configure(configure_api);

    let app = App::new()
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(resolve_short_link)
        .service(healthz);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Assemble the service layer from the configured storage backend.
pub fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let repositories = match &config.db_pool {
        Some(pool) => Repositories {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            ingredients: Arc::new(DieselIngredientRepository::new(pool.clone())),
            recipes: Arc::new(DieselRecipeRepository::new(pool.clone())),
            relations: Arc::new(DieselRelationRepository::new(pool.clone())),
            shopping_list: Arc::new(DieselShoppingListQuery::new(pool.clone())),
        },
        None => {
            warn!("no database configured, using the in-memory store");
            let store = Arc::new(MemoryStore::new());
            Repositories {
                users: Arc::clone(&store) as _,
                ingredients: Arc::clone(&store) as _,
                recipes: Arc::clone(&store) as _,
                relations: Arc::clone(&store) as _,
                shopping_list: store as _,
            }
        }
    };
    web::Data::new(HttpState::new(repositories, Arc::new(DefaultClock)))
}

/// Construct an Actix HTTP server from a pre-built configuration and state.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    config: ServerConfig,
    http_state: web::Data<HttpState>,
) -> std::io::Result<Server> {
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        db_pool: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    Ok(server)
}

/// `Key::derive_from` panics below this; undersized files are treated like a
/// missing key instead.
const MIN_SESSION_KEY_BYTES: usize = 32;

/// Read session key material, or generate a throwaway key where permitted.
fn load_session_key(settings: &AppSettings) -> std::io::Result<Key> {
    let key_path = settings.session_key_file();
    let failure = match std::fs::read(&key_path) {
        Ok(bytes) if bytes.len() >= MIN_SESSION_KEY_BYTES => {
            return Ok(Key::derive_from(&bytes));
        }
        Ok(bytes) => format!(
            "session key at {} holds {} bytes, need at least {MIN_SESSION_KEY_BYTES}",
            key_path.display(),
            bytes.len()
        ),
        Err(error) => format!(
            "failed to read session key at {}: {error}",
            key_path.display()
        ),
    };
    if cfg!(debug_assertions) || settings.session_allow_ephemeral {
        warn!(%failure, "using temporary session key (dev only)");
        Ok(Key::generate())
    } else {
        Err(std::io::Error::other(failure))
    }
}

/// Bootstrap storage, state, and the HTTP listener from loaded settings,
/// then drive the server to completion.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the bind address is invalid, the session
/// key cannot be read, or the database pool cannot be built.
pub async fn run(settings: AppSettings) -> std::io::Result<()> {
    let key = load_session_key(&settings)?;
    let bind_addr = settings
        .bind_addr()
        .parse()
        .map_err(|error| std::io::Error::other(format!("invalid bind address: {error}")))?;

    let db_pool = match settings.database_url.as_deref() {
        Some(url) => Some(
            DbPool::new(PoolConfig::new(url))
                .await
                .map_err(|error| std::io::Error::other(error.to_string()))?,
        ),
        None => None,
    };

    let config = ServerConfig::new(key, settings.cookie_secure, SameSite::Lax, bind_addr)
        .with_db_pool(db_pool);
    let http_state = build_http_state(&config);

    if let Some(path) = &settings.catalog_file {
        match http_state.catalog.import_file(path).await {
            Ok(count) => info!(count, path = %path.display(), "ingredient catalog imported"),
            Err(error) => warn!(%error, path = %path.display(), "catalog import failed"),
        }
    }

    info!(addr = %config.bind_addr(), "starting server");
    create_server(config, http_state)?.await
}

#[cfg(test)]
mod tests {
    //! Unit tests for session key loading.

    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    use rstest::rstest;

    fn settings_with_key_file(path: PathBuf) -> AppSettings {
        AppSettings {
            bind_addr: None,
            database_url: None,
            session_key_file: Some(path),
            session_allow_ephemeral: true,
            cookie_secure: false,
            catalog_file: None,
        }
    }

    #[rstest]
    fn full_length_key_material_is_derived() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        let material = [7u8; 64];
        file.write_all(&material).expect("write key material");

        let settings = settings_with_key_file(file.path().to_path_buf());
        let key = load_session_key(&settings).expect("key should load");
        assert_eq!(key.master(), Key::derive_from(&material).master());
    }

    #[rstest]
    #[case::empty(0)]
    #[case::undersized(MIN_SESSION_KEY_BYTES - 1)]
    fn undersized_key_material_falls_back_to_generated(#[case] len: usize) {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(&vec![7u8; len]).expect("write key material");

        let settings = settings_with_key_file(file.path().to_path_buf());
        let key = load_session_key(&settings).expect("fallback key should load");
        assert_ne!(key.master(), Key::derive_from(&[7u8; 64]).master());
    }

    #[rstest]
    fn missing_key_file_falls_back_to_generated() {
        let dir = tempfile::tempdir().expect("temp dir");
        let settings = settings_with_key_file(dir.path().join("absent"));
        load_session_key(&settings).expect("fallback key should load");
    }
}
