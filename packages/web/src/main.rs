use dioxus::prelude::*;

use ui::AuthProvider;
use views::{Dashboard, Login, SignUp};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Root {},
    #[route("/login?:error")]
    Login { error: String },
    #[route("/sign-up")]
    SignUp {},
    #[route("/dashboard")]
    Dashboard {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    #[cfg(feature = "server")]
    {
        tokio::runtime::Runtime::new()
            .expect("Failed to start tokio runtime")
            .block_on(launch_server());
    }

    #[cfg(not(feature = "server"))]
    {
        dioxus::launch(App);
    }
}

#[cfg(feature = "server")]
async fn launch_server() {
    use dioxus::server::{DioxusRouterExt, ServeConfig};
    use tracing_subscriber::EnvFilter;

    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // An enabled method without credentials must stop the server here
    let config = match api::AuthConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid auth configuration: {}", e);
            std::process::exit(1);
        }
    };
    for method in config.enabled_methods() {
        tracing::info!(?method, "Auth method enabled");
    }
    tracing::info!(
        backend = %config.base_url,
        linking = ?config.account_linking,
        origins = ?config.trusted_origins,
        "Auth configuration loaded"
    );

    let router = axum::Router::new()
        .serve_dioxus_application(ServeConfig::new(), App)
        .layer(cors_layer(&config));

    // Use the address from dx serve or default to localhost:8080
    let addr = dioxus::cli_config::fullstack_address_or_localhost();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router.into_make_service())
        .await
        .expect("Server error");
}

/// CORS for the trusted origins, with cookies allowed.
#[cfg(feature = "server")]
fn cors_layer(config: &api::AuthConfig) -> tower_http::cors::CorsLayer {
    use axum::http::{header, HeaderValue, Method};
    use tower_http::cors::{AllowOrigin, CorsLayer};

    let origins: Vec<HeaderValue> = config
        .trusted_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring trusted origin {:?}: {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

#[component]
fn App() -> Element {
    let client = use_hook(ui::default_client);

    rsx! {
        // Global app resources
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        match client {
            Ok(client) => rsx! {
                AuthProvider {
                    client: client,
                    Router::<Route> {}
                }
            },
            Err(e) => rsx! {
                p { class: "auth-form__error", "Sign-in is unavailable: {e}" }
            },
        }
    }
}

/// Redirect `/` to `/dashboard`
#[component]
fn Root() -> Element {
    let nav = use_navigator();
    nav.replace(Route::Dashboard {});
    rsx! {}
}
