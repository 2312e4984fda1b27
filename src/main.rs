use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use payment_relay::adapters::store::InMemoryProjectionStore;
use payment_relay::adapters::stripe::{StripeConfig, StripeGateway};
use payment_relay::application::confirm_subscription::ConfirmSubscriptionHandler;
use payment_relay::application::create_payment_session::{
    CheckoutUrls, CreatePaymentSessionHandler,
};
use payment_relay::application::handle_webhook::HandleWebhookHandler;
use payment_relay::config::AppConfig;
use payment_relay::domain::reconciler::Reconciler;
use payment_relay::domain::verifier::WebhookVerifier;
use payment_relay::http::{build_router, routes::build_cors, AppState};
use payment_relay::ports::payment_gateway::PaymentGateway;
use payment_relay::ports::projection_store::ProjectionStore;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("fatal: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    let gateway: Arc<dyn PaymentGateway> = Arc::new(StripeGateway::new(StripeConfig::new(
        config.payment.stripe_api_key.clone(),
    )));
    let store: Arc<dyn ProjectionStore> = Arc::new(InMemoryProjectionStore::new());

    let verifier = WebhookVerifier::new(
        config.payment.stripe_webhook_secret.clone(),
        config.payment.webhook_tolerance_secs,
    );
    let reconciler = Reconciler::new(Arc::clone(&store));

    let state = AppState {
        create_session: Arc::new(CreatePaymentSessionHandler::new(
            Arc::clone(&gateway),
            CheckoutUrls {
                success_url: config.payment.success_url.clone(),
                cancel_url: config.payment.cancel_url.clone(),
            },
        )),
        confirm_subscription: Arc::new(ConfirmSubscriptionHandler::new(Arc::clone(&gateway))),
        webhook: Arc::new(HandleWebhookHandler::new(verifier, reconciler)),
    };

    let app = build_router(state)
        .layer(build_cors(&config.server.cors_origins_list()))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id());

    let addr = config.server.socket_addr()?;
    info!(%addr, "payment relay listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
