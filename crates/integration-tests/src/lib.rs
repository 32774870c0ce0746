//! Integration test support for the knitwear storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p knitwear-integration-tests
//! ```
//!
//! Tests run entirely in-process: checkout talks to an [`OrderApiStub`], an
//! `axum` server bound to an ephemeral port that answers `POST /api/orders`
//! with a canned status and body and records every request it receives.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use knitwear_core::ProductId;
use knitwear_storefront::config::ApiConfig;
use knitwear_storefront::services::{PaymentMethod, ShippingAddress};
use knitwear_storefront::{CheckoutDetails, NewCartItem, ProductSummary, VariantSelection};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Canned reply for the stub order endpoint.
#[derive(Debug, Clone)]
pub struct StubReply {
    pub status: StatusCode,
    pub body: Option<Value>,
    pub delay: Duration,
}

impl StubReply {
    #[must_use]
    pub const fn new(status: StatusCode) -> Self {
        Self {
            status,
            body: None,
            delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Debug, Default)]
struct Recorded {
    bodies: Vec<Value>,
    authorization: Vec<Option<String>>,
}

struct StubState {
    reply: StubReply,
    recorded: Mutex<Recorded>,
}

/// Running stub of the backend order API.
pub struct OrderApiStub {
    addr: SocketAddr,
    state: Arc<StubState>,
}

impl OrderApiStub {
    /// Start the stub on `127.0.0.1` with an OS-assigned port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn(reply: StubReply) -> Self {
        let state = Arc::new(StubState {
            reply,
            recorded: Mutex::new(Recorded::default()),
        });

        let app = Router::new()
            .route("/api/orders", post(create_order))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub listener");
        let addr = listener.local_addr().expect("Stub listener has no address");

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state }
    }

    /// Base URL to configure the storefront with.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// API config pointing at this stub.
    ///
    /// # Panics
    ///
    /// Panics if the stub URL does not parse.
    #[must_use]
    pub fn api_config(&self, timeout: Duration) -> ApiConfig {
        ApiConfig::new(&self.base_url(), timeout).expect("Stub URL is valid")
    }

    /// JSON bodies received so far, in arrival order.
    ///
    /// # Panics
    ///
    /// Panics if the recorder lock is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<Value> {
        self.state
            .recorded
            .lock()
            .expect("Recorder lock poisoned")
            .bodies
            .clone()
    }

    /// `Authorization` header of each request, if one was sent.
    ///
    /// # Panics
    ///
    /// Panics if the recorder lock is poisoned.
    #[must_use]
    pub fn authorization_headers(&self) -> Vec<Option<String>> {
        self.state
            .recorded
            .lock()
            .expect("Recorder lock poisoned")
            .authorization
            .clone()
    }
}

async fn create_order(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    {
        let mut recorded = state.recorded.lock().expect("Recorder lock poisoned");
        recorded.bodies.push(body);
        recorded.authorization.push(
            headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(ToOwned::to_owned),
        );
    }

    if !state.reply.delay.is_zero() {
        tokio::time::sleep(state.reply.delay).await;
    }

    match &state.reply.body {
        Some(body) => (state.reply.status, Json(body.clone())).into_response(),
        None => state.reply.status.into_response(),
    }
}

/// Order endpoint that answers `201 Created` and then drops the connection
/// partway through the body. Returns the base URL to configure.
///
/// Serves a single request.
///
/// # Panics
///
/// Panics if the listener cannot be bound.
pub async fn spawn_truncated_created() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub listener");
    let addr = listener.local_addr().expect("Stub listener has no address");

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        if read_request(&mut socket).await.is_err() {
            return;
        }
        let head = "HTTP/1.1 201 Created\r\n\
                    content-type: application/json\r\n\
                    content-length: 64\r\n\r\n{\"id\":";
        let _ = socket.write_all(head.as_bytes()).await;
        let _ = socket.shutdown().await;
    });

    format!("http://{addr}/api")
}

/// Read one HTTP request (head plus `content-length` body) off the socket.
async fn read_request(socket: &mut tokio::net::TcpStream) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0_u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(chunk.get(..n).unwrap_or_default());

        let Some(head_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(buf.get(..head_end).unwrap_or_default());
        let body_len = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buf.len() >= head_end + 4 + body_len {
            return Ok(());
        }
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// A product as the catalog endpoint would return it.
#[must_use]
pub fn product(id: i64, name: &str, price: &str) -> ProductSummary {
    ProductSummary {
        id: ProductId::new(id),
        name: name.to_string(),
        category: "Sweaters".to_string(),
        price: price.to_string(),
        original_price: None,
        image: format!("/images/products/{id}.jpg"),
        variants: Vec::new(),
    }
}

/// Cart item for a product with no size/color selected.
#[must_use]
pub fn cart_item(id: i64, price: &str) -> NewCartItem {
    product(id, &format!("Knit #{id}"), price).to_cart_item(&VariantSelection::default())
}

/// Complete shipping details paying cash on delivery.
#[must_use]
pub fn checkout_details() -> CheckoutDetails {
    CheckoutDetails {
        shipping_address: ShippingAddress {
            first_name: "Meera".to_string(),
            last_name: "Iyer".to_string(),
            email: "meera@example.in".to_string(),
            phone: "9123456780".to_string(),
            address: "4 Lake View Road".to_string(),
            city: "Chennai".to_string(),
            state: "Tamil Nadu".to_string(),
            zip_code: "600001".to_string(),
        },
        payment_method: PaymentMethod::cash_on_delivery(),
    }
}
