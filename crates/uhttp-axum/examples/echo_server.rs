//! Echo server with body logging, called through the uhttp client
//!
//! Run with:
//! ```bash
//! RUST_LOG=debug cargo run --example echo_server -p uhttp-axum
//! ```
//!
//! The server logs `gin_request_body` / `gin_response_body` for each POST, and
//! the client logs `resp_body` for each decoded reply.

use axum::routing::post;
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uhttp::{FormFields, HttpClient};
use uhttp_axum::BodyLogLayer;
use uhttp_common::{init_logging, LogConfig};

#[derive(Debug, Serialize, Deserialize)]
struct CleanReply {
    code: i32,
    err: String,
    logid: String,
}

async fn clean(Form(fields): Form<HashMap<String, String>>) -> Json<CleanReply> {
    let park_code = fields.get("park_code").cloned().unwrap_or_default();
    Json(CleanReply {
        code: 0,
        err: String::new(),
        logid: format!("clean-{}", park_code),
    })
}

async fn echo(Json(body): Json<serde_json::Value>) -> Json<serde_json::Value> {
    Json(body)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LogConfig::from_env().default_directive("debug"))?;

    let app = Router::new()
        .route("/mul_vpl_clean", post(clean))
        .route("/echo", post(echo))
        .layer(BodyLogLayer::new());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move { axum::serve(listener, app).await });
    tracing::info!(%addr, "echo server listening");

    let client = HttpClient::with_limits(10, 20)?;

    let mut form = FormFields::new();
    form.add("park_code", "1234");
    let reply: CleanReply = client
        .post_form(&format!("http://{}/mul_vpl_clean", addr), &form)
        .await?;
    tracing::info!(?reply, "form reply");

    let echoed: serde_json::Value = client
        .post(&format!("http://{}/echo", addr), r#"{"plate":"A123"}"#)
        .await?;
    tracing::info!(%echoed, "echo reply");

    Ok(())
}
