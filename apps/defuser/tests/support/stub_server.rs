// Canned solving service over real HTTP for `HttpRoundApi` tests.
//
// Binds to an ephemeral port, answers with fixed JSON shaped like the real
// service, and records every request so tests can check paths and bodies.

use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;

use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use parking_lot::Mutex;
use serde_json::{json, Value};

/// Round id that the stub reports as missing, with a problem-details body.
pub const MISSING_ROUND: i64 = 404;
/// Module id whose solve call fails with a plain-text 500.
pub const BROKEN_MODULE: i64 = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct StubLog {
    requests: Mutex<Vec<Recorded>>,
}

impl StubLog {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().clone()
    }

    pub fn last(&self) -> Option<Recorded> {
        self.requests.lock().last().cloned()
    }

    fn record(&self, req: &HttpRequest, body: Option<Value>) {
        self.requests.lock().push(Recorded {
            method: req.method().to_string(),
            path: req.path().to_string(),
            body,
        });
    }
}

pub struct StubServer {
    pub base_url: String,
    pub log: Arc<StubLog>,
    handle: ServerHandle,
}

impl StubServer {
    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}

fn round_json(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "status": status,
        "startTime": null,
        "roundState": {},
        "bombs": [{
            "id": 11,
            "serialNumber": "AB1C2",
            "batteries": { "aa": 2, "d": 0 },
            "indicators": { "FRK": true },
            "portPlates": [["PARALLEL", "SERIAL"], []],
            "status": "ACTIVE",
            "strikes": 0,
            "modules": [
                { "id": 21, "type": "WIRES", "solved": false,
                  "state": { "wires": ["RED", "BLUE", "BLUE"] } },
                { "id": 22, "type": "BUTTON", "solved": false,
                  "state": { "color": 42 } }
            ]
        }]
    })
}

fn body_of(bytes: &web::Bytes) -> Option<Value> {
    if bytes.is_empty() {
        return None;
    }
    serde_json::from_slice(bytes).ok()
}

async fn handle(req: HttpRequest, bytes: web::Bytes, log: web::Data<StubLog>) -> HttpResponse {
    let body = body_of(&bytes);
    log.record(&req, body.clone());

    let segments: Vec<&str> = req.path().trim_matches('/').split('/').collect();
    let method = req.method().as_str();
    let id = |i: usize| segments.get(i).and_then(|s| s.parse::<i64>().ok()).unwrap_or(0);

    match (method, segments.as_slice()) {
        ("POST", ["rounds"]) => HttpResponse::Ok().json(json!({
            "id": 7, "status": "SETUP", "bombs": []
        })),
        ("GET", ["rounds"]) => HttpResponse::Ok().json(json!([
            round_json(7, "SETUP"),
            { "id": 8, "status": "COMPLETED", "bombs": [] }
        ])),
        ("GET", ["rounds", _]) if id(1) == MISSING_ROUND => {
            HttpResponse::build(StatusCode::NOT_FOUND)
                .content_type("application/problem+json")
                .json(json!({
                    "type": "https://defuser.test/errors/round-not-found",
                    "title": "Round not found",
                    "status": 404,
                    "detail": format!("Round {MISSING_ROUND} does not exist"),
                    "code": "ROUND_NOT_FOUND",
                    "trace_id": "trace-404"
                }))
        }
        ("GET", ["rounds", _]) => HttpResponse::Ok().json(round_json(id(1), "SETUP")),
        ("DELETE", ["rounds", _]) => HttpResponse::NoContent().finish(),
        ("POST", ["rounds", _, "start"]) => {
            let mut round = round_json(id(1), "ACTIVE");
            round["startTime"] = json!("2026-01-02T03:04:05Z");
            HttpResponse::Ok().json(round)
        }
        ("POST", ["rounds", _, "bombs"]) => {
            let config = body.unwrap_or_else(|| json!({}));
            HttpResponse::Ok().json(json!({
                "id": 12,
                "serialNumber": config["serialNumber"],
                "batteries": config["batteries"],
                "indicators": config.get("indicators").cloned().unwrap_or_else(|| json!({})),
                "portPlates": config.get("portPlates").cloned().unwrap_or_else(|| json!([])),
                "status": "ACTIVE",
                "strikes": 0,
                "modules": []
            }))
        }
        ("PATCH", ["rounds", _, "bombs", _]) => HttpResponse::Ok().json(json!({
            "id": id(3),
            "serialNumber": body
                .as_ref()
                .and_then(|b| b.get("serialNumber").cloned())
                .unwrap_or_else(|| json!("AB1C2")),
            "status": "ACTIVE",
            "strikes": 0
        })),
        ("POST", ["rounds", _, "bombs", _, "modules"]) => {
            let request = body.unwrap_or_else(|| json!({}));
            let count = request["count"].as_u64().unwrap_or(0);
            let modules: Vec<Value> = (0..count)
                .map(|i| json!({ "id": 100 + i, "type": request["type"], "solved": false }))
                .collect();
            HttpResponse::Ok().json(modules)
        }
        ("POST", ["rounds", _, "bombs", _, "strikes"]) => HttpResponse::Ok().json(json!({
            "id": id(3),
            "serialNumber": "AB1C2",
            "status": "ACTIVE",
            "strikes": 1
        })),
        ("POST", ["rounds", _, "bombs", _, "modules", _, "solve"])
            if id(5) == BROKEN_MODULE =>
        {
            HttpResponse::InternalServerError()
                .content_type("text/plain")
                .body("solver crashed")
        }
        ("POST", ["rounds", _, "bombs", _, "modules", _, "solve"]) => {
            HttpResponse::Ok().json(json!({ "output": { "cutPosition": 2 }, "solved": true }))
        }
        _ => HttpResponse::NotFound().finish(),
    }
}

/// Start the stub on 127.0.0.1 with an OS-assigned port.
pub async fn start_stub_server() -> Result<StubServer, Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr: SocketAddr = listener.local_addr()?;
    let log = web::Data::new(StubLog::default());
    let shared = log.clone().into_inner();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(log.clone())
            .default_service(web::to(handle))
    })
    .workers(1)
    .listen(listener)?
    .run();

    let handle = server.handle();
    tokio::spawn(server);

    Ok(StubServer {
        base_url: format!("http://{addr}"),
        log: shared,
        handle,
    })
}
