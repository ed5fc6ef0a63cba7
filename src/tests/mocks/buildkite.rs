use serde_json::json;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use crate::buildkite::TriggerBuildRequest;

pub const TEST_AUTH_TOKEN: &str = "bk-test-token";

/// Behavior of the mocked create-build endpoint.
#[derive(Clone, Copy, Debug)]
pub enum BuildBehavior {
    /// The build is created and scheduled with a single job.
    Created,
    /// The build is created, but the response carries no jobs.
    NoJobs,
    /// Buildkite reports an internal error.
    InternalError,
}

/// Stands in for the Buildkite REST API and records every build request that
/// the relay sends to it.
pub struct BuildkiteMockServer {
    mock_server: MockServer,
    build_requests: mpsc::Receiver<TriggerBuildRequest>,
}

impl BuildkiteMockServer {
    pub async fn start() -> Self {
        Self::start_with_behavior(BuildBehavior::Created).await
    }

    pub async fn start_with_behavior(behavior: BuildBehavior) -> Self {
        let mock_server = MockServer::start().await;
        let (tx, rx) = mpsc::channel(1024);
        Mock::given(method("POST"))
            .and(path("/builds"))
            .and(header(
                "Authorization",
                format!("Bearer {TEST_AUTH_TOKEN}").as_str(),
            ))
            .respond_with(CreateBuildResponder { behavior, tx })
            .mount(&mock_server)
            .await;
        Self {
            mock_server,
            build_requests: rx,
        }
    }

    /// URL of the mocked create-build endpoint.
    pub fn build_url(&self) -> Url {
        format!("{}/builds", self.mock_server.uri())
            .parse()
            .unwrap()
    }

    /// Returns the next build request received by the mock.
    pub fn expect_build_request(&mut self) -> TriggerBuildRequest {
        self.build_requests
            .try_recv()
            .expect("No build request was received by Buildkite")
    }

    pub fn assert_no_build_requests(&mut self) {
        assert!(matches!(
            self.build_requests.try_recv(),
            Err(TryRecvError::Empty)
        ));
    }
}

struct CreateBuildResponder {
    behavior: BuildBehavior,
    tx: mpsc::Sender<TriggerBuildRequest>,
}

impl Respond for CreateBuildResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let build: TriggerBuildRequest =
            serde_json::from_slice(&request.body).expect("Cannot parse build request");
        self.tx.try_send(build).expect("Cannot record build request");

        match self.behavior {
            BuildBehavior::Created => ResponseTemplate::new(201).set_body_json(json!({
                "id": "f62a1b4d-10f9-4790-bc1c-e2c3a0c80983",
                "url": "https://api.buildkite.com/v2/organizations/acme-inc/pipelines/my-pipeline/builds/27",
                "web_url": "https://buildkite.com/acme-inc/my-pipeline/builds/27",
                "number": 27,
                "state": "scheduled",
                "jobs": [{
                    "id": "b63254c0-3271-4a98-8270-7cfbd6c2f14e",
                    "type": "script",
                    "state": "scheduled",
                    "web_url": "https://buildkite.com/acme-inc/my-pipeline/builds/27#b63254c0-3271-4a98-8270-7cfbd6c2f14e"
                }]
            })),
            BuildBehavior::NoJobs => ResponseTemplate::new(201).set_body_json(json!({
                "id": "f62a1b4d-10f9-4790-bc1c-e2c3a0c80983",
                "web_url": "https://buildkite.com/acme-inc/my-pipeline/builds/27",
                "number": 27,
                "state": "scheduled",
                "jobs": []
            })),
            BuildBehavior::InternalError => {
                ResponseTemplate::new(500).set_body_string("Internal Server Error")
            }
        }
    }
}
