#![allow(dead_code)]

use axum::extract::ws::Message;
use futures::channel::mpsc;
use futures::StreamExt;
use setpoint_daemon::session::{Session, SessionEnd, SessionStats};
use setpoint_model::{
    check_inputs, Activation, DenseLayer, Generator, LoadedModel, ModelArtifact, ModelResult,
    Recommender, ARTIFACT_FORMAT,
};
use setpoint_types::{OutputSchema, ProtocolMode, SENSOR_FIELDS, SENSOR_WIDTH};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Outputs `[noise[0], features[0]]` so tests can see both inputs
pub struct NoiseAndFirstFeature;

impl Generator for NoiseAndFirstFeature {
    fn latent_dim(&self) -> usize {
        8
    }

    fn feature_dim(&self) -> usize {
        SENSOR_WIDTH
    }

    fn output_dim(&self) -> usize {
        2
    }

    fn predict(&self, noise: &[f32], features: &[f32]) -> ModelResult<Vec<f32>> {
        check_inputs(self, noise, features)?;
        Ok(vec![noise[0], features[0]])
    }
}

pub fn recommender() -> Arc<Recommender> {
    let schema = OutputSchema::new(["noise_sp", "part_sp"], 2).unwrap();
    let model = LoadedModel::new(Arc::new(NoiseAndFirstFeature), schema).unwrap();
    Arc::new(Recommender::new(model))
}

/// JSON reading with every field set to `value`
pub fn reading_json(value: f64) -> String {
    let map: serde_json::Map<_, _> = SENSOR_FIELDS
        .iter()
        .map(|name| (name.to_string(), serde_json::json!(value)))
        .collect();
    serde_json::Value::Object(map).to_string()
}

/// An artifact for a small dense generator with seven named outputs
pub fn seven_output_artifact() -> ModelArtifact {
    let width = 8 + SENSOR_WIDTH;
    ModelArtifact {
        format: ARTIFACT_FORMAT.to_string(),
        latent_dim: 8,
        inputs: SENSOR_FIELDS.iter().map(|s| s.to_string()).collect(),
        outputs: Some(
            [
                "ffte_feed_flow_rate_sp",
                "ffte_steam_pressure_sp",
                "ffte_production_solids_sp",
                "tfe_input_flow_sp",
                "tfe_out_flow_sp",
                "tfe_steam_pressure_sp",
                "tfe_vacuum_pressure_sp",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        ),
        precision: None,
        layers: vec![
            DenseLayer::new(
                vec![vec![0.05; 12]; width],
                vec![0.0; 12],
                Activation::LeakyRelu { alpha: 0.2 },
            )
            .unwrap(),
            DenseLayer::new(vec![vec![0.1; 7]; 12], vec![0.0; 7], Activation::Sigmoid).unwrap(),
        ],
    }
}

/// In-memory client side of a running session
pub struct Client {
    pub inbound: mpsc::UnboundedSender<Result<Message, axum::Error>>,
    pub outbound: mpsc::UnboundedReceiver<Message>,
    pub handle: JoinHandle<SessionEnd>,
}

impl Client {
    pub fn spawn(session: Session) -> Self {
        let (in_tx, in_rx) = mpsc::unbounded();
        let (out_tx, out_rx) = mpsc::unbounded();
        let handle = tokio::spawn(session.run(in_rx, out_tx));
        Self {
            inbound: in_tx,
            outbound: out_rx,
            handle,
        }
    }

    pub fn connect(mode: ProtocolMode) -> Self {
        Self::spawn(Session::new(
            recommender(),
            mode,
            Arc::new(SessionStats::default()),
        ))
    }

    pub fn send_text(&self, text: impl Into<String>) {
        self.inbound
            .unbounded_send(Ok(Message::Text(text.into())))
            .expect("session should be receiving");
    }

    pub async fn recv(&mut self) -> Option<Message> {
        self.outbound.next().await
    }

    pub async fn recv_text(&mut self) -> String {
        match self.recv().await {
            Some(Message::Text(text)) => text,
            other => panic!("expected a text frame, got {:?}", other),
        }
    }

    pub async fn recv_json(&mut self) -> serde_json::Value {
        let text = self.recv_text().await;
        serde_json::from_str(&text).expect("reply should be JSON")
    }

    /// Hang up and wait for the session to finish
    pub async fn finish(self) -> SessionEnd {
        drop(self.inbound);
        self.handle.await.expect("session task panicked")
    }
}
