use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Medicamento {
    pub id: u64,
    pub nome: String,
    pub dosagem: String,
    pub horario: String,
}

#[derive(Deserialize)]
pub struct MedicamentoInput {
    pub nome: String,
    pub dosagem: String,
    pub horario: String,
}

#[derive(Default)]
pub struct Store {
    next_id: u64,
    records: BTreeMap<u64, Medicamento>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/medicamentos", get(list_medicamentos).post(create_medicamento))
        .route(
            "/medicamentos/{id}",
            put(update_medicamento).delete(delete_medicamento),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_medicamentos(State(db): State<Db>) -> Json<Vec<Medicamento>> {
    let store = db.read().await;
    Json(store.records.values().cloned().collect())
}

async fn create_medicamento(
    State(db): State<Db>,
    Json(input): Json<MedicamentoInput>,
) -> (StatusCode, Json<Medicamento>) {
    let mut store = db.write().await;
    store.next_id += 1;
    let record = Medicamento {
        id: store.next_id,
        nome: input.nome,
        dosagem: input.dosagem,
        horario: input.horario,
    };
    store.records.insert(record.id, record.clone());
    tracing::info!(id = record.id, "created medicamento");
    (StatusCode::CREATED, Json(record))
}

async fn update_medicamento(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<MedicamentoInput>,
) -> Result<Json<Medicamento>, StatusCode> {
    let mut store = db.write().await;
    let record = store.records.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    record.nome = input.nome;
    record.dosagem = input.dosagem;
    record.horario = input.horario;
    tracing::info!(id, "updated medicamento");
    Ok(Json(record.clone()))
}

async fn delete_medicamento(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    store.records.remove(&id).ok_or(StatusCode::NOT_FOUND)?;
    tracing::info!(id, "deleted medicamento");
    Ok(StatusCode::NO_CONTENT)
}
